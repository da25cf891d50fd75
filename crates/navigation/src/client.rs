use model::{
    facility::Facility, location::Location, route::Route, school::SchoolInfo, staff::Staff,
    Table, WithId,
};
use utility::{id::Id, let_also::LetAlso, slug::slugify};

use crate::{
    admin::AdminCapability,
    author::RouteAuthor,
    database::{Database, DatabaseError, Repo},
    lookup::Campus,
    NotFoundError, Operation, PersistenceError, RequestError, RequestResult, ValidationError,
};

/// A record type the admin manages through the generic list editor.
pub trait Editable: Table + Clone + Send + Sync + 'static {
    /// Labelled text fields that must not be empty, in form order.
    fn required_fields(&self) -> Vec<(&'static str, &str)>;

    fn before_insert(&mut self) {}

    fn before_update(&mut self, _stored: &Self) {}

    /// A name no two records of this type may share.
    fn unique_name(&self) -> Option<&str> {
        None
    }

    fn validate(&self) -> Result<(), ValidationError> {
        match self
            .required_fields()
            .into_iter()
            .find(|(_, value)| value.trim().is_empty())
        {
            Some((field, _)) => Err(ValidationError::MissingField { field }),
            None => Ok(()),
        }
    }
}

impl Editable for Location {
    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![("Location Name", self.name.as_str())]
    }

    fn before_insert(&mut self) {
        self.slug = slugify(&self.name);
    }

    // Slugs are handed out in QR codes, so a rename keeps the old one.
    fn before_update(&mut self, stored: &Self) {
        self.slug = stored.slug.clone();
    }

    // Routes name their endpoints.
    fn unique_name(&self) -> Option<&str> {
        Some(self.name.trim())
    }
}

impl Editable for Staff {
    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("Name", self.name.as_str()),
            ("Title", self.title.as_str()),
            ("Department", self.department.as_str()),
            ("Office/Room", self.room.as_str()),
        ]
    }
}

impl Editable for Facility {
    fn required_fields(&self) -> Vec<(&'static str, &str)> {
        vec![("Name", self.name.as_str()), ("Description", self.description.as_str())]
    }
}

fn record_not_found<T: Table>(id: Id<T>) -> impl FnOnce(DatabaseError) -> RequestError {
    move |error| match error {
        DatabaseError::NotFound => NotFoundError::Record {
            table: T::TABLE,
            id: id.raw(),
        }
        .into(),
        other => other.into(),
    }
}

fn rejected<T: Table>(operation: Operation) -> impl FnOnce(DatabaseError) -> PersistenceError {
    move |error| PersistenceError::new(T::TABLE, operation, error)
}

/// A unique name clash reported by the store becomes the same validation
/// error the pre-check gives.
fn write_failed<T: Editable>(
    operation: Operation,
    item: &T,
) -> impl FnOnce(DatabaseError) -> RequestError {
    let name = item.unique_name().map(str::to_owned);
    move |error| match (error, name) {
        (DatabaseError::Conflict(_), Some(name)) => ValidationError::DuplicateName { name }.into(),
        (error, _) => rejected::<T>(operation)(error).into(),
    }
}

/// Entry point for everything the application reads and writes.
#[derive(Debug, Clone)]
pub struct Client<D>
where
    D: Database,
{
    pub database: D,
}

impl<D> Client<D>
where
    D: Database,
{
    pub fn new(database: D) -> Self {
        Self { database }
    }

    pub async fn load_campus(&self) -> RequestResult<Campus> {
        let locations = self.get_locations().await?;
        let routes = self.get_routes().await?;
        Campus::new(locations, routes)
            .also(|campus| {
                let orphans = campus.orphaned_routes().len();
                if orphans > 0 {
                    log::warn!("{} routes name a location that does not exist", orphans);
                }
                for route in campus.empty_routes() {
                    log::warn!(
                        "Route {} from '{}' to '{}' has no steps",
                        route.id,
                        route.content.start_location,
                        route.content.end_location
                    );
                }
            })
            .let_owned(Ok)
    }

    pub async fn get_locations(&self) -> RequestResult<Vec<WithId<Location>>> {
        Ok(Repo::<Location>::get_all(&self.database).await?)
    }

    pub async fn get_location_by_slug(&self, slug: &str) -> RequestResult<WithId<Location>> {
        self.get_locations()
            .await?
            .into_iter()
            .find(|location| location.content.slug == slug)
            .ok_or_else(|| {
                NotFoundError::Location {
                    slug: slug.to_owned(),
                }
                .into()
            })
    }

    pub async fn get_routes(&self) -> RequestResult<Vec<WithId<Route>>> {
        Ok(Repo::<Route>::get_all(&self.database).await?)
    }

    pub async fn get_route(&self, id: Id<Route>) -> RequestResult<WithId<Route>> {
        Repo::<Route>::get(&self.database, id)
            .await
            .map_err(record_not_found(id))
    }

    pub async fn get_staff(&self) -> RequestResult<Vec<WithId<Staff>>> {
        Ok(Repo::<Staff>::get_all(&self.database).await?)
    }

    pub async fn get_facilities(&self) -> RequestResult<Vec<WithId<Facility>>> {
        Ok(Repo::<Facility>::get_all(&self.database).await?)
    }

    pub async fn get_school_info(&self) -> RequestResult<WithId<SchoolInfo>> {
        Repo::<SchoolInfo>::get_all(&self.database)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| NotFoundError::SchoolInfo.into())
    }

    pub fn route_author(&self, admin: &AdminCapability) -> RouteAuthor<D> {
        RouteAuthor::new(self.database.clone(), admin)
    }
}

impl<D> Client<D>
where
    D: Database,
{
    pub async fn list<T>(&self) -> RequestResult<Vec<WithId<T>>>
    where
        T: Editable,
        D: Repo<T>,
    {
        Ok(Repo::<T>::get_all(&self.database).await?)
    }

    pub async fn get<T>(&self, id: Id<T>) -> RequestResult<WithId<T>>
    where
        T: Editable,
        D: Repo<T>,
    {
        Repo::<T>::get(&self.database, id)
            .await
            .map_err(record_not_found(id))
    }

    /// Inserts `item` when `id` is `None` and replaces the stored record
    /// otherwise. Nothing is written if a required field is empty or the
    /// name is taken by another record.
    pub async fn save<T>(
        &self,
        _admin: &AdminCapability,
        id: Option<Id<T>>,
        mut item: T,
    ) -> RequestResult<WithId<T>>
    where
        T: Editable,
        D: Repo<T>,
    {
        item.validate()?;
        let saved = match id {
            None => {
                self.ensure_unique_name(None, &item).await?;
                item.before_insert();
                let failed = write_failed(Operation::Insert, &item);
                Repo::<T>::insert(&self.database, item).await.map_err(failed)?
            }
            Some(id) => {
                let stored = self.get(id).await?;
                self.ensure_unique_name(Some(id), &item).await?;
                item.before_update(&stored.content);
                let failed = write_failed(Operation::Update, &item);
                Repo::<T>::update(&self.database, WithId::new(id, item))
                    .await
                    .map_err(failed)?
            }
        };
        log::info!("Saved {} into '{}'", saved.id, T::TABLE);
        Ok(saved)
    }

    async fn ensure_unique_name<T>(&self, id: Option<Id<T>>, item: &T) -> RequestResult<()>
    where
        T: Editable,
        D: Repo<T>,
    {
        let Some(name) = item.unique_name() else {
            return Ok(());
        };
        let taken = self.list::<T>().await?.iter().any(|other| {
            Some(other.id) != id
                && other
                    .content
                    .unique_name()
                    .is_some_and(|other| other.eq_ignore_ascii_case(name))
        });
        if taken {
            return Err(ValidationError::DuplicateName {
                name: name.to_owned(),
            }
            .into());
        }
        Ok(())
    }

    /// Like [`Client::save`], additionally warning when a rename leaves
    /// routes pointing at the old name.
    pub async fn save_location(
        &self,
        admin: &AdminCapability,
        id: Option<Id<Location>>,
        location: Location,
    ) -> RequestResult<WithId<Location>> {
        let previous = match id {
            Some(id) => Some(self.get(id).await?.content.name),
            None => None,
        };
        let saved = self.save(admin, id, location).await?;

        if let Some(previous) = previous.filter(|name| *name != saved.content.name) {
            let stranded = self
                .get_routes()
                .await?
                .iter()
                .filter(|route| {
                    route.content.start_location == previous
                        || route.content.end_location == previous
                })
                .count();
            if stranded > 0 {
                log::warn!(
                    "Renamed '{}' to '{}'; {} routes still use the old name",
                    previous,
                    saved.content.name,
                    stranded
                );
            }
        }
        Ok(saved)
    }

    pub async fn delete<T>(&self, _admin: &AdminCapability, id: Id<T>) -> RequestResult<()>
    where
        T: Editable,
        D: Repo<T>,
    {
        Repo::<T>::delete(&self.database, id)
            .await
            .map_err(|error| match error {
                DatabaseError::NotFound => record_not_found(id)(error),
                other => rejected::<T>(Operation::Delete)(other).into(),
            })?;
        log::info!("Deleted {} from '{}'", id, T::TABLE);
        Ok(())
    }

    pub async fn update_school_info(
        &self,
        _admin: &AdminCapability,
        info: WithId<SchoolInfo>,
    ) -> RequestResult<WithId<SchoolInfo>> {
        Ok(Repo::<SchoolInfo>::update(&self.database, info)
            .await
            .map_err(rejected::<SchoolInfo>(Operation::Update))?)
    }
}
