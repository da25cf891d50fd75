use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, RwLock, RwLockReadGuard, RwLockWriteGuard,
};

use async_trait::async_trait;
use model::{
    facility::Facility, location::Location, route::Route, school::SchoolInfo, staff::Staff,
    Table, WithId,
};
use serde::Deserialize;
use tables::{MemoryTable, Tables};
use utility::{id::Id, slug::slugify};

use crate::database::{DatabaseError, Repo, Result};

mod tables {
    use std::collections::HashSet;

    use indexmap::IndexMap;
    use model::{
        facility::Facility, location::Location, route::Route, school::SchoolInfo,
        staff::Staff, Table, WithId,
    };

    #[derive(Debug, Default)]
    pub struct Tables {
        pub next_id: i64,
        pub locations: IndexMap<i64, Location>,
        pub routes: IndexMap<i64, Route>,
        pub staff: IndexMap<i64, Staff>,
        pub facilities: IndexMap<i64, Facility>,
        pub school_info: IndexMap<i64, SchoolInfo>,
        pub denied: HashSet<&'static str>,
    }

    impl Tables {
        pub fn allocate_id(&mut self) -> i64 {
            self.next_id += 1;
            self.next_id
        }
    }

    /// Selects the map backing a record type.
    pub trait MemoryTable: Table + Clone + Send + Sync + 'static {
        fn rows(tables: &Tables) -> &IndexMap<i64, Self>;
        fn rows_mut(tables: &mut Tables) -> &mut IndexMap<i64, Self>;

        /// Brings a listing into the table's natural order. Rows are kept in
        /// id order already.
        fn sort(_rows: &mut [WithId<Self>]) {}

        /// Whether both rows hold the same value in a unique column.
        fn clashes(&self, _other: &Self) -> bool {
            false
        }
    }

    fn by_name<T, F>(rows: &mut [WithId<T>], name: F)
    where
        T: Table + Clone,
        F: Fn(&T) -> &str,
    {
        rows.sort_by(|a, b| name(&a.content).cmp(name(&b.content)));
    }

    impl MemoryTable for Location {
        fn rows(tables: &Tables) -> &IndexMap<i64, Self> {
            &tables.locations
        }

        fn rows_mut(tables: &mut Tables) -> &mut IndexMap<i64, Self> {
            &mut tables.locations
        }

        fn sort(rows: &mut [WithId<Self>]) {
            by_name(rows, |location| location.name.as_str());
        }

        fn clashes(&self, other: &Self) -> bool {
            self.name == other.name
        }
    }

    impl MemoryTable for Route {
        fn rows(tables: &Tables) -> &IndexMap<i64, Self> {
            &tables.routes
        }

        fn rows_mut(tables: &mut Tables) -> &mut IndexMap<i64, Self> {
            &mut tables.routes
        }
    }

    impl MemoryTable for Staff {
        fn rows(tables: &Tables) -> &IndexMap<i64, Self> {
            &tables.staff
        }

        fn rows_mut(tables: &mut Tables) -> &mut IndexMap<i64, Self> {
            &mut tables.staff
        }

        fn sort(rows: &mut [WithId<Self>]) {
            by_name(rows, |staff| staff.name.as_str());
        }
    }

    impl MemoryTable for Facility {
        fn rows(tables: &Tables) -> &IndexMap<i64, Self> {
            &tables.facilities
        }

        fn rows_mut(tables: &mut Tables) -> &mut IndexMap<i64, Self> {
            &mut tables.facilities
        }

        fn sort(rows: &mut [WithId<Self>]) {
            by_name(rows, |facility| facility.name.as_str());
        }
    }

    impl MemoryTable for SchoolInfo {
        fn rows(tables: &Tables) -> &IndexMap<i64, Self> {
            &tables.school_info
        }

        fn rows_mut(tables: &mut Tables) -> &mut IndexMap<i64, Self> {
            &mut tables.school_info
        }
    }
}

/// Seed data for a [`MemoryDatabase`], usually read from a JSON file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Fixture {
    pub school_info: Option<SchoolInfo>,
    pub locations: Vec<FixtureLocation>,
    pub routes: Vec<Route>,
    pub staff: Vec<Staff>,
    pub facilities: Vec<Facility>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureLocation {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub is_classroom: bool,
}

/// A data-access collaborator that keeps every table in memory.
///
/// Cloning is cheap and clones share their tables. Individual tables can be
/// told to reject writes, which is how a misconfigured backend looks from
/// the outside.
#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    tables: Arc<RwLock<Tables>>,
    writes: Arc<AtomicUsize>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fixture(fixture: Fixture) -> Self {
        let database = Self::new();
        {
            let mut tables = database.write();
            if let Some(info) = fixture.school_info {
                let id = tables.allocate_id();
                tables.school_info.insert(id, info);
            }
            for location in fixture.locations {
                let id = tables.allocate_id();
                let slug = location.slug.unwrap_or_else(|| slugify(&location.name));
                tables.locations.insert(
                    id,
                    Location {
                        name: location.name,
                        slug,
                        is_classroom: location.is_classroom,
                    },
                );
            }
            for route in fixture.routes {
                let id = tables.allocate_id();
                tables.routes.insert(id, route);
            }
            for staff in fixture.staff {
                let id = tables.allocate_id();
                tables.staff.insert(id, staff);
            }
            for facility in fixture.facilities {
                let id = tables.allocate_id();
                tables.facilities.insert(id, facility);
            }
        }
        database
    }

    /// Makes every following insert, update and delete on `table` fail with
    /// [`DatabaseError::Rejected`].
    pub fn deny_writes(&self, table: &'static str) {
        self.write().denied.insert(table);
    }

    /// Number of write operations that reached the store, rejected or not.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn begin_write<T: Table>(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let tables = self.write();
        if tables.denied.contains(T::TABLE) {
            return Err(DatabaseError::Rejected(format!(
                "permission denied for table {}",
                T::TABLE
            )));
        }
        Ok(tables)
    }
}

fn ensure_no_clash<T: MemoryTable>(tables: &Tables, id: i64, row: &T) -> Result<()> {
    match T::rows(tables)
        .iter()
        .find(|(other_id, other)| **other_id != id && row.clashes(other))
    {
        Some((other_id, _)) => Err(DatabaseError::Conflict(format!(
            "row {} in {} holds the same unique value",
            other_id,
            T::TABLE
        ))),
        None => Ok(()),
    }
}

#[async_trait]
impl<T> Repo<T> for MemoryDatabase
where
    T: MemoryTable,
{
    async fn get(&self, id: Id<T>) -> Result<WithId<T>> {
        T::rows(&self.read())
            .get(&id.raw())
            .cloned()
            .map(|row| WithId::new(id, row))
            .ok_or(DatabaseError::NotFound)
    }

    async fn get_all(&self) -> Result<Vec<WithId<T>>> {
        let mut rows = T::rows(&self.read())
            .iter()
            .map(|(id, row)| WithId::new(Id::new(*id), row.clone()))
            .collect::<Vec<_>>();
        T::sort(&mut rows);
        Ok(rows)
    }

    async fn insert(&self, element: T) -> Result<WithId<T>> {
        let mut tables = self.begin_write::<T>()?;
        ensure_no_clash(&tables, 0, &element)?;
        let id = tables.allocate_id();
        T::rows_mut(&mut tables).insert(id, element.clone());
        Ok(WithId::new(Id::new(id), element))
    }

    async fn update(&self, element: WithId<T>) -> Result<WithId<T>> {
        let mut tables = self.begin_write::<T>()?;
        ensure_no_clash(&tables, element.id.raw(), &element.content)?;
        match T::rows_mut(&mut tables).get_mut(&element.id.raw()) {
            Some(row) => {
                *row = element.content.clone();
                Ok(element)
            }
            None => Err(DatabaseError::NotFound),
        }
    }

    async fn delete(&self, id: Id<T>) -> Result<()> {
        let mut tables = self.begin_write::<T>()?;
        T::rows_mut(&mut tables)
            .shift_remove(&id.raw())
            .map(|_| ())
            .ok_or(DatabaseError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use model::route::RouteStep;

    use super::*;

    #[tokio::test]
    async fn locations_are_listed_by_name() {
        let database = MemoryDatabase::new();
        for name in ["Library", "Gym", "Main Office"] {
            Repo::<Location>::insert(&database, Location::new(name, false))
                .await
                .unwrap();
        }
        let names = Repo::<Location>::get_all(&database)
            .await
            .unwrap()
            .into_iter()
            .map(|location| location.content.name)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Gym", "Library", "Main Office"]);
    }

    #[tokio::test]
    async fn routes_are_listed_in_store_order() {
        let database = MemoryDatabase::new();
        for (start, end) in [("B", "A"), ("A", "B")] {
            Repo::<Route>::insert(
                &database,
                Route {
                    start_location: start.to_owned(),
                    end_location: end.to_owned(),
                    steps: vec![RouteStep::text("walk")],
                },
            )
            .await
            .unwrap();
        }
        let routes = Repo::<Route>::get_all(&database).await.unwrap();
        assert_eq!(routes[0].content.start_location, "B");
        assert_eq!(routes[1].content.start_location, "A");
    }

    #[tokio::test]
    async fn denied_tables_reject_writes() {
        let database = MemoryDatabase::new();
        database.deny_writes(Staff::TABLE);
        let result = Repo::<Staff>::insert(
            &database,
            Staff {
                name: "A".to_owned(),
                title: "B".to_owned(),
                department: "C".to_owned(),
                room: "D".to_owned(),
            },
        )
        .await;
        assert_matches!(result, Err(DatabaseError::Rejected(_)));
        assert_eq!(database.write_count(), 1);
        assert!(Repo::<Staff>::get_all(&database).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn location_names_are_unique() {
        let database = MemoryDatabase::new();
        let gym = Repo::<Location>::insert(&database, Location::new("Gym", false))
            .await
            .unwrap();
        let hall = Repo::<Location>::insert(&database, Location::new("Hall", false))
            .await
            .unwrap();

        assert_matches!(
            Repo::<Location>::insert(&database, Location::new("Gym", true)).await,
            Err(DatabaseError::Conflict(_))
        );
        assert_matches!(
            Repo::<Location>::update(&database, WithId::new(hall.id, Location::new("Gym", false)))
                .await,
            Err(DatabaseError::Conflict(_))
        );
        Repo::<Location>::update(&database, WithId::new(gym.id, Location::new("Gym", true)))
            .await
            .unwrap();
        assert_eq!(Repo::<Location>::get_all(&database).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn updating_an_unknown_record_fails() {
        let database = MemoryDatabase::new();
        let result = Repo::<Location>::update(
            &database,
            WithId::new(Id::new(99), Location::new("Nowhere", false)),
        )
        .await;
        assert_matches!(result, Err(DatabaseError::NotFound));
    }

    #[test]
    fn fixture_locations_get_a_slug() {
        let fixture: Fixture = serde_json::from_str(
            r#"{ "locations": [{ "name": "Main Office" }, { "name": "Room 4", "isClassroom": true }] }"#,
        )
        .unwrap();
        let database = MemoryDatabase::from_fixture(fixture);
        let tables = database.read();
        let slugs = tables
            .locations
            .values()
            .map(|location| location.slug.as_str())
            .collect::<Vec<_>>();
        assert_eq!(slugs, vec!["main-office", "room-4"]);
    }
}
