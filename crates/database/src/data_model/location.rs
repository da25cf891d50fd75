use async_trait::async_trait;
use model::{location::Location, WithId};
use navigation::database::{Repo, Result};
use sqlx::prelude::FromRow;
use utility::id::Id;

use crate::{
    queries::location::{delete, get, get_all, insert, update},
    PgDatabase,
};

use super::DatabaseRow;

#[derive(Debug, Clone, FromRow)]
pub struct LocationRow {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub is_classroom: Option<bool>,
}

impl DatabaseRow for LocationRow {
    type Model = Location;

    fn get_id(&self) -> Id<Self::Model> {
        Id::new(self.id)
    }

    fn to_model(self) -> Self::Model {
        Location {
            name: self.name,
            slug: self.slug,
            is_classroom: self.is_classroom.unwrap_or(false),
        }
    }
}

#[async_trait]
impl Repo<Location> for PgDatabase {
    async fn get(&self, id: Id<Location>) -> Result<WithId<Location>> {
        get(&self.pool, id).await
    }

    async fn get_all(&self) -> Result<Vec<WithId<Location>>> {
        get_all(&self.pool).await
    }

    async fn insert(&self, element: Location) -> Result<WithId<Location>> {
        insert(&self.pool, element).await
    }

    async fn update(&self, element: WithId<Location>) -> Result<WithId<Location>> {
        update(&self.pool, element).await
    }

    async fn delete(&self, id: Id<Location>) -> Result<()> {
        delete(&self.pool, id).await
    }
}
