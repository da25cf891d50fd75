use async_trait::async_trait;
use model::{facility::Facility, WithId};
use navigation::database::{Repo, Result};
use sqlx::prelude::FromRow;
use utility::id::Id;

use crate::{
    queries::facility::{delete, get, get_all, insert, update},
    PgDatabase,
};

use super::DatabaseRow;

#[derive(Debug, Clone, FromRow)]
pub struct FacilityRow {
    pub id: i64,
    pub name: String,
    pub description: String,
}

impl DatabaseRow for FacilityRow {
    type Model = Facility;

    fn get_id(&self) -> Id<Self::Model> {
        Id::new(self.id)
    }

    fn to_model(self) -> Self::Model {
        Facility {
            name: self.name,
            description: self.description,
        }
    }
}

#[async_trait]
impl Repo<Facility> for PgDatabase {
    async fn get(&self, id: Id<Facility>) -> Result<WithId<Facility>> {
        get(&self.pool, id).await
    }

    async fn get_all(&self) -> Result<Vec<WithId<Facility>>> {
        get_all(&self.pool).await
    }

    async fn insert(&self, element: Facility) -> Result<WithId<Facility>> {
        insert(&self.pool, element).await
    }

    async fn update(&self, element: WithId<Facility>) -> Result<WithId<Facility>> {
        update(&self.pool, element).await
    }

    async fn delete(&self, id: Id<Facility>) -> Result<()> {
        delete(&self.pool, id).await
    }
}
