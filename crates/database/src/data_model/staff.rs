use async_trait::async_trait;
use model::{staff::Staff, WithId};
use navigation::database::{Repo, Result};
use sqlx::prelude::FromRow;
use utility::id::Id;

use crate::{
    queries::staff::{delete, get, get_all, insert, update},
    PgDatabase,
};

use super::DatabaseRow;

#[derive(Debug, Clone, FromRow)]
pub struct StaffRow {
    pub id: i64,
    pub name: String,
    pub title: String,
    pub department: String,
    pub room: String,
}

impl DatabaseRow for StaffRow {
    type Model = Staff;

    fn get_id(&self) -> Id<Self::Model> {
        Id::new(self.id)
    }

    fn to_model(self) -> Self::Model {
        Staff {
            name: self.name,
            title: self.title,
            department: self.department,
            room: self.room,
        }
    }
}

#[async_trait]
impl Repo<Staff> for PgDatabase {
    async fn get(&self, id: Id<Staff>) -> Result<WithId<Staff>> {
        get(&self.pool, id).await
    }

    async fn get_all(&self) -> Result<Vec<WithId<Staff>>> {
        get_all(&self.pool).await
    }

    async fn insert(&self, element: Staff) -> Result<WithId<Staff>> {
        insert(&self.pool, element).await
    }

    async fn update(&self, element: WithId<Staff>) -> Result<WithId<Staff>> {
        update(&self.pool, element).await
    }

    async fn delete(&self, id: Id<Staff>) -> Result<()> {
        delete(&self.pool, id).await
    }
}
