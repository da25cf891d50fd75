use async_trait::async_trait;
use model::{
    school::{SchoolInfo, Slide},
    WithId,
};
use navigation::database::{Repo, Result};
use sqlx::{prelude::FromRow, types::Json};
use utility::id::Id;

use crate::{
    queries::school::{delete, get, get_all, insert, update},
    PgDatabase,
};

use super::DatabaseRow;

#[derive(Debug, Clone, FromRow)]
pub struct SchoolInfoRow {
    pub id: i64,
    pub name: String,
    pub about: String,
    pub slideshow: Json<Vec<Slide>>,
}

impl DatabaseRow for SchoolInfoRow {
    type Model = SchoolInfo;

    fn get_id(&self) -> Id<Self::Model> {
        Id::new(self.id)
    }

    fn to_model(self) -> Self::Model {
        SchoolInfo {
            name: self.name,
            about: self.about,
            slideshow: self.slideshow.0,
        }
    }
}

#[async_trait]
impl Repo<SchoolInfo> for PgDatabase {
    async fn get(&self, id: Id<SchoolInfo>) -> Result<WithId<SchoolInfo>> {
        get(&self.pool, id).await
    }

    async fn get_all(&self) -> Result<Vec<WithId<SchoolInfo>>> {
        get_all(&self.pool).await
    }

    async fn insert(&self, element: SchoolInfo) -> Result<WithId<SchoolInfo>> {
        insert(&self.pool, element).await
    }

    async fn update(&self, element: WithId<SchoolInfo>) -> Result<WithId<SchoolInfo>> {
        update(&self.pool, element).await
    }

    async fn delete(&self, id: Id<SchoolInfo>) -> Result<()> {
        delete(&self.pool, id).await
    }
}
