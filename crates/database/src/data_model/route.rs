use async_trait::async_trait;
use model::{
    route::{Route, RouteStep},
    WithId,
};
use navigation::database::{Repo, Result};
use sqlx::{prelude::FromRow, types::Json};
use utility::id::Id;

use crate::{
    queries::route::{delete, get, get_all, insert, update},
    PgDatabase,
};

use super::DatabaseRow;

#[derive(Debug, Clone, FromRow)]
pub struct RouteRow {
    pub id: i64,
    pub start_location: String,
    pub end_location: String,
    pub steps: Json<Vec<RouteStep>>,
}

impl DatabaseRow for RouteRow {
    type Model = Route;

    fn get_id(&self) -> Id<Self::Model> {
        Id::new(self.id)
    }

    fn to_model(self) -> Self::Model {
        Route {
            start_location: self.start_location,
            end_location: self.end_location,
            steps: self.steps.0,
        }
    }
}

#[async_trait]
impl Repo<Route> for PgDatabase {
    async fn get(&self, id: Id<Route>) -> Result<WithId<Route>> {
        get(&self.pool, id).await
    }

    async fn get_all(&self) -> Result<Vec<WithId<Route>>> {
        get_all(&self.pool).await
    }

    async fn insert(&self, element: Route) -> Result<WithId<Route>> {
        insert(&self.pool, element).await
    }

    async fn update(&self, element: WithId<Route>) -> Result<WithId<Route>> {
        update(&self.pool, element).await
    }

    async fn delete(&self, id: Id<Route>) -> Result<()> {
        delete(&self.pool, id).await
    }
}
