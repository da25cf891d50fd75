use model::{route::Route, WithId};
use navigation::database::Result;
use sqlx::{types::Json, Executor, Postgres};
use utility::{id::Id, let_also::LetAlso};

use crate::data_model::{route::RouteRow, with_id, with_ids};

use super::{convert_error, expect_deleted};

pub async fn get<'c, E>(executor: E, id: Id<Route>) -> Result<WithId<Route>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT id, start_location, end_location, steps
        FROM routes
        WHERE id = $1;
        ",
    )
    .bind(id.raw())
    .fetch_one(executor)
    .await
    .map_err(convert_error)
    .map(|row: RouteRow| with_id(row))
}

/// Routes in store order, which decides between routes sharing endpoints.
pub async fn get_all<'c, E>(executor: E) -> Result<Vec<WithId<Route>>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT id, start_location, end_location, steps
        FROM routes
        ORDER BY id;
        ",
    )
    .fetch_all(executor)
    .await
    .map_err(convert_error)?
    .let_owned(|routes: Vec<RouteRow>| Ok(with_ids(routes)))
}

pub async fn insert<'c, E>(executor: E, route: Route) -> Result<WithId<Route>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        INSERT INTO routes(start_location, end_location, steps)
        VALUES ($1, $2, $3)
        RETURNING id, start_location, end_location, steps;
        ",
    )
    .bind(&route.start_location)
    .bind(&route.end_location)
    .bind(Json(&route.steps))
    .fetch_one(executor)
    .await
    .map_err(convert_error)
    .map(|row: RouteRow| with_id(row))
}

pub async fn update<'c, E>(executor: E, route: WithId<Route>) -> Result<WithId<Route>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        UPDATE routes
        SET start_location = $1,
            end_location = $2,
            steps = $3
        WHERE id = $4
        RETURNING id, start_location, end_location, steps;
        ",
    )
    .bind(&route.content.start_location)
    .bind(&route.content.end_location)
    .bind(Json(&route.content.steps))
    .bind(route.id.raw())
    .fetch_one(executor)
    .await
    .map_err(convert_error)
    .map(|row: RouteRow| with_id(row))
}

pub async fn delete<'c, E>(executor: E, id: Id<Route>) -> Result<()>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query("DELETE FROM routes WHERE id = $1;")
        .bind(id.raw())
        .execute(executor)
        .await
        .map_err(convert_error)
        .and_then(expect_deleted)
}
