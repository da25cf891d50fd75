use model::{location::Location, WithId};
use navigation::database::Result;
use sqlx::{Executor, Postgres};
use utility::{id::Id, let_also::LetAlso};

use crate::data_model::{location::LocationRow, with_id, with_ids};

use super::{convert_error, expect_deleted};

pub async fn get<'c, E>(executor: E, id: Id<Location>) -> Result<WithId<Location>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT id, name, slug, is_classroom
        FROM locations
        WHERE id = $1;
        ",
    )
    .bind(id.raw())
    .fetch_one(executor)
    .await
    .map_err(convert_error)
    .map(|row: LocationRow| with_id(row))
}

pub async fn get_all<'c, E>(executor: E) -> Result<Vec<WithId<Location>>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT id, name, slug, is_classroom
        FROM locations
        ORDER BY name;
        ",
    )
    .fetch_all(executor)
    .await
    .map_err(convert_error)?
    .let_owned(|locations: Vec<LocationRow>| Ok(with_ids(locations)))
}

pub async fn insert<'c, E>(executor: E, location: Location) -> Result<WithId<Location>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        INSERT INTO locations(name, slug, is_classroom)
        VALUES ($1, $2, $3)
        RETURNING id, name, slug, is_classroom;
        ",
    )
    .bind(&location.name)
    .bind(&location.slug)
    .bind(location.is_classroom)
    .fetch_one(executor)
    .await
    .map_err(convert_error)
    .map(|row: LocationRow| with_id(row))
}

pub async fn update<'c, E>(executor: E, location: WithId<Location>) -> Result<WithId<Location>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        UPDATE locations
        SET name = $1,
            slug = $2,
            is_classroom = $3
        WHERE id = $4
        RETURNING id, name, slug, is_classroom;
        ",
    )
    .bind(&location.content.name)
    .bind(&location.content.slug)
    .bind(location.content.is_classroom)
    .bind(location.id.raw())
    .fetch_one(executor)
    .await
    .map_err(convert_error)
    .map(|row: LocationRow| with_id(row))
}

pub async fn delete<'c, E>(executor: E, id: Id<Location>) -> Result<()>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query("DELETE FROM locations WHERE id = $1;")
        .bind(id.raw())
        .execute(executor)
        .await
        .map_err(convert_error)
        .and_then(expect_deleted)
}
