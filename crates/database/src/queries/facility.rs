use model::{facility::Facility, WithId};
use navigation::database::Result;
use sqlx::{Executor, Postgres};
use utility::{id::Id, let_also::LetAlso};

use crate::data_model::{facility::FacilityRow, with_id, with_ids};

use super::{convert_error, expect_deleted};

pub async fn get<'c, E>(executor: E, id: Id<Facility>) -> Result<WithId<Facility>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as("SELECT id, name, description FROM facilities WHERE id = $1;")
        .bind(id.raw())
        .fetch_one(executor)
        .await
        .map_err(convert_error)
        .map(|row: FacilityRow| with_id(row))
}

pub async fn get_all<'c, E>(executor: E) -> Result<Vec<WithId<Facility>>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as("SELECT id, name, description FROM facilities ORDER BY name;")
        .fetch_all(executor)
        .await
        .map_err(convert_error)?
        .let_owned(|facilities: Vec<FacilityRow>| Ok(with_ids(facilities)))
}

pub async fn insert<'c, E>(executor: E, facility: Facility) -> Result<WithId<Facility>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        INSERT INTO facilities(name, description)
        VALUES ($1, $2)
        RETURNING id, name, description;
        ",
    )
    .bind(&facility.name)
    .bind(&facility.description)
    .fetch_one(executor)
    .await
    .map_err(convert_error)
    .map(|row: FacilityRow| with_id(row))
}

pub async fn update<'c, E>(executor: E, facility: WithId<Facility>) -> Result<WithId<Facility>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        UPDATE facilities
        SET name = $1,
            description = $2
        WHERE id = $3
        RETURNING id, name, description;
        ",
    )
    .bind(&facility.content.name)
    .bind(&facility.content.description)
    .bind(facility.id.raw())
    .fetch_one(executor)
    .await
    .map_err(convert_error)
    .map(|row: FacilityRow| with_id(row))
}

pub async fn delete<'c, E>(executor: E, id: Id<Facility>) -> Result<()>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query("DELETE FROM facilities WHERE id = $1;")
        .bind(id.raw())
        .execute(executor)
        .await
        .map_err(convert_error)
        .and_then(expect_deleted)
}
