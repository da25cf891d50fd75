use model::{school::SchoolInfo, WithId};
use navigation::database::Result;
use sqlx::{types::Json, Executor, Postgres};
use utility::{id::Id, let_also::LetAlso};

use crate::data_model::{school::SchoolInfoRow, with_id, with_ids};

use super::{convert_error, expect_deleted};

pub async fn get<'c, E>(executor: E, id: Id<SchoolInfo>) -> Result<WithId<SchoolInfo>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as("SELECT id, name, about, slideshow FROM school_info WHERE id = $1;")
        .bind(id.raw())
        .fetch_one(executor)
        .await
        .map_err(convert_error)
        .map(|row: SchoolInfoRow| with_id(row))
}

pub async fn get_all<'c, E>(executor: E) -> Result<Vec<WithId<SchoolInfo>>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as("SELECT id, name, about, slideshow FROM school_info ORDER BY id;")
        .fetch_all(executor)
        .await
        .map_err(convert_error)?
        .let_owned(|rows: Vec<SchoolInfoRow>| Ok(with_ids(rows)))
}

pub async fn insert<'c, E>(executor: E, info: SchoolInfo) -> Result<WithId<SchoolInfo>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        INSERT INTO school_info(name, about, slideshow)
        VALUES ($1, $2, $3)
        RETURNING id, name, about, slideshow;
        ",
    )
    .bind(&info.name)
    .bind(&info.about)
    .bind(Json(&info.slideshow))
    .fetch_one(executor)
    .await
    .map_err(convert_error)
    .map(|row: SchoolInfoRow| with_id(row))
}

pub async fn update<'c, E>(executor: E, info: WithId<SchoolInfo>) -> Result<WithId<SchoolInfo>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        UPDATE school_info
        SET name = $1,
            about = $2,
            slideshow = $3
        WHERE id = $4
        RETURNING id, name, about, slideshow;
        ",
    )
    .bind(&info.content.name)
    .bind(&info.content.about)
    .bind(Json(&info.content.slideshow))
    .bind(info.id.raw())
    .fetch_one(executor)
    .await
    .map_err(convert_error)
    .map(|row: SchoolInfoRow| with_id(row))
}

pub async fn delete<'c, E>(executor: E, id: Id<SchoolInfo>) -> Result<()>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query("DELETE FROM school_info WHERE id = $1;")
        .bind(id.raw())
        .execute(executor)
        .await
        .map_err(convert_error)
        .and_then(expect_deleted)
}
