use model::{staff::Staff, WithId};
use navigation::database::Result;
use sqlx::{Executor, Postgres};
use utility::{id::Id, let_also::LetAlso};

use crate::data_model::{staff::StaffRow, with_id, with_ids};

use super::{convert_error, expect_deleted};

pub async fn get<'c, E>(executor: E, id: Id<Staff>) -> Result<WithId<Staff>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT id, name, title, department, room
        FROM staff
        WHERE id = $1;
        ",
    )
    .bind(id.raw())
    .fetch_one(executor)
    .await
    .map_err(convert_error)
    .map(|row: StaffRow| with_id(row))
}

pub async fn get_all<'c, E>(executor: E) -> Result<Vec<WithId<Staff>>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT id, name, title, department, room
        FROM staff
        ORDER BY name;
        ",
    )
    .fetch_all(executor)
    .await
    .map_err(convert_error)?
    .let_owned(|staff: Vec<StaffRow>| Ok(with_ids(staff)))
}

pub async fn insert<'c, E>(executor: E, staff: Staff) -> Result<WithId<Staff>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        INSERT INTO staff(name, title, department, room)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, title, department, room;
        ",
    )
    .bind(&staff.name)
    .bind(&staff.title)
    .bind(&staff.department)
    .bind(&staff.room)
    .fetch_one(executor)
    .await
    .map_err(convert_error)
    .map(|row: StaffRow| with_id(row))
}

pub async fn update<'c, E>(executor: E, staff: WithId<Staff>) -> Result<WithId<Staff>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        UPDATE staff
        SET name = $1,
            title = $2,
            department = $3,
            room = $4
        WHERE id = $5
        RETURNING id, name, title, department, room;
        ",
    )
    .bind(&staff.content.name)
    .bind(&staff.content.title)
    .bind(&staff.content.department)
    .bind(&staff.content.room)
    .bind(staff.id.raw())
    .fetch_one(executor)
    .await
    .map_err(convert_error)
    .map(|row: StaffRow| with_id(row))
}

pub async fn delete<'c, E>(executor: E, id: Id<Staff>) -> Result<()>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query("DELETE FROM staff WHERE id = $1;")
        .bind(id.raw())
        .execute(executor)
        .await
        .map_err(convert_error)
        .and_then(expect_deleted)
}
