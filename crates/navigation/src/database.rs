use std::{error, result};

use async_trait::async_trait;
use model::{
    facility::Facility, location::Location, route::Route, school::SchoolInfo, staff::Staff,
    Table, WithId,
};
use utility::id::Id;

#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("the requested record does not exist")]
    NotFound,
    /// The backend refused the statement, usually because of a missing
    /// privilege or row level policy.
    #[error("the backend rejected the operation: {0}")]
    Rejected(String),
    /// A unique column already holds the written value.
    #[error("the record conflicts with an existing one: {0}")]
    Conflict(String),
    #[error(transparent)]
    Other(Box<dyn error::Error + Send + Sync>),
}

pub type Result<T> = result::Result<T, DatabaseError>;

/// Read, insert, update and delete by table and id.
///
/// `get_all` returns records in the table's natural order: locations, staff
/// and facilities sorted by name, everything else by id.
#[async_trait]
pub trait Repo<T>
where
    T: Table + Send + Sync + 'static,
{
    async fn get(&self, id: Id<T>) -> Result<WithId<T>>;
    async fn get_all(&self) -> Result<Vec<WithId<T>>>;
    async fn insert(&self, element: T) -> Result<WithId<T>>;
    /// Replaces the stored record. Fails with `NotFound` when the id is unknown.
    async fn update(&self, element: WithId<T>) -> Result<WithId<T>>;
    async fn delete(&self, id: Id<T>) -> Result<()>;
}

/// The data-access collaborator: one repo per table the application knows.
pub trait Database:
    Repo<Location>
    + Repo<Route>
    + Repo<Staff>
    + Repo<Facility>
    + Repo<SchoolInfo>
    + Clone
    + Send
    + Sync
    + Sized
    + 'static
{
}

impl<D> Database for D where
    D: Repo<Location>
        + Repo<Route>
        + Repo<Staff>
        + Repo<Facility>
        + Repo<SchoolInfo>
        + Clone
        + Send
        + Sync
        + Sized
        + 'static
{
}
