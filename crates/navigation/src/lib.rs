use std::fmt;

use database::DatabaseError;
use storage::UploadError;

pub mod admin;
pub mod author;
pub mod client;
pub mod database;
pub mod lookup;
pub mod memory;
pub mod narration;
pub mod playback;
pub mod search;
pub mod storage;

pub use client::Client;

/// The write a data-access call attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Insert,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Insert => write!(f, "INSERT"),
            Self::Update => write!(f, "UPDATE"),
            Self::Delete => write!(f, "DELETE"),
        }
    }
}

/// User input violates a precondition. Nothing was persisted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please select a start and end location.")]
    MissingEndpoint,
    #[error("Start and end locations cannot be the same.")]
    SameEndpoints,
    #[error("Please add at least one step with instructions.")]
    NoSteps,
    #[error("Please add instructions to step {}.", .step + 1)]
    EmptyStepText { step: usize },
    #[error("Please fill in the {field}.")]
    MissingField { field: &'static str },
    #[error("A location called '{name}' already exists.")]
    DuplicateName { name: String },
    #[error("There is no route open in the editor.")]
    NoOpenDraft,
}

/// The backing store refused a write.
#[derive(Debug, thiserror::Error)]
#[error(
    "Operation failed. This is likely due to a missing or incorrect write permission \
     on the '{table}' table for the '{operation}' action. ({source})"
)]
pub struct PersistenceError {
    pub table: &'static str,
    pub operation: Operation,
    pub source: DatabaseError,
}

impl PersistenceError {
    pub fn new(table: &'static str, operation: Operation, source: DatabaseError) -> Self {
        log::error!("{} on '{}' failed: {}", operation, table, source);
        Self {
            table,
            operation,
            source,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotFoundError {
    #[error("Route not found for this destination.")]
    Route { start: String, end: String },
    #[error("There is no location called '{slug}'.")]
    Location { slug: String },
    #[error("There is no record {id} in '{table}'.")]
    Record { table: &'static str, id: i64 },
    #[error("The school information has not been set up yet.")]
    SchoolInfo,
}

/// A device feature the caller asked for is missing or was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CapabilityUnavailable {
    #[error("Text-to-speech is not supported on this device.")]
    Narration,
}

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
    #[error(transparent)]
    CapabilityUnavailable(#[from] CapabilityUnavailable),
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error("Incorrect password.")]
    Unauthorized,
    #[error("Could not load data: {0}")]
    Database(#[from] DatabaseError),
}

pub type RequestResult<O> = Result<O, RequestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn persistence_error_names_table_and_operation() {
        let error = PersistenceError::new(
            "routes",
            Operation::Delete,
            DatabaseError::Rejected("permission denied for table routes".to_owned()),
        );
        let message = error.to_string();
        assert!(message.contains("'routes' table"));
        assert!(message.contains("'DELETE' action"));
        assert!(message.contains("permission denied for table routes"));
    }

    #[test]
    fn empty_step_message_is_one_based() {
        assert_eq!(
            ValidationError::EmptyStepText { step: 0 }.to_string(),
            "Please add instructions to step 1."
        );
    }
}
