use navigation::database::DatabaseError;
use sqlx::postgres::PgQueryResult;

pub mod facility;
pub mod location;
pub mod route;
pub mod school;
pub mod staff;

/// SQLSTATE of a statement refused by a missing privilege or a row level
/// security policy.
const INSUFFICIENT_PRIVILEGE: &str = "42501";
const UNIQUE_VIOLATION: &str = "23505";

pub(crate) fn convert_error(why: sqlx::Error) -> DatabaseError {
    match why {
        sqlx::Error::RowNotFound => DatabaseError::NotFound,
        sqlx::Error::Database(ref error)
            if error.code().as_deref() == Some(INSUFFICIENT_PRIVILEGE) =>
        {
            DatabaseError::Rejected(error.message().to_owned())
        }
        sqlx::Error::Database(ref error) if error.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            DatabaseError::Conflict(error.message().to_owned())
        }
        _ => DatabaseError::Other(Box::new(why)),
    }
}

/// Deleting a row that is not there is reported as `NotFound`.
pub(crate) fn expect_deleted(result: PgQueryResult) -> navigation::database::Result<()> {
    if result.rows_affected() == 0 {
        Err(DatabaseError::NotFound)
    } else {
        Ok(())
    }
}
