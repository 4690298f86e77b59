//! Diesel and pool error translation shared by the repositories.
//!
//! Each repository passes its own `connection`/`query` constructors so the
//! resulting error names the store that failed.

use tracing::debug;

use super::pool::PoolError;

/// Turn a pool failure into the repository's connection error.
pub(crate) fn map_pool_error<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Turn a Diesel failure into the repository's query or connection error.
///
/// Driver messages are logged at debug level and replaced with generic text
/// so SQL never reaches callers.
pub(crate) fn map_diesel_error<E>(
    error: diesel::result::Error,
    query: impl FnOnce(&'static str) -> E,
    connection: impl FnOnce(&'static str) -> E,
) -> E {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection closed")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            query("unique constraint violated")
        }
        DieselError::NotFound => query("record not found"),
        _ => query("database error"),
    }
}
