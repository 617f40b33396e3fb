//! Error handling utilities for repositories

use calorie_core::error::DomainError;
use sqlx::Error as SqlxError;
use tracing::error;
use uuid::Uuid;

/// SQLSTATE codes that mean the statement itself was malformed
const INVALID_QUERY_STATES: [&str; 3] = [
    "42601", // syntax_error
    "42703", // undefined_column
    "22P02", // invalid_text_representation
];

/// Convert SQLx error to DomainError
///
/// Malformed statements surface as `InvalidQuery`; everything else is an
/// opaque database error whose details are only logged.
pub fn map_db_error(e: SqlxError) -> DomainError {
    if let Some(db_err) = e.as_database_error() {
        if db_err
            .code()
            .is_some_and(|code| INVALID_QUERY_STATES.contains(&code.as_ref()))
        {
            return DomainError::InvalidQuery(db_err.message().to_string());
        }
    }
    error!(error = %e, "Database operation failed");
    DomainError::DatabaseError(e.to_string())
}

/// Check for unique violation and return appropriate error or fallback
pub fn map_unique_violation<F>(e: SqlxError, on_unique: F) -> DomainError
where
    F: FnOnce() -> DomainError,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return on_unique();
        }
    }
    map_db_error(e)
}

/// Create a "user not found" error
pub fn user_not_found(id: Uuid) -> DomainError {
    DomainError::UserNotFound(id)
}
