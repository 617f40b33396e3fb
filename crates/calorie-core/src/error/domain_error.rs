//! Domain errors - error types for the domain layer

use thiserror::Error;
use uuid::Uuid;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(Uuid),

    #[error("Meal not found: {0}")]
    MealNotFound(Uuid),

    #[error("Calories not found for meal")]
    MealCaloriesNotFound,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Invalid role id: {0}")]
    InvalidRoleId(i16),

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Insufficient permissions: {0}")]
    InsufficientPermissions(String),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("User already exists")]
    UserAlreadyExists,

    #[error("Account already exists")]
    AccountAlreadyExists,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::MealNotFound(_) => "MEAL_NOT_FOUND",
            Self::MealCaloriesNotFound => "MEAL_CALORIES_NOT_FOUND",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::InvalidFilter(_) => "INVALID_FILTER",
            Self::InvalidQuery(_) => "INVALID_QUERY",
            Self::InvalidRoleId(_) => "INVALID_ROLE_ID",

            // Authorization
            Self::InsufficientPermissions(_) => "INSUFFICIENT_PERMISSIONS",

            // Conflict
            Self::UserAlreadyExists => "USER_ALREADY_EXISTS",
            Self::AccountAlreadyExists => "ACCOUNT_ALREADY_EXISTS",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_) | Self::MealNotFound(_) | Self::MealCaloriesNotFound
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::InvalidFilter(_)
                | Self::InvalidQuery(_)
                | Self::InvalidRoleId(_)
        )
    }

    /// Check if this is an authorization error
    pub fn is_authorization(&self) -> bool {
        matches!(self, Self::InsufficientPermissions(_))
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::UserAlreadyExists | Self::AccountAlreadyExists)
    }

    /// Check if this error wraps an infrastructure failure
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::DatabaseError(_) | Self::InternalError(_))
    }

    /// HTTP status the error is reported with
    pub fn status_code(&self) -> u16 {
        if self.is_not_found() {
            404
        } else if self.is_validation() {
            400
        } else if self.is_authorization() {
            403
        } else if self.is_conflict() {
            409
        } else {
            500
        }
    }
}
