//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use validator::{Validate, ValidationError};

/// Letters, digits and ASCII punctuation only
fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username
        .chars()
        .all(|c| c.is_alphanumeric() || c.is_ascii_punctuation())
    {
        Ok(())
    } else {
        Err(ValidationError::new("username_charset")
            .with_message("Username may only contain letters, digits and punctuation".into()))
    }
}

fn validate_meal_update(request: &UpdateMealRequest) -> Result<(), ValidationError> {
    if request.is_empty() {
        Err(ValidationError::new("empty_update")
            .with_message("At least one of name, date, time or calories is required".into()))
    } else {
        Ok(())
    }
}

// ============================================================================
// Auth Requests
// ============================================================================

/// Account signup request
///
/// Password strength is checked by the auth service.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(
        length(min = 5, max = 50, message = "Username must be 5-50 characters"),
        custom(function = "validate_username")
    )]
    pub username: String,

    pub password: String,
}

/// Signin request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SigninRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

// ============================================================================
// User Requests
// ============================================================================

/// Create user request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        length(min = 5, max = 50, message = "Username must be 5-50 characters"),
        custom(function = "validate_username")
    )]
    pub username: String,

    pub password: String,

    /// Checked against the assignable roles by the service
    pub role_id: i16,
}

/// Update user request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(
        length(min = 5, max = 50, message = "Username must be 5-50 characters"),
        custom(function = "validate_username")
    )]
    pub username: String,

    pub role_id: Option<i16>,
}

// ============================================================================
// Meal Requests
// ============================================================================

/// Create meal request
///
/// When `calories` is omitted the meal name is looked up.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMealRequest {
    #[validate(length(min = 1, max = 50, message = "Meal name must be 1-50 characters"))]
    pub name: String,

    pub date: NaiveDate,

    pub time: NaiveTime,

    #[validate(range(min = 0, message = "Calories must not be negative"))]
    pub calories: Option<i32>,
}

/// Partial meal update; omitted fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[validate(schema(function = "validate_meal_update"))]
pub struct UpdateMealRequest {
    #[validate(length(min = 1, max = 50, message = "Meal name must be 1-50 characters"))]
    pub name: Option<String>,

    pub date: Option<NaiveDate>,

    pub time: Option<NaiveTime>,

    #[validate(range(min = 0, message = "Calories must not be negative"))]
    pub calories: Option<i32>,
}

impl UpdateMealRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.date.is_none() && self.time.is_none() && self.calories.is_none()
    }
}

// ============================================================================
// Settings Requests
// ============================================================================

/// Update settings request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateSettingsRequest {
    #[validate(
        required(message = "expected_daily_calories is required"),
        range(min = 0, message = "expected_daily_calories must not be negative")
    )]
    pub expected_daily_calories: Option<i32>,
}
