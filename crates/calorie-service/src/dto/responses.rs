//! Response DTOs for API endpoints
//!
//! All response DTOs implement `Serialize` for JSON output.
//! Dates are `YYYY-MM-DD` and times `HH:MM:SS`.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Serialize;
use uuid::Uuid;

// ============================================================================
// Auth Responses
// ============================================================================

/// Issued access token
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
}

// ============================================================================
// User Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub account_id: Uuid,
    pub username: String,
    pub role_id: i16,
}

// ============================================================================
// Meal Responses
// ============================================================================

/// Meal with the deficit flag of its day
#[derive(Debug, Clone, Serialize)]
pub struct MealResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    #[serde(serialize_with = "serialize_time")]
    pub time: NaiveTime,
    pub name: String,
    pub calories: i32,
    pub calories_deficit: bool,
}

fn serialize_time<S>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(&time.format("%H:%M:%S"))
}

// ============================================================================
// Settings Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct SettingsResponse {
    pub user_id: Uuid,
    pub expected_daily_calories: i32,
}

// ============================================================================
// Health Responses
// ============================================================================

/// State of the service or one of its dependencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Probe {
    Healthy,
    Unhealthy,
}

impl From<bool> for Probe {
    fn from(healthy: bool) -> Self {
        if healthy {
            Self::Healthy
        } else {
            Self::Unhealthy
        }
    }
}

/// Liveness: the process answers
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: Probe,
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: Probe::Healthy,
            version: env!("CARGO_PKG_VERSION"),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness: the store accepts queries
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub ready: bool,
    pub checks: DependencyChecks,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DependencyChecks {
    pub database: Probe,
}

impl ReadinessResponse {
    pub fn from_checks(checks: DependencyChecks) -> Self {
        Self {
            ready: checks.database == Probe::Healthy,
            checks,
            timestamp: Utc::now(),
        }
    }
}
