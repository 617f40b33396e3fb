//! Settings database model

use sqlx::FromRow;
use uuid::Uuid;

/// Database model for users_settings table
#[derive(Debug, Clone, FromRow)]
pub struct SettingsModel {
    pub user_id: Uuid,
    pub expected_daily_calories: i32,
}
