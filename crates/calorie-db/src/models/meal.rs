//! Meal database models

use chrono::{NaiveDate, NaiveTime};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for users_meals table
#[derive(Debug, Clone, FromRow)]
pub struct MealModel {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub name: String,
    pub calories: i32,
}

/// Meal row left-joined with its day's summary
#[derive(Debug, Clone, FromRow)]
pub struct MealEntryModel {
    #[sqlx(flatten)]
    pub meal: MealModel,
    /// NULL when the day has no summary row
    pub calories_deficit: Option<bool>,
}
