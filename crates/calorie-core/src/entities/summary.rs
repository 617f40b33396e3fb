//! Daily summary - derived per-user, per-day calorie total

use chrono::NaiveDate;
use uuid::Uuid;

/// Derived summary of one user's day
///
/// `total_calories` is the sum of that day's meals and `calories_deficit`
/// is `total_calories < target`. Rows are upserted and never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySummary {
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub total_calories: i64,
    pub calories_deficit: bool,
}

impl DailySummary {
    /// Build the summary for a day total against a daily target
    pub fn compute(user_id: Uuid, date: NaiveDate, total_calories: i64, target: i32) -> Self {
        Self {
            user_id,
            date,
            total_calories,
            calories_deficit: is_deficit(total_calories, target),
        }
    }
}

/// The single deficit rule shared by recompute and bulk flag refresh
#[inline]
pub fn is_deficit(total_calories: i64, target: i32) -> bool {
    total_calories < i64::from(target)
}
