//! Settings entity - a user's daily calorie target

use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub user_id: Uuid,
    pub expected_daily_calories: i32,
}

impl Settings {
    pub fn new(user_id: Uuid, expected_daily_calories: i32) -> Self {
        Self {
            user_id,
            expected_daily_calories,
        }
    }

    /// Settings of a user who never set a target
    pub fn unset(user_id: Uuid) -> Self {
        Self::new(user_id, 0)
    }
}
