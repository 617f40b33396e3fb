//! Meal entity - one entry in a user's meal ledger

use chrono::{NaiveDate, NaiveTime};
use uuid::Uuid;

/// Meal entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub name: String,
    pub calories: i32,
}

impl Meal {
    /// Create a new meal with a fresh identifier
    pub fn new(
        user_id: Uuid,
        date: NaiveDate,
        time: NaiveTime,
        name: impl Into<String>,
        calories: i32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            date,
            time,
            name: name.into(),
            calories,
        }
    }

    /// Overlay the fields present in `patch`
    pub fn apply(&mut self, patch: MealPatch) {
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(time) = patch.time {
            self.time = time;
        }
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(calories) = patch.calories {
            self.calories = calories;
        }
    }
}

/// Partial meal update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MealPatch {
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub name: Option<String>,
    pub calories: Option<i32>,
}

impl MealPatch {
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.time.is_none() && self.name.is_none() && self.calories.is_none()
    }
}

/// A meal joined with the deficit flag of its day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealEntry {
    pub meal: Meal,
    pub calories_deficit: bool,
}

impl MealEntry {
    pub fn new(meal: Meal, calories_deficit: bool) -> Self {
        Self {
            meal,
            calories_deficit,
        }
    }
}
