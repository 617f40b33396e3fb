//! Meal entity <-> model mapper

use calorie_core::entities::{Meal, MealEntry};

use crate::models::{MealEntryModel, MealModel};

impl From<MealModel> for Meal {
    fn from(model: MealModel) -> Self {
        Meal {
            id: model.id,
            user_id: model.user_id,
            date: model.date,
            time: model.time,
            name: model.name,
            calories: model.calories,
        }
    }
}

/// A missing summary row reads as "no deficit"
impl From<MealEntryModel> for MealEntry {
    fn from(model: MealEntryModel) -> Self {
        MealEntry::new(model.meal.into(), model.calories_deficit.unwrap_or(false))
    }
}
