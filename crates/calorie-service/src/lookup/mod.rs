//! Calorie lookup clients

mod nutritionix;

use async_trait::async_trait;

use calorie_core::error::DomainError;
use calorie_core::traits::{CalorieLookup, RepoResult};

pub use nutritionix::NutritionixLookup;

/// Lookup used when no provider is configured; it never finds anything
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledLookup;

#[async_trait]
impl CalorieLookup for DisabledLookup {
    async fn lookup(&self, _meal_name: &str) -> RepoResult<i32> {
        Err(DomainError::MealCaloriesNotFound)
    }
}
