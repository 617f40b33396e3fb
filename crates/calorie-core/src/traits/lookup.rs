//! Calorie lookup port

use async_trait::async_trait;

use super::RepoResult;

/// Resolves a meal name to its calorie count
///
/// Fails with `MealCaloriesNotFound` when the name is unknown.
#[async_trait]
pub trait CalorieLookup: Send + Sync {
    async fn lookup(&self, meal_name: &str) -> RepoResult<i32>;
}
