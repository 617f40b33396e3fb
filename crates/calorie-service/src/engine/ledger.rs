//! Meal ledger
//!
//! Writes meals and recomputes the touched days in the same transaction.

use tracing::{info, instrument};
use uuid::Uuid;

use calorie_core::entities::{Meal, MealEntry};
use calorie_core::error::DomainError;
use calorie_core::traits::{LedgerTransaction, LockMode, MealRepository, RepoResult, UnitOfWork};
use calorie_core::value_objects::{FilterExpr, Page, PageRequest};

use super::aggregator;
use super::transaction::finish;

/// Meal ledger bound to a unit of work and a read-side repository
pub struct MealLedger<'a> {
    uow: &'a dyn UnitOfWork,
    meals: &'a dyn MealRepository,
}

impl<'a> MealLedger<'a> {
    pub fn new(uow: &'a dyn UnitOfWork, meals: &'a dyn MealRepository) -> Self {
        Self { uow, meals }
    }

    /// Persist a new meal and recompute its day
    #[instrument(skip(self, meal), fields(user_id = %meal.user_id, date = %meal.date))]
    pub async fn create(&self, meal: Meal) -> RepoResult<MealEntry> {
        let mut tx = self.uow.begin().await?;
        let result = create_in(tx.as_mut(), &meal).await;
        let deficit = finish(tx, result).await?;

        info!(meal_id = %meal.id, "Meal created");
        Ok(MealEntry::new(meal, deficit))
    }

    pub async fn read(&self, user_id: Uuid, meal_id: Uuid) -> RepoResult<MealEntry> {
        self.meals
            .find(user_id, meal_id)
            .await?
            .ok_or(DomainError::MealNotFound(meal_id))
    }

    pub async fn list(
        &self,
        user_id: Uuid,
        page: PageRequest,
        filter: Option<&FilterExpr>,
    ) -> RepoResult<Page<MealEntry>> {
        self.meals.list(user_id, page, filter).await
    }

    /// Overwrite a stored meal
    ///
    /// Recomputes the new date and, when the meal moved, the previous one.
    #[instrument(skip(self, meal), fields(user_id = %meal.user_id, meal_id = %meal.id))]
    pub async fn update(&self, meal: Meal) -> RepoResult<MealEntry> {
        let mut tx = self.uow.begin().await?;
        let result = update_in(tx.as_mut(), &meal).await;
        let deficit = finish(tx, result).await?;

        info!("Meal updated");
        Ok(MealEntry::new(meal, deficit))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, user_id: Uuid, meal_id: Uuid) -> RepoResult<()> {
        let mut tx = self.uow.begin().await?;
        let result = delete_in(tx.as_mut(), user_id, meal_id).await;
        finish(tx, result).await?;

        info!("Meal deleted");
        Ok(())
    }
}

async fn create_in(tx: &mut dyn LedgerTransaction, meal: &Meal) -> RepoResult<bool> {
    tx.lock_user(meal.user_id, LockMode::Shared).await?;
    tx.insert_meal(meal).await?;
    let summary = aggregator::recompute(tx, meal.user_id, meal.date).await?;
    Ok(summary.calories_deficit)
}

async fn update_in(tx: &mut dyn LedgerTransaction, meal: &Meal) -> RepoResult<bool> {
    tx.lock_user(meal.user_id, LockMode::Shared).await?;
    let previous = tx
        .find_meal(meal.user_id, meal.id)
        .await?
        .ok_or(DomainError::MealNotFound(meal.id))?;

    if !tx.update_meal(meal).await? {
        return Err(DomainError::MealNotFound(meal.id));
    }

    let summaries = aggregator::recompute_days(tx, meal.user_id, &[meal.date, previous.date]).await?;
    let deficit = summaries
        .iter()
        .find(|s| s.date == meal.date)
        .is_some_and(|s| s.calories_deficit);
    Ok(deficit)
}

async fn delete_in(tx: &mut dyn LedgerTransaction, user_id: Uuid, meal_id: Uuid) -> RepoResult<()> {
    tx.lock_user(user_id, LockMode::Shared).await?;
    let deleted = tx
        .delete_meal(user_id, meal_id)
        .await?
        .ok_or(DomainError::MealNotFound(meal_id))?;
    aggregator::recompute(tx, user_id, deleted.date).await?;
    Ok(())
}
