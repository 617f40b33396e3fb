//! Unit of work - transactional access to the meal ledger
//!
//! Every mutation of meals, settings or daily summaries happens inside a
//! [`LedgerTransaction`]. Nothing written through it is visible to other
//! transactions until [`LedgerTransaction::commit`]; dropping or rolling
//! back discards all of it.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use super::RepoResult;
use crate::entities::{DailySummary, Meal, Settings};

/// Strength of a per-user transaction lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockMode {
    /// Taken by meal writers; many may hold it at once
    Shared,
    /// Taken by target changes; excludes every meal writer of the user
    Exclusive,
}

#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Start a new transaction
    async fn begin(&self) -> RepoResult<Box<dyn LedgerTransaction>>;

    /// Check that the backing store is reachable
    async fn health_check(&self) -> RepoResult<()>;
}

/// One open transaction
///
/// Locks are held until commit or rollback. Callers take the user lock
/// first, then day locks in ascending date order.
#[async_trait]
pub trait LedgerTransaction: Send {
    /// Lock a user's target against concurrent changes
    async fn lock_user(&mut self, user_id: Uuid, mode: LockMode) -> RepoResult<()>;

    /// Exclusively lock one day of a user
    async fn lock_day(&mut self, user_id: Uuid, date: NaiveDate) -> RepoResult<()>;

    async fn insert_meal(&mut self, meal: &Meal) -> RepoResult<()>;

    /// Load a meal and lock its row
    async fn find_meal(&mut self, user_id: Uuid, meal_id: Uuid) -> RepoResult<Option<Meal>>;

    /// Overwrite a meal; returns false if no such meal exists for the user
    async fn update_meal(&mut self, meal: &Meal) -> RepoResult<bool>;

    /// Delete a meal, returning the deleted row
    async fn delete_meal(&mut self, user_id: Uuid, meal_id: Uuid) -> RepoResult<Option<Meal>>;

    /// Sum of calories over the user's meals on `date`
    async fn sum_calories(&mut self, user_id: Uuid, date: NaiveDate) -> RepoResult<i64>;

    /// The user's daily target, if one was ever set
    async fn daily_target(&mut self, user_id: Uuid) -> RepoResult<Option<i32>>;

    async fn upsert_summary(&mut self, summary: &DailySummary) -> RepoResult<()>;

    async fn upsert_settings(&mut self, settings: &Settings) -> RepoResult<()>;

    /// Recompute the deficit flag of every summary of the user against
    /// `target`, leaving totals untouched; returns the number of rows seen
    async fn refresh_deficit_flags(&mut self, user_id: Uuid, target: i32) -> RepoResult<u64>;

    async fn commit(self: Box<Self>) -> RepoResult<()>;

    async fn rollback(self: Box<Self>) -> RepoResult<()>;
}
