//! Daily summary aggregator
//!
//! Keeps `users_calories` consistent with the meal ledger and the daily
//! target. Every function runs inside the caller's transaction and expects
//! the caller to already hold the user lock; day locks are taken here, in
//! ascending date order.

use chrono::NaiveDate;
use tracing::{debug, instrument};
use uuid::Uuid;

use calorie_core::entities::{DailySummary, Settings};
use calorie_core::traits::{LedgerTransaction, RepoResult};

/// Recompute one day and upsert its summary
///
/// A missing settings row counts as a zero target.
#[instrument(skip(tx))]
pub async fn recompute(
    tx: &mut dyn LedgerTransaction,
    user_id: Uuid,
    date: NaiveDate,
) -> RepoResult<DailySummary> {
    let target = tx.daily_target(user_id).await?.unwrap_or(0);
    recompute_with_target(tx, user_id, date, target).await
}

/// Recompute several days, locking them in ascending order
///
/// Duplicate dates are recomputed once. Summaries come back in the order
/// they were locked.
#[instrument(skip(tx))]
pub async fn recompute_days(
    tx: &mut dyn LedgerTransaction,
    user_id: Uuid,
    dates: &[NaiveDate],
) -> RepoResult<Vec<DailySummary>> {
    let mut ordered = dates.to_vec();
    ordered.sort_unstable();
    ordered.dedup();

    let target = tx.daily_target(user_id).await?.unwrap_or(0);
    let mut summaries = Vec::with_capacity(ordered.len());
    for date in ordered {
        summaries.push(recompute_with_target(tx, user_id, date, target).await?);
    }
    Ok(summaries)
}

async fn recompute_with_target(
    tx: &mut dyn LedgerTransaction,
    user_id: Uuid,
    date: NaiveDate,
    target: i32,
) -> RepoResult<DailySummary> {
    tx.lock_day(user_id, date).await?;
    let total = tx.sum_calories(user_id, date).await?;
    let summary = DailySummary::compute(user_id, date, total, target);
    tx.upsert_summary(&summary).await?;

    debug!(
        user_id = %user_id,
        %date,
        total_calories = summary.total_calories,
        calories_deficit = summary.calories_deficit,
        "Daily summary recomputed"
    );
    Ok(summary)
}

/// Store a new target and re-evaluate every summary flag of the user
///
/// Totals are left untouched. Requires the exclusive user lock.
#[instrument(skip(tx))]
pub async fn apply_target(tx: &mut dyn LedgerTransaction, settings: Settings) -> RepoResult<u64> {
    tx.upsert_settings(&settings).await?;
    let refreshed = tx
        .refresh_deficit_flags(settings.user_id, settings.expected_daily_calories)
        .await?;

    debug!(user_id = %settings.user_id, refreshed, "Deficit flags refreshed");
    Ok(refreshed)
}
