//! Transaction completion helper

use calorie_core::traits::{LedgerTransaction, RepoResult};
use tracing::warn;

/// Commit `tx` when `result` is `Ok`, roll it back otherwise
///
/// The original error always wins over a rollback failure, which is only
/// logged.
pub async fn finish<T>(tx: Box<dyn LedgerTransaction>, result: RepoResult<T>) -> RepoResult<T> {
    match result {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!(error = %rollback_err, cause = %err, "Rollback failed");
            }
            Err(err)
        }
    }
}
