//! Settings store

use tracing::{info, instrument};
use uuid::Uuid;

use calorie_core::entities::Settings;
use calorie_core::error::DomainError;
use calorie_core::traits::{LockMode, RepoResult, SettingsRepository, UnitOfWork};

use super::aggregator;
use super::transaction::finish;

/// Reads and writes the daily calorie target
pub struct SettingsStore<'a> {
    uow: &'a dyn UnitOfWork,
    settings: &'a dyn SettingsRepository,
}

impl<'a> SettingsStore<'a> {
    pub fn new(uow: &'a dyn UnitOfWork, settings: &'a dyn SettingsRepository) -> Self {
        Self { uow, settings }
    }

    /// Current settings, or a zero target when none were ever written
    pub async fn get(&self, user_id: Uuid) -> RepoResult<Settings> {
        Ok(self
            .settings
            .find(user_id)
            .await?
            .unwrap_or_else(|| Settings::unset(user_id)))
    }

    /// Replace the target and re-evaluate every deficit flag of the user
    #[instrument(skip(self))]
    pub async fn update(&self, user_id: Uuid, expected_daily_calories: i32) -> RepoResult<Settings> {
        if expected_daily_calories < 0 {
            return Err(DomainError::ValidationError(
                "expected_daily_calories must not be negative".to_string(),
            ));
        }

        let settings = Settings::new(user_id, expected_daily_calories);
        let mut tx = self.uow.begin().await?;
        let result = async {
            tx.lock_user(user_id, LockMode::Exclusive).await?;
            aggregator::apply_target(tx.as_mut(), settings).await
        }
        .await;
        let refreshed = finish(tx, result).await?;

        info!(refreshed, "Daily target updated");
        Ok(settings)
    }
}
