//! PostgreSQL implementation of SettingsRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use calorie_core::entities::Settings;
use calorie_core::traits::{RepoResult, SettingsRepository};

use crate::models::SettingsModel;

use super::error::map_db_error;

/// PostgreSQL implementation of SettingsRepository
#[derive(Clone)]
pub struct PgSettingsRepository {
    pool: PgPool,
}

impl PgSettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsRepository for PgSettingsRepository {
    #[instrument(skip(self))]
    async fn find(&self, user_id: Uuid) -> RepoResult<Option<Settings>> {
        let result = sqlx::query_as::<_, SettingsModel>(
            r"
            SELECT user_id, expected_daily_calories
            FROM users_settings
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Settings::from))
    }
}
