//! PostgreSQL unit of work
//!
//! Each [`PgLedgerTransaction`] wraps one SQLx transaction. User and day
//! locks are transaction-scoped advisory locks, so they are released by
//! commit or rollback and never leak past the transaction.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{debug, instrument};
use uuid::Uuid;

use calorie_core::entities::{DailySummary, Meal, Settings};
use calorie_core::traits::{LedgerTransaction, LockMode, RepoResult, UnitOfWork};

use crate::models::MealModel;

use super::error::map_db_error;

/// Starts ledger transactions on a connection pool
#[derive(Clone)]
pub struct PgUnitOfWork {
    pool: PgPool,
}

impl PgUnitOfWork {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    #[instrument(skip(self))]
    async fn begin(&self) -> RepoResult<Box<dyn LedgerTransaction>> {
        let tx = self.pool.begin().await.map_err(map_db_error)?;
        Ok(Box::new(PgLedgerTransaction { tx }))
    }

    async fn health_check(&self) -> RepoResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }
}

/// One open PostgreSQL transaction
pub struct PgLedgerTransaction {
    tx: Transaction<'static, Postgres>,
}

fn user_lock_key(user_id: Uuid) -> String {
    format!("calories:user:{user_id}")
}

fn day_lock_key(user_id: Uuid, date: NaiveDate) -> String {
    format!("calories:day:{user_id}:{date}")
}

#[async_trait]
impl LedgerTransaction for PgLedgerTransaction {
    #[instrument(skip(self))]
    async fn lock_user(&mut self, user_id: Uuid, mode: LockMode) -> RepoResult<()> {
        let statement = match mode {
            LockMode::Shared => "SELECT pg_advisory_xact_lock_shared(hashtextextended($1, 0))",
            LockMode::Exclusive => "SELECT pg_advisory_xact_lock(hashtextextended($1, 0))",
        };
        sqlx::query(statement)
            .bind(user_lock_key(user_id))
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn lock_day(&mut self, user_id: Uuid, date: NaiveDate) -> RepoResult<()> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(day_lock_key(user_id, date))
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self, meal), fields(meal_id = %meal.id))]
    async fn insert_meal(&mut self, meal: &Meal) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO users_meals (id, user_id, name, date, time, calories)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(meal.id)
        .bind(meal.user_id)
        .bind(&meal.name)
        .bind(meal.date)
        .bind(meal.time)
        .bind(meal.calories)
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_meal(&mut self, user_id: Uuid, meal_id: Uuid) -> RepoResult<Option<Meal>> {
        let result = sqlx::query_as::<_, MealModel>(
            r"
            SELECT id, user_id, date, time, name, calories
            FROM users_meals
            WHERE user_id = $1 AND id = $2
            FOR UPDATE
            ",
        )
        .bind(user_id)
        .bind(meal_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Meal::from))
    }

    #[instrument(skip(self, meal), fields(meal_id = %meal.id))]
    async fn update_meal(&mut self, meal: &Meal) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE users_meals
            SET name = $3, date = $4, time = $5, calories = $6
            WHERE user_id = $1 AND id = $2
            ",
        )
        .bind(meal.user_id)
        .bind(meal.id)
        .bind(&meal.name)
        .bind(meal.date)
        .bind(meal.time)
        .bind(meal.calories)
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete_meal(&mut self, user_id: Uuid, meal_id: Uuid) -> RepoResult<Option<Meal>> {
        let result = sqlx::query_as::<_, MealModel>(
            r"
            DELETE FROM users_meals
            WHERE user_id = $1 AND id = $2
            RETURNING id, user_id, date, time, name, calories
            ",
        )
        .bind(user_id)
        .bind(meal_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Meal::from))
    }

    #[instrument(skip(self))]
    async fn sum_calories(&mut self, user_id: Uuid, date: NaiveDate) -> RepoResult<i64> {
        sqlx::query_scalar::<_, i64>(
            r"
            SELECT COALESCE(SUM(calories), 0)::BIGINT
            FROM users_meals
            WHERE user_id = $1 AND date = $2
            ",
        )
        .bind(user_id)
        .bind(date)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn daily_target(&mut self, user_id: Uuid) -> RepoResult<Option<i32>> {
        sqlx::query_scalar::<_, i32>(
            r"
            SELECT expected_daily_calories
            FROM users_settings
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_db_error)
    }

    #[instrument(skip(self))]
    async fn upsert_summary(&mut self, summary: &DailySummary) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO users_calories (user_id, date, total_calories, calories_deficit)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, date) DO UPDATE
            SET total_calories = EXCLUDED.total_calories,
                calories_deficit = EXCLUDED.calories_deficit
            ",
        )
        .bind(summary.user_id)
        .bind(summary.date)
        .bind(summary.total_calories)
        .bind(summary.calories_deficit)
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn upsert_settings(&mut self, settings: &Settings) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO users_settings (user_id, expected_daily_calories)
            VALUES ($1, $2)
            ON CONFLICT (user_id) DO UPDATE
            SET expected_daily_calories = EXCLUDED.expected_daily_calories
            ",
        )
        .bind(settings.user_id)
        .bind(settings.expected_daily_calories)
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn refresh_deficit_flags(&mut self, user_id: Uuid, target: i32) -> RepoResult<u64> {
        let result = sqlx::query(
            r"
            UPDATE users_calories
            SET calories_deficit = (total_calories < $2)
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .bind(i64::from(target))
        .execute(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected())
    }

    async fn commit(self: Box<Self>) -> RepoResult<()> {
        self.tx.commit().await.map_err(map_db_error)?;
        debug!("Transaction committed");
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> RepoResult<()> {
        self.tx.rollback().await.map_err(map_db_error)?;
        debug!("Transaction rolled back");
        Ok(())
    }
}
