//! PostgreSQL implementation of MealRepository

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;
use uuid::Uuid;

use calorie_core::entities::MealEntry;
use calorie_core::traits::{MealRepository, RepoResult};
use calorie_core::value_objects::{FilterExpr, Page, PageRequest};

use crate::models::MealEntryModel;

use super::error::map_db_error;
use super::filter::{meal_column, push_filter};

/// Meals left-joined with their day summary
const MEAL_ENTRY_FROM: &str = r"
    FROM users_meals AS m
    LEFT JOIN users_calories AS c ON m.user_id = c.user_id AND m.date = c.date
    WHERE m.user_id = ";

/// PostgreSQL implementation of MealRepository
#[derive(Clone)]
pub struct PgMealRepository {
    pool: PgPool,
}

impl PgMealRepository {
    /// Create a new PgMealRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MealRepository for PgMealRepository {
    #[instrument(skip(self))]
    async fn find(&self, user_id: Uuid, meal_id: Uuid) -> RepoResult<Option<MealEntry>> {
        let result = sqlx::query_as::<_, MealEntryModel>(
            r"
            SELECT m.id, m.user_id, m.date, m.time, m.name, m.calories, c.calories_deficit
            FROM users_meals AS m
            LEFT JOIN users_calories AS c ON m.user_id = c.user_id AND m.date = c.date
            WHERE m.user_id = $1 AND m.id = $2
            ",
        )
        .bind(user_id)
        .bind(meal_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(MealEntry::from))
    }

    #[instrument(skip(self))]
    async fn list(
        &self,
        user_id: Uuid,
        page: PageRequest,
        filter: Option<&FilterExpr>,
    ) -> RepoResult<Page<MealEntry>> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*)");
        count.push(MEAL_ENTRY_FROM).push_bind(user_id);
        push_filter(&mut count, filter, meal_column)?;

        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        let mut select = QueryBuilder::<Postgres>::new(
            "SELECT m.id, m.user_id, m.date, m.time, m.name, m.calories, c.calories_deficit",
        );
        select.push(MEAL_ENTRY_FROM).push_bind(user_id);
        push_filter(&mut select, filter, meal_column)?;
        select
            .push(" ORDER BY m.date ASC, m.time DESC, m.id LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows = select
            .build_query_as::<MealEntryModel>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(Page::new(
            rows.into_iter().map(MealEntry::from).collect(),
            total,
        ))
    }
}
