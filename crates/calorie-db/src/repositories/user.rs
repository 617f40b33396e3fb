//! PostgreSQL implementation of UserRepository

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;
use uuid::Uuid;

use calorie_core::entities::{NewUser, User};
use calorie_core::error::DomainError;
use calorie_core::traits::{RepoResult, UserRepository};
use calorie_core::value_objects::{FilterExpr, Page, PageRequest, Role};

use crate::models::{UserCredentialsModel, UserModel};

use super::error::{map_db_error, map_unique_violation, user_not_found};
use super::filter::{push_filter, user_column};

/// PostgreSQL implementation of UserRepository
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Create a new PgUserRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, account_id: Uuid, id: Uuid) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(
            r"
            SELECT id, account_id, username, role_id
            FROM users
            WHERE account_id = $1 AND id = $2
            ",
        )
        .bind(account_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(User::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_owner_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        let result = sqlx::query_as::<_, UserModel>(
            r"
            SELECT id, account_id, username, role_id
            FROM users
            WHERE username = $1 AND role_id = $2
            ",
        )
        .bind(username)
        .bind(Role::Owner.id())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(User::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_credentials(
        &self,
        account_id: Uuid,
        username: &str,
    ) -> RepoResult<Option<(User, String)>> {
        let result = sqlx::query_as::<_, UserCredentialsModel>(
            r"
            SELECT id, account_id, username, role_id, password
            FROM users
            WHERE account_id = $1 AND username = $2
            ",
        )
        .bind(account_id)
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result
            .map(|row| -> RepoResult<(User, String)> {
                Ok((User::try_from(row.user)?, row.password))
            })
            .transpose()
    }

    #[instrument(skip(self))]
    async fn list(
        &self,
        account_id: Uuid,
        page: PageRequest,
        filter: Option<&FilterExpr>,
    ) -> RepoResult<Page<User>> {
        let mut count =
            QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users WHERE account_id = ");
        count.push_bind(account_id);
        push_filter(&mut count, filter, user_column)?;

        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_error)?;

        let mut select = QueryBuilder::<Postgres>::new(
            "SELECT id, account_id, username, role_id FROM users WHERE account_id = ",
        );
        select.push_bind(account_id);
        push_filter(&mut select, filter, user_column)?;
        select
            .push(" ORDER BY username, id LIMIT ")
            .push_bind(page.limit())
            .push(" OFFSET ")
            .push_bind(page.offset());

        let rows = select
            .build_query_as::<UserModel>()
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        let items = rows
            .into_iter()
            .map(User::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(items, total))
    }

    #[instrument(skip(self, new_user), fields(username = %new_user.user.username))]
    async fn create(&self, new_user: &NewUser) -> RepoResult<()> {
        let user = &new_user.user;
        sqlx::query(
            r"
            INSERT INTO users (id, account_id, username, password, role_id)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(user.id)
        .bind(user.account_id)
        .bind(&user.username)
        .bind(&new_user.password_hash)
        .bind(user.role.id())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                if user.is_owner() {
                    DomainError::AccountAlreadyExists
                } else {
                    DomainError::UserAlreadyExists
                }
            })
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn update(&self, user: &User) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE users
            SET username = $3, role_id = $4
            WHERE account_id = $1 AND id = $2
            ",
        )
        .bind(user.account_id)
        .bind(user.id)
        .bind(&user.username)
        .bind(user.role.id())
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::UserAlreadyExists))?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(user.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, account_id: Uuid, id: Uuid) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            DELETE FROM users
            WHERE account_id = $1 AND id = $2
            ",
        )
        .bind(account_id)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(user_not_found(id));
        }

        Ok(())
    }
}
