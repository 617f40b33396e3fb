//! Repository traits (ports) - define the interface for data access
//!
//! These traits follow the Repository pattern from Domain-Driven Design.
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Everything that mutates meals, settings or
//! summaries goes through [`crate::traits::UnitOfWork`] instead.

use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::{MealEntry, NewUser, Settings, User};
use crate::error::DomainError;
use crate::value_objects::{FilterExpr, Page, PageRequest};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by ID within an account
    async fn find_by_id(&self, account_id: Uuid, id: Uuid) -> RepoResult<Option<User>>;

    /// Find the owner of any account by username
    async fn find_owner_by_username(&self, username: &str) -> RepoResult<Option<User>>;

    /// Get a user and its password hash for signin
    async fn find_credentials(
        &self,
        account_id: Uuid,
        username: &str,
    ) -> RepoResult<Option<(User, String)>>;

    /// List the users of an account
    async fn list(
        &self,
        account_id: Uuid,
        page: PageRequest,
        filter: Option<&FilterExpr>,
    ) -> RepoResult<Page<User>>;

    /// Create a new user
    ///
    /// Fails with `AccountAlreadyExists` for a duplicate owner and
    /// `UserAlreadyExists` for a duplicate username inside an account.
    async fn create(&self, user: &NewUser) -> RepoResult<()>;

    /// Update username and role
    async fn update(&self, user: &User) -> RepoResult<()>;

    /// Hard delete a user; meals, settings and summaries are left in place
    async fn delete(&self, account_id: Uuid, id: Uuid) -> RepoResult<()>;
}

// ============================================================================
// Meal Repository
// ============================================================================

#[async_trait]
pub trait MealRepository: Send + Sync {
    /// Find a meal joined with its day's deficit flag
    async fn find(&self, user_id: Uuid, meal_id: Uuid) -> RepoResult<Option<MealEntry>>;

    /// List meals ordered by date ascending, then time descending
    async fn list(
        &self,
        user_id: Uuid,
        page: PageRequest,
        filter: Option<&FilterExpr>,
    ) -> RepoResult<Page<MealEntry>>;
}

// ============================================================================
// Settings Repository
// ============================================================================

#[async_trait]
pub trait SettingsRepository: Send + Sync {
    async fn find(&self, user_id: Uuid) -> RepoResult<Option<Settings>>;
}
