//! User directory service
//!
//! Every operation is scoped to the caller's account and checked by the
//! authorization evaluator before any write.

use calorie_common::auth::{hash_password, validate_password_strength};
use calorie_core::entities::{NewUser, User};
use calorie_core::value_objects::{FilterExpr, Page, PageRequest, Role, USER_FILTER_FIELDS};
use calorie_core::{authorize, Action, DomainError, ExecutionContext, Identity};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::dto::{CreateUserRequest, UpdateUserRequest, UserResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    /// Create a new UserService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Load a user of the caller's account
    async fn find(&self, caller: Identity, user_id: Uuid) -> ServiceResult<User> {
        let user = self
            .ctx
            .user_repo()
            .find_by_id(caller.account_id, user_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))?;
        Ok(user)
    }

    /// Build the execution context for an operation on `user_id`
    ///
    /// Fails with `UserNotFound` when the user is not part of the caller's
    /// account.
    pub async fn acting_as(
        &self,
        caller: Identity,
        user_id: Uuid,
    ) -> ServiceResult<ExecutionContext> {
        if user_id == caller.user_id {
            return Ok(ExecutionContext::for_self(caller));
        }
        let target = self.find(caller, user_id).await?;
        Ok(ExecutionContext::on_behalf_of(caller, target.identity()))
    }

    /// List users of the caller's account
    #[instrument(skip(self, filter))]
    pub async fn list(
        &self,
        caller: Identity,
        page: PageRequest,
        filter: Option<&str>,
    ) -> ServiceResult<Page<UserResponse>> {
        authorize(&ExecutionContext::for_self(caller), Action::ListUsers)?;
        let filter = match filter {
            Some(raw) => FilterExpr::parse(raw, USER_FILTER_FIELDS)?,
            None => None,
        };

        let users = self
            .ctx
            .user_repo()
            .list(caller.account_id, page, filter.as_ref())
            .await?;
        Ok(users.map(UserResponse::from))
    }

    /// Create a non-owner user in the caller's account
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn create(
        &self,
        caller: Identity,
        request: CreateUserRequest,
    ) -> ServiceResult<UserResponse> {
        let role = Role::assignable(request.role_id)?;
        authorize(&ExecutionContext::for_self(caller), Action::CreateUser { role })?;
        validate_password_strength(&request.password)?;

        let password_hash = hash_password(&request.password)?;
        let new_user = NewUser::member(caller.account_id, request.username, role, password_hash);
        self.ctx.user_repo().create(&new_user).await?;

        info!(user_id = %new_user.user.id, role = %role, "User created");
        Ok(UserResponse::from(new_user.user))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, caller: Identity, user_id: Uuid) -> ServiceResult<UserResponse> {
        let target = self.find(caller, user_id).await?;
        let ctx = ExecutionContext::on_behalf_of(caller, target.identity());
        authorize(&ctx, Action::ReadUser)?;
        Ok(UserResponse::from(target))
    }

    /// Rename a user and optionally change their role
    ///
    /// Sending the user's current role is not a role change.
    #[instrument(skip(self, request))]
    pub async fn update(
        &self,
        caller: Identity,
        user_id: Uuid,
        request: UpdateUserRequest,
    ) -> ServiceResult<UserResponse> {
        let mut target = self.find(caller, user_id).await?;
        let requested = request.role_id.map(Role::assignable).transpose()?;
        let role_change = requested.filter(|role| *role != target.role);

        let ctx = ExecutionContext::on_behalf_of(caller, target.identity());
        authorize(&ctx, Action::UpdateUser { role_change })?;

        target.set_username(request.username);
        if let Some(role) = role_change {
            target.set_role(role);
        }
        self.ctx.user_repo().update(&target).await?;

        info!(user_id = %target.id, "User updated");
        Ok(UserResponse::from(target))
    }

    /// Delete a user; their meals, settings and summaries are left in place
    #[instrument(skip(self))]
    pub async fn delete(&self, caller: Identity, user_id: Uuid) -> ServiceResult<()> {
        let target = self.find(caller, user_id).await?;
        let ctx = ExecutionContext::on_behalf_of(caller, target.identity());
        authorize(&ctx, Action::DeleteUser)?;

        self.ctx
            .user_repo()
            .delete(caller.account_id, user_id)
            .await?;

        info!(user_id = %user_id, "User deleted");
        Ok(())
    }
}
