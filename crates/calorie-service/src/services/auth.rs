//! Authentication service
//!
//! Handles account signup, signin and bearer token authentication.

use calorie_common::auth::{hash_password, validate_password_strength, verify_password};
use calorie_common::AppError;
use calorie_core::entities::NewUser;
use calorie_core::{DomainError, Identity};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::dto::{SigninRequest, SignupRequest, TokenResponse, UserResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a new account and its owner
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn signup(&self, request: SignupRequest) -> ServiceResult<UserResponse> {
        validate_password_strength(&request.password)?;

        if self
            .ctx
            .user_repo()
            .find_owner_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(DomainError::AccountAlreadyExists.into());
        }

        let password_hash = hash_password(&request.password)?;
        let owner = NewUser::owner(request.username, password_hash);
        self.ctx.user_repo().create(&owner).await?;

        info!(
            user_id = %owner.user.id,
            account_id = %owner.user.account_id,
            "Account created"
        );

        Ok(UserResponse::from(owner.user))
    }

    /// Exchange account credentials for an access token
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn signin(
        &self,
        account_id: Uuid,
        request: SigninRequest,
    ) -> ServiceResult<TokenResponse> {
        let (user, password_hash) = self
            .ctx
            .user_repo()
            .find_credentials(account_id, &request.username)
            .await?
            .ok_or_else(|| {
                warn!("Signin failed: user not found");
                AppError::InvalidCredentials
            })?;

        if !verify_password(&request.password, &password_hash)? {
            warn!(user_id = %user.id, "Signin failed: invalid password");
            return Err(AppError::InvalidCredentials.into());
        }

        let token = self.ctx.jwt_service().issue(user.id, user.account_id)?;

        info!(user_id = %user.id, "User signed in");
        Ok(TokenResponse::from(token))
    }

    /// Resolve a bearer token to the caller's identity
    ///
    /// The user is reloaded so that deleted users and role changes take
    /// effect immediately.
    #[instrument(skip(self, token))]
    pub async fn authenticate(&self, token: &str) -> ServiceResult<Identity> {
        let claims = self.ctx.jwt_service().verify(token)?;
        let (user_id, account_id) = (claims.sub, claims.account_id);

        let user = self
            .ctx
            .user_repo()
            .find_by_id(account_id, user_id)
            .await?
            .ok_or_else(|| {
                warn!(user_id = %user_id, "Token refers to a missing user");
                AppError::InvalidToken
            })?;

        Ok(user.identity())
    }
}
