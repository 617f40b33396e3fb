//! Authentication handlers
//!
//! Endpoints for account signup and signin.

use axum::{extract::State, Json};
use calorie_service::dto::{SigninRequest, SignupRequest, TokenResponse, UserResponse};
use calorie_service::AuthService;

use crate::extractors::{AccountIdPath, IdPath, ValidatedJson};
use crate::response::{ApiResult, Created};
use crate::state::AppState;

/// Create an account and its owner
///
/// POST /signup
pub async fn signup(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SignupRequest>,
) -> ApiResult<Created<Json<UserResponse>>> {
    let service = AuthService::new(state.service_context());
    let response = service.signup(request).await?;
    Ok(Created(Json(response)))
}

/// Sign in to an account
///
/// POST /accounts/{account_id}/signin
pub async fn signin(
    State(state): State<AppState>,
    IdPath(AccountIdPath { account_id }): IdPath<AccountIdPath>,
    ValidatedJson(request): ValidatedJson<SigninRequest>,
) -> ApiResult<Created<Json<TokenResponse>>> {
    let service = AuthService::new(state.service_context());
    let response = service.signin(account_id, request).await?;
    Ok(Created(Json(response)))
}
