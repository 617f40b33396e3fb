//! User handlers
//!
//! Endpoints for the user directory of the caller's account.

use axum::{extract::State, Json};
use calorie_service::dto::{CreateUserRequest, UpdateUserRequest, UserResponse};
use calorie_service::UserService;

use crate::extractors::{AuthUser, IdPath, Pagination, UserIdPath, ValidatedJson};
use crate::response::{ApiResult, Created, NoContent, PageResponse};
use crate::state::AppState;

/// List users of the caller's account
///
/// GET /users
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    pagination: Pagination,
) -> ApiResult<Json<PageResponse<UserResponse>>> {
    let service = UserService::new(state.service_context());
    let page = service
        .list(auth.identity(), pagination.request, pagination.filter())
        .await?;
    Ok(Json(pagination.respond(page)))
}

/// Create a user in the caller's account
///
/// POST /users
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> ApiResult<Created<Json<UserResponse>>> {
    let service = UserService::new(state.service_context());
    let response = service.create(auth.identity(), request).await?;
    Ok(Created(Json(response)))
}

/// GET /users/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(UserIdPath { user_id }): IdPath<UserIdPath>,
) -> ApiResult<Json<UserResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.get(auth.identity(), user_id).await?;
    Ok(Json(response))
}

/// Rename a user and optionally change their role
///
/// PUT /users/{user_id}
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(UserIdPath { user_id }): IdPath<UserIdPath>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let service = UserService::new(state.service_context());
    let response = service.update(auth.identity(), user_id, request).await?;
    Ok(Json(response))
}

/// DELETE /users/{user_id}
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(UserIdPath { user_id }): IdPath<UserIdPath>,
) -> ApiResult<NoContent> {
    let service = UserService::new(state.service_context());
    service.delete(auth.identity(), user_id).await?;
    Ok(NoContent)
}
