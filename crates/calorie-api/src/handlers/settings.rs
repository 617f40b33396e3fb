//! Settings handlers

use axum::{extract::State, Json};
use calorie_core::ExecutionContext;
use calorie_service::dto::{SettingsResponse, UpdateSettingsRequest};
use calorie_service::{SettingsService, UserService};

use crate::extractors::{AuthUser, IdPath, UserIdPath, ValidatedJson};
use crate::response::ApiResult;
use crate::state::AppState;

/// GET /settings
pub async fn get_settings(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<SettingsResponse>> {
    let ctx = ExecutionContext::for_self(auth.identity());
    let response = SettingsService::new(state.service_context()).get(ctx).await?;
    Ok(Json(response))
}

/// Change the caller's daily target; every deficit flag is re-evaluated
///
/// PUT /settings
pub async fn update_settings(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<UpdateSettingsRequest>,
) -> ApiResult<Json<SettingsResponse>> {
    let ctx = ExecutionContext::for_self(auth.identity());
    let response = SettingsService::new(state.service_context())
        .update(ctx, request)
        .await?;
    Ok(Json(response))
}

/// GET /users/{user_id}/settings
pub async fn get_user_settings(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(UserIdPath { user_id }): IdPath<UserIdPath>,
) -> ApiResult<Json<SettingsResponse>> {
    let ctx = UserService::new(state.service_context())
        .acting_as(auth.identity(), user_id)
        .await?;
    let response = SettingsService::new(state.service_context()).get(ctx).await?;
    Ok(Json(response))
}

/// PUT /users/{user_id}/settings
pub async fn update_user_settings(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(UserIdPath { user_id }): IdPath<UserIdPath>,
    ValidatedJson(request): ValidatedJson<UpdateSettingsRequest>,
) -> ApiResult<Json<SettingsResponse>> {
    let ctx = UserService::new(state.service_context())
        .acting_as(auth.identity(), user_id)
        .await?;
    let response = SettingsService::new(state.service_context())
        .update(ctx, request)
        .await?;
    Ok(Json(response))
}
