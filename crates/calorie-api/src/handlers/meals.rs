//! Meal handlers
//!
//! `/meals` operates on the caller's own ledger; `/users/{user_id}/meals`
//! on the ledger of another user of the same account.

use axum::{extract::State, Json};
use calorie_core::ExecutionContext;
use calorie_service::dto::{CreateMealRequest, MealResponse, UpdateMealRequest};
use calorie_service::{MealService, UserService};
use uuid::Uuid;

use crate::extractors::{
    AuthUser, IdPath, MealIdPath, Pagination, UserIdPath, UserMealPath, ValidatedJson,
};
use crate::response::{ApiResult, Created, NoContent, PageResponse};
use crate::state::AppState;

async fn acting_as(state: &AppState, auth: AuthUser, user_id: Uuid) -> ApiResult<ExecutionContext> {
    let ctx = UserService::new(state.service_context())
        .acting_as(auth.identity(), user_id)
        .await?;
    Ok(ctx)
}

async fn list(
    state: &AppState,
    ctx: ExecutionContext,
    pagination: &Pagination,
) -> ApiResult<Json<PageResponse<MealResponse>>> {
    let page = MealService::new(state.service_context())
        .list(ctx, pagination.request, pagination.filter())
        .await?;
    Ok(Json(pagination.respond(page)))
}

async fn create(
    state: &AppState,
    ctx: ExecutionContext,
    request: CreateMealRequest,
) -> ApiResult<Created<Json<MealResponse>>> {
    let response = MealService::new(state.service_context())
        .create(ctx, request)
        .await?;
    Ok(Created(Json(response)))
}

async fn get(
    state: &AppState,
    ctx: ExecutionContext,
    meal_id: Uuid,
) -> ApiResult<Json<MealResponse>> {
    let response = MealService::new(state.service_context())
        .get(ctx, meal_id)
        .await?;
    Ok(Json(response))
}

async fn update(
    state: &AppState,
    ctx: ExecutionContext,
    meal_id: Uuid,
    request: UpdateMealRequest,
) -> ApiResult<Json<MealResponse>> {
    let response = MealService::new(state.service_context())
        .update(ctx, meal_id, request)
        .await?;
    Ok(Json(response))
}

async fn delete(state: &AppState, ctx: ExecutionContext, meal_id: Uuid) -> ApiResult<NoContent> {
    MealService::new(state.service_context())
        .delete(ctx, meal_id)
        .await?;
    Ok(NoContent)
}

/// GET /meals
pub async fn list_meals(
    State(state): State<AppState>,
    auth: AuthUser,
    pagination: Pagination,
) -> ApiResult<Json<PageResponse<MealResponse>>> {
    let ctx = ExecutionContext::for_self(auth.identity());
    list(&state, ctx, &pagination).await
}

/// POST /meals
pub async fn create_meal(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(request): ValidatedJson<CreateMealRequest>,
) -> ApiResult<Created<Json<MealResponse>>> {
    let ctx = ExecutionContext::for_self(auth.identity());
    create(&state, ctx, request).await
}

/// GET /meals/{meal_id}
pub async fn get_meal(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(MealIdPath { meal_id }): IdPath<MealIdPath>,
) -> ApiResult<Json<MealResponse>> {
    let ctx = ExecutionContext::for_self(auth.identity());
    get(&state, ctx, meal_id).await
}

/// PUT /meals/{meal_id}
pub async fn update_meal(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(MealIdPath { meal_id }): IdPath<MealIdPath>,
    ValidatedJson(request): ValidatedJson<UpdateMealRequest>,
) -> ApiResult<Json<MealResponse>> {
    let ctx = ExecutionContext::for_self(auth.identity());
    update(&state, ctx, meal_id, request).await
}

/// DELETE /meals/{meal_id}
pub async fn delete_meal(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(MealIdPath { meal_id }): IdPath<MealIdPath>,
) -> ApiResult<NoContent> {
    let ctx = ExecutionContext::for_self(auth.identity());
    delete(&state, ctx, meal_id).await
}

/// GET /users/{user_id}/meals
pub async fn list_user_meals(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(UserIdPath { user_id }): IdPath<UserIdPath>,
    pagination: Pagination,
) -> ApiResult<Json<PageResponse<MealResponse>>> {
    let ctx = acting_as(&state, auth, user_id).await?;
    list(&state, ctx, &pagination).await
}

/// POST /users/{user_id}/meals
pub async fn create_user_meal(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(UserIdPath { user_id }): IdPath<UserIdPath>,
    ValidatedJson(request): ValidatedJson<CreateMealRequest>,
) -> ApiResult<Created<Json<MealResponse>>> {
    let ctx = acting_as(&state, auth, user_id).await?;
    create(&state, ctx, request).await
}

/// GET /users/{user_id}/meals/{meal_id}
pub async fn get_user_meal(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(UserMealPath { user_id, meal_id }): IdPath<UserMealPath>,
) -> ApiResult<Json<MealResponse>> {
    let ctx = acting_as(&state, auth, user_id).await?;
    get(&state, ctx, meal_id).await
}

/// PUT /users/{user_id}/meals/{meal_id}
pub async fn update_user_meal(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(UserMealPath { user_id, meal_id }): IdPath<UserMealPath>,
    ValidatedJson(request): ValidatedJson<UpdateMealRequest>,
) -> ApiResult<Json<MealResponse>> {
    let ctx = acting_as(&state, auth, user_id).await?;
    update(&state, ctx, meal_id, request).await
}

/// DELETE /users/{user_id}/meals/{meal_id}
pub async fn delete_user_meal(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(UserMealPath { user_id, meal_id }): IdPath<UserMealPath>,
) -> ApiResult<NoContent> {
    let ctx = acting_as(&state, auth, user_id).await?;
    delete(&state, ctx, meal_id).await
}
