//! Route definitions
//!
//! All API routes organized by domain and mounted under /api/v1.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{auth, health, meals, settings, users};
use crate::state::AppState;

/// Create the main API router (health routes are mounted separately)
pub fn create_router() -> Router<AppState> {
    Router::new().nest("/api/v1", api_v1_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(user_routes())
        .merge(meal_routes())
        .merge(settings_routes())
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/accounts/:account_id/signin", post(auth::signin))
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/:user_id",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
}

/// Own meals and meals of another user of the account
fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(meals::list_meals).post(meals::create_meal))
        .route(
            "/meals/:meal_id",
            get(meals::get_meal)
                .put(meals::update_meal)
                .delete(meals::delete_meal),
        )
        .route(
            "/users/:user_id/meals",
            get(meals::list_user_meals).post(meals::create_user_meal),
        )
        .route(
            "/users/:user_id/meals/:meal_id",
            get(meals::get_user_meal)
                .put(meals::update_user_meal)
                .delete(meals::delete_user_meal),
        )
}

fn settings_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/settings",
            get(settings::get_settings).put(settings::update_settings),
        )
        .route(
            "/users/:user_id/settings",
            get(settings::get_user_settings).put(settings::update_user_settings),
        )
}
