//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::sync::Arc;

use axum::Router;
use calorie_common::{AppConfig, AppError, JwtService};
use calorie_db::{
    create_pool, run_migrations, PgMealRepository, PgSettingsRepository, PgUnitOfWork,
    PgUserRepository, PoolConfig,
};
use calorie_service::{NutritionixLookup, ServiceContextBuilder};
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::{apply_middleware, apply_rate_limit};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
///
/// Health routes are not rate limited.
pub fn create_app(state: AppState) -> Result<Router, AppError> {
    let config = state.config();
    let api = apply_rate_limit(create_router(), &config.rate_limit)?;
    let router = apply_middleware(
        api.merge(health_routes()),
        &config.cors,
        config.app.env.is_production(),
    );
    Ok(router.with_state(state))
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let pool = create_pool(&PoolConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    run_migrations(&pool)
        .await
        .map_err(|e| AppError::Database(format!("Migrations failed: {e}")))?;

    let jwt_service = Arc::new(JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expiry,
    ));
    let calorie_lookup =
        NutritionixLookup::from_config(&config.nutritionix).map_err(AppError::Domain)?;

    let service_context = ServiceContextBuilder::new()
        .user_repo(Arc::new(PgUserRepository::new(pool.clone())))
        .meal_repo(Arc::new(PgMealRepository::new(pool.clone())))
        .settings_repo(Arc::new(PgSettingsRepository::new(pool.clone())))
        .unit_of_work(Arc::new(PgUnitOfWork::new(pool)))
        .calorie_lookup(calorie_lookup)
        .jwt_service(jwt_service)
        .build()?;

    Ok(AppState::new(service_context, config))
}

/// Serve `app` on an already bound listener
pub async fn serve(listener: TcpListener, app: Router) -> Result<(), AppError> {
    let addr = listener.local_addr().map_err(AppError::internal)?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await.map_err(AppError::internal)
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let address = config.api.address();

    let state = create_app_state(config).await?;
    let app = create_app(state)?;

    info!("Starting HTTP server on {}", address);
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {address}: {e}")))?;

    serve(listener, app).await
}
