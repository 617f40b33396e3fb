//! Liveness and readiness probes

use axum::{extract::State, http::StatusCode, Json};
use calorie_service::dto::{DependencyChecks, HealthResponse, Probe, ReadinessResponse};
use tracing::warn;

use crate::state::AppState;

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// GET /health/ready
///
/// 503 while the database does not answer.
pub async fn readiness_check(
    State(state): State<AppState>,
) -> (StatusCode, Json<ReadinessResponse>) {
    let database = match state.service_context().unit_of_work().health_check().await {
        Ok(()) => Probe::Healthy,
        Err(e) => {
            warn!(error = %e, "Database health check failed");
            Probe::Unhealthy
        }
    };

    let response = ReadinessResponse::from_checks(DependencyChecks { database });
    let status = if response.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status, Json(response))
}
