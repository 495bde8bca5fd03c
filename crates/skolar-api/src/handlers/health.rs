//! Health check endpoint, mounted on both route tables.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::time::Duration;
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthCheckResponse {
    pub status: String,
    pub registry: String,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "config",
    responses(
        (status = 200, description = "Service is healthy", body = HealthCheckResponse),
        (status = 503, description = "Registry unreachable", body = HealthCheckResponse)
    )
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    const TIMEOUT: Duration = Duration::from_secs(5);

    // One cheap registry round trip with a timeout stands in for a database
    // ping regardless of the backing store.
    let (status, registry) = match tokio::time::timeout(TIMEOUT, state.schools.count()).await {
        Ok(Ok(_)) => (StatusCode::OK, "healthy".to_string()),
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Registry health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("unhealthy: {}", e),
            )
        }
        Err(_) => {
            tracing::error!("Registry health check timed out");
            (StatusCode::SERVICE_UNAVAILABLE, "timeout".to_string())
        }
    };

    let body = HealthCheckResponse {
        status: if status == StatusCode::OK {
            "healthy".to_string()
        } else {
            "unhealthy".to_string()
        },
        registry,
    };

    (status, Json(body))
}
