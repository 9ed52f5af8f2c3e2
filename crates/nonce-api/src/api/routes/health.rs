//! Health check route handler

use crate::{api::types::HealthCheckResponse, server::AppState};
use axum::{extract::State, Json};
use tracing::warn;

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is running", body = HealthCheckResponse),
    ),
    tag = "health",
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    let reachable = match state.resolver.store().health_check().await {
        Ok(()) => true,
        Err(e) => {
            warn!("Credential store health check failed: {}", e);
            false
        }
    };

    Json(HealthCheckResponse {
        status: if reachable { "healthy" } else { "degraded" }.to_string(),
        version: crate::VERSION.to_string(),
        timestamp: chrono::Utc::now(),
        credential_store_reachable: reachable,
    })
}
