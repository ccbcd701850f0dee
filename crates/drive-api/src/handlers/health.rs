//! Health check handler.

use axum::Json;
use axum::extract::State;

use crate::dto::response::{ApiResponse, ComponentHealth, HealthResponse};
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let store_ok = match state.store.health_check().await {
        Ok(ok) => ok,
        Err(e) => {
            tracing::warn!(error = %e, "Entity store health check failed");
            false
        }
    };
    let objects_ok = match state.objects.health_check().await {
        Ok(ok) => ok,
        Err(e) => {
            tracing::warn!(error = %e, "Object store health check failed");
            false
        }
    };

    let status = if store_ok && objects_ok { "ok" } else { "degraded" };

    Json(ApiResponse::ok(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: ComponentHealth {
            backend: state.store.backend_name().to_string(),
            healthy: store_ok,
        },
        objects: ComponentHealth {
            backend: state.objects.provider_type().to_string(),
            healthy: objects_ok,
        },
        deletion_queue: state.deletion_queue.stats(),
    }))
}
