//! Storage usage summary.

use axum::Json;
use axum::extract::State;

use drive_entity::node::StorageUsage;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::Caller;
use crate::state::AppState;

/// GET /api/usage
pub async fn usage(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<ApiResponse<StorageUsage>>, ApiError> {
    let usage = state.node_service.usage(&caller).await?;
    Ok(Json(ApiResponse::ok(usage)))
}
