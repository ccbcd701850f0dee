//! Permanent deletion progress.

use axum::Json;
use axum::extract::{Path, State};

use drive_core::types::DeletionTaskId;
use drive_entity::deletion::DeletionStatus;

use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::Caller;
use crate::state::AppState;

/// GET /api/deletions/{id}
pub async fn status(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<DeletionTaskId>,
) -> Result<Json<ApiResponse<DeletionStatus>>, ApiError> {
    let status = state.deletion_service.status(&caller, id)?;
    Ok(Json(ApiResponse::ok(status)))
}
