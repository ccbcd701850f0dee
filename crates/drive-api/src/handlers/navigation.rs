//! Breadcrumb and deep-link handlers.

use axum::Json;
use axum::extract::{Query, State};

use drive_entity::node::Node;
use drive_service::tree::navigation::split_path;

use crate::dto::request::{AncestorsQuery, ResolveQuery};
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::Caller;
use crate::state::AppState;

/// GET /api/ancestors?folder_id=...
pub async fn ancestors(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<AncestorsQuery>,
) -> Result<Json<ApiResponse<Vec<Node>>>, ApiError> {
    let chain = state
        .navigation_service
        .resolve_ancestors(&caller, query.folder_id)
        .await?;
    Ok(Json(ApiResponse::ok(chain)))
}

/// GET /api/resolve?path=a/b
pub async fn resolve(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<ResolveQuery>,
) -> Result<Json<ApiResponse<Option<Node>>>, ApiError> {
    let segments = split_path(&query.path);
    let node = state
        .navigation_service
        .resolve_path(&caller, &segments)
        .await?;
    Ok(Json(ApiResponse::ok(node)))
}
