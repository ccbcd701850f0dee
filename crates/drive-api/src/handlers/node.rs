//! Node listing, creation, rename, trash and deletion handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use validator::Validate;

use drive_core::types::NodeId;
use drive_entity::deletion::DeletionPhase;
use drive_entity::node::Node;

use crate::dto::request::{CreateFileRequest, CreateFolderRequest, ParentQuery, RenameRequest};
use crate::dto::response::{ApiResponse, DeletionAccepted};
use crate::error::ApiError;
use crate::extractors::Caller;
use crate::state::AppState;

/// GET /api/folders?parent_id=...
pub async fn list_folders(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<ParentQuery>,
) -> Result<Json<ApiResponse<Vec<Node>>>, ApiError> {
    let folders = state
        .node_service
        .list_folders(&caller, query.parent_id)
        .await?;
    Ok(Json(ApiResponse::ok(folders)))
}

/// GET /api/files?parent_id=...
pub async fn list_files(
    State(state): State<AppState>,
    caller: Caller,
    Query(query): Query<ParentQuery>,
) -> Result<Json<ApiResponse<Vec<Node>>>, ApiError> {
    let files = state
        .node_service
        .list_files(&caller, query.parent_id)
        .await?;
    Ok(Json(ApiResponse::ok(files)))
}

/// GET /api/trash
pub async fn list_trashed(
    State(state): State<AppState>,
    caller: Caller,
) -> Result<Json<ApiResponse<Vec<Node>>>, ApiError> {
    let nodes = state.node_service.list_trashed(&caller).await?;
    Ok(Json(ApiResponse::ok(nodes)))
}

/// POST /api/folders
pub async fn create_folder(
    State(state): State<AppState>,
    caller: Caller,
    Json(req): Json<CreateFolderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Node>>), ApiError> {
    req.validate()?;
    let folder = state
        .node_service
        .create_folder(&caller, &req.name, req.parent_id)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(folder))))
}

/// POST /api/files
pub async fn create_file(
    State(state): State<AppState>,
    caller: Caller,
    Json(req): Json<CreateFileRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Node>>), ApiError> {
    req.validate()?;
    let file = state
        .node_service
        .create_file(&caller, &req.name, req.parent_id, req.content())
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(file))))
}

/// PATCH /api/nodes/{id}
pub async fn rename(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<NodeId>,
    Json(req): Json<RenameRequest>,
) -> Result<Json<ApiResponse<Node>>, ApiError> {
    req.validate()?;
    let node = state.node_service.rename(&caller, id, &req.name).await?;
    Ok(Json(ApiResponse::ok(node)))
}

/// POST /api/nodes/{id}/trash
pub async fn trash(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<NodeId>,
) -> Result<Json<ApiResponse<Node>>, ApiError> {
    let node = state.cascade_service.trash(&caller, id).await?;
    Ok(Json(ApiResponse::ok(node)))
}

/// POST /api/nodes/{id}/restore
pub async fn restore(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<NodeId>,
) -> Result<Json<ApiResponse<Node>>, ApiError> {
    let node = state.cascade_service.restore(&caller, id).await?;
    Ok(Json(ApiResponse::ok(node)))
}

/// DELETE /api/nodes/{id}
///
/// Accepts the deletion and returns before any bytes or records are gone.
pub async fn delete_permanently(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<NodeId>,
) -> Result<(StatusCode, Json<ApiResponse<DeletionAccepted>>), ApiError> {
    let task_id = state.deletion_service.request(&caller, id).await?;
    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse::ok(DeletionAccepted {
            task_id,
            phase: DeletionPhase::Requested,
        })),
    ))
}
