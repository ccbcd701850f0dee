//! File content upload and download handlers.

use axum::Json;
use axum::body::Body;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use bytes::Bytes;

use drive_core::error::AppError;
use drive_core::types::NodeId;
use drive_entity::node::Node;
use drive_service::Upload;

use crate::dto::request::ContentQuery;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::extractors::Caller;
use crate::state::AppState;

/// POST /api/files/upload: multipart upload
///
/// Fields: `file` (required), `parent_id` and `name` (optional; the name
/// defaults to the uploaded file name).
pub async fn upload(
    State(state): State<AppState>,
    caller: Caller,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<Node>>), ApiError> {
    let mut parent_id: Option<NodeId> = None;
    let mut name: Option<String> = None;
    let mut file_name: Option<String> = None;
    let mut mime_type: Option<String> = None;
    let mut data: Option<Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("Multipart error: {e}")))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "parent_id" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::validation(format!("Read error: {e}")))?;
                let text = text.trim();
                if !text.is_empty() {
                    parent_id = Some(
                        text.parse()
                            .map_err(|_| AppError::validation("Invalid parent_id"))?,
                    );
                }
            }
            "name" => {
                name = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::validation(format!("Read error: {e}")))?,
                );
            }
            "file" => {
                file_name = field.file_name().map(String::from);
                mime_type = field.content_type().map(String::from);
                data = Some(
                    field
                        .bytes()
                        .await
                        .map_err(|e| AppError::validation(format!("Read error: {e}")))?,
                );
            }
            _ => {}
        }
    }

    let data = data.ok_or_else(|| AppError::validation("file is required"))?;
    let name = name
        .or(file_name)
        .ok_or_else(|| AppError::validation("A file name is required"))?;

    let node = state
        .content_service
        .upload(
            &caller,
            Upload {
                name,
                parent_id,
                mime_type,
                data,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(node))))
}

/// GET /api/files/{id}/content
pub async fn download(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<NodeId>,
    Query(query): Query<ContentQuery>,
) -> Result<Response, ApiError> {
    let download = state.content_service.download(&caller, id).await?;
    let node = download.node;

    let content_type = node
        .mime_type
        .clone()
        .unwrap_or_else(|| "application/octet-stream".to_string());
    let disposition = if query.download { "attachment" } else { "inline" };
    let filename = node.name.replace(['"', '\\', '\r', '\n'], "_");

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(
            header::CONTENT_DISPOSITION,
            format!("{disposition}; filename=\"{filename}\""),
        );
    if let Some(size) = node.size_bytes {
        builder = builder.header(header::CONTENT_LENGTH, size);
    }

    let response = builder
        .body(Body::from_stream(download.stream))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))?;

    Ok(response)
}
