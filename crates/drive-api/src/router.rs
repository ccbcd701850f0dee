//! Route definitions for the Drive HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Multipart framing allowance on top of the configured upload size.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_upload = usize::try_from(state.config.storage.max_upload_size_bytes)
        .unwrap_or(usize::MAX)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    let api_routes = Router::new()
        .merge(folder_routes())
        .merge(file_routes())
        .merge(node_routes())
        .merge(navigation_routes())
        .merge(deletion_routes())
        .merge(health_routes());

    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Folder listing and creation
fn folder_routes() -> Router<AppState> {
    Router::new().route(
        "/folders",
        get(handlers::node::list_folders).post(handlers::node::create_folder),
    )
}

/// File listing, creation, upload and content
fn file_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/files",
            get(handlers::node::list_files).post(handlers::node::create_file),
        )
        .route("/files/upload", post(handlers::content::upload))
        .route("/files/{id}/content", get(handlers::content::download))
}

/// Rename, trash, restore, permanent delete
fn node_routes() -> Router<AppState> {
    Router::new()
        .route("/trash", get(handlers::node::list_trashed))
        .route(
            "/nodes/{id}",
            axum::routing::patch(handlers::node::rename)
                .delete(handlers::node::delete_permanently),
        )
        .route("/nodes/{id}/trash", post(handlers::node::trash))
        .route("/nodes/{id}/restore", post(handlers::node::restore))
}

/// Breadcrumbs, deep links, usage
fn navigation_routes() -> Router<AppState> {
    Router::new()
        .route("/ancestors", get(handlers::navigation::ancestors))
        .route("/resolve", get(handlers::navigation::resolve))
        .route("/usage", get(handlers::usage::usage))
}

/// Deletion task status
fn deletion_routes() -> Router<AppState> {
    Router::new().route("/deletions/{id}", get(handlers::deletion::status))
}

/// Health check
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
