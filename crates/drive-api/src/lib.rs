//! # drive-api
//!
//! HTTP API layer for Drive built on Axum.
//!
//! Provides the REST endpoints over the file tree, the caller extractor,
//! middleware (CORS, request logging), DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, serve, shutdown_signal};
pub use error::ApiError;
pub use state::AppState;
