//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use drive_auth::JwtDecoder;
use drive_core::config::AppConfig;
use drive_core::traits::storage::ObjectStore;
use drive_database::NodeStore;
use drive_service::{
    AccessGuard, CascadeService, ContentService, DeletionScheduler, DeletionService,
    NavigationService, NodeService,
};
use drive_worker::DeletionQueue;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Node entity store
    pub store: Arc<dyn NodeStore>,
    /// Binary object store
    pub objects: Arc<dyn ObjectStore>,
    /// Permanent deletion queue
    pub deletion_queue: Arc<DeletionQueue>,

    // ── Auth ─────────────────────────────────────────────────
    /// JWT token decoder and validator
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    /// Listing, creation, rename, usage
    pub node_service: Arc<NodeService>,
    /// Trash and restore cascades
    pub cascade_service: Arc<CascadeService>,
    /// Ancestors and path resolution
    pub navigation_service: Arc<NavigationService>,
    /// Permanent deletion requests
    pub deletion_service: Arc<DeletionService>,
    /// Upload and download
    pub content_service: Arc<ContentService>,
}

impl AppState {
    /// Wire every service over the given stores and queue.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn NodeStore>,
        objects: Arc<dyn ObjectStore>,
        deletion_queue: Arc<DeletionQueue>,
    ) -> Self {
        let guard = AccessGuard::new(Arc::clone(&store));
        let node_service = NodeService::new(
            Arc::clone(&store),
            config.tree.clone(),
            config.storage.quota_bytes,
        );
        let scheduler: Arc<dyn DeletionScheduler> = deletion_queue.clone();

        Self {
            jwt_decoder: Arc::new(JwtDecoder::new(&config.auth)),
            cascade_service: Arc::new(CascadeService::new(Arc::clone(&store), &config.tree)),
            navigation_service: Arc::new(NavigationService::new(Arc::clone(&store), &config.tree)),
            deletion_service: Arc::new(DeletionService::new(Arc::clone(&store), scheduler)),
            content_service: Arc::new(ContentService::new(
                Arc::clone(&objects),
                node_service.clone(),
                guard,
                config.storage.max_upload_size_bytes,
            )),
            node_service: Arc::new(node_service),
            config: Arc::new(config),
            store,
            objects,
            deletion_queue,
        }
    }
}
