//! Drive Server: personal cloud file storage.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use drive_core::config::{AppConfig, StoreBackend};
use drive_core::error::AppError;
use drive_database::{DatabasePool, MemoryNodeStore, NodeStore, PgNodeStore};

#[tokio::main]
async fn main() {
    let env = std::env::var("DRIVE_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!("Loaded configuration (env: {})", env);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Drive v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Create data directories ──────────────────────────
    tokio::fs::create_dir_all(&config.storage.data_root)
        .await
        .map_err(|e| {
            AppError::internal(format!(
                "Failed to create dir '{}': {}",
                config.storage.data_root, e
            ))
        })?;

    // ── Step 2: Entity store ─────────────────────────────────────
    let (store, db_pool) = connect_store(&config).await?;
    tracing::info!("Entity store ready (backend: {})", store.backend_name());

    // ── Step 3: Object store ─────────────────────────────────────
    tracing::info!(
        "Initializing object store (provider: {})...",
        config.storage.provider
    );
    let objects = drive_storage::build_object_store(&config.storage).await?;

    // ── Step 4: Deletion worker ──────────────────────────────────
    let (deletion_queue, worker) = drive_worker::spawn_deletion_worker(
        &config.worker,
        Arc::clone(&store),
        Arc::clone(&objects),
    );

    // ── Step 5: Build and start HTTP server ─────────────────────
    let server_config = config.server.clone();
    let state = drive_api::AppState::new(config, store, objects, deletion_queue);
    let app = drive_api::build_app(state);

    let served = drive_api::serve(&server_config, app, drive_api::shutdown_signal()).await;

    // ── Step 6: Drain background work ───────────────────────────
    if let Some(worker) = worker {
        worker.shutdown().await;
    }
    if let Some(pool) = db_pool {
        pool.close().await;
    }

    tracing::info!("Drive server stopped");
    served
}

/// Select the entity store backend; PostgreSQL gets its migrations run.
async fn connect_store(
    config: &AppConfig,
) -> Result<(Arc<dyn NodeStore>, Option<DatabasePool>), AppError> {
    match config.store.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory entity store; data is lost on restart");
            Ok((Arc::new(MemoryNodeStore::new()), None))
        }
        StoreBackend::Postgres => {
            tracing::info!("Connecting to database...");
            let db = DatabasePool::connect(&config.database).await?;

            tracing::info!("Running database migrations...");
            drive_database::migration::run_migrations(db.pool()).await?;
            tracing::info!("Database migrations complete");

            let store = PgNodeStore::new(db.pool().clone());
            Ok((Arc::new(store), Some(db)))
        }
    }
}
