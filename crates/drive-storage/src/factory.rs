//! Provider selection from configuration.

use std::sync::Arc;

use tracing::info;

use drive_core::config::StorageConfig;
use drive_core::error::AppError;
use drive_core::result::AppResult;
use drive_core::traits::storage::ObjectStore;

use crate::providers::local::LocalObjectStore;
use crate::providers::memory::MemoryObjectStore;

/// Build the object store named by `config.provider`.
pub async fn build_object_store(config: &StorageConfig) -> AppResult<Arc<dyn ObjectStore>> {
    let store: Arc<dyn ObjectStore> = match config.provider.as_str() {
        "local" => Arc::new(
            LocalObjectStore::new(&config.local.root_path, &config.local.public_base_url).await?,
        ),
        "memory" => Arc::new(MemoryObjectStore::new()),
        other => {
            return Err(AppError::configuration(format!(
                "Unknown storage provider '{other}'"
            )));
        }
    };
    info!(provider = store.provider_type(), "Object store ready");
    Ok(store)
}
