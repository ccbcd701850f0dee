//! In-memory object store.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use futures::stream;

use drive_core::error::AppError;
use drive_core::result::AppResult;
use drive_core::traits::storage::{ByteStream, ObjectStore, StoredObject};

use crate::keys::{generate_key, validate_key};

/// Keeps objects in a concurrent map. Contents are lost on restart.
///
/// Deletes can be made to fail, either for specific keys a given number of
/// times or wholesale, to exercise the deletion worker's retry path.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: DashMap<String, Bytes>,
    failing_deletes: DashMap<String, u32>,
    unavailable: AtomicBool,
}

impl MemoryObjectStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an object exists under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.objects.contains_key(key)
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Make the next `times` deletes of `key` fail.
    pub fn fail_deletes(&self, key: impl Into<String>, times: u32) {
        self.failing_deletes.insert(key.into(), times);
    }

    /// Make every delete fail until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(!self.unavailable.load(Ordering::SeqCst))
    }

    async fn put(&self, key_hint: &str, data: Bytes) -> AppResult<StoredObject> {
        let key = generate_key(key_hint);
        let size_bytes = data.len() as u64;
        self.objects.insert(key.clone(), data);
        Ok(StoredObject {
            url: format!("memory://{key}"),
            key,
            size_bytes,
        })
    }

    async fn read(&self, key: &str) -> AppResult<ByteStream> {
        validate_key(key)?;
        let data = self
            .objects
            .get(key)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::not_found(format!("Object not found: {key}")))?;
        Ok(Box::pin(stream::once(async move { Ok(data) })))
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        validate_key(key)?;
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::storage("Object store unavailable"));
        }
        if let Some(mut remaining) = self.failing_deletes.get_mut(key) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(AppError::storage(format!("Injected delete failure: {key}")));
            }
        }
        self.objects.remove(key);
        Ok(())
    }
}
