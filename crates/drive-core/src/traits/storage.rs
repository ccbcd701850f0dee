//! Object store trait for the binary content behind file nodes.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;

/// Location of a stored object, persisted opaquely on the file node.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StoredObject {
    /// Key used to address the object in later reads and deletes.
    pub key: String,
    /// URL the content can be fetched from.
    pub url: String,
    /// Number of bytes written.
    pub size_bytes: u64,
}

/// A byte stream type used for reading object contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Trait for binary object storage backends.
///
/// The tree engine never touches object bytes itself; it only persists the
/// `(url, key)` pair returned by [`ObjectStore::put`] and hands keys back to
/// [`ObjectStore::delete_many`] during permanent deletion.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "memory").
    fn provider_type(&self) -> &str;

    /// Check whether the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Store an object under a key derived from `key_hint`.
    async fn put(&self, key_hint: &str, data: Bytes) -> AppResult<StoredObject>;

    /// Stream an object's bytes.
    async fn read(&self, key: &str) -> AppResult<ByteStream>;

    /// Delete one object. Deleting a missing object is not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Delete several objects, reporting the outcome per key in input order.
    async fn delete_many(&self, keys: &[String]) -> Vec<(String, AppResult<()>)> {
        let mut outcomes = Vec::with_capacity(keys.len());
        for key in keys {
            outcomes.push((key.clone(), self.delete(key).await));
        }
        outcomes
    }
}
