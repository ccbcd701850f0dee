//! Moving bytes between callers and the object store.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, warn};

use drive_core::error::AppError;
use drive_core::traits::storage::{ByteStream, ObjectStore};
use drive_core::types::NodeId;
use drive_entity::node::{FileContent, Node};
use drive_storage::mime::guess_from_name;

use crate::context::RequestContext;
use crate::guard::AccessGuard;
use crate::node::names::normalize_name;
use crate::node::service::NodeService;

/// An incoming file.
#[derive(Debug, Clone)]
pub struct Upload {
    /// Display name.
    pub name: String,
    /// Destination folder (root when `None`).
    pub parent_id: Option<NodeId>,
    /// Declared MIME type; guessed from the name when absent.
    pub mime_type: Option<String>,
    /// File bytes.
    pub data: Bytes,
}

/// An outgoing file.
pub struct Download {
    /// The file node.
    pub node: Node,
    /// The object bytes.
    pub stream: ByteStream,
}

impl std::fmt::Debug for Download {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Download").field("node", &self.node).finish()
    }
}

/// Upload stores the object first and then records the node; download is
/// owner-only.
#[derive(Debug, Clone)]
pub struct ContentService {
    objects: Arc<dyn ObjectStore>,
    nodes: NodeService,
    guard: AccessGuard,
    max_upload_bytes: u64,
}

impl ContentService {
    /// Create a content service.
    pub fn new(
        objects: Arc<dyn ObjectStore>,
        nodes: NodeService,
        guard: AccessGuard,
        max_upload_bytes: u64,
    ) -> Self {
        Self {
            objects,
            nodes,
            guard,
            max_upload_bytes,
        }
    }

    /// Store `upload` and create its file node.
    ///
    /// If the node cannot be created the stored object is removed again.
    pub async fn upload(&self, ctx: &RequestContext, upload: Upload) -> Result<Node, AppError> {
        let owner = self.guard.require_identity(ctx)?;
        let name = normalize_name(&upload.name)?;
        if upload.data.len() as u64 > self.max_upload_bytes {
            return Err(AppError::validation(format!(
                "File exceeds the {} byte upload limit",
                self.max_upload_bytes
            )));
        }

        let mime_type = upload
            .mime_type
            .filter(|mime| !mime.trim().is_empty() && mime != "application/octet-stream")
            .or_else(|| guess_from_name(&name))
            .unwrap_or_else(|| "application/octet-stream".to_string());

        let stored = self.objects.put(owner.as_str(), upload.data).await?;
        let content = FileContent {
            mime_type: Some(mime_type),
            size_bytes: Some(i64::try_from(stored.size_bytes).unwrap_or(i64::MAX)),
            content_url: Some(stored.url.clone()),
            storage_key: Some(stored.key.clone()),
        };

        match self
            .nodes
            .create_file(ctx, &name, upload.parent_id, content)
            .await
        {
            Ok(node) => {
                info!(owner_id = %owner, node_id = %node.id, bytes = stored.size_bytes, "File uploaded");
                Ok(node)
            }
            Err(e) => {
                if let Err(cleanup) = self.objects.delete(&stored.key).await {
                    warn!(key = %stored.key, error = %cleanup, "Failed to remove object of rejected upload");
                }
                Err(e)
            }
        }
    }

    /// Open the content of a file the caller owns.
    pub async fn download(&self, ctx: &RequestContext, id: NodeId) -> Result<Download, AppError> {
        let node = self.guard.require_owned(ctx, id).await?;
        if node.is_folder() {
            return Err(AppError::validation("Folders have no content"));
        }
        let key = node
            .storage_key
            .as_deref()
            .ok_or_else(|| AppError::not_found("File has no stored content"))?;
        let stream = self.objects.read(key).await?;
        Ok(Download { node, stream })
    }
}
