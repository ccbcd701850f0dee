//! Node entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use drive_core::types::{NodeId, OwnerId};

use super::kind::NodeKind;

/// A file or folder in an owner's tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Node {
    /// Unique node identifier.
    pub id: NodeId,
    /// Display name.
    pub name: String,
    /// File or folder.
    pub kind: NodeKind,
    /// Parent folder (None for root-level nodes).
    pub parent_id: Option<NodeId>,
    /// The subject that created the node.
    pub owner_id: OwnerId,
    /// MIME type (files only).
    pub mime_type: Option<String>,
    /// Content size in bytes (files only).
    pub size_bytes: Option<i64>,
    /// URL the content is served from (files only).
    pub content_url: Option<String>,
    /// Object store key of the content (files only).
    pub storage_key: Option<String>,
    /// When the node was created.
    pub created_at: DateTime<Utc>,
    /// When the node was created or last renamed.
    pub updated_at: DateTime<Utc>,
    /// Soft-delete flag.
    pub trashed: bool,
    /// When the node was trashed.
    pub trashed_at: Option<DateTime<Utc>>,
}

impl Node {
    /// Whether the node is a folder.
    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    /// Whether the node sits at the root of its owner's tree.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Whether the node is visible in normal listings.
    pub fn is_live(&self) -> bool {
        !self.trashed
    }

    /// Whether `owner` owns this node.
    pub fn is_owned_by(&self, owner: &OwnerId) -> bool {
        &self.owner_id == owner
    }

    /// Get the file extension (lowercase), if any.
    pub fn extension(&self) -> Option<String> {
        if self.is_folder() {
            return None;
        }
        self.name
            .rsplit('.')
            .next()
            .filter(|ext| *ext != self.name)
            .map(|ext| ext.to_lowercase())
    }
}

/// Content metadata persisted on file nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileContent {
    /// MIME type.
    pub mime_type: Option<String>,
    /// Size in bytes.
    pub size_bytes: Option<i64>,
    /// URL of the stored object.
    pub content_url: Option<String>,
    /// Object store key.
    pub storage_key: Option<String>,
}

/// What a new node holds. Folders cannot carry file metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeContent {
    /// A folder.
    Folder,
    /// A file with its content metadata.
    File(FileContent),
}

/// Data required to create a new node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNode {
    /// Display name (already validated and trimmed).
    pub name: String,
    /// Parent folder (None for root).
    pub parent_id: Option<NodeId>,
    /// The creating subject.
    pub owner_id: OwnerId,
    /// Folder marker or file metadata.
    pub content: NodeContent,
}

impl CreateNode {
    /// Describe a new folder.
    pub fn folder(name: impl Into<String>, parent_id: Option<NodeId>, owner_id: OwnerId) -> Self {
        Self {
            name: name.into(),
            parent_id,
            owner_id,
            content: NodeContent::Folder,
        }
    }

    /// Describe a new file.
    pub fn file(
        name: impl Into<String>,
        parent_id: Option<NodeId>,
        owner_id: OwnerId,
        content: FileContent,
    ) -> Self {
        Self {
            name: name.into(),
            parent_id,
            owner_id,
            content: NodeContent::File(content),
        }
    }

    /// The kind of node this creates.
    pub fn kind(&self) -> NodeKind {
        match self.content {
            NodeContent::Folder => NodeKind::Folder,
            NodeContent::File(_) => NodeKind::File,
        }
    }

    /// Materialize the row a store inserts, stamped with `now`.
    pub fn into_node(self, id: NodeId, now: DateTime<Utc>) -> Node {
        let kind = self.kind();
        let content = match self.content {
            NodeContent::Folder => FileContent::default(),
            NodeContent::File(content) => content,
        };
        Node {
            id,
            name: self.name,
            kind,
            parent_id: self.parent_id,
            owner_id: self.owner_id,
            mime_type: content.mime_type,
            size_bytes: content.size_bytes,
            content_url: content.content_url,
            storage_key: content.storage_key,
            created_at: now,
            updated_at: now,
            trashed: false,
            trashed_at: None,
        }
    }
}
