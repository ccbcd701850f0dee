//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use drive_core::types::NodeId;
use drive_entity::node::FileContent;

/// `?parent_id=` on listings; absent means the root.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParentQuery {
    /// Folder whose children are listed.
    pub parent_id: Option<NodeId>,
}

/// `?folder_id=` on the ancestors query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AncestorsQuery {
    /// Folder whose chain is resolved.
    pub folder_id: Option<NodeId>,
}

/// `?path=a/b` on the resolve query.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolveQuery {
    /// Slash-separated folder names from the root.
    #[serde(default)]
    pub path: String,
}

/// `?download=true` asks for an attachment instead of inline content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentQuery {
    /// Serve with `Content-Disposition: attachment`.
    #[serde(default)]
    pub download: bool,
}

/// Create folder request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFolderRequest {
    /// Folder name.
    #[validate(length(max = 255))]
    pub name: String,
    /// Parent folder ID; root when absent.
    pub parent_id: Option<NodeId>,
}

/// Create a file record for content stored elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFileRequest {
    /// File name.
    #[validate(length(max = 255))]
    pub name: String,
    /// Parent folder ID; root when absent.
    pub parent_id: Option<NodeId>,
    /// MIME type.
    pub mime_type: Option<String>,
    /// Size in bytes.
    #[validate(range(min = 0))]
    pub size_bytes: Option<i64>,
    /// Where the content can be fetched.
    pub content_url: Option<String>,
    /// Object store key of the content.
    pub storage_key: Option<String>,
}

impl CreateFileRequest {
    /// The content part of the request.
    pub fn content(&self) -> FileContent {
        FileContent {
            mime_type: self.mime_type.clone(),
            size_bytes: self.size_bytes,
            content_url: self.content_url.clone(),
            storage_key: self.storage_key.clone(),
        }
    }
}

/// Rename request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RenameRequest {
    /// New name.
    #[validate(length(max = 255))]
    pub name: String,
}
