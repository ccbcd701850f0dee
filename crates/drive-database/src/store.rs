//! The node store seam.
//!
//! Every query the tree engine issues goes through [`NodeStore`], so the
//! services never see SQL or the in-memory indexes directly. Listings are
//! returned in insertion order; each lookup is backed by an index on the
//! fields it filters.

use async_trait::async_trait;

use drive_core::result::AppResult;
use drive_core::types::{NodeId, OwnerId};
use drive_entity::node::{CreateNode, Node, NodeKind, NodePatch};

/// Persistent storage of file-tree nodes.
#[async_trait]
pub trait NodeStore: Send + Sync + std::fmt::Debug + 'static {
    /// Backend name for health reporting.
    fn backend_name(&self) -> &'static str;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Fetch a node by id.
    async fn get(&self, id: NodeId) -> AppResult<Option<Node>>;

    /// Insert a node and return the stored row.
    async fn insert(&self, data: CreateNode) -> AppResult<Node>;

    /// Apply a patch. Returns `None` when the node does not exist.
    async fn patch(&self, id: NodeId, patch: NodePatch) -> AppResult<Option<Node>>;

    /// Remove a node. Returns whether a row was removed.
    async fn delete(&self, id: NodeId) -> AppResult<bool>;

    /// Every node owned by `owner`, trashed or not.
    async fn find_by_owner(&self, owner: &OwnerId) -> AppResult<Vec<Node>>;

    /// Children of `parent` (root when `None`) of one kind, owned by `owner`.
    async fn find_children_of_kind(
        &self,
        parent: Option<NodeId>,
        owner: &OwnerId,
        kind: NodeKind,
    ) -> AppResult<Vec<Node>>;

    /// Every direct child of `parent`, regardless of owner or trash state.
    async fn find_child_nodes(&self, parent: NodeId) -> AppResult<Vec<Node>>;

    /// Trashed nodes owned by `owner`.
    async fn find_trashed(&self, owner: &OwnerId) -> AppResult<Vec<Node>>;

    /// First live folder under `parent` whose name matches case-insensitively.
    async fn find_folder_by_name(
        &self,
        parent: Option<NodeId>,
        owner: &OwnerId,
        name: &str,
    ) -> AppResult<Option<Node>>;
}
