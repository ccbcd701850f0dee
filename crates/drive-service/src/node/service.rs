//! Listing, creation, rename and usage of nodes.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use drive_core::config::TreeConfig;
use drive_core::error::AppError;
use drive_core::types::{NodeId, OwnerId};
use drive_database::NodeStore;
use drive_entity::node::{CreateNode, FileContent, Node, NodeKind, NodePatch, StorageUsage};
use drive_storage::keys::{key_belongs_to, validate_key};

use crate::context::RequestContext;
use crate::guard::AccessGuard;

use super::names::normalize_name;

/// Owner-scoped reads and the non-cascading mutations.
#[derive(Debug, Clone)]
pub struct NodeService {
    store: Arc<dyn NodeStore>,
    guard: AccessGuard,
    tree: TreeConfig,
    quota_bytes: u64,
}

impl NodeService {
    /// Create a node service.
    pub fn new(store: Arc<dyn NodeStore>, tree: TreeConfig, quota_bytes: u64) -> Self {
        Self {
            guard: AccessGuard::new(store.clone()),
            store,
            tree,
            quota_bytes,
        }
    }

    /// Live folders directly under `parent` (root when `None`).
    pub async fn list_folders(
        &self,
        ctx: &RequestContext,
        parent: Option<NodeId>,
    ) -> Result<Vec<Node>, AppError> {
        self.list_children(ctx, parent, NodeKind::Folder).await
    }

    /// Live files directly under `parent` (root when `None`).
    pub async fn list_files(
        &self,
        ctx: &RequestContext,
        parent: Option<NodeId>,
    ) -> Result<Vec<Node>, AppError> {
        self.list_children(ctx, parent, NodeKind::File).await
    }

    async fn list_children(
        &self,
        ctx: &RequestContext,
        parent: Option<NodeId>,
        kind: NodeKind,
    ) -> Result<Vec<Node>, AppError> {
        let Some(owner) = ctx.identity.as_ref() else {
            return Ok(Vec::new());
        };
        let mut nodes = self.store.find_children_of_kind(parent, owner, kind).await?;
        nodes.retain(Node::is_live);
        Ok(nodes)
    }

    /// Every trashed node of the caller, whatever its parent or kind.
    pub async fn list_trashed(&self, ctx: &RequestContext) -> Result<Vec<Node>, AppError> {
        match ctx.identity.as_ref() {
            Some(owner) => self.store.find_trashed(owner).await,
            None => Ok(Vec::new()),
        }
    }

    /// Create a folder.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        name: &str,
        parent: Option<NodeId>,
    ) -> Result<Node, AppError> {
        let owner = self.guard.require_identity(ctx)?;
        let name = normalize_name(name)?;
        self.check_parent(ctx, parent).await?;
        self.ensure_folder_name_free(parent, owner, &name, None)
            .await?;

        let node = self
            .store
            .insert(CreateNode::folder(name, parent, owner.clone()))
            .await?;
        info!(owner_id = %owner, node_id = %node.id, name = %node.name, "Folder created");
        Ok(node)
    }

    /// Create a file record for content already placed in the object store.
    pub async fn create_file(
        &self,
        ctx: &RequestContext,
        name: &str,
        parent: Option<NodeId>,
        content: FileContent,
    ) -> Result<Node, AppError> {
        let owner = self.guard.require_identity(ctx)?;
        let name = normalize_name(name)?;
        if content.size_bytes.is_some_and(|size| size < 0) {
            return Err(AppError::validation("File size cannot be negative"));
        }
        self.check_parent(ctx, parent).await?;
        if let Some(key) = content.storage_key.as_deref() {
            self.check_storage_key(owner, key).await?;
        }

        let node = self
            .store
            .insert(CreateNode::file(name, parent, owner.clone(), content))
            .await?;
        info!(owner_id = %owner, node_id = %node.id, name = %node.name, "File created");
        Ok(node)
    }

    /// Rename a node the caller owns.
    pub async fn rename(
        &self,
        ctx: &RequestContext,
        id: NodeId,
        new_name: &str,
    ) -> Result<Node, AppError> {
        let owner = self.guard.require_identity(ctx)?;
        let name = normalize_name(new_name)?;
        let node = self.guard.require_owned(ctx, id).await?;

        if node.is_folder() && node.is_live() {
            self.ensure_folder_name_free(node.parent_id, owner, &name, Some(node.id))
                .await?;
        }

        let renamed = self
            .store
            .patch(id, NodePatch::rename(name, Utc::now()))
            .await?
            .ok_or_else(|| AppError::not_found(format!("Node {id} not found")))?;
        info!(owner_id = %owner, node_id = %id, name = %renamed.name, "Node renamed");
        Ok(renamed)
    }

    /// Storage usage of the caller. Anonymous callers see zeros.
    pub async fn usage(&self, ctx: &RequestContext) -> Result<StorageUsage, AppError> {
        let quota = i64::try_from(self.quota_bytes).unwrap_or(i64::MAX);
        let Some(owner) = ctx.identity.as_ref() else {
            return Ok(StorageUsage::from_nodes(std::iter::empty(), quota));
        };
        let nodes = self.store.find_by_owner(owner).await?;
        Ok(StorageUsage::from_nodes(&nodes, quota))
    }

    /// A new child may only go under a live folder the caller owns.
    async fn check_parent(
        &self,
        ctx: &RequestContext,
        parent: Option<NodeId>,
    ) -> Result<(), AppError> {
        let Some(parent_id) = parent else {
            return Ok(());
        };
        let parent = self.guard.require_owned(ctx, parent_id).await?;
        if !parent.is_folder() {
            return Err(AppError::validation("Parent must be a folder"));
        }
        if parent.trashed {
            return Err(AppError::validation("Parent folder is in the trash"));
        }
        Ok(())
    }

    /// A file may only reference an object stored under the caller's
    /// prefix that no other node already points at.
    async fn check_storage_key(&self, owner: &OwnerId, key: &str) -> Result<(), AppError> {
        validate_key(key)?;
        if !key_belongs_to(key, owner.as_str()) {
            return Err(AppError::authorization(
                "Storage key belongs to another owner",
            ));
        }
        let nodes = self.store.find_by_owner(owner).await?;
        if nodes.iter().any(|node| node.storage_key.as_deref() == Some(key)) {
            return Err(AppError::conflict("Storage key is already in use"));
        }
        Ok(())
    }

    async fn ensure_folder_name_free(
        &self,
        parent: Option<NodeId>,
        owner: &OwnerId,
        name: &str,
        exclude: Option<NodeId>,
    ) -> Result<(), AppError> {
        if !self.tree.unique_folder_names {
            return Ok(());
        }
        let existing = self.store.find_folder_by_name(parent, owner, name).await?;
        match existing {
            Some(folder) if Some(folder.id) != exclude => Err(AppError::conflict(format!(
                "A folder named '{name}' already exists here"
            ))),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{ctx, services};
    use drive_core::error::ErrorKind;
    use drive_storage::keys::generate_key;

    #[tokio::test]
    async fn test_list_scoped_to_parent_owner_and_kind() {
        let s = services();
        let alice = ctx("alice");
        let docs = s.nodes.create_folder(&alice, "Docs", None).await.expect("docs");
        s.nodes
            .create_folder(&alice, "Sub", Some(docs.id))
            .await
            .expect("sub");
        s.nodes
            .create_file(&alice, "a.txt", Some(docs.id), FileContent::default())
            .await
            .expect("file");
        s.nodes
            .create_folder(&ctx("bob"), "Bobs", None)
            .await
            .expect("bob root");

        let roots = s.nodes.list_folders(&alice, None).await.expect("roots");
        assert_eq!(roots.iter().map(|n| n.name.as_str()).collect::<Vec<_>>(), ["Docs"]);

        let sub = s.nodes.list_folders(&alice, Some(docs.id)).await.expect("sub");
        assert_eq!(sub.len(), 1);
        let files = s.nodes.list_files(&alice, Some(docs.id)).await.expect("files");
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "a.txt");
    }

    #[tokio::test]
    async fn test_anonymous_queries_are_empty_and_mutations_fail() {
        let s = services();
        s.nodes.create_folder(&ctx("alice"), "Docs", None).await.expect("docs");
        let anon = RequestContext::anonymous("127.0.0.1", None);

        assert!(s.nodes.list_folders(&anon, None).await.expect("list").is_empty());
        assert!(s.nodes.list_trashed(&anon).await.expect("trash").is_empty());
        assert_eq!(s.nodes.usage(&anon).await.expect("usage").folder_count, 0);

        let err = s
            .nodes
            .create_folder(&anon, "X", None)
            .await
            .expect_err("anonymous create");
        assert_eq!(err.kind, ErrorKind::Authentication);
    }

    #[tokio::test]
    async fn test_rename_rejects_blank_names_without_mutation() {
        let s = services();
        let alice = ctx("alice");
        let docs = s.nodes.create_folder(&alice, "Docs", None).await.expect("docs");

        for blank in ["", "   "] {
            let err = s.nodes.rename(&alice, docs.id, blank).await.expect_err("blank");
            assert_eq!(err.kind, ErrorKind::Validation);
        }
        let unchanged = s.store.get(docs.id).await.expect("get").expect("exists");
        assert_eq!(unchanged, docs);
    }

    #[tokio::test]
    async fn test_rename_trims_and_bumps_updated_at() {
        let s = services();
        let alice = ctx("alice");
        let docs = s.nodes.create_folder(&alice, "Docs", None).await.expect("docs");

        let renamed = s
            .nodes
            .rename(&alice, docs.id, "  Papers  ")
            .await
            .expect("rename");
        assert_eq!(renamed.name, "Papers");
        assert!(renamed.updated_at >= docs.updated_at);
        assert_eq!(renamed.created_at, docs.created_at);
    }

    #[tokio::test]
    async fn test_foreign_rename_is_unauthorized_and_harmless() {
        let s = services();
        let docs = s
            .nodes
            .create_folder(&ctx("alice"), "Docs", None)
            .await
            .expect("docs");

        let err = s
            .nodes
            .rename(&ctx("bob"), docs.id, "Mine")
            .await
            .expect_err("foreign");
        assert_eq!(err.kind, ErrorKind::Authorization);
        assert_eq!(s.store.get(docs.id).await.expect("get"), Some(docs));
    }

    #[tokio::test]
    async fn test_folder_names_unique_among_live_siblings() {
        let s = services();
        let alice = ctx("alice");
        let docs = s.nodes.create_folder(&alice, "Docs", None).await.expect("docs");

        let err = s
            .nodes
            .create_folder(&alice, "docs", None)
            .await
            .expect_err("duplicate");
        assert_eq!(err.kind, ErrorKind::Conflict);

        // Case-only rename of the same folder is allowed.
        s.nodes.rename(&alice, docs.id, "DOCS").await.expect("self rename");

        let other = s.nodes.create_folder(&alice, "Other", None).await.expect("other");
        let err = s
            .nodes
            .rename(&alice, other.id, "Docs")
            .await
            .expect_err("clash");
        assert_eq!(err.kind, ErrorKind::Conflict);

        // Another owner may reuse the name.
        s.nodes
            .create_folder(&ctx("bob"), "Docs", None)
            .await
            .expect("bob docs");
    }

    #[tokio::test]
    async fn test_create_under_invalid_parent() {
        let s = services();
        let alice = ctx("alice");
        let file = s
            .nodes
            .create_file(&alice, "a.txt", None, FileContent::default())
            .await
            .expect("file");

        let err = s
            .nodes
            .create_folder(&alice, "X", Some(file.id))
            .await
            .expect_err("file parent");
        assert_eq!(err.kind, ErrorKind::Validation);

        let err = s
            .nodes
            .create_folder(&alice, "X", Some(NodeId::new()))
            .await
            .expect_err("missing parent");
        assert_eq!(err.kind, ErrorKind::NotFound);

        let bobs = s
            .nodes
            .create_folder(&ctx("bob"), "Bobs", None)
            .await
            .expect("bob");
        let err = s
            .nodes
            .create_folder(&alice, "X", Some(bobs.id))
            .await
            .expect_err("foreign parent");
        assert_eq!(err.kind, ErrorKind::Authorization);
    }

    #[tokio::test]
    async fn test_storage_key_must_belong_to_caller() {
        let s = services();
        let alice = ctx("alice");
        let bobs_key = generate_key("bob");
        let foreign = FileContent {
            storage_key: Some(bobs_key),
            ..FileContent::default()
        };
        let err = s
            .nodes
            .create_file(&alice, "stolen.bin", None, foreign)
            .await
            .expect_err("foreign key");
        assert_eq!(err.kind, ErrorKind::Authorization);

        let escaping = FileContent {
            storage_key: Some("alice/../bob/x".into()),
            ..FileContent::default()
        };
        let err = s
            .nodes
            .create_file(&alice, "up.bin", None, escaping)
            .await
            .expect_err("traversal");
        assert_eq!(err.kind, ErrorKind::Validation);

        let own = FileContent {
            storage_key: Some(generate_key("alice")),
            ..FileContent::default()
        };
        s.nodes
            .create_file(&alice, "mine.bin", None, own.clone())
            .await
            .expect("own key");
        let err = s
            .nodes
            .create_file(&alice, "copy.bin", None, own)
            .await
            .expect_err("shared key");
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert!(s.store.find_by_owner(&OwnerId::new("bob")).await.expect("bob").is_empty());
    }

    #[tokio::test]
    async fn test_usage_counts_live_content() {
        let s = services();
        let alice = ctx("alice");
        s.nodes.create_folder(&alice, "Docs", None).await.expect("docs");
        let content = FileContent {
            size_bytes: Some(2048),
            ..FileContent::default()
        };
        s.nodes
            .create_file(&alice, "a.bin", None, content)
            .await
            .expect("file");

        let usage = s.nodes.usage(&alice).await.expect("usage");
        assert_eq!(usage.used_bytes, 2048);
        assert_eq!(usage.file_count, 1);
        assert_eq!(usage.folder_count, 1);
    }
}
