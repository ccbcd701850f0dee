//! Trash and restore cascades.
//!
//! Both walks use an explicit stack and a visited set, so deep trees do not
//! grow the call stack and a corrupt parent cycle cannot loop forever.
//! Neither walk is atomic. Every step is idempotent, so re-running an
//! interrupted cascade converges on the same result.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use drive_core::config::TreeConfig;
use drive_core::error::AppError;
use drive_core::types::{NodeId, OwnerId};
use drive_database::NodeStore;
use drive_entity::node::{Node, NodePatch};

use crate::context::RequestContext;
use crate::guard::AccessGuard;
use crate::node::names::numbered_name;

/// Attempts at a free ` (n)` name before giving up on a restore.
const MAX_RENAME_ATTEMPTS: u32 = 1000;

/// Soft-delete and recovery of whole subtrees.
#[derive(Debug, Clone)]
pub struct CascadeService {
    store: Arc<dyn NodeStore>,
    guard: AccessGuard,
    unique_folder_names: bool,
}

impl CascadeService {
    /// Create a cascade service.
    pub fn new(store: Arc<dyn NodeStore>, tree: &TreeConfig) -> Self {
        Self {
            guard: AccessGuard::new(store.clone()),
            store,
            unique_folder_names: tree.unique_folder_names,
        }
    }

    /// Trash `id` and every descendant, parents before children.
    ///
    /// Descendants are found structurally (by parent only) and marked
    /// unconditionally, including ones that were already trashed.
    pub async fn trash(&self, ctx: &RequestContext, id: NodeId) -> Result<Node, AppError> {
        let target = self.guard.require_owned(ctx, id).await?;
        let now = Utc::now();

        let mut stack = vec![target.id];
        let mut visited = HashSet::new();
        let mut trashed_target = None;

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            let Some(node) = self.store.patch(current, NodePatch::trash(now)).await? else {
                continue;
            };
            if node.is_folder() {
                let children = self.store.find_child_nodes(node.id).await?;
                // Reversed so the first child is popped first.
                stack.extend(
                    children
                        .into_iter()
                        .rev()
                        .map(|child| child.id)
                        .filter(|child| !visited.contains(child)),
                );
            }
            if node.id == target.id {
                trashed_target = Some(node);
            }
        }

        info!(
            owner_id = %target.owner_id,
            node_id = %id,
            count = visited.len(),
            "Moved subtree to trash"
        );
        trashed_target.ok_or_else(|| AppError::not_found(format!("Node {id} not found")))
    }

    /// Restore `id` and the trashed part of its subtree.
    ///
    /// If the target's parent is gone or itself trashed, the target moves to
    /// the root first. Below the target only trashed children are restored,
    /// and the walk descends only into children it restored. A restored
    /// folder whose name is taken by a live sibling folder gets a ` (n)`
    /// suffix.
    pub async fn restore(&self, ctx: &RequestContext, id: NodeId) -> Result<Node, AppError> {
        let target = self.guard.require_owned(ctx, id).await?;

        let mut patch = NodePatch::restore();
        let mut destination = target.parent_id;
        if let Some(parent_id) = target.parent_id {
            let parent_usable = self
                .store
                .get(parent_id)
                .await?
                .is_some_and(|parent| parent.is_live());
            if !parent_usable {
                debug!(node_id = %id, parent_id = %parent_id, "Parent unavailable, restoring to root");
                patch = patch.detach_to_root();
                destination = None;
            }
        }
        let patch = self.resolve_name_clash(&target, destination, patch).await?;

        let restored = self
            .store
            .patch(id, patch)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Node {id} not found")))?;

        let mut visited = HashSet::from([restored.id]);
        let mut stack = Vec::new();
        if restored.is_folder() {
            stack.push(restored.id);
        }

        while let Some(folder) = stack.pop() {
            for child in self.store.find_child_nodes(folder).await? {
                if !child.trashed || !visited.insert(child.id) {
                    continue;
                }
                let patch = self
                    .resolve_name_clash(&child, Some(folder), NodePatch::restore())
                    .await?;
                if let Some(node) = self.store.patch(child.id, patch).await? {
                    if node.is_folder() {
                        stack.push(node.id);
                    }
                }
            }
        }

        info!(
            owner_id = %restored.owner_id,
            node_id = %id,
            count = visited.len(),
            to_root = restored.parent_id.is_none() && target.parent_id.is_some(),
            "Restored subtree from trash"
        );
        Ok(restored)
    }

    /// Add a rename to `patch` when `node` is a folder whose name is already
    /// used by a live folder under `parent`.
    async fn resolve_name_clash(
        &self,
        node: &Node,
        parent: Option<NodeId>,
        mut patch: NodePatch,
    ) -> Result<NodePatch, AppError> {
        if !self.unique_folder_names || !node.is_folder() {
            return Ok(patch);
        }
        if !self.name_taken(parent, &node.owner_id, &node.name, node.id).await? {
            return Ok(patch);
        }
        for n in 2..=MAX_RENAME_ATTEMPTS {
            let candidate = numbered_name(&node.name, n);
            if !self.name_taken(parent, &node.owner_id, &candidate, node.id).await? {
                debug!(node_id = %node.id, name = %candidate, "Renaming restored folder to avoid a clash");
                patch.name = Some(candidate);
                patch.updated_at = Some(Utc::now());
                return Ok(patch);
            }
        }
        Err(AppError::conflict(format!(
            "No free name for folder '{}' in its destination",
            node.name
        )))
    }

    async fn name_taken(
        &self,
        parent: Option<NodeId>,
        owner: &OwnerId,
        name: &str,
        exclude: NodeId,
    ) -> Result<bool, AppError> {
        Ok(self
            .store
            .find_folder_by_name(parent, owner, name)
            .await?
            .is_some_and(|folder| folder.id != exclude))
    }
}
