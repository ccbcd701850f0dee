//! Validation and scheduling of permanent deletions.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::info;

use drive_core::error::AppError;
use drive_core::types::{DeletionTaskId, NodeId};
use drive_database::NodeStore;
use drive_entity::deletion::{DeletionEntry, DeletionStatus, DeletionTask};
use drive_entity::node::Node;

use crate::context::RequestContext;
use crate::guard::AccessGuard;

use super::scheduler::DeletionScheduler;

/// Phase 0 of the two-phase delete: checks, subtree collection, hand-off.
#[derive(Debug, Clone)]
pub struct DeletionService {
    store: Arc<dyn NodeStore>,
    guard: AccessGuard,
    scheduler: Arc<dyn DeletionScheduler>,
}

impl DeletionService {
    /// Create a deletion service.
    pub fn new(store: Arc<dyn NodeStore>, scheduler: Arc<dyn DeletionScheduler>) -> Self {
        Self {
            guard: AccessGuard::new(store.clone()),
            store,
            scheduler,
        }
    }

    /// Schedule `id` and its subtree for permanent removal.
    ///
    /// Every descendant must already be in the trash; otherwise nothing is
    /// scheduled and a conflict is returned. The returned id can be polled
    /// with [`DeletionService::status`].
    pub async fn request(
        &self,
        ctx: &RequestContext,
        id: NodeId,
    ) -> Result<DeletionTaskId, AppError> {
        let root = self.guard.require_owned(ctx, id).await?;
        let subtree = self.collect_post_order(&root).await?;

        if let Some(live) = subtree.iter().find(|node| node.id != root.id && node.is_live()) {
            return Err(AppError::conflict(format!(
                "'{}' is not in the trash; trash the folder before deleting it",
                live.name
            )));
        }

        let entries = subtree
            .into_iter()
            .map(|node| DeletionEntry {
                node_id: node.id,
                storage_key: node.storage_key,
            })
            .collect();
        let task = DeletionTask::new(root.owner_id.clone(), root.id, entries);
        let task_id = task.id;
        let node_count = task.node_count();

        self.scheduler.schedule(task).await?;
        info!(
            owner_id = %root.owner_id,
            node_id = %root.id,
            task_id = %task_id,
            node_count,
            "Permanent deletion scheduled"
        );
        Ok(task_id)
    }

    /// Progress of a deletion the caller requested.
    pub fn status(
        &self,
        ctx: &RequestContext,
        id: DeletionTaskId,
    ) -> Result<DeletionStatus, AppError> {
        let owner = self.guard.require_identity(ctx)?;
        let status = self
            .scheduler
            .status(id)
            .ok_or_else(|| AppError::not_found(format!("Deletion task {id} not found")))?;
        if &status.owner_id != owner {
            return Err(AppError::authorization("You do not own this deletion task"));
        }
        Ok(status)
    }

    /// The subtree under `root`, every child before its parent, root last.
    async fn collect_post_order(&self, root: &Node) -> Result<Vec<Node>, AppError> {
        let mut order = Vec::new();
        let mut visited = HashSet::from([root.id]);
        // (node, children already pushed)
        let mut stack = vec![(root.clone(), false)];

        while let Some((node, expanded)) = stack.pop() {
            if expanded || !node.is_folder() {
                order.push(node);
                continue;
            }
            let children = self.store.find_child_nodes(node.id).await?;
            stack.push((node, true));
            for child in children.into_iter().rev() {
                if visited.insert(child.id) {
                    stack.push((child, false));
                }
            }
        }
        Ok(order)
    }
}
