//! Breadcrumb and deep-link navigation.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::warn;

use drive_core::config::TreeConfig;
use drive_core::error::AppError;
use drive_core::types::{NodeId, OwnerId};
use drive_database::NodeStore;
use drive_entity::node::Node;

use crate::context::RequestContext;

/// Resolves ancestor chains and name paths within an owner's tree.
#[derive(Debug, Clone)]
pub struct NavigationService {
    store: Arc<dyn NodeStore>,
    max_depth: usize,
}

impl NavigationService {
    /// Create a navigation service.
    pub fn new(store: Arc<dyn NodeStore>, tree: &TreeConfig) -> Self {
        Self {
            store,
            max_depth: tree.max_depth,
        }
    }

    /// The chain from the root down to the parent of `folder_id`.
    ///
    /// The target is loaded and must belong to the caller but is not part
    /// of the result. The walk stops quietly at a missing node, at a node
    /// owned by someone else, on a repeated id, or after `max_depth` steps.
    /// Whatever was collected up to that point is returned.
    pub async fn resolve_ancestors(
        &self,
        ctx: &RequestContext,
        folder_id: Option<NodeId>,
    ) -> Result<Vec<Node>, AppError> {
        let (Some(owner), Some(start)) = (ctx.identity.as_ref(), folder_id) else {
            return Ok(Vec::new());
        };
        let Some(target) = self.store.get(start).await? else {
            return Ok(Vec::new());
        };
        if !target.is_owned_by(owner) {
            return Ok(Vec::new());
        }

        let mut chain = Vec::new();
        let mut visited = HashSet::from([start]);
        let mut next = target.parent_id;

        while let Some(current) = next {
            if chain.len() >= self.max_depth {
                warn!(node_id = %start, max_depth = self.max_depth, "Ancestor walk hit depth limit");
                break;
            }
            if !visited.insert(current) {
                warn!(node_id = %current, "Ancestor walk found a parent cycle");
                break;
            }
            let Some(node) = self.store.get(current).await? else {
                break;
            };
            if !node.is_owned_by(owner) {
                break;
            }
            next = node.parent_id;
            chain.push(node);
        }

        chain.reverse();
        Ok(chain)
    }

    /// Find the folder addressed by `segments`, starting at the root.
    ///
    /// Returns `None` when any step has no match, when no segments are
    /// given, or when the caller is anonymous.
    pub async fn resolve_path<S: AsRef<str>>(
        &self,
        ctx: &RequestContext,
        segments: &[S],
    ) -> Result<Option<Node>, AppError> {
        let Some(owner) = ctx.identity.as_ref() else {
            return Ok(None);
        };
        if segments.is_empty() {
            return Ok(None);
        }

        let mut current: Option<Node> = None;
        for segment in segments {
            let parent = current.as_ref().map(|node| node.id);
            match self.find_segment(parent, owner, segment.as_ref()).await? {
                Some(folder) => current = Some(folder),
                None => return Ok(None),
            }
        }
        Ok(current)
    }

    /// One level of the path walk. Deep links spell spaces as hyphens, so
    /// that reading is tried first and the literal segment second.
    async fn find_segment(
        &self,
        parent: Option<NodeId>,
        owner: &OwnerId,
        segment: &str,
    ) -> Result<Option<Node>, AppError> {
        let literal = segment.trim();
        if literal.is_empty() {
            return Ok(None);
        }
        let spaced = literal.replace('-', " ");
        if let Some(found) = self.store.find_folder_by_name(parent, owner, &spaced).await? {
            return Ok(Some(found));
        }
        if spaced != literal {
            return self.store.find_folder_by_name(parent, owner, literal).await;
        }
        Ok(None)
    }
}

/// Split a `a/b/c` path into its non-empty segments.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('/')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect()
}
