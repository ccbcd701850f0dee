//! Single-owner access checks.

use std::sync::Arc;

use drive_core::error::AppError;
use drive_core::types::{NodeId, OwnerId};
use drive_database::NodeStore;
use drive_entity::node::Node;

use crate::context::RequestContext;

/// Resolves the caller and enforces that only the owner touches a node.
#[derive(Debug, Clone)]
pub struct AccessGuard {
    store: Arc<dyn NodeStore>,
}

impl AccessGuard {
    /// Create a guard over `store`.
    pub fn new(store: Arc<dyn NodeStore>) -> Self {
        Self { store }
    }

    /// The caller's identity, or an authentication error.
    pub fn require_identity<'a>(&self, ctx: &'a RequestContext) -> Result<&'a OwnerId, AppError> {
        ctx.identity
            .as_ref()
            .ok_or_else(|| AppError::authentication("Authentication required"))
    }

    /// Load a node the caller owns, checking existence before ownership.
    pub async fn require_owned(&self, ctx: &RequestContext, id: NodeId) -> Result<Node, AppError> {
        let owner = self.require_identity(ctx)?;
        let node = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Node {id} not found")))?;
        if !node.is_owned_by(owner) {
            return Err(AppError::authorization("You do not own this item"));
        }
        Ok(node)
    }
}
