//! Partial updates applied to a stored node.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use drive_core::types::NodeId;

use super::model::Node;

/// A set of field changes. `None` leaves the field untouched.
///
/// Nullable columns use a nested `Option` so that "clear the value" is
/// distinct from "leave it alone".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodePatch {
    /// New display name.
    pub name: Option<String>,
    /// New parent (`Some(None)` moves the node to root).
    pub parent_id: Option<Option<NodeId>>,
    /// New trash flag.
    pub trashed: Option<bool>,
    /// New trash timestamp.
    pub trashed_at: Option<Option<DateTime<Utc>>>,
    /// New modification timestamp.
    pub updated_at: Option<DateTime<Utc>>,
}

impl NodePatch {
    /// Rename the node and bump its modification time.
    pub fn rename(name: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            name: Some(name.into()),
            updated_at: Some(now),
            ..Self::default()
        }
    }

    /// Mark the node trashed at `now`.
    pub fn trash(now: DateTime<Utc>) -> Self {
        Self {
            trashed: Some(true),
            trashed_at: Some(Some(now)),
            ..Self::default()
        }
    }

    /// Clear the trash flag.
    pub fn restore() -> Self {
        Self {
            trashed: Some(false),
            trashed_at: Some(None),
            ..Self::default()
        }
    }

    /// Move the node to the root of its owner's tree.
    pub fn detach_to_root(mut self) -> Self {
        self.parent_id = Some(None);
        self
    }

    /// Whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.parent_id.is_none()
            && self.trashed.is_none()
            && self.trashed_at.is_none()
            && self.updated_at.is_none()
    }

    /// Apply the changes to an in-memory node.
    pub fn apply(&self, node: &mut Node) {
        if let Some(name) = &self.name {
            node.name = name.clone();
        }
        if let Some(parent_id) = self.parent_id {
            node.parent_id = parent_id;
        }
        if let Some(trashed) = self.trashed {
            node.trashed = trashed;
        }
        if let Some(trashed_at) = self.trashed_at {
            node.trashed_at = trashed_at;
        }
        if let Some(updated_at) = self.updated_at {
            node.updated_at = updated_at;
        }
    }
}
