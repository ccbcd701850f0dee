//! Deletion task payload and status snapshot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use drive_core::types::{DeletionTaskId, NodeId, OwnerId};

use super::phase::DeletionPhase;

/// One node scheduled for removal, with the object key it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletionEntry {
    /// The node record to remove.
    pub node_id: NodeId,
    /// Object store key for file content, if any.
    pub storage_key: Option<String>,
}

/// A validated permanent deletion handed to the background worker.
///
/// `entries` is in post-order: every descendant precedes its ancestor,
/// and the root is last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletionTask {
    /// Task identifier returned to the caller.
    pub id: DeletionTaskId,
    /// Owner of the subtree.
    pub owner_id: OwnerId,
    /// Root of the deleted subtree.
    pub root_id: NodeId,
    /// Nodes to remove, children first.
    pub entries: Vec<DeletionEntry>,
    /// When the task was accepted.
    pub requested_at: DateTime<Utc>,
}

impl DeletionTask {
    /// Build a new task for `root_id`.
    pub fn new(owner_id: OwnerId, root_id: NodeId, entries: Vec<DeletionEntry>) -> Self {
        Self {
            id: DeletionTaskId::new(),
            owner_id,
            root_id,
            entries,
            requested_at: Utc::now(),
        }
    }

    /// Object keys referenced by the subtree, in entry order.
    pub fn storage_keys(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter_map(|entry| entry.storage_key.clone())
            .collect()
    }

    /// Number of node records in the task.
    pub fn node_count(&self) -> usize {
        self.entries.len()
    }
}

/// Queryable progress of a deletion task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletionStatus {
    /// Task identifier.
    pub task_id: DeletionTaskId,
    /// Owner of the subtree.
    pub owner_id: OwnerId,
    /// Root of the deleted subtree.
    pub root_id: NodeId,
    /// Current phase.
    pub phase: DeletionPhase,
    /// Number of node records in the task.
    pub node_count: usize,
    /// Records removed so far.
    pub records_deleted: usize,
    /// Object keys that could not be removed after all retries.
    pub orphaned_keys: Vec<String>,
    /// Last error, if the task failed.
    pub error: Option<String>,
    /// When the status last changed.
    pub updated_at: DateTime<Utc>,
}

impl DeletionStatus {
    /// Initial status for a freshly accepted task.
    pub fn requested(task: &DeletionTask) -> Self {
        Self {
            task_id: task.id,
            owner_id: task.owner_id.clone(),
            root_id: task.root_id,
            phase: DeletionPhase::Requested,
            node_count: task.node_count(),
            records_deleted: 0,
            orphaned_keys: Vec::new(),
            error: None,
            updated_at: task.requested_at,
        }
    }
}
