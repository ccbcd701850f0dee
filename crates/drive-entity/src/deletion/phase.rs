//! Deletion task phase enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a permanent deletion currently stands.
///
/// Phases only move forward: `Requested` → `StorageCleanupPending` →
/// `RecordDeletionPending` → `Complete`, or to `Failed` from any
/// non-terminal phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeletionPhase {
    /// Accepted and queued, no side effects yet.
    Requested,
    /// Binary objects are being removed.
    StorageCleanupPending,
    /// Node records are being removed.
    RecordDeletionPending,
    /// All records are gone.
    Complete,
    /// The task stopped before removing every record.
    Failed,
}

impl DeletionPhase {
    /// Return the phase as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Requested => "requested",
            Self::StorageCleanupPending => "storage_cleanup_pending",
            Self::RecordDeletionPending => "record_deletion_pending",
            Self::Complete => "complete",
            Self::Failed => "failed",
        }
    }

    /// Whether the task has finished, successfully or not.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }

    /// Whether moving to `next` is allowed.
    pub fn can_advance_to(&self, next: DeletionPhase) -> bool {
        use DeletionPhase::*;
        matches!(
            (self, next),
            (Requested, StorageCleanupPending)
                | (StorageCleanupPending, RecordDeletionPending)
                | (RecordDeletionPending, Complete)
                | (Requested | StorageCleanupPending | RecordDeletionPending, Failed)
        )
    }
}

impl fmt::Display for DeletionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
