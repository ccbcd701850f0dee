//! Task phase tracking and queue counters.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use drive_core::types::DeletionTaskId;
use drive_entity::deletion::{DeletionPhase, DeletionStatus, DeletionTask};

/// Snapshot of the deletion queue's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueStats {
    /// Accepted but not yet picked up.
    pub queued: u64,
    /// Currently executing.
    pub in_flight: u64,
    /// Finished with every record removed.
    pub completed: u64,
    /// Finished without removing every record.
    pub failed: u64,
    /// Object keys given up on after all retries.
    pub orphaned_objects: u64,
}

/// How long finished tasks stay visible when no retention is configured.
const DEFAULT_RETENTION: Duration = Duration::from_secs(3600);

/// Shared record of task statuses, keyed by task id.
///
/// Finished tasks are kept for the retention window and swept whenever a
/// new task is registered.
#[derive(Debug)]
pub struct DeletionTracker {
    statuses: DashMap<DeletionTaskId, DeletionStatus>,
    retention: Duration,
    scheduled: AtomicU64,
    started: AtomicU64,
    completed: AtomicU64,
    failed: AtomicU64,
    orphaned: AtomicU64,
}

impl Default for DeletionTracker {
    fn default() -> Self {
        Self::with_retention(DEFAULT_RETENTION)
    }
}

impl DeletionTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty tracker that forgets finished tasks after `retention`.
    pub fn with_retention(retention: Duration) -> Self {
        Self {
            statuses: DashMap::new(),
            retention,
            scheduled: AtomicU64::new(0),
            started: AtomicU64::new(0),
            completed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            orphaned: AtomicU64::new(0),
        }
    }

    /// Record a newly accepted task.
    pub fn register(&self, task: &DeletionTask) {
        self.sweep_finished();
        self.statuses.insert(task.id, DeletionStatus::requested(task));
        self.scheduled.fetch_add(1, Ordering::SeqCst);
    }

    /// Forget a task that never made it into the queue.
    pub fn unregister(&self, id: DeletionTaskId) {
        if self.statuses.remove(&id).is_some() {
            self.scheduled.fetch_sub(1, Ordering::SeqCst);
        }
    }

    /// Drop finished tasks older than the retention window. Returns how many
    /// were removed.
    pub fn sweep_finished(&self) -> usize {
        let now = Utc::now();
        let before = self.statuses.len();
        self.statuses.retain(|_, status| {
            let expired = (now - status.updated_at)
                .to_std()
                .is_ok_and(|age| age >= self.retention);
            !(status.phase.is_terminal() && expired)
        });
        before.saturating_sub(self.statuses.len())
    }

    /// Note that the worker picked a task up.
    pub fn mark_started(&self) {
        self.started.fetch_add(1, Ordering::SeqCst);
    }

    /// Move a task forward. Backward or out-of-order moves are ignored.
    pub fn advance(&self, id: DeletionTaskId, next: DeletionPhase) -> bool {
        let Some(mut status) = self.statuses.get_mut(&id) else {
            return false;
        };
        if !status.phase.can_advance_to(next) {
            tracing::debug!("Ignoring phase move {} -> {} for task {}", status.phase, next, id);
            return false;
        }
        status.phase = next;
        status.updated_at = Utc::now();
        match next {
            DeletionPhase::Complete => {
                self.completed.fetch_add(1, Ordering::SeqCst);
            }
            DeletionPhase::Failed => {
                self.failed.fetch_add(1, Ordering::SeqCst);
            }
            _ => {}
        }
        true
    }

    /// Record object keys that could not be removed.
    pub fn record_orphans(&self, id: DeletionTaskId, keys: &[String]) {
        if keys.is_empty() {
            return;
        }
        self.orphaned.fetch_add(keys.len() as u64, Ordering::SeqCst);
        if let Some(mut status) = self.statuses.get_mut(&id) {
            status.orphaned_keys.extend(keys.iter().cloned());
            status.updated_at = Utc::now();
        }
    }

    /// Record one removed node record.
    pub fn record_deleted(&self, id: DeletionTaskId) {
        if let Some(mut status) = self.statuses.get_mut(&id) {
            status.records_deleted += 1;
        }
    }

    /// Mark a task failed with a reason.
    pub fn fail(&self, id: DeletionTaskId, reason: impl Into<String>) {
        if self.advance(id, DeletionPhase::Failed) {
            if let Some(mut status) = self.statuses.get_mut(&id) {
                status.error = Some(reason.into());
            }
        }
    }

    /// Current phase of a task.
    pub fn phase(&self, id: DeletionTaskId) -> Option<DeletionPhase> {
        self.statuses.get(&id).map(|status| status.phase)
    }

    /// Full status of a task.
    pub fn get(&self, id: DeletionTaskId) -> Option<DeletionStatus> {
        self.statuses.get(&id).map(|status| status.clone())
    }

    /// Current counters.
    pub fn stats(&self) -> QueueStats {
        let scheduled = self.scheduled.load(Ordering::SeqCst);
        let started = self.started.load(Ordering::SeqCst);
        let completed = self.completed.load(Ordering::SeqCst);
        let failed = self.failed.load(Ordering::SeqCst);
        QueueStats {
            queued: scheduled.saturating_sub(started),
            in_flight: started.saturating_sub(completed + failed),
            completed,
            failed,
            orphaned_objects: self.orphaned.load(Ordering::SeqCst),
        }
    }
}
