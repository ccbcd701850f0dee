//! Bounded in-process queue of deletion tasks.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use drive_core::error::AppError;
use drive_core::result::AppResult;
use drive_core::types::DeletionTaskId;
use drive_entity::deletion::{DeletionStatus, DeletionTask};
use drive_service::DeletionScheduler;

use crate::tracker::{DeletionTracker, QueueStats};

/// Producer side of the deletion queue.
///
/// Scheduling never waits: a full or closed queue is reported to the
/// caller as service-unavailable and the task is forgotten.
#[derive(Debug, Clone)]
pub struct DeletionQueue {
    sender: mpsc::Sender<DeletionTask>,
    tracker: Arc<DeletionTracker>,
}

impl DeletionQueue {
    /// Create a queue holding up to `capacity` pending tasks, returning the
    /// consumer end for the runner.
    pub fn channel(
        capacity: usize,
        tracker: Arc<DeletionTracker>,
    ) -> (Self, mpsc::Receiver<DeletionTask>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self { sender, tracker }, receiver)
    }

    /// Current queue counters.
    pub fn stats(&self) -> QueueStats {
        self.tracker.stats()
    }

    /// The tracker shared with the runner.
    pub fn tracker(&self) -> &Arc<DeletionTracker> {
        &self.tracker
    }
}

#[async_trait]
impl DeletionScheduler for DeletionQueue {
    async fn schedule(&self, task: DeletionTask) -> AppResult<()> {
        let id = task.id;
        self.tracker.register(&task);
        match self.sender.try_send(task) {
            Ok(()) => {
                tracing::debug!("Queued deletion task {}", id);
                Ok(())
            }
            Err(TrySendError::Full(_)) => {
                self.tracker.unregister(id);
                Err(AppError::service_unavailable(
                    "Deletion queue is full, try again later",
                ))
            }
            Err(TrySendError::Closed(_)) => {
                self.tracker.unregister(id);
                Err(AppError::service_unavailable("Deletion worker is not running"))
            }
        }
    }

    fn status(&self, id: DeletionTaskId) -> Option<DeletionStatus> {
        self.tracker.get(id)
    }
}
