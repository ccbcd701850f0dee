//! The seam between request handling and the background deletion worker.

use async_trait::async_trait;

use drive_core::result::AppResult;
use drive_core::types::DeletionTaskId;
use drive_entity::deletion::{DeletionStatus, DeletionTask};

/// Accepts validated deletion tasks and reports their progress.
#[async_trait]
pub trait DeletionScheduler: Send + Sync + std::fmt::Debug + 'static {
    /// Queue a task. Returns once the task is accepted, not when it runs.
    async fn schedule(&self, task: DeletionTask) -> AppResult<()>;

    /// Current progress of a task, if it is known.
    fn status(&self, id: DeletionTaskId) -> Option<DeletionStatus>;
}
