//! Deletion executor: storage cleanup, then record removal.

use std::sync::Arc;
use std::time::Duration;

use drive_core::config::WorkerConfig;
use drive_core::error::{AppError, ErrorKind};
use drive_core::traits::storage::ObjectStore;
use drive_database::NodeStore;
use drive_entity::deletion::{DeletionPhase, DeletionTask};

use crate::tracker::DeletionTracker;

/// Log target for failures that need an operator.
pub const ALERT_TARGET: &str = "drive::alert";

/// Error from task execution
#[derive(Debug, thiserror::Error)]
pub enum JobExecutionError {
    /// Permanent failure, do not retry
    #[error("Permanent job failure: {0}")]
    Permanent(String),

    /// Transient failure, may retry
    #[error("Transient job failure: {0}")]
    Transient(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] AppError),
}

/// Attempts and exponential backoff shared by object and task retries.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubled for each one after.
    pub backoff_base: Duration,
}

impl RetryPolicy {
    /// Build from worker configuration.
    pub fn from_config(config: &WorkerConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            backoff_base: Duration::from_millis(config.backoff_base_ms),
        }
    }

    /// Delay after the given failed attempt (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_base
            .saturating_mul(1u32 << attempt.saturating_sub(1).min(16))
    }
}

/// What a finished task did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionOutcome {
    /// Node records removed by this run.
    pub records_deleted: usize,
    /// Object keys given up on.
    pub orphaned_keys: Vec<String>,
}

/// Runs the asynchronous phases of one deletion task.
#[derive(Debug)]
pub struct DeletionExecutor {
    store: Arc<dyn NodeStore>,
    objects: Arc<dyn ObjectStore>,
    tracker: Arc<DeletionTracker>,
    retry: RetryPolicy,
}

impl DeletionExecutor {
    /// Create a new executor
    pub fn new(
        store: Arc<dyn NodeStore>,
        objects: Arc<dyn ObjectStore>,
        tracker: Arc<DeletionTracker>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            store,
            objects,
            tracker,
            retry,
        }
    }

    /// The retry policy in use.
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Run the task's remaining phases.
    ///
    /// Storage cleanup runs once per task. A re-run after a record-phase
    /// failure goes straight to record deletion.
    pub async fn execute(&self, task: &DeletionTask) -> Result<DeletionOutcome, JobExecutionError> {
        let mut outcome = DeletionOutcome::default();

        match self.tracker.phase(task.id) {
            Some(DeletionPhase::Requested) | None => {
                self.tracker
                    .advance(task.id, DeletionPhase::StorageCleanupPending);
                outcome.orphaned_keys = self.cleanup_objects(task).await;
                self.tracker.record_orphans(task.id, &outcome.orphaned_keys);
                self.tracker
                    .advance(task.id, DeletionPhase::RecordDeletionPending);
            }
            Some(DeletionPhase::StorageCleanupPending) => {
                self.tracker
                    .advance(task.id, DeletionPhase::RecordDeletionPending);
            }
            Some(DeletionPhase::RecordDeletionPending) => {}
            Some(phase) => {
                return Err(JobExecutionError::Permanent(format!(
                    "Task {} is already {}",
                    task.id, phase
                )));
            }
        }

        outcome.records_deleted = self.delete_records(task).await?;
        self.tracker.advance(task.id, DeletionPhase::Complete);
        Ok(outcome)
    }

    /// Phase 1: remove every object, retrying failures with backoff.
    /// Returns the keys still failing after the last attempt.
    async fn cleanup_objects(&self, task: &DeletionTask) -> Vec<String> {
        let mut pending = task.storage_keys();
        if pending.is_empty() {
            return pending;
        }
        let mut last_errors = Vec::new();

        for attempt in 1..=self.retry.max_attempts {
            let outcomes = self.objects.delete_many(&pending).await;
            last_errors.clear();
            pending.clear();
            for (key, result) in outcomes {
                match result {
                    Ok(()) => {}
                    Err(e) if e.is(ErrorKind::NotFound) => {}
                    Err(e) => {
                        last_errors.push(e.to_string());
                        pending.push(key);
                    }
                }
            }
            if pending.is_empty() {
                break;
            }
            if attempt < self.retry.max_attempts {
                let delay = self.retry.backoff(attempt);
                tracing::warn!(
                    "Task {}: {} object(s) failed to delete on attempt {}/{}, retrying in {:?}",
                    task.id,
                    pending.len(),
                    attempt,
                    self.retry.max_attempts,
                    delay
                );
                tokio::time::sleep(delay).await;
            }
        }

        for (key, error) in pending.iter().zip(last_errors.iter()) {
            tracing::error!(
                target: ALERT_TARGET,
                task_id = %task.id,
                owner_id = %task.owner_id,
                key = %key,
                error = %error,
                "Orphaned object after {} attempts",
                self.retry.max_attempts
            );
        }
        pending
    }

    /// Phase 2: remove every record, children before parents.
    async fn delete_records(&self, task: &DeletionTask) -> Result<usize, JobExecutionError> {
        let mut removed = 0;
        for entry in &task.entries {
            let deleted = self.store.delete(entry.node_id).await.map_err(|e| {
                JobExecutionError::Transient(format!(
                    "Failed to delete record {}: {}",
                    entry.node_id, e
                ))
            })?;
            if deleted {
                removed += 1;
                self.tracker.record_deleted(task.id);
            }
        }
        tracing::debug!("Task {}: removed {} record(s)", task.id, removed);
        Ok(removed)
    }
}
