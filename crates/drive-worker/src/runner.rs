//! Worker runner: consumes the deletion queue until shut down.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, mpsc, watch};
use tokio::task::JoinHandle;

use drive_core::config::WorkerConfig;
use drive_core::traits::storage::ObjectStore;
use drive_database::NodeStore;
use drive_entity::deletion::DeletionTask;

use crate::executor::{DeletionExecutor, JobExecutionError, RetryPolicy};
use crate::queue::DeletionQueue;
use crate::tracker::DeletionTracker;

/// Main loop pulling tasks off the queue and running them concurrently.
#[derive(Debug)]
pub struct WorkerRunner {
    executor: Arc<DeletionExecutor>,
    tracker: Arc<DeletionTracker>,
    config: WorkerConfig,
}

impl WorkerRunner {
    /// Create a new worker runner
    pub fn new(
        executor: Arc<DeletionExecutor>,
        tracker: Arc<DeletionTracker>,
        config: WorkerConfig,
    ) -> Self {
        Self {
            executor,
            tracker,
            config,
        }
    }

    /// Run until the cancel signal flips to `true` or every sender is gone.
    ///
    /// In-flight tasks get `shutdown_timeout_seconds` to finish. Tasks still
    /// waiting in the queue at that point are marked failed.
    pub async fn run(
        &self,
        mut receiver: mpsc::Receiver<DeletionTask>,
        mut cancel: watch::Receiver<bool>,
    ) {
        let concurrency = self.config.concurrency.max(1);
        tracing::info!(
            "Deletion worker started with concurrency={}, max_attempts={}",
            concurrency,
            self.executor.retry_policy().max_attempts
        );

        let semaphore = Arc::new(Semaphore::new(concurrency));

        loop {
            tokio::select! {
                changed = cancel.changed() => {
                    if changed.is_err() || *cancel.borrow() {
                        tracing::info!("Deletion worker received shutdown signal");
                        break;
                    }
                }
                next = receiver.recv() => {
                    let Some(task) = next else {
                        tracing::info!("Deletion queue closed");
                        break;
                    };
                    let Ok(permit) = semaphore.clone().acquire_owned().await else {
                        break;
                    };
                    self.tracker.mark_started();
                    let executor = Arc::clone(&self.executor);
                    let tracker = Arc::clone(&self.tracker);
                    tokio::spawn(async move {
                        let _permit = permit;
                        process(&executor, &tracker, task).await;
                    });
                }
            }
        }

        tracing::info!("Deletion worker waiting for in-flight tasks to complete...");
        let permits = u32::try_from(concurrency).unwrap_or(u32::MAX);
        let drained = tokio::time::timeout(
            Duration::from_secs(self.config.shutdown_timeout_seconds),
            semaphore.acquire_many(permits),
        )
        .await;
        if drained.is_err() {
            tracing::warn!("Deletion worker shutdown timed out with tasks still running");
        }

        receiver.close();
        while let Ok(task) = receiver.try_recv() {
            tracing::warn!("Abandoning queued deletion task {} at shutdown", task.id);
            self.tracker.mark_started();
            self.tracker
                .fail(task.id, "Worker shut down before the task ran");
        }

        tracing::info!("Deletion worker shut down complete");
    }
}

/// Run one task, retrying whole-task transient failures.
async fn process(executor: &DeletionExecutor, tracker: &DeletionTracker, task: DeletionTask) {
    let policy = executor.retry_policy();
    let mut attempt = 1;

    loop {
        tracing::info!(
            "Processing deletion task: id={}, root={}, nodes={}, attempt={}/{}",
            task.id,
            task.root_id,
            task.node_count(),
            attempt,
            policy.max_attempts
        );

        match executor.execute(&task).await {
            Ok(outcome) => {
                tracing::info!(
                    "Deletion task {} completed: {} record(s) removed, {} orphaned object(s)",
                    task.id,
                    outcome.records_deleted,
                    outcome.orphaned_keys.len()
                );
                return;
            }
            Err(JobExecutionError::Transient(msg)) if attempt < policy.max_attempts => {
                let delay = policy.backoff(attempt);
                tracing::warn!(
                    "Deletion task {} failed (transient), retrying in {:?}: {}",
                    task.id,
                    delay,
                    msg
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                tracing::error!("Deletion task {} failed: {}", task.id, e);
                tracker.fail(task.id, e.to_string());
                return;
            }
        }
    }
}

/// Running worker plus the means to stop it.
#[derive(Debug)]
pub struct WorkerHandle {
    cancel: watch::Sender<bool>,
    join: JoinHandle<()>,
}

impl WorkerHandle {
    /// Signal shutdown and wait for the runner to drain.
    pub async fn shutdown(self) {
        let _ = self.cancel.send(true);
        if let Err(e) = self.join.await {
            tracing::error!("Deletion worker task panicked: {}", e);
        }
    }
}

/// Build the queue and, when enabled, start a runner consuming it.
///
/// With the worker disabled the queue's consumer end is dropped, so every
/// scheduling attempt fails as unavailable instead of piling up.
pub fn spawn_deletion_worker(
    config: &WorkerConfig,
    store: Arc<dyn NodeStore>,
    objects: Arc<dyn ObjectStore>,
) -> (Arc<DeletionQueue>, Option<WorkerHandle>) {
    let tracker = Arc::new(DeletionTracker::with_retention(Duration::from_secs(
        config.status_retention_seconds,
    )));
    let (queue, receiver) = DeletionQueue::channel(config.queue_capacity, tracker.clone());

    if !config.enabled {
        tracing::warn!("Deletion worker disabled; permanent deletes will be rejected");
        return (Arc::new(queue), None);
    }

    let executor = Arc::new(DeletionExecutor::new(
        store,
        objects,
        tracker.clone(),
        RetryPolicy::from_config(config),
    ));
    let runner = WorkerRunner::new(executor, tracker, config.clone());
    let (cancel, cancel_rx) = watch::channel(false);
    let join = tokio::spawn(async move { runner.run(receiver, cancel_rx).await });

    (Arc::new(queue), Some(WorkerHandle { cancel, join }))
}
