//! Background processing of permanent deletions.
//!
//! This crate provides:
//! - A bounded in-process queue implementing the service layer's
//!   [`DeletionScheduler`](drive_service::DeletionScheduler)
//! - A tracker holding each task's phase and the queue statistics
//! - An executor running storage cleanup and then record deletion
//! - A runner consuming the queue with bounded concurrency

pub mod executor;
pub mod queue;
pub mod runner;
pub mod tracker;

pub use executor::{DeletionExecutor, JobExecutionError, RetryPolicy};
pub use queue::DeletionQueue;
pub use runner::{WorkerHandle, WorkerRunner, spawn_deletion_worker};
pub use tracker::{DeletionTracker, QueueStats};
