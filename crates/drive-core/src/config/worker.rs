//! Deletion worker configuration.

use serde::{Deserialize, Serialize};

/// Background deletion worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the worker is started with the server.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Number of deletion tasks processed concurrently.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Capacity of the in-process task queue.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Attempts per object before it is reported as orphaned.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Base delay of the exponential retry backoff, in milliseconds.
    #[serde(default = "default_backoff_base")]
    pub backoff_base_ms: u64,
    /// Seconds to wait for in-flight tasks on shutdown.
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout_seconds: u64,
    /// Seconds a finished task's status stays queryable.
    #[serde(default = "default_status_retention")]
    pub status_retention_seconds: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            concurrency: default_concurrency(),
            queue_capacity: default_queue_capacity(),
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base(),
            shutdown_timeout_seconds: default_shutdown_timeout(),
            status_retention_seconds: default_status_retention(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_concurrency() -> usize {
    4
}

fn default_queue_capacity() -> usize {
    1024
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_base() -> u64 {
    200
}

fn default_shutdown_timeout() -> u64 {
    30
}

fn default_status_retention() -> u64 {
    3600
}
