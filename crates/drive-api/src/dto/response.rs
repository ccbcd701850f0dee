//! Response DTOs.

use serde::{Deserialize, Serialize};

use drive_core::types::DeletionTaskId;
use drive_entity::deletion::DeletionPhase;
use drive_worker::QueueStats;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Body of an accepted permanent deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletionAccepted {
    /// Id to poll at `/api/deletions/{id}`.
    pub task_id: DeletionTaskId,
    /// Phase at acceptance.
    pub phase: DeletionPhase,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `"ok"` when every dependency answered, `"degraded"` otherwise.
    pub status: String,
    /// Version.
    pub version: String,
    /// Entity store backend and state.
    pub store: ComponentHealth,
    /// Object store provider and state.
    pub objects: ComponentHealth,
    /// Deletion queue counters.
    pub deletion_queue: QueueStats,
}

/// Health of one dependency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Implementation name.
    pub backend: String,
    /// Whether the last check succeeded.
    pub healthy: bool,
}
