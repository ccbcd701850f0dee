//! Core type definitions used across the Drive workspace.

pub mod id;

pub use id::{DeletionTaskId, NodeId, OwnerId};
