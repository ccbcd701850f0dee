//! Permanent-deletion task entities.

pub mod phase;
pub mod task;

pub use phase::DeletionPhase;
pub use task::{DeletionEntry, DeletionStatus, DeletionTask};
