//! Permanent deletion, phase 0.

pub mod scheduler;
pub mod service;

pub use scheduler::DeletionScheduler;
pub use service::DeletionService;
