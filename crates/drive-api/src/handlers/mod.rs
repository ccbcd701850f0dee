//! Route handlers organized by domain.

pub mod content;
pub mod deletion;
pub mod health;
pub mod navigation;
pub mod node;
pub mod usage;
