//! File-tree node entities.

pub mod kind;
pub mod model;
pub mod patch;
pub mod usage;

pub use kind::NodeKind;
pub use model::{CreateNode, FileContent, Node, NodeContent};
pub use patch::NodePatch;
pub use usage::StorageUsage;
