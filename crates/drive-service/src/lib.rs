//! # drive-service
//!
//! The file-tree engine. Every operation takes a [`RequestContext`]
//! carrying the caller's identity and goes through the [`AccessGuard`]
//! before touching the [`NodeStore`](drive_database::NodeStore).
//!
//! ## Modules
//!
//! - `node`: listings, creation, rename, usage summary
//! - `tree`: trash/restore cascades, ancestor walk, path resolution
//! - `deletion`: phase 0 of permanent deletion and the scheduler seam
//! - `content`: upload and download of file bytes

pub mod content;
pub mod context;
pub mod deletion;
pub mod guard;
pub mod node;
pub mod tree;

pub use content::{ContentService, Download, Upload};
pub use context::RequestContext;
pub use deletion::{DeletionScheduler, DeletionService};
pub use guard::AccessGuard;
pub use node::NodeService;
pub use tree::{CascadeService, NavigationService};
