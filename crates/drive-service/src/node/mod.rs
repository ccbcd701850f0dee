//! Node listings, creation and rename.

pub mod names;
pub mod service;

pub use service::NodeService;
