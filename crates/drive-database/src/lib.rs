//! # drive-database
//!
//! The [`NodeStore`] seam used by the service layer, a PostgreSQL
//! implementation backed by sqlx, and an in-memory implementation used by
//! tests and single-process deployments.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryNodeStore;
pub use repositories::node::PgNodeStore;
pub use store::NodeStore;
