//! # drive-storage
//!
//! Object store providers holding the binary content behind file nodes.
//! The tree engine only ever sees the [`ObjectStore`](drive_core::traits::ObjectStore)
//! trait; [`build_object_store`] picks the provider named in configuration.

pub mod factory;
pub mod keys;
pub mod mime;
pub mod providers;

pub use factory::build_object_store;
pub use providers::local::LocalObjectStore;
pub use providers::memory::MemoryObjectStore;
