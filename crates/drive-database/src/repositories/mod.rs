//! PostgreSQL repository implementations.

pub mod node;
