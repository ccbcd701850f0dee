//! # drive-entity
//!
//! Domain entity models for Drive. Every struct in this crate represents a
//! database table row or a domain value object. Database entities derive
//! `sqlx::FromRow` in addition to the serde traits.

pub mod deletion;
pub mod node;
