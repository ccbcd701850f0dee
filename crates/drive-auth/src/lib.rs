//! # drive-auth
//!
//! Turns a bearer token into the caller's owner identity. Identity
//! issuance belongs to an external provider; [`JwtEncoder`] exists so
//! development setups and tests can mint tokens signed with the shared
//! secret.

pub mod jwt;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
