//! Object key generation and validation.

use drive_core::error::AppError;
use drive_core::result::AppResult;
use uuid::Uuid;

/// Generate a fresh key under a sanitized prefix derived from `hint`.
///
/// Keys look like `<prefix>/<uuid>`. Characters outside `[A-Za-z0-9_-]`
/// in the hint are replaced with `_`.
pub fn generate_key(hint: &str) -> String {
    format!("{}/{}", key_prefix(hint), Uuid::new_v4().simple())
}

/// The sanitized prefix [`generate_key`] puts in front of keys for `hint`.
pub fn key_prefix(hint: &str) -> String {
    let prefix: String = hint
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if prefix.is_empty() {
        "objects".to_string()
    } else {
        prefix
    }
}

/// Whether `key` lives under the prefix generated for `hint`.
pub fn key_belongs_to(key: &str, hint: &str) -> bool {
    key.split_once('/')
        .is_some_and(|(prefix, rest)| !rest.is_empty() && prefix == key_prefix(hint))
}

/// Reject keys that could escape the provider's namespace.
pub fn validate_key(key: &str) -> AppResult<()> {
    if key.is_empty()
        || key.starts_with('/')
        || key.contains('\\')
        || key.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..")
    {
        return Err(AppError::validation(format!("Invalid object key: {key}")));
    }
    Ok(())
}
