//! Display-name rules.

use drive_core::error::AppError;

/// Longest accepted name, in characters.
pub const MAX_NAME_CHARS: usize = 255;

/// Trim `raw` and check it is usable as a node name.
pub fn normalize_name(raw: &str) -> Result<String, AppError> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::validation("Name cannot be empty"));
    }
    if name.chars().count() > MAX_NAME_CHARS {
        return Err(AppError::validation(format!(
            "Name cannot exceed {MAX_NAME_CHARS} characters"
        )));
    }
    Ok(name.to_string())
}

/// `name` with a ` (n)` suffix, shortened so the result stays within
/// [`MAX_NAME_CHARS`].
pub fn numbered_name(name: &str, n: u32) -> String {
    let suffix = format!(" ({n})");
    let room = MAX_NAME_CHARS.saturating_sub(suffix.chars().count());
    let stem: String = name.chars().take(room).collect();
    format!("{}{suffix}", stem.trim_end())
}
