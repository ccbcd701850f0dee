//! MIME type guessing for uploads that arrive without a content type.

/// Guess a MIME type from a file name's extension.
pub fn guess_from_name(name: &str) -> Option<String> {
    mime_guess::from_path(name)
        .first()
        .map(|mime| mime.essence_str().to_string())
}
