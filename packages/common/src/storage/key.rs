use super::error::StorageError;

/// Generate a fresh storage key for an uploaded file.
///
/// Keys are UUIDv7 (time-ordered, collision-free) plus the lowercased file
/// extension, e.g. `0192d7a8-....-....webp`. The original filename is never
/// used as part of the key.
pub fn new_media_key(extension: &str) -> String {
    let ext = extension.trim_start_matches('.').to_lowercase();
    format!("{}.{ext}", uuid::Uuid::now_v7())
}

/// Validate a storage key before it touches the backend.
///
/// Keys come back from clients (asset URLs, delete requests), so anything
/// that is not `uuid.ext` shaped is rejected rather than resolved.
pub fn validate_media_key(key: &str) -> Result<&str, StorageError> {
    let (stem, ext) = key
        .rsplit_once('.')
        .ok_or_else(|| StorageError::InvalidKey("missing extension".into()))?;

    if uuid::Uuid::parse_str(stem).is_err() {
        return Err(StorageError::InvalidKey("key stem is not a UUID".into()));
    }

    if ext.is_empty() || ext.len() > 8 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(StorageError::InvalidKey("malformed extension".into()));
    }

    Ok(key)
}
