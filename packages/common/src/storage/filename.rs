use super::error::StorageError;

/// Validates a stored filename: a flat name with no directory components.
///
/// Stored filenames are server-generated, but this is also applied to any
/// name arriving from a URL before it touches the filesystem.
pub fn validate_stored_filename(filename: &str) -> Result<&str, StorageError> {
    let trimmed = filename.trim();

    if trimmed.is_empty() {
        return Err(StorageError::InvalidFilename("filename cannot be empty"));
    }

    if trimmed.contains('\0') {
        return Err(StorageError::InvalidFilename(
            "null bytes are not allowed in filenames",
        ));
    }

    // Reject ASCII control characters to prevent header injection when the
    // name is echoed back in response headers.
    if trimmed.chars().any(|c| c.is_ascii_control()) {
        return Err(StorageError::InvalidFilename(
            "control characters are not allowed in filenames",
        ));
    }

    if trimmed.contains('/') || trimmed.contains('\\') {
        return Err(StorageError::InvalidFilename(
            "path separators are not allowed in filenames",
        ));
    }

    if trimmed == ".." {
        return Err(StorageError::InvalidFilename(
            "'..' is not a valid filename",
        ));
    }

    if trimmed.starts_with('.') {
        return Err(StorageError::InvalidFilename(
            "hidden filenames (starting with '.') are not allowed",
        ));
    }

    Ok(trimmed)
}

/// Validates a file extension for generated names: short, lowercase alphanumeric.
pub fn validate_extension(ext: &str) -> Result<&str, StorageError> {
    if ext.is_empty() || ext.len() > 16 {
        return Err(StorageError::InvalidFilename(
            "extension must be 1-16 characters",
        ));
    }
    if !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(StorageError::InvalidFilename(
            "extension must be alphanumeric",
        ));
    }
    Ok(ext)
}
