/// Errors that can occur during media storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The requested file was not found.
    #[error("stored file not found: {0}")]
    NotFound(String),

    /// An I/O error occurred.
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The filename is not a safe flat name.
    #[error("invalid stored filename: {0}")]
    InvalidFilename(&'static str),

    /// The file exceeds the configured size limit.
    #[error("file exceeds size limit ({actual} > {limit} bytes)")]
    SizeLimitExceeded { actual: u64, limit: u64 },
}
