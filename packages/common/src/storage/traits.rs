use async_trait::async_trait;
use tokio::io::AsyncRead;

use super::error::StorageError;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// Handle to a stored media file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Server-generated storage name, decoupled from any user-supplied name.
    pub filename: String,
    /// Size in bytes.
    pub size: u64,
}

/// Storage for uploaded media binaries under server-generated names.
///
/// Writes are append-only (every `put` produces a fresh unique name);
/// deletes are best-effort single-file removals.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store bytes under a newly generated `{uuid}.{ext}` name.
    async fn put(&self, ext: &str, data: &[u8]) -> Result<StoredFile, StorageError>;

    /// Retrieve a stored file as a streaming async reader.
    async fn get_stream(&self, filename: &str) -> Result<BoxReader, StorageError>;

    /// Check whether a stored file exists.
    async fn exists(&self, filename: &str) -> Result<bool, StorageError>;

    /// Delete a stored file.
    ///
    /// Returns `true` if the file was deleted, `false` if it did not exist.
    async fn delete(&self, filename: &str) -> Result<bool, StorageError>;

    /// Get the size of a stored file in bytes.
    async fn size(&self, filename: &str) -> Result<u64, StorageError>;
}
