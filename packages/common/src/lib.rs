pub mod storage;

pub use storage::{BoxReader, MediaStore, StorageError, StoredFile};
