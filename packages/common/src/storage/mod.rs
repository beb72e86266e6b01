mod error;
mod filename;
mod traits;

pub mod filesystem;

pub use error::StorageError;
pub use filename::validate_stored_filename;
pub use traits::{BoxReader, MediaStore, StoredFile};
