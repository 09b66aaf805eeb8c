mod error;
mod key;
mod traits;

pub mod filesystem;
#[cfg(feature = "object-storage")]
pub mod object;

pub use error::StorageError;
pub use key::{new_media_key, validate_media_key};
pub use traits::{BoxReader, MediaStore, StoredMedia};
