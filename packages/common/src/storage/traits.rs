use async_trait::async_trait;
use tokio::io::AsyncRead;

use super::error::StorageError;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// A stored media asset as seen by callers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredMedia {
    /// Backend storage key (`uuid.ext`).
    pub key: String,
    /// Public URL clients use to fetch the asset.
    pub url: String,
    /// Size in bytes.
    pub size: u64,
}

/// Storage for uploaded media files.
///
/// Backends own the mapping from key to public URL: the filesystem backend
/// serves keys under a local static path, the object-storage backend under
/// the bucket's public endpoint. Records only ever persist the URL.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store an uploaded file, fully buffered, under a fresh key.
    ///
    /// `extension` is the validated file extension (without dot);
    /// `content_type` is the declared MIME type, forwarded to backends
    /// that record it.
    async fn put(
        &self,
        extension: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<StoredMedia, StorageError>;

    /// Open a stored asset as a streaming async reader.
    async fn open(&self, key: &str) -> Result<BoxReader, StorageError>;

    /// Check whether an asset exists.
    async fn exists(&self, key: &str) -> Result<bool, StorageError>;

    /// Delete an asset by key.
    ///
    /// Returns `true` if the asset was deleted, `false` if it did not exist.
    async fn delete(&self, key: &str) -> Result<bool, StorageError>;
}
