use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use super::error::StorageError;
use super::key::{new_media_key, validate_media_key};
use super::traits::{BoxReader, MediaStore, StoredMedia};

/// Filesystem-backed media store.
///
/// Files land flat under `{root}/{key}` and are exposed to clients as
/// `{public_base_url}/{key}` (served by the API's static upload route).
/// Writes go through a temp file plus rename so a crash never leaves a
/// half-written asset at its final path.
pub struct FilesystemMediaStore {
    root: PathBuf,
    public_base_url: String,
    max_size: u64,
}

impl FilesystemMediaStore {
    /// Create a new filesystem media store, creating the directories if needed.
    pub async fn new(
        root: PathBuf,
        public_base_url: String,
        max_size: u64,
    ) -> Result<Self, StorageError> {
        fs::create_dir_all(&root).await?;
        fs::create_dir_all(root.join(".tmp")).await?;
        Ok(Self {
            root,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            max_size,
        })
    }

    fn media_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    /// Path for a temporary file during writes.
    fn temp_path(&self) -> PathBuf {
        self.root.join(".tmp").join(uuid::Uuid::new_v4().to_string())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{key}", self.public_base_url)
    }
}

#[async_trait]
impl MediaStore for FilesystemMediaStore {
    async fn put(
        &self,
        extension: &str,
        _content_type: &str,
        data: &[u8],
    ) -> Result<StoredMedia, StorageError> {
        if data.len() as u64 > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: data.len() as u64,
                limit: self.max_size,
            });
        }

        let key = new_media_key(extension);
        let final_path = self.media_path(&key);

        let temp_path = self.temp_path();
        if let Err(e) = fs::write(&temp_path, data).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        if let Err(e) = fs::rename(&temp_path, &final_path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        Ok(StoredMedia {
            url: self.public_url(&key),
            size: data.len() as u64,
            key,
        })
    }

    async fn open(&self, key: &str) -> Result<BoxReader, StorageError> {
        validate_media_key(key)?;
        let path = self.media_path(key);
        match fs::File::open(&path).await {
            Ok(file) => Ok(Box::new(file)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        validate_media_key(key)?;
        Ok(fs::try_exists(self.media_path(key)).await?)
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        validate_media_key(key)?;
        match fs::remove_file(self.media_path(key)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
