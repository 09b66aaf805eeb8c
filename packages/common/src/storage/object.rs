use std::io::Cursor;

use async_trait::async_trait;
use s3::Bucket;
use s3::creds::Credentials;
use s3::error::S3Error;
use s3::region::Region;

use super::error::StorageError;
use super::key::{new_media_key, validate_media_key};
use super::traits::{BoxReader, MediaStore, StoredMedia};

/// S3-compatible object store backend for uploaded media.
///
/// Objects are keyed the same way as the filesystem backend (`uuid.ext`)
/// and exposed to clients at `{public_base_url}/{key}`, which is expected
/// to point at the bucket's public endpoint or a CDN in front of it.
pub struct ObjectMediaStore {
    bucket: Box<Bucket>,
    public_base_url: String,
    max_size: u64,
}

impl ObjectMediaStore {
    /// Connect to a bucket. Credentials come from the standard AWS
    /// environment variables / profile chain. A custom endpoint selects
    /// an S3-compatible store such as MinIO.
    pub fn new(
        bucket_name: &str,
        region: &str,
        endpoint: Option<&str>,
        public_base_url: String,
        max_size: u64,
    ) -> Result<Self, StorageError> {
        let region = match endpoint {
            Some(endpoint) => Region::Custom {
                region: region.to_string(),
                endpoint: endpoint.to_string(),
            },
            None => region
                .parse()
                .map_err(|e| StorageError::Backend(format!("invalid region: {e}")))?,
        };
        let credentials =
            Credentials::default().map_err(|e| StorageError::Backend(e.to_string()))?;
        let bucket = Bucket::new(bucket_name, region, credentials)
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        Ok(Self {
            bucket,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
            max_size,
        })
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{key}", self.public_base_url)
    }
}

fn map_s3_error(key: &str, err: S3Error) -> StorageError {
    match err {
        S3Error::HttpFailWithBody(404, _) => StorageError::NotFound(key.to_string()),
        other => StorageError::Backend(other.to_string()),
    }
}

#[async_trait]
impl MediaStore for ObjectMediaStore {
    async fn put(
        &self,
        extension: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<StoredMedia, StorageError> {
        if data.len() as u64 > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: data.len() as u64,
                limit: self.max_size,
            });
        }

        let key = new_media_key(extension);
        self.bucket
            .put_object_with_content_type(&key, data, content_type)
            .await
            .map_err(|e| map_s3_error(&key, e))?;

        Ok(StoredMedia {
            url: self.public_url(&key),
            size: data.len() as u64,
            key,
        })
    }

    async fn open(&self, key: &str) -> Result<BoxReader, StorageError> {
        validate_media_key(key)?;
        let response = self
            .bucket
            .get_object(key)
            .await
            .map_err(|e| map_s3_error(key, e))?;
        Ok(Box::new(Cursor::new(response.to_vec())))
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        validate_media_key(key)?;
        match self.bucket.head_object(key).await {
            Ok(_) => Ok(true),
            Err(S3Error::HttpFailWithBody(404, _)) => Ok(false),
            Err(e) => Err(StorageError::Backend(e.to_string())),
        }
    }

    async fn delete(&self, key: &str) -> Result<bool, StorageError> {
        validate_media_key(key)?;
        match self.bucket.delete_object(key).await {
            Ok(_) => Ok(true),
            Err(S3Error::HttpFailWithBody(404, _)) => Ok(false),
            Err(e) => Err(StorageError::Backend(e.to_string())),
        }
    }
}
