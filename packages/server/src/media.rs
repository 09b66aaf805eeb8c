use std::sync::Arc;

use common::MediaStore;
use common::storage::filesystem::FilesystemMediaStore;

use crate::config::{StorageBackend, StorageConfig};

/// Build the media store selected by the configuration.
pub async fn build_media_store(config: &StorageConfig) -> anyhow::Result<Arc<dyn MediaStore>> {
    match config.backend {
        StorageBackend::Local => {
            let store = FilesystemMediaStore::new(
                config.local_root.clone(),
                config.public_base_url.clone(),
                config.max_upload_size,
            )
            .await?;
            Ok(Arc::new(store))
        }
        StorageBackend::S3 => {
            if config.s3_bucket.is_empty() {
                anyhow::bail!("storage.s3_bucket is required for the s3 backend");
            }
            let store = common::storage::object::ObjectMediaStore::new(
                &config.s3_bucket,
                &config.s3_region,
                config.s3_endpoint.as_deref(),
                config.public_base_url.clone(),
                config.max_upload_size,
            )?;
            Ok(Arc::new(store))
        }
    }
}
