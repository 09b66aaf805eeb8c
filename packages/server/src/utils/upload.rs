use axum::extract::multipart::Field;
use common::{MediaStore, StoredMedia};

use crate::error::AppError;

/// File extensions accepted as images.
const IMAGE_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "gif", "webp"];

/// File extensions accepted as videos.
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "ogg", "mov", "avi"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

/// A fully-buffered, validated upload from a multipart request.
///
/// Validation happens while the multipart stream is parsed, before any
/// record mutation: a rejected file fails the whole request with no
/// partially-updated record left behind.
pub struct UploadedFile {
    pub filename: String,
    pub extension: String,
    pub kind: MediaKind,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Validate an upload's filename extension against its declared MIME type.
///
/// Returns the lowercased extension and the media kind. Anything that is
/// not an allowed image or video combination is rejected.
pub fn validate_media_file(
    filename: &str,
    content_type: Option<&str>,
) -> Result<(String, MediaKind), AppError> {
    let filename = filename.trim();
    if filename.is_empty() {
        return Err(AppError::Validation("File must have a filename".into()));
    }

    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .filter(|ext| !ext.is_empty())
        .ok_or_else(|| {
            AppError::Validation(format!("File '{filename}' has no extension"))
        })?;

    let declared = content_type.unwrap_or("");

    let is_image = IMAGE_EXTENSIONS.contains(&extension.as_str()) && declared.starts_with("image/");
    let is_video = VIDEO_EXTENSIONS.contains(&extension.as_str()) && declared.starts_with("video/");

    if is_image {
        Ok((extension, MediaKind::Image))
    } else if is_video {
        Ok((extension, MediaKind::Video))
    } else {
        Err(AppError::Validation(
            "Only image and video files are allowed".into(),
        ))
    }
}

/// Read one multipart file field into a validated, buffered upload.
pub async fn read_media_field(field: Field<'_>) -> Result<UploadedFile, AppError> {
    let filename = field
        .file_name()
        .map(|s| s.to_string())
        .ok_or_else(|| AppError::Validation("File field must have a filename".into()))?;
    let content_type = field.content_type().map(|s| s.to_string());

    let (extension, kind) = validate_media_file(&filename, content_type.as_deref())?;

    let bytes = field
        .bytes()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read file: {e}")))?;

    Ok(UploadedFile {
        filename,
        extension,
        kind,
        content_type: content_type.unwrap_or_else(|| "application/octet-stream".into()),
        bytes: bytes.to_vec(),
    })
}

/// Persist a buffered upload to the media store.
///
/// Size limits are enforced by the store; a limit violation surfaces as a
/// validation error before any record mutation.
pub async fn store_upload(
    store: &dyn MediaStore,
    file: &UploadedFile,
) -> Result<StoredMedia, AppError> {
    Ok(store
        .put(&file.extension, &file.content_type, &file.bytes)
        .await?)
}
