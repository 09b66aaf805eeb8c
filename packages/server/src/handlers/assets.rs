use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use tokio_util::io::ReaderStream;
use tracing::instrument;

use crate::error::AppError;
use crate::state::AppState;

/// Serve an uploaded media file by its storage key.
///
/// Keys are UUID-derived and never reused, so responses are cacheable
/// indefinitely.
#[instrument(skip(state))]
pub async fn serve_media(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response, AppError> {
    let reader = state.media.open(&key).await?;

    let content_type = mime_guess::from_path(&key)
        .first_or_octet_stream()
        .to_string();

    let body = Body::from_stream(ReaderStream::new(reader));

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (
                header::CACHE_CONTROL,
                "public, max-age=31536000, immutable".to_string(),
            ),
        ],
        body,
    )
        .into_response())
}
