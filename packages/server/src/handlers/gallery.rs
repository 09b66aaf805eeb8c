use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::gallery_item::{self, GalleryCategory, MediaType};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::content::DeletedResponse;
use crate::models::gallery::{GalleryItemResponse, GalleryListQuery, GallerySubmission};
use crate::models::shared::parse_enum_field;
use crate::state::AppState;
use crate::utils::upload::{UploadedFile, read_media_field, store_upload};

pub fn gallery_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(128 * 1024 * 1024)
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Gallery",
    operation_id = "listGallery",
    summary = "List active gallery items",
    params(
        ("category" = Option<String>, Query, description = "Category to filter by"),
        ("media_type" = Option<String>, Query, description = "Media type to filter by (photo/video)"),
    ),
    responses(
        (status = 200, description = "Gallery items", body = Vec<GalleryItemResponse>),
        (status = 400, description = "Unknown filter value (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_gallery(
    State(state): State<AppState>,
    Query(query): Query<GalleryListQuery>,
) -> Result<Json<Vec<GalleryItemResponse>>, AppError> {
    let mut select = gallery_item::Entity::find().filter(gallery_item::Column::IsActive.eq(true));
    if let Some(category) = query.category.as_deref() {
        let category: GalleryCategory = parse_enum_field("category", category)?;
        select = select.filter(gallery_item::Column::Category.eq(category));
    }
    if let Some(media_type) = query.media_type.as_deref() {
        let media_type: MediaType = parse_enum_field("media_type", media_type)?;
        select = select.filter(gallery_item::Column::MediaType.eq(media_type));
    }

    let items = select
        .order_by_asc(gallery_item::Column::Order)
        .order_by_asc(gallery_item::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(items.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Gallery",
    operation_id = "createGalleryItem",
    summary = "Create a gallery item",
    description = "Multipart form with a required `media` file and an optional `thumbnail` image \
        used as the poster for videos.",
    request_body(content_type = "multipart/form-data", description = "Scalar fields + media file"),
    responses(
        (status = 201, description = "Gallery item created", body = GalleryItemResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(username = %auth_user.username))]
pub async fn create_gallery_item(
    auth_user: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let (fields, media, thumbnail) = collect_gallery_form(multipart).await?;
    let submission = GallerySubmission::parse(&fields)?;

    let media = media
        .ok_or_else(|| AppError::Validation("Missing required file field 'media'".into()))?;
    let media_url = store_upload(&*state.media, &media).await?.url;
    let thumbnail_url = match thumbnail {
        Some(file) => Some(store_upload(&*state.media, &file).await?.url),
        None => None,
    };

    let item = gallery_item::ActiveModel {
        title: Set(submission.title),
        description: Set(submission.description),
        media_type: Set(submission.media_type),
        category: Set(submission.category),
        media_url: Set(media_url),
        thumbnail_url: Set(thumbnail_url),
        order: Set(submission.order),
        is_active: Set(submission.is_active),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(GalleryItemResponse::from(item))))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Gallery",
    operation_id = "updateGalleryItem",
    summary = "Replace a gallery item",
    description = "Replace semantics for scalar fields. The stored media and thumbnail survive \
        unless new files are uploaded.",
    params(("id" = i32, Path, description = "Gallery item ID")),
    request_body(content_type = "multipart/form-data", description = "Scalar fields + optional files"),
    responses(
        (status = 200, description = "Gallery item updated", body = GalleryItemResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Gallery item not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(id, username = %auth_user.username))]
pub async fn update_gallery_item(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Json<GalleryItemResponse>, AppError> {
    let (fields, media, thumbnail) = collect_gallery_form(multipart).await?;
    let submission = GallerySubmission::parse(&fields)?;

    let existing = find_gallery_item(&state.db, id).await?;

    let media_url = match media {
        Some(file) => store_upload(&*state.media, &file).await?.url,
        None => existing.media_url.clone(),
    };
    let thumbnail_url = match thumbnail {
        Some(file) => Some(store_upload(&*state.media, &file).await?.url),
        None => existing.thumbnail_url.clone(),
    };

    let mut active: gallery_item::ActiveModel = existing.into();
    active.title = Set(submission.title);
    active.description = Set(submission.description);
    active.media_type = Set(submission.media_type);
    active.category = Set(submission.category);
    active.media_url = Set(media_url);
    active.thumbnail_url = Set(thumbnail_url);
    active.order = Set(submission.order);
    active.is_active = Set(submission.is_active);

    let item = active.update(&state.db).await?;

    Ok(Json(item.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Gallery",
    operation_id = "deleteGalleryItem",
    summary = "Delete a gallery item",
    params(("id" = i32, Path, description = "Gallery item ID")),
    responses(
        (status = 200, description = "Gallery item deleted", body = DeletedResponse),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Gallery item not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id, username = %auth_user.username))]
pub async fn delete_gallery_item(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DeletedResponse>, AppError> {
    let item = find_gallery_item(&state.db, id).await?;
    gallery_item::Entity::delete_by_id(item.id)
        .exec(&state.db)
        .await?;

    Ok(Json(DeletedResponse {
        message: "Gallery item deleted successfully".into(),
    }))
}

async fn find_gallery_item<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<gallery_item::Model, AppError> {
    gallery_item::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Gallery item not found".into()))
}

async fn collect_gallery_form(
    mut multipart: Multipart,
) -> Result<(BTreeMap<String, String>, Option<UploadedFile>, Option<UploadedFile>), AppError> {
    let mut fields = BTreeMap::new();
    let mut media = None;
    let mut thumbnail = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("media") => media = Some(read_media_field(field).await?),
            Some("thumbnail") => thumbnail = Some(read_media_field(field).await?),
            Some(other) => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read '{other}': {e}")))?;
                fields.insert(other.to_string(), value);
            }
            None => {}
        }
    }

    Ok((fields, media, thumbnail))
}
