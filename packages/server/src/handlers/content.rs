use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::content::{self, MediaRef, MediaRefs, Section};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::content::{
    ContentListQuery, ContentResponse, ContentSubmission, DeletedResponse,
};
use crate::state::AppState;
use crate::utils::upload::{UploadedFile, read_media_field, store_upload};

/// Maximum number of image files per content request.
const MAX_CONTENT_IMAGES: usize = 5;

/// Body limit layer for content multipart routes (5 files x 50 MB + form slack).
pub fn content_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(256 * 1024 * 1024)
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Content",
    operation_id = "listContent",
    summary = "List active content records",
    description = "Returns active content records ordered by `order`, optionally filtered to one \
        section. Inactive records are excluded; they remain addressable by id.",
    params(
        ("section" = Option<String>, Query, description = "Section tag to filter by"),
    ),
    responses(
        (status = 200, description = "Content records", body = Vec<ContentResponse>),
        (status = 400, description = "Unknown section tag (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_content(
    State(state): State<AppState>,
    Query(query): Query<ContentListQuery>,
) -> Result<Json<Vec<ContentResponse>>, AppError> {
    let section = match query.section.as_deref() {
        Some(tag) => Some(
            Section::from_tag(tag)
                .ok_or_else(|| AppError::Validation(format!("Unknown section '{tag}'")))?,
        ),
        None => None,
    };

    let mut select = content::Entity::find().filter(content::Column::IsActive.eq(true));
    if let Some(section) = section {
        select = select.filter(content::Column::Section.eq(section));
    }

    let records = select
        .order_by_asc(content::Column::Order)
        .order_by_asc(content::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(records.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/about",
    tag = "Content",
    operation_id = "getAboutSections",
    summary = "Get the about-page sections",
    description = "Returns active records of the about, mission, vision and values sections in \
        one call, ordered by `order`.",
    responses(
        (status = 200, description = "About-page content records", body = Vec<ContentResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn get_about_sections(
    State(state): State<AppState>,
) -> Result<Json<Vec<ContentResponse>>, AppError> {
    let records = content::Entity::find()
        .filter(content::Column::IsActive.eq(true))
        .filter(content::Column::Section.is_in([
            Section::About,
            Section::Mission,
            Section::Vision,
            Section::Values,
        ]))
        .order_by_asc(content::Column::Order)
        .order_by_asc(content::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(records.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Content",
    operation_id = "getContent",
    summary = "Get a content record by ID",
    description = "Returns a single record, active or not, so administrators can edit inactive \
        records.",
    params(("id" = i32, Path, description = "Content record ID")),
    responses(
        (status = 200, description = "Content record", body = ContentResponse),
        (status = 404, description = "Content not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(id))]
pub async fn get_content(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ContentResponse>, AppError> {
    let model = find_content(&state.db, id).await?;
    Ok(Json(model.into()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Content",
    operation_id = "createContent",
    summary = "Create a content record",
    description = "Creates a content record from a multipart form: scalar fields plus up to 5 \
        `images` files with optional `caption_<i>` fields. Singleton sections (hero, footer, \
        school-name, mission, vision, contact) reject a second active record.",
    request_body(content_type = "multipart/form-data", description = "Scalar fields + image files"),
    responses(
        (status = 201, description = "Content created", body = ContentResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 409, description = "Singleton section already has an active record (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(username = %auth_user.username))]
pub async fn create_content(
    auth_user: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let (fields, uploads) = collect_content_form(multipart).await?;
    let submission = ContentSubmission::parse(&fields)?;

    let txn = state.db.begin().await?;

    if submission.is_active {
        ensure_section_slot(&txn, submission.section, None).await?;
    }

    // All files validated and buffered; persist them before touching the record.
    let mut new_images = Vec::with_capacity(uploads.len());
    for (i, file) in uploads.iter().enumerate() {
        let stored = store_upload(&*state.media, file).await?;
        new_images.push(MediaRef {
            url: stored.url,
            caption: submission.caption_for(i),
            order: i as i32,
        });
    }

    let now = chrono::Utc::now();
    let new_content = content::ActiveModel {
        section: Set(submission.section),
        title: Set(submission.title),
        subtitle: Set(submission.subtitle),
        description: Set(submission.description),
        body: Set(submission.body),
        images: Set(MediaRefs(new_images)),
        order: Set(submission.order),
        is_active: Set(submission.is_active),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    let model = new_content.insert(&txn).await?;
    txn.commit().await?;

    Ok((StatusCode::CREATED, Json(ContentResponse::from(model))))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Content",
    operation_id = "updateContent",
    summary = "Replace a content record",
    description = "Replace semantics, not PATCH: the full scalar field set is submitted each \
        request and optional fields left out are cleared. Image handling: new `images` files are \
        appended to the `existing_images` list the caller echoes back (or replace everything when \
        no such list is sent); with no new files the stored list is kept unless `existing_images` \
        is supplied as a wholesale replacement. The record's section cannot change.",
    params(("id" = i32, Path, description = "Content record ID")),
    request_body(content_type = "multipart/form-data", description = "Scalar fields + optional image files + optional existing_images JSON"),
    responses(
        (status = 200, description = "Content updated", body = ContentResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Content not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Singleton section already has an active record (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(id, username = %auth_user.username))]
pub async fn update_content(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Json<ContentResponse>, AppError> {
    let (fields, uploads) = collect_content_form(multipart).await?;
    let submission = ContentSubmission::parse(&fields)?;

    let txn = state.db.begin().await?;

    let existing = find_content(&txn, id).await?;

    if submission.section != existing.section {
        return Err(AppError::Validation(format!(
            "Section cannot be changed (record belongs to '{}')",
            existing.section.tag()
        )));
    }

    if submission.is_active {
        ensure_section_slot(&txn, submission.section, Some(id)).await?;
    }

    let mut stored_uploads = Vec::with_capacity(uploads.len());
    for (i, file) in uploads.iter().enumerate() {
        let stored = store_upload(&*state.media, file).await?;
        stored_uploads.push((stored.url, submission.caption_for(i)));
    }

    let images = resolve_images(
        &existing.images,
        submission.existing_images.clone(),
        stored_uploads,
    );

    let mut active: content::ActiveModel = existing.into();
    active.title = Set(submission.title);
    active.subtitle = Set(submission.subtitle);
    active.description = Set(submission.description);
    active.body = Set(submission.body);
    active.images = Set(images);
    active.order = Set(submission.order);
    active.is_active = Set(submission.is_active);
    active.updated_at = Set(chrono::Utc::now());

    let model = active.update(&txn).await?;
    txn.commit().await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Content",
    operation_id = "deleteContent",
    summary = "Delete a content record",
    description = "Permanent removal. Media files referenced by the record are left in storage.",
    params(("id" = i32, Path, description = "Content record ID")),
    responses(
        (status = 200, description = "Content deleted", body = DeletedResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Content not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id, username = %auth_user.username))]
pub async fn delete_content(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DeletedResponse>, AppError> {
    let model = find_content(&state.db, id).await?;
    content::Entity::delete_by_id(model.id).exec(&state.db).await?;

    Ok(Json(DeletedResponse {
        message: "Content deleted successfully".into(),
    }))
}

async fn find_content<C: ConnectionTrait>(db: &C, id: i32) -> Result<content::Model, AppError> {
    content::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Content not found".into()))
}

/// Reject a second active record in a singleton section.
///
/// Callers pass their open transaction. The advisory lock is held until
/// that transaction ends, so of two concurrent writers the second one
/// counts the first one's committed row and gets the conflict.
async fn ensure_section_slot<C: ConnectionTrait>(
    db: &C,
    section: Section,
    exclude_id: Option<i32>,
) -> Result<(), AppError> {
    if section.allows_multiple() {
        return Ok(());
    }

    db.execute_raw(Statement::from_sql_and_values(
        DbBackend::Postgres,
        "SELECT pg_advisory_xact_lock(hashtext('content_section'), hashtext($1))",
        [section.tag().into()],
    ))
    .await?;

    let mut select = content::Entity::find()
        .filter(content::Column::Section.eq(section))
        .filter(content::Column::IsActive.eq(true));
    if let Some(id) = exclude_id {
        select = select.filter(content::Column::Id.ne(id));
    }

    if select.count(db).await? > 0 {
        return Err(AppError::Conflict(format!(
            "Section '{}' already has an active record",
            section.tag()
        )));
    }
    Ok(())
}

/// The image merge policy for updates.
///
/// With new uploads, the final list is the caller's `existing_images` list
/// (empty when absent, which drops all prior images) plus the uploads
/// appended with positional `order` values continuing after the kept list.
/// Without uploads, the stored list survives untouched unless the caller
/// supplies `existing_images` as a wholesale replacement.
fn resolve_images(
    stored: &MediaRefs,
    kept: Option<Vec<MediaRef>>,
    new_uploads: Vec<(String, Option<String>)>,
) -> MediaRefs {
    if new_uploads.is_empty() {
        return match kept {
            Some(list) => MediaRefs(list),
            None => stored.clone(),
        };
    }

    let mut images = kept.unwrap_or_default();
    let base = images.len();
    for (i, (url, caption)) in new_uploads.into_iter().enumerate() {
        images.push(MediaRef {
            url,
            caption,
            order: (base + i) as i32,
        });
    }
    MediaRefs(images)
}

/// Collect the multipart form into text fields plus buffered `images` uploads.
async fn collect_content_form(
    mut multipart: Multipart,
) -> Result<(BTreeMap<String, String>, Vec<UploadedFile>), AppError> {
    let mut fields = BTreeMap::new();
    let mut uploads = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("images") => {
                if uploads.len() >= MAX_CONTENT_IMAGES {
                    return Err(AppError::Validation(format!(
                        "At most {MAX_CONTENT_IMAGES} image files per request"
                    )));
                }
                uploads.push(read_media_field(field).await?);
            }
            Some(other) => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read '{other}': {e}")))?;
                fields.insert(other.to_string(), value);
            }
            None => {} // Ignore unnamed fields.
        }
    }

    Ok((fields, uploads))
}
