use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::event::{self, EventCategory};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::content::DeletedResponse;
use crate::models::event::{EventListQuery, EventResponse, EventSubmission};
use crate::models::shared::parse_enum_field;
use crate::state::AppState;
use crate::utils::upload::{MediaKind, UploadedFile, read_media_field, store_upload};

pub fn event_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(64 * 1024 * 1024)
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Events",
    operation_id = "listEvents",
    summary = "List active events",
    description = "Returns active events ordered by event date ascending.",
    params(
        ("category" = Option<String>, Query, description = "Category to filter by"),
    ),
    responses(
        (status = 200, description = "Events", body = Vec<EventResponse>),
        (status = 400, description = "Unknown category (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventListQuery>,
) -> Result<Json<Vec<EventResponse>>, AppError> {
    let mut select = event::Entity::find().filter(event::Column::IsActive.eq(true));
    if let Some(category) = query.category.as_deref() {
        let category: EventCategory = parse_enum_field("category", category)?;
        select = select.filter(event::Column::Category.eq(category));
    }

    let events = select
        .order_by_asc(event::Column::Date)
        .order_by_asc(event::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(events.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Events",
    operation_id = "createEvent",
    summary = "Create an event",
    description = "Multipart form with scalar fields and an optional `image` file.",
    request_body(content_type = "multipart/form-data", description = "Scalar fields + optional image"),
    responses(
        (status = 201, description = "Event created", body = EventResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(username = %auth_user.username))]
pub async fn create_event(
    auth_user: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let (fields, image) = collect_event_form(multipart).await?;
    let submission = EventSubmission::parse(&fields)?;

    let image_url = match image {
        Some(file) => Some(store_upload(&*state.media, &file).await?.url),
        None => None,
    };

    let model = event::ActiveModel {
        title: Set(submission.title),
        description: Set(submission.description),
        date: Set(submission.date),
        time: Set(submission.time),
        location: Set(submission.location),
        image_url: Set(image_url),
        category: Set(submission.category),
        is_active: Set(submission.is_active),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(EventResponse::from(model))))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Events",
    operation_id = "updateEvent",
    summary = "Replace an event",
    description = "Replace semantics for scalar fields. The stored image survives unless a new \
        file is uploaded.",
    params(("id" = i32, Path, description = "Event ID")),
    request_body(content_type = "multipart/form-data", description = "Scalar fields + optional image"),
    responses(
        (status = 200, description = "Event updated", body = EventResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(id, username = %auth_user.username))]
pub async fn update_event(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Json<EventResponse>, AppError> {
    let (fields, image) = collect_event_form(multipart).await?;
    let submission = EventSubmission::parse(&fields)?;

    let existing = find_event(&state.db, id).await?;

    let image_url = match image {
        Some(file) => Some(store_upload(&*state.media, &file).await?.url),
        None => existing.image_url.clone(),
    };

    let mut active: event::ActiveModel = existing.into();
    active.title = Set(submission.title);
    active.description = Set(submission.description);
    active.date = Set(submission.date);
    active.time = Set(submission.time);
    active.location = Set(submission.location);
    active.image_url = Set(image_url);
    active.category = Set(submission.category);
    active.is_active = Set(submission.is_active);

    let model = active.update(&state.db).await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Events",
    operation_id = "deleteEvent",
    summary = "Delete an event",
    params(("id" = i32, Path, description = "Event ID")),
    responses(
        (status = 200, description = "Event deleted", body = DeletedResponse),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Event not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id, username = %auth_user.username))]
pub async fn delete_event(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DeletedResponse>, AppError> {
    let model = find_event(&state.db, id).await?;
    event::Entity::delete_by_id(model.id).exec(&state.db).await?;

    Ok(Json(DeletedResponse {
        message: "Event deleted successfully".into(),
    }))
}

async fn find_event<C: ConnectionTrait>(db: &C, id: i32) -> Result<event::Model, AppError> {
    event::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".into()))
}

async fn collect_event_form(
    mut multipart: Multipart,
) -> Result<(BTreeMap<String, String>, Option<UploadedFile>), AppError> {
    let mut fields = BTreeMap::new();
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("image") => {
                let file = read_media_field(field).await?;
                if file.kind != MediaKind::Image {
                    return Err(AppError::Validation(
                        "Event image must be an image file".into(),
                    ));
                }
                image = Some(file);
            }
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

    Ok((fields, image))
}
