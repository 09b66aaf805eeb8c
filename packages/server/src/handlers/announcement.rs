use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::announcement::{self, AnnouncementKind, Priority};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::announcement::{
    AnnouncementListQuery, AnnouncementRequest, AnnouncementResponse,
};
use crate::models::content::DeletedResponse;
use crate::models::shared::parse_enum_field;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Announcements",
    operation_id = "listAnnouncements",
    summary = "List active, unexpired announcements",
    description = "Returns active announcements whose expiry date is unset or in the future, \
        newest first.",
    params(
        ("kind" = Option<String>, Query, description = "Announcement kind to filter by"),
        ("priority" = Option<String>, Query, description = "Priority to filter by"),
    ),
    responses(
        (status = 200, description = "Announcements", body = Vec<AnnouncementResponse>),
        (status = 400, description = "Unknown filter value (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_announcements(
    State(state): State<AppState>,
    Query(query): Query<AnnouncementListQuery>,
) -> Result<Json<Vec<AnnouncementResponse>>, AppError> {
    let now = chrono::Utc::now();
    let mut select = announcement::Entity::find()
        .filter(announcement::Column::IsActive.eq(true))
        .filter(
            Condition::any()
                .add(announcement::Column::ExpiryDate.is_null())
                .add(announcement::Column::ExpiryDate.gte(now)),
        );
    if let Some(kind) = query.kind.as_deref() {
        let kind: AnnouncementKind = parse_enum_field("kind", kind)?;
        select = select.filter(announcement::Column::Kind.eq(kind));
    }
    if let Some(priority) = query.priority.as_deref() {
        let priority: Priority = parse_enum_field("priority", priority)?;
        select = select.filter(announcement::Column::Priority.eq(priority));
    }

    let items = select
        .order_by_desc(announcement::Column::CreatedAt)
        .order_by_desc(announcement::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(items.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Announcements",
    operation_id = "createAnnouncement",
    summary = "Create an announcement",
    request_body = AnnouncementRequest,
    responses(
        (status = 201, description = "Announcement created", body = AnnouncementResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, request), fields(username = %auth_user.username))]
pub async fn create_announcement(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(request): AppJson<AnnouncementRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;

    let model = announcement::ActiveModel {
        title: Set(request.title.trim().to_string()),
        content: Set(request.content.trim().to_string()),
        kind: Set(request.kind),
        priority: Set(request.priority),
        expiry_date: Set(request.expiry_date),
        is_active: Set(request.is_active),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(AnnouncementResponse::from(model))))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Announcements",
    operation_id = "updateAnnouncement",
    summary = "Replace an announcement",
    params(("id" = i32, Path, description = "Announcement ID")),
    request_body = AnnouncementRequest,
    responses(
        (status = 200, description = "Announcement updated", body = AnnouncementResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Announcement not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, request), fields(id, username = %auth_user.username))]
pub async fn update_announcement(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(request): AppJson<AnnouncementRequest>,
) -> Result<Json<AnnouncementResponse>, AppError> {
    request.validate()?;

    let existing = find_announcement(&state.db, id).await?;

    let mut active: announcement::ActiveModel = existing.into();
    active.title = Set(request.title.trim().to_string());
    active.content = Set(request.content.trim().to_string());
    active.kind = Set(request.kind);
    active.priority = Set(request.priority);
    active.expiry_date = Set(request.expiry_date);
    active.is_active = Set(request.is_active);

    let model = active.update(&state.db).await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Announcements",
    operation_id = "deleteAnnouncement",
    summary = "Delete an announcement",
    params(("id" = i32, Path, description = "Announcement ID")),
    responses(
        (status = 200, description = "Announcement deleted", body = DeletedResponse),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Announcement not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id, username = %auth_user.username))]
pub async fn delete_announcement(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DeletedResponse>, AppError> {
    let model = find_announcement(&state.db, id).await?;
    announcement::Entity::delete_by_id(model.id)
        .exec(&state.db)
        .await?;

    Ok(Json(DeletedResponse {
        message: "Announcement deleted successfully".into(),
    }))
}

async fn find_announcement<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<announcement::Model, AppError> {
    announcement::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Announcement not found".into()))
}
