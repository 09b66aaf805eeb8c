use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::contact_message;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::contact::{ContactMessageResponse, ContactRequest};
use crate::models::content::DeletedResponse;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Contact",
    operation_id = "submitContactMessage",
    summary = "Submit a contact form message",
    description = "Public endpoint. Messages land in the admin inbox unread.",
    request_body = ContactRequest,
    responses(
        (status = 201, description = "Message received", body = ContactMessageResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, request))]
pub async fn submit_contact_message(
    State(state): State<AppState>,
    AppJson(request): AppJson<ContactRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;

    let model = contact_message::ActiveModel {
        name: Set(request.name.trim().to_string()),
        email: Set(request.email.trim().to_string()),
        phone: Set(request.phone.filter(|p| !p.trim().is_empty())),
        subject: Set(request.subject.filter(|s| !s.trim().is_empty())),
        message: Set(request.message.trim().to_string()),
        is_read: Set(false),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ContactMessageResponse::from(model)),
    ))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Contact",
    operation_id = "listContactMessages",
    summary = "List contact messages",
    description = "Admin inbox, newest first. Includes read and unread messages.",
    responses(
        (status = 200, description = "Contact messages", body = Vec<ContactMessageResponse>),
        (status = 401, description = "Unauthorized", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(username = %auth_user.username))]
pub async fn list_contact_messages(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<ContactMessageResponse>>, AppError> {
    let messages = contact_message::Entity::find()
        .order_by_desc(contact_message::Column::CreatedAt)
        .order_by_desc(contact_message::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    put,
    path = "/{id}/read",
    tag = "Contact",
    operation_id = "markContactMessageRead",
    summary = "Mark a contact message as read",
    params(("id" = i32, Path, description = "Contact message ID")),
    responses(
        (status = 200, description = "Message marked read", body = ContactMessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Message not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id, username = %auth_user.username))]
pub async fn mark_contact_message_read(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ContactMessageResponse>, AppError> {
    let existing = find_contact_message(&state.db, id).await?;

    let mut active: contact_message::ActiveModel = existing.into();
    active.is_read = Set(true);
    let model = active.update(&state.db).await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Contact",
    operation_id = "deleteContactMessage",
    summary = "Delete a contact message",
    params(("id" = i32, Path, description = "Contact message ID")),
    responses(
        (status = 200, description = "Message deleted", body = DeletedResponse),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Message not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id, username = %auth_user.username))]
pub async fn delete_contact_message(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DeletedResponse>, AppError> {
    let model = find_contact_message(&state.db, id).await?;
    contact_message::Entity::delete_by_id(model.id)
        .exec(&state.db)
        .await?;

    Ok(Json(DeletedResponse {
        message: "Contact message deleted successfully".into(),
    }))
}

async fn find_contact_message<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<contact_message::Model, AppError> {
    contact_message::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Contact message not found".into()))
}
