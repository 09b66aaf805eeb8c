use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::faculty_member;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::content::DeletedResponse;
use crate::models::faculty::{FacultyResponse, FacultySubmission};
use crate::state::AppState;
use crate::utils::upload::{MediaKind, UploadedFile, read_media_field, store_upload};

pub fn faculty_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(64 * 1024 * 1024)
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Faculty",
    operation_id = "listFaculty",
    summary = "List active faculty members",
    responses(
        (status = 200, description = "Faculty members", body = Vec<FacultyResponse>),
    ),
)]
#[instrument(skip(state))]
pub async fn list_faculty(
    State(state): State<AppState>,
) -> Result<Json<Vec<FacultyResponse>>, AppError> {
    let members = faculty_member::Entity::find()
        .filter(faculty_member::Column::IsActive.eq(true))
        .order_by_asc(faculty_member::Column::Order)
        .order_by_asc(faculty_member::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(members.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Faculty",
    operation_id = "createFacultyMember",
    summary = "Create a faculty member",
    description = "Multipart form with scalar fields and an optional `image` portrait.",
    request_body(content_type = "multipart/form-data", description = "Scalar fields + optional image"),
    responses(
        (status = 201, description = "Faculty member created", body = FacultyResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(username = %auth_user.username))]
pub async fn create_faculty_member(
    auth_user: AuthUser,
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let (fields, image) = collect_faculty_form(multipart).await?;
    let submission = FacultySubmission::parse(&fields)?;

    let image_url = match image {
        Some(file) => Some(store_upload(&*state.media, &file).await?.url),
        None => None,
    };

    let model = faculty_member::ActiveModel {
        name: Set(submission.name),
        designation: Set(submission.designation),
        department: Set(submission.department),
        qualification: Set(submission.qualification),
        experience: Set(submission.experience),
        email: Set(submission.email),
        phone: Set(submission.phone),
        bio: Set(submission.bio),
        specialization: Set(submission.specialization),
        image_url: Set(image_url),
        order: Set(submission.order),
        is_active: Set(submission.is_active),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(FacultyResponse::from(model))))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Faculty",
    operation_id = "updateFacultyMember",
    summary = "Replace a faculty member",
    description = "Replace semantics for scalar fields. The stored portrait survives unless a new \
        file is uploaded.",
    params(("id" = i32, Path, description = "Faculty member ID")),
    request_body(content_type = "multipart/form-data", description = "Scalar fields + optional image"),
    responses(
        (status = 200, description = "Faculty member updated", body = FacultyResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Faculty member not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(id, username = %auth_user.username))]
pub async fn update_faculty_member(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Json<FacultyResponse>, AppError> {
    let (fields, image) = collect_faculty_form(multipart).await?;
    let submission = FacultySubmission::parse(&fields)?;

    let existing = find_faculty_member(&state.db, id).await?;

    let image_url = match image {
        Some(file) => Some(store_upload(&*state.media, &file).await?.url),
        None => existing.image_url.clone(),
    };

    let mut active: faculty_member::ActiveModel = existing.into();
    active.name = Set(submission.name);
    active.designation = Set(submission.designation);
    active.department = Set(submission.department);
    active.qualification = Set(submission.qualification);
    active.experience = Set(submission.experience);
    active.email = Set(submission.email);
    active.phone = Set(submission.phone);
    active.bio = Set(submission.bio);
    active.specialization = Set(submission.specialization);
    active.image_url = Set(image_url);
    active.order = Set(submission.order);
    active.is_active = Set(submission.is_active);

    let model = active.update(&state.db).await?;

    Ok(Json(model.into()))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Faculty",
    operation_id = "deleteFacultyMember",
    summary = "Delete a faculty member",
    params(("id" = i32, Path, description = "Faculty member ID")),
    responses(
        (status = 200, description = "Faculty member deleted", body = DeletedResponse),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Faculty member not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id, username = %auth_user.username))]
pub async fn delete_faculty_member(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<DeletedResponse>, AppError> {
    let model = find_faculty_member(&state.db, id).await?;
    faculty_member::Entity::delete_by_id(model.id)
        .exec(&state.db)
        .await?;

    Ok(Json(DeletedResponse {
        message: "Faculty member deleted successfully".into(),
    }))
}

async fn find_faculty_member<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<faculty_member::Model, AppError> {
    faculty_member::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Faculty member not found".into()))
}

async fn collect_faculty_form(
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
                        "Faculty portrait must be an image file".into(),
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
