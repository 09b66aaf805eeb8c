use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::announcement::{self, AnnouncementKind, Priority};
use crate::error::AppError;

use super::shared::validate_title;

/// JSON body for announcement create/update. Announcements carry no media,
/// so they skip the multipart pipeline entirely.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct AnnouncementRequest {
    pub title: String,
    pub content: String,
    #[serde(default = "default_kind")]
    pub kind: AnnouncementKind,
    #[serde(default = "default_priority")]
    pub priority: Priority,
    pub expiry_date: Option<DateTime<Utc>>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_kind() -> AnnouncementKind {
    AnnouncementKind::General
}

fn default_priority() -> Priority {
    Priority::Medium
}

fn default_active() -> bool {
    true
}

impl AnnouncementRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_title(&self.title)?;
        if self.content.trim().is_empty() {
            return Err(AppError::Validation(
                "Missing required field 'content'".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
pub struct AnnouncementListQuery {
    pub kind: Option<String>,
    pub priority: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AnnouncementResponse {
    pub id: i32,
    pub title: String,
    pub content: String,
    pub kind: AnnouncementKind,
    pub priority: Priority,
    pub expiry_date: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<announcement::Model> for AnnouncementResponse {
    fn from(m: announcement::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            content: m.content,
            kind: m.kind,
            priority: m.priority,
            expiry_date: m.expiry_date,
            is_active: m.is_active,
            created_at: m.created_at,
        }
    }
}
