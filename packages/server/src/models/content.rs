use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::content::{self, MediaRef, Section};
use crate::error::AppError;

use super::shared::{non_empty, parse_bool_field, parse_i32_field, validate_title};

/// Scalar fields of a content create/update request, parsed out of the
/// multipart form's text fields.
///
/// Updates use replace semantics: the whole field set is submitted each
/// time, and optional fields left out of the request are stored as NULL
/// rather than preserved.
#[derive(Debug, PartialEq)]
pub struct ContentSubmission {
    pub section: Section,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
    pub order: i32,
    pub is_active: bool,
    /// Images the caller wants to keep on update, echoed back as JSON.
    pub existing_images: Option<Vec<MediaRef>>,
    /// Captions for newly-uploaded files, keyed by upload index
    /// (`caption_0`, `caption_1`, ...).
    captions: BTreeMap<usize, String>,
}

impl ContentSubmission {
    pub fn parse(fields: &BTreeMap<String, String>) -> Result<Self, AppError> {
        let section_tag = fields
            .get("section")
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Validation("Missing required field 'section'".into()))?;
        let section = Section::from_tag(section_tag)
            .ok_or_else(|| AppError::Validation(format!("Unknown section '{section_tag}'")))?;

        let title = fields
            .get("title")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Validation("Missing required field 'title'".into()))?;
        validate_title(&title)?;

        let order = match fields.get("order") {
            Some(v) if !v.trim().is_empty() => parse_i32_field("order", v)?,
            _ => 0,
        };
        let is_active = match fields.get("is_active") {
            Some(v) if !v.trim().is_empty() => parse_bool_field("is_active", v)?,
            _ => true,
        };

        let existing_images = match fields.get("existing_images") {
            Some(raw) => Some(serde_json::from_str::<Vec<MediaRef>>(raw).map_err(|e| {
                AppError::Validation(format!("Invalid existing_images JSON: {e}"))
            })?),
            None => None,
        };

        let mut captions = BTreeMap::new();
        for (key, value) in fields {
            if let Some(index) = key.strip_prefix("caption_")
                && let Ok(index) = index.parse::<usize>()
            {
                captions.insert(index, value.clone());
            }
        }

        Ok(Self {
            section,
            title,
            subtitle: non_empty(fields.get("subtitle")),
            description: non_empty(fields.get("description")),
            body: non_empty(fields.get("body")),
            order,
            is_active,
            existing_images,
            captions,
        })
    }

    /// Caption supplied for the i-th new upload, if any.
    pub fn caption_for(&self, index: usize) -> Option<String> {
        self.captions
            .get(&index)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
    }
}

#[derive(Deserialize)]
pub struct ContentListQuery {
    /// Section tag to filter by; omit for all sections.
    pub section: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ContentResponse {
    pub id: i32,
    pub section: Section,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
    pub images: Vec<MediaRef>,
    pub order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<content::Model> for ContentResponse {
    fn from(m: content::Model) -> Self {
        Self {
            id: m.id,
            section: m.section,
            title: m.title,
            subtitle: m.subtitle,
            description: m.description,
            body: m.body,
            images: m.images.0,
            order: m.order,
            is_active: m.is_active,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Confirmation body for deletes.
#[derive(Serialize, utoipa::ToSchema)]
pub struct DeletedResponse {
    pub message: String,
}
