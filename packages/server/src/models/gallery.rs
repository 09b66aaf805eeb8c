use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::gallery_item::{self, GalleryCategory, MediaType};
use crate::error::AppError;

use super::shared::{non_empty, parse_bool_field, parse_enum_field, parse_i32_field, validate_title};

/// Scalar fields of a gallery create/update request.
#[derive(Debug, PartialEq)]
pub struct GallerySubmission {
    pub title: String,
    pub description: Option<String>,
    pub media_type: MediaType,
    pub category: GalleryCategory,
    pub order: i32,
    pub is_active: bool,
}

impl GallerySubmission {
    pub fn parse(fields: &BTreeMap<String, String>) -> Result<Self, AppError> {
        let title = fields
            .get("title")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Validation("Missing required field 'title'".into()))?;
        validate_title(&title)?;

        let media_type = match fields.get("media_type") {
            Some(v) if !v.trim().is_empty() => parse_enum_field("media_type", v)?,
            _ => MediaType::Photo,
        };
        let category = match fields.get("category") {
            Some(v) if !v.trim().is_empty() => parse_enum_field("category", v)?,
            _ => GalleryCategory::Other,
        };
        let order = match fields.get("order") {
            Some(v) if !v.trim().is_empty() => parse_i32_field("order", v)?,
            _ => 0,
        };
        let is_active = match fields.get("is_active") {
            Some(v) if !v.trim().is_empty() => parse_bool_field("is_active", v)?,
            _ => true,
        };

        Ok(Self {
            title,
            description: non_empty(fields.get("description")),
            media_type,
            category,
            order,
            is_active,
        })
    }
}

#[derive(Deserialize)]
pub struct GalleryListQuery {
    pub category: Option<String>,
    pub media_type: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct GalleryItemResponse {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub media_type: MediaType,
    pub category: GalleryCategory,
    pub media_url: String,
    pub thumbnail_url: Option<String>,
    pub order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<gallery_item::Model> for GalleryItemResponse {
    fn from(m: gallery_item::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            media_type: m.media_type,
            category: m.category,
            media_url: m.media_url,
            thumbnail_url: m.thumbnail_url,
            order: m.order,
            is_active: m.is_active,
            created_at: m.created_at,
        }
    }
}
