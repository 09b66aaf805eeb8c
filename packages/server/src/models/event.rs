use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::event::{self, EventCategory};
use crate::error::AppError;

use super::shared::{
    non_empty, parse_bool_field, parse_datetime_field, parse_enum_field, validate_title,
};

/// Scalar fields of an event create/update request.
#[derive(Debug, PartialEq)]
pub struct EventSubmission {
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub category: EventCategory,
    pub is_active: bool,
}

impl EventSubmission {
    pub fn parse(fields: &BTreeMap<String, String>) -> Result<Self, AppError> {
        let title = fields
            .get("title")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Validation("Missing required field 'title'".into()))?;
        validate_title(&title)?;

        let description = fields
            .get("description")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Validation("Missing required field 'description'".into()))?;

        let date = fields
            .get("date")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| AppError::Validation("Missing required field 'date'".into()))
            .and_then(|v| parse_datetime_field("date", v))?;

        let category = match fields.get("category") {
            Some(v) if !v.trim().is_empty() => parse_enum_field("category", v)?,
            _ => EventCategory::Other,
        };
        let is_active = match fields.get("is_active") {
            Some(v) if !v.trim().is_empty() => parse_bool_field("is_active", v)?,
            _ => true,
        };

        Ok(Self {
            title,
            description,
            date,
            time: non_empty(fields.get("time")),
            location: non_empty(fields.get("location")),
            category,
            is_active,
        })
    }
}

#[derive(Deserialize)]
pub struct EventListQuery {
    pub category: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct EventResponse {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub image_url: Option<String>,
    pub category: EventCategory,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<event::Model> for EventResponse {
    fn from(m: event::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            date: m.date,
            time: m.time,
            location: m.location,
            image_url: m.image_url,
            category: m.category,
            is_active: m.is_active,
            created_at: m.created_at,
        }
    }
}
