use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::entity::faculty_member::{self, Specializations};
use crate::error::AppError;

use super::shared::{non_empty, parse_bool_field, parse_i32_field};

/// Scalar fields of a faculty create/update request.
#[derive(Debug, PartialEq)]
pub struct FacultySubmission {
    pub name: String,
    pub designation: String,
    pub department: Option<String>,
    pub qualification: Option<String>,
    pub experience: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub specialization: Specializations,
    pub order: i32,
    pub is_active: bool,
}

impl FacultySubmission {
    pub fn parse(fields: &BTreeMap<String, String>) -> Result<Self, AppError> {
        let name = fields
            .get("name")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Validation("Missing required field 'name'".into()))?;
        let designation = fields
            .get("designation")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::Validation("Missing required field 'designation'".into()))?;

        // Sent either as a JSON array or as a comma-separated list.
        let specialization = match fields.get("specialization") {
            Some(raw) if !raw.trim().is_empty() => parse_specializations(raw)?,
            _ => Specializations::default(),
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
            name,
            designation,
            department: non_empty(fields.get("department")),
            qualification: non_empty(fields.get("qualification")),
            experience: non_empty(fields.get("experience")),
            email: non_empty(fields.get("email")),
            phone: non_empty(fields.get("phone")),
            bio: non_empty(fields.get("bio")),
            specialization,
            order,
            is_active,
        })
    }
}

fn parse_specializations(raw: &str) -> Result<Specializations, AppError> {
    let raw = raw.trim();
    if raw.starts_with('[') {
        let list: Vec<String> = serde_json::from_str(raw)
            .map_err(|e| AppError::Validation(format!("Invalid specialization JSON: {e}")))?;
        return Ok(Specializations(
            list.into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        ));
    }
    Ok(Specializations(
        raw.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    ))
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct FacultyResponse {
    pub id: i32,
    pub name: String,
    pub designation: String,
    pub department: Option<String>,
    pub qualification: Option<String>,
    pub experience: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub specialization: Vec<String>,
    pub image_url: Option<String>,
    pub order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<faculty_member::Model> for FacultyResponse {
    fn from(m: faculty_member::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            designation: m.designation,
            department: m.department,
            qualification: m.qualification,
            experience: m.experience,
            email: m.email,
            phone: m.phone,
            bio: m.bio,
            specialization: m.specialization.0,
            image_url: m.image_url,
            order: m.order,
            is_active: m.is_active,
            created_at: m.created_at,
        }
    }
}
