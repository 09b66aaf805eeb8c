use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::contact_message;
use crate::error::AppError;

/// JSON body for the public contact form.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct ContactRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
}

impl ContactRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("Missing required field 'name'".into()));
        }
        // Light-touch shape check, not RFC 5322.
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') || email.starts_with('@') || email.ends_with('@')
        {
            return Err(AppError::Validation(format!("Invalid email '{email}'")));
        }
        if self.message.trim().is_empty() {
            return Err(AppError::Validation(
                "Missing required field 'message'".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ContactMessageResponse {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<contact_message::Model> for ContactMessageResponse {
    fn from(m: contact_message::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            phone: m.phone,
            subject: m.subject,
            message: m.message,
            is_read: m.is_read,
            created_at: m.created_at,
        }
    }
}
