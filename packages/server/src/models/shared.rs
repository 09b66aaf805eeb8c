use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// Validate a trimmed title (1-256 Unicode characters).
pub fn validate_title(title: &str) -> Result<(), AppError> {
    let title = title.trim();
    if title.is_empty() || title.chars().count() > 256 {
        return Err(AppError::Validation(
            "Title must be 1-256 characters".into(),
        ));
    }
    Ok(())
}

/// Parse a boolean multipart text field ("true"/"false"/"1"/"0").
pub fn parse_bool_field(name: &str, value: &str) -> Result<bool, AppError> {
    match value.trim() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(AppError::Validation(format!(
            "Invalid {name}: '{other}' is not a boolean"
        ))),
    }
}

/// Parse an integer multipart text field.
pub fn parse_i32_field(name: &str, value: &str) -> Result<i32, AppError> {
    value
        .trim()
        .parse::<i32>()
        .map_err(|_| AppError::Validation(format!("Invalid {name}: '{value}' is not an integer")))
}

/// Parse an RFC 3339 datetime multipart text field.
pub fn parse_datetime_field(name: &str, value: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            AppError::Validation(format!(
                "Invalid {name}: '{value}' is not an RFC 3339 datetime"
            ))
        })
}

/// Parse a closed-vocabulary multipart text field into its enum.
pub fn parse_enum_field<T: DeserializeOwned>(name: &str, value: &str) -> Result<T, AppError> {
    serde_json::from_value(serde_json::Value::String(value.trim().to_string()))
        .map_err(|_| AppError::Validation(format!("Invalid {name}: '{value}'")))
}

/// Normalize an optional text field: trimmed, with empty treated as absent.
pub fn non_empty(value: Option<&String>) -> Option<String> {
    value
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}
