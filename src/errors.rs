use std::borrow::Cow;
use std::fmt;

use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse
};
use serde::Serialize;
use validator::ValidationErrors;

#[derive(Debug)]
pub enum AppError {
    ValidationError(Vec<FieldError>),
    NotFound(String),
    Conflict(String),
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(errors) => {
                let messages = errors.iter()
                    .map(|e| format!("{}:{}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "validation error: {}", messages)
            }
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal server error: {}", msg)
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::ValidationError(errors) => {
                serde_json::json!({
                    "error": "Validation failed",
                    "details": errors
                })
            }
            AppError::NotFound(_) => serde_json::json!({"error": "Not found"}),
            AppError::InternalError(msg) => {
                tracing::error!("internal error surfaced to client: {}", msg);
                serde_json::json!({"error": "Internal server error"})
            }
            AppError::Conflict(_) => serde_json::json!({"error": self.to_string()}),
        };
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl AppError {
    /// Single-field validation failure.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::ValidationError(vec![FieldError {
            field: field.into(),
            message: message.into(),
        }])
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut field_errors: Vec<FieldError> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(|e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| default_message(&e.code)),
                })
            })
            .collect();

        field_errors.sort_by(|a, b| a.field.cmp(&b.field));

        AppError::ValidationError(field_errors)
    }
}

fn default_message(code: &str) -> String {
    match code {
        "required" => "This field is required.".to_string(),
        "email" => "Enter a valid email address.".to_string(),
        "url" => "Enter a valid URL.".to_string(),
        "length" => "Ensure this field has a valid length.".to_string(),
        _ => "Invalid value".to_string(),
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(e) if e.code() == Some(Cow::Borrowed("23505")) => {
                AppError::Conflict(unique_violation_message(e.constraint()))
            }
            sqlx::Error::Database(e) if e.code() == Some(Cow::Borrowed("23503")) => {
                AppError::invalid_field(
                    foreign_key_field(e.constraint()),
                    "Referenced object does not exist.",
                )
            }
            _ => AppError::InternalError(format!("Database error: {}", err))
        }
    }
}

fn unique_violation_message(constraint: Option<&str>) -> String {
    match constraint {
        Some(name) if name.ends_with("_slug_key") => "Slug already exists".to_string(),
        _ => "Database conflict occurred".to_string(),
    }
}

/// Request field named by a foreign key constraint such as `comments_post_id_fkey`.
fn foreign_key_field(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some(name) if name.contains("tag_id") => "tags",
        Some(name) if name.contains("post_id") => "post",
        _ => "non_field_errors",
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError(err.to_string())
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}
