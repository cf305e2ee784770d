use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sea_orm::{DbErr, SqlErr};
use serde_json::json;
use thiserror::Error;

use crate::validation::FieldErrors;

/// Errors surfaced by the admin handlers.
#[derive(Error, Debug)]
pub enum AdminError {
    #[error("Validation failed")]
    Validation(FieldErrors),
    #[error("{0} not found")]
    NotFound(String),
    #[error("Multipart error: {0}")]
    Multipart(String),
    #[error("Malformed request: {0}")]
    BadRequest(String),
    #[error("Database error: {0}")]
    Database(DbErr),
}

impl AdminError {
    /// Single-field validation failure.
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::default();
        errors.add(field, message);
        AdminError::Validation(errors)
    }
}

/// Whether the database refused a write because a referenced row is gone.
pub fn is_foreign_key_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_)))
}

impl From<FieldErrors> for AdminError {
    fn from(errors: FieldErrors) -> Self {
        AdminError::Validation(errors)
    }
}

impl From<DbErr> for AdminError {
    fn from(e: DbErr) -> Self {
        match e {
            DbErr::RecordNotFound(what) => AdminError::NotFound(what),
            other => AdminError::Database(other),
        }
    }
}

impl From<actix_multipart::MultipartError> for AdminError {
    fn from(e: actix_multipart::MultipartError) -> Self {
        AdminError::Multipart(e.to_string())
    }
}

impl ResponseError for AdminError {
    fn status_code(&self) -> StatusCode {
        match self {
            AdminError::Validation(_) | AdminError::Multipart(_) | AdminError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AdminError::NotFound(_) => StatusCode::NOT_FOUND,
            AdminError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AdminError::Validation(fields) => json!({
                "error": self.to_string(),
                "fields": fields,
            }),
            AdminError::Database(e) => {
                tracing::error!(error = %e, "database error in admin request");
                json!({ "error": "Database error" })
            }
            _ => json!({ "error": self.to_string() }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
