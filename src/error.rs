//! Application error type and its HTTP translation.
//!
//! Every fallible operation in the service, repository and handler layers returns
//! [`AppError`]. Its [`IntoResponse`] implementation is the single place where
//! domain failures become HTTP status codes and JSON error bodies:
//!
//! ```json
//! {
//!   "error": {
//!     "code": "not_found",
//!     "message": "Customer not found",
//!     "details": { "id": 42 }
//!   }
//! }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Map, Value, json};
use validator::ValidationErrors;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload nested under the `error` key of every error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Errors surfaced to API callers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed or semantically invalid input (400).
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// The addressed record does not exist (404).
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// The request conflicts with stored state, e.g. a duplicate email (409).
    #[error("{message}")]
    Conflict { message: String, details: Value },

    /// Storage or other unexpected failure (500).
    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// HTTP status code this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts the error into its serializable payload.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, message, details) = match self {
            AppError::Validation { message, details } => ("validation_error", message, details),
            AppError::NotFound { message, details } => ("not_found", message, details),
            AppError::Conflict { message, details } => ("conflict", message, details),
            AppError::Internal { message, details } => ("internal_error", message, details),
        };

        ErrorInfo {
            code,
            message: message.clone(),
            details: details.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error() {
            if db.is_unique_violation() {
                return AppError::conflict(
                    "Unique constraint violation",
                    json!({ "constraint": db.constraint() }),
                );
            }
        }

        tracing::error!(error = %e, "Database error");
        AppError::internal("Database error", json!({}))
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::bad_request("Validation failed", validation_details(&errors))
    }
}

/// Flattens field errors into `{ "field": [{ "code", "message" }, ...] }`.
fn validation_details(errors: &ValidationErrors) -> Value {
    let mut fields = Map::new();

    for (field, field_errors) in errors.field_errors() {
        let entries = field_errors
            .iter()
            .map(|err| {
                json!({
                    "code": err.code,
                    "message": err.message.as_ref().map(|m| m.to_string()),
                })
            })
            .collect();

        fields.insert(field.to_string(), Value::Array(entries));
    }

    Value::Object(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::ValidationError;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::bad_request("x", json!({})).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::not_found("x", json!({})).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::conflict("x", json!({})).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::internal("x", json!({})).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_info_carries_code_and_details() {
        let info = AppError::not_found("Customer not found", json!({ "id": 7 })).to_error_info();

        assert_eq!(info.code, "not_found");
        assert_eq!(info.message, "Customer not found");
        assert_eq!(info.details["id"], 7);
    }

    #[test]
    fn test_display_uses_message() {
        let err = AppError::conflict("Email already in use", json!({}));
        assert_eq!(err.to_string(), "Email already in use");
    }

    #[test]
    fn test_validation_errors_become_field_details() {
        let mut errors = ValidationErrors::new();
        errors.add(
            "name",
            ValidationError::new("length").with_message("Name must be 2-100 characters".into()),
        );

        let err = AppError::from(errors);

        match err {
            AppError::Validation { details, .. } => {
                assert_eq!(details["name"][0]["code"], "length");
                assert_eq!(
                    details["name"][0]["message"],
                    "Name must be 2-100 characters"
                );
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
