//! Application error taxonomy and its HTTP mapping.
//!
//! Every failure that reaches the transport layer is an [`AppError`]. Store and
//! cache errors are translated at the service boundary, so no infrastructure
//! error type leaks into a response unchanged.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use validator::ValidationErrors;

use crate::domain::repositories::StoreError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload: `{ "code", "message", "details" }`.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Errors surfaced to API callers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed or missing input. Never retried.
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// The identifier never existed (or was already swept).
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// The identifier existed but its lifetime has elapsed.
    #[error("{message}")]
    Expired { message: String, details: Value },

    /// The durable store (or the id generator) failed.
    #[error("{message}")]
    StoreUnavailable { message: String, details: Value },
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

    pub fn expired(message: impl Into<String>, details: Value) -> Self {
        Self::Expired {
            message: message.into(),
            details,
        }
    }

    pub fn store_unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
            details,
        }
    }

    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Expired { .. } => StatusCode::GONE,
            AppError::StoreUnavailable { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts the error into its serializable form.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, message, details) = match self {
            AppError::Validation { message, details } => ("validation_error", message, details),
            AppError::NotFound { message, details } => ("not_found", message, details),
            AppError::Expired { message, details } => ("expired", message, details),
            AppError::StoreUnavailable { message, details } => {
                ("store_unavailable", message, details)
            }
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

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::UniqueViolation { constraint } => AppError::store_unavailable(
                "Unique constraint violation",
                json!({ "constraint": constraint }),
            ),
            // The store's own message may carry connection details; keep it in logs only.
            StoreError::Unavailable(reason) => {
                tracing::error!(%reason, "durable store unavailable");
                AppError::store_unavailable("Store unavailable", json!({}))
            }
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(e: ValidationErrors) -> Self {
        let fields: serde_json::Map<String, Value> = e
            .field_errors()
            .into_iter()
            .map(|(field, errors)| {
                let messages: Vec<Value> = errors
                    .iter()
                    .map(|err| {
                        err.message
                            .as_ref()
                            .map(|m| Value::String(m.to_string()))
                            .unwrap_or_else(|| Value::String(err.code.to_string()))
                    })
                    .collect();
                (field.to_string(), Value::Array(messages))
            })
            .collect();

        AppError::bad_request("Validation failed", json!({ "fields": fields }))
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::bad_request(
            "Malformed request body",
            json!({ "reason": e.body_text() }),
        )
    }
}
