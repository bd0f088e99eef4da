//! Boundary error type and its HTTP representation.
//!
//! Every failure leaving the application layer is an [`AppError`]. Store
//! errors are normalized by [`map_store_error`], which logs the full detail
//! and keeps it out of the response body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::domain::repositories::StoreError;

/// Fixed message returned for every integration failure.
const INTEGRATION_MESSAGE: &str = "Key-value store request failed";

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{message}")]
    Validation { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    #[error("{message}")]
    CapacityExceeded { message: String, details: Value },

    #[error("{message}")]
    ConcurrentModification { message: String, details: Value },

    #[error("{message}")]
    Integration { message: String, details: Value },

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

    pub fn capacity_exceeded(message: impl Into<String>, details: Value) -> Self {
        Self::CapacityExceeded {
            message: message.into(),
            details,
        }
    }

    pub fn concurrent_modification(message: impl Into<String>, details: Value) -> Self {
        Self::ConcurrentModification {
            message: message.into(),
            details,
        }
    }

    /// Opaque store failure. Callers never see the underlying cause.
    pub fn integration() -> Self {
        Self::Integration {
            message: INTEGRATION_MESSAGE.to_string(),
            details: json!({}),
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Returns `true` for optimistic-write conflicts, the only retryable kind.
    pub fn is_concurrent_modification(&self) -> bool {
        matches!(self, Self::ConcurrentModification { .. })
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::CapacityExceeded { .. } => StatusCode::INSUFFICIENT_STORAGE,
            AppError::ConcurrentModification { .. } => StatusCode::CONFLICT,
            AppError::Integration { .. } | AppError::Internal { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Converts the error into its serializable payload.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, message, details) = match self {
            AppError::Validation { message, details } => ("validation_error", message, details),
            AppError::NotFound { message, details } => ("not_found", message, details),
            AppError::CapacityExceeded { message, details } => {
                ("capacity_exceeded", message, details)
            }
            AppError::ConcurrentModification { message, details } => {
                ("concurrent_modification", message, details)
            }
            AppError::Integration { message, details } => ("integration_error", message, details),
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

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|field| field.to_string())
            .collect();
        AppError::bad_request("Invalid URL provided", json!({ "fields": fields }))
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        map_store_error("store", err)
    }
}

/// Normalizes a store error at the engine boundary.
///
/// Version conflicts become [`AppError::ConcurrentModification`] and foreign
/// cursors become [`AppError::Validation`]. Everything else collapses into
/// the opaque [`AppError::Integration`] after being logged.
pub fn map_store_error(operation: &'static str, err: StoreError) -> AppError {
    metrics::counter!("shortener_store_errors_total", "operation" => operation).increment(1);

    match err {
        StoreError::VersionConflict { expected, actual } => {
            tracing::warn!(operation, %expected, %actual, "Store version changed before write");
            AppError::concurrent_modification(
                "The store was modified concurrently, retry the request",
                json!({}),
            )
        }
        StoreError::InvalidCursor(reason) => {
            tracing::debug!(operation, %reason, "Rejected pagination token");
            AppError::bad_request("Invalid pagination token", json!({}))
        }
        other => {
            tracing::error!(operation, error = %other, "Key-value store operation failed");
            AppError::integration()
        }
    }
}
