//! API error types with `{ "error": "<message>" }` JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::db::DatabaseError;
use crate::validation::ValidationError;

pub const MSG_ID_REQUIRED: &str = "ID parameter is required";
pub const MSG_NOT_FOUND: &str = "Test not found";

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Storage operation a handler was performing when the store failed.
///
/// Picks the generic message shown to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
    Fetch,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Create => "create",
            Operation::Fetch => "fetch",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            Operation::List | Operation::Create => "Something went wrong",
            Operation::Fetch => "Failed to fetch test",
            Operation::Update => "Failed to update test",
            Operation::Delete => "Failed to delete test",
        }
    }
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Diagnostic test not found")]
    NotFound,
    #[error("Storage failure during {}: {source}", .operation.as_str())]
    Storage {
        operation: Operation,
        source: DatabaseError,
    },
}

impl ApiError {
    /// Classify a store failure: an unknown id is a 404, anything else a 500.
    pub fn from_store(operation: Operation, err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { .. } => ApiError::NotFound,
            source => ApiError::Storage { operation, source },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail.clone()),
            ApiError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::NotFound => (StatusCode::NOT_FOUND, MSG_NOT_FOUND.to_string()),
            ApiError::Storage { operation, source } => {
                tracing::error!(
                    operation = operation.as_str(),
                    error = %source,
                    "Record store failure"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    operation.failure_message().to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
