// API errors - validation, not-found and store failures mapped to HTTP responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::db::StoreError;
use crate::resource::{Operation, ResourceKind};

/// Everything a handler can fail with
#[derive(Debug, Error)]
pub enum ApiError {
    /// Required field missing or empty; the store is never touched
    #[error("{0}")]
    Validation(String),

    /// The targeted id does not exist
    #[error("{0}")]
    NotFound(String),

    /// Any failure from the store
    #[error("{context} {source}")]
    Store {
        context: String,
        #[source]
        source: StoreError,
        /// Omit `source` from the response body
        redact: bool,
    },
}

impl ApiError {
    pub fn store(kind: ResourceKind, op: Operation, source: StoreError, redact: bool) -> Self {
        error!(resource = %kind, operation = %op, error = %source, "store operation failed");
        ApiError::Store {
            context: kind.store_failure(op),
            source,
            redact,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Store { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Text sent to the client
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Store {
                context,
                redact: true,
                ..
            } => context.clone(),
            other => other.to_string(),
        }
    }
}

/// Body of every failure response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Body of successful update/delete responses
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorBody {
            error: self.public_message(),
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
