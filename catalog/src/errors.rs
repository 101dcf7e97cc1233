use crate::db::errors::DbError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;
use utoipa::ToSchema;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Invalid request data. Carries a single message naming the violated rule.
    #[error("{message}")]
    BadRequest { message: String },

    /// Requested resource (or any match for a search) not found
    #[error("{message}")]
    NotFound { message: String },

    /// Storage failure. The client only ever sees the fixed, operation-specific message.
    #[error("Failed to {operation}")]
    Storage {
        operation: &'static str,
        #[source]
        source: DbError,
    },
}

/// JSON body of every error response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human readable description of what went wrong
    pub error: String,
}

impl Error {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Error::BadRequest { message: message.into() }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Error::NotFound { message: message.into() }
    }

    /// Returns a mapper for use with `map_err` that tags a storage failure with the operation
    /// being performed.
    pub fn storage(operation: &'static str) -> impl FnOnce(DbError) -> Self {
        move |source| Error::Storage { operation, source }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking internal implementation details
    pub fn user_message(&self) -> String {
        // Display for Storage deliberately omits the source
        self.to_string()
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        match &self {
            Error::Storage { operation, source } => {
                tracing::error!(operation = %operation, "Storage error: {:#}", source);
            }
            Error::BadRequest { .. } | Error::NotFound { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let body = ErrorResponse {
            error: self.user_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

/// Type alias for service operation results
pub type Result<T> = std::result::Result<T, Error>;
