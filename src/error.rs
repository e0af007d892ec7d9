//! Error types for the registry
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Registry Error Enum ==
/// Unified error type for the registry and its HTTP gateway.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No live entry exists for the key
    #[error("There is no entry with key '{0}'")]
    NotFound(String),

    /// A live entry already exists for the key
    #[error("Entry with key '{0}' already exists")]
    AlreadyExists(String),

    /// Nested sequence access outside `[0, len)`
    #[error("Index {index} out of range for entry '{key}' of length {len}")]
    IndexOutOfRange { key: String, index: i64, len: usize },

    /// Index access on a value that is not a sequence
    #[error("Stored value at '{0}' is not a sequence")]
    NotASequence(String),

    /// Sub-key access on a value that is not a mapping
    #[error("Stored value at '{0}' is not a mapping")]
    NotAMapping(String),

    /// Payload did not decode into any supported value shape
    #[error("Entity is unprocessable: {0}")]
    Unprocessable(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl RegistryError {
    /// HTTP status the gateway answers with for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
            RegistryError::AlreadyExists(_) => StatusCode::CONFLICT,
            RegistryError::IndexOutOfRange { .. }
            | RegistryError::NotASequence(_)
            | RegistryError::NotAMapping(_)
            | RegistryError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            RegistryError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for RegistryError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the registry.
pub type Result<T> = std::result::Result<T, RegistryError>;
