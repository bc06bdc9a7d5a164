use crate::store::StoreError;
use axum::{
    Json,
    extract::rejection::BytesRejection,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;
use utoipa::ToSchema;

#[derive(ThisError, Debug)]
pub enum Error {
    /// Request body is not well-formed JSON (or is JSON `null`)
    #[error("Invalid JSON")]
    InvalidJson,

    /// Payload parsed but failed validation; `None` when reasons are not exposed
    #[error("Invalid parameters{}", reason_suffix(.reason))]
    InvalidParameters { reason: Option<String> },

    /// Request body exceeds the configured limit
    #[error("Request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// Only POST is served
    #[error("Method {method} not allowed")]
    MethodNotAllowed { method: Method },

    /// No route for the requested path
    #[error("No route for {path}")]
    NotFound { path: String },

    /// Record store failure; the cause is logged, never returned
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },
}

fn reason_suffix(reason: &Option<String>) -> String {
    reason.as_deref().map(|r| format!(": {r}")).unwrap_or_default()
}

/// JSON body of every error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidJson | Error::InvalidParameters { .. } => StatusCode::BAD_REQUEST,
            Error::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Error::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Store(_) | Error::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns a user-safe error message, without leaking storage details
    pub fn user_message(&self) -> String {
        match self {
            Error::InvalidJson | Error::InvalidParameters { .. } => self.to_string(),
            Error::PayloadTooLarge { .. } => "Payload Too Large".to_string(),
            Error::MethodNotAllowed { .. } => "Method Not Allowed".to_string(),
            Error::NotFound { .. } => "Not Found".to_string(),
            Error::Store(_) | Error::Internal { .. } => "Internal Error".to_string(),
        }
    }

    /// Map a body extraction failure, keeping the size limit visible to the client
    pub fn from_body_rejection(rejection: BytesRejection, limit: usize) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Error::PayloadTooLarge { limit }
        } else {
            tracing::debug!("Failed to read request body: {}", rejection.body_text());
            Error::InvalidJson
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match &self {
            Error::Store(_) | Error::Internal { .. } => {
                tracing::error!("Internal service error: {:#}", self);
            }
            Error::PayloadTooLarge { .. } => {
                tracing::warn!("Rejected request: {}", self);
            }
            Error::InvalidJson | Error::InvalidParameters { .. } | Error::MethodNotAllowed { .. } | Error::NotFound { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let body = ErrorResponse {
            error: self.user_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

/// Type alias for handler results
pub type Result<T> = std::result::Result<T, Error>;
