//! HTTP request handlers.
//!
//! - [`books`]: book submission (parse, validate, persist)
//!
//! Handlers return [`crate::errors::Error`], which converts to the matching status code and a
//! JSON `{"error": ...}` body.

pub mod books;

use axum::http::Uri;

use crate::errors::Error;

/// Fallback for POST requests to unknown paths
pub async fn not_found(uri: Uri) -> Error {
    Error::NotFound {
        path: uri.path().to_string(),
    }
}
