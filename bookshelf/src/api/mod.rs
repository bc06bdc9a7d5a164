//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers
//! - **[`middleware`]**: Method filtering applied before path matching
//! - **[`models`]**: Request/response data structures
//!
//! The service exposes a single operation, `POST /books` (path configurable through
//! [`Config::books_path`](crate::Config)). Any other method answers 405 regardless of path; a
//! POST to any other path answers 404. Every response body is JSON.

pub mod handlers;
pub mod middleware;
pub mod models;
