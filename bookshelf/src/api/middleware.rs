use axum::{
    extract::Request,
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::errors::Error;

/// Reject every non-POST request with 405, whatever the path.
///
/// Applied as a router layer so it also wraps the fallback: the method check always runs before
/// the path is considered.
pub async fn require_post(request: Request, next: Next) -> Response {
    if request.method() != Method::POST {
        return Error::MethodNotAllowed {
            method: request.method().clone(),
        }
        .into_response();
    }

    next.run(request).await
}
