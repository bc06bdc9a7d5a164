//! OpenAPI documentation for the books API.
//!
//! The service has no GET routes, so the document is not served; `bookshelf --print-openapi`
//! writes it to stdout.

use utoipa::OpenApi;

use crate::api::models::books::{BookContents, BookCreatedResponse, BookSubmission};
use crate::errors::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "bookshelf",
        description = "Validate book submissions and store them as records."
    ),
    paths(crate::api::handlers::books::create_book),
    components(schemas(BookSubmission, BookContents, BookCreatedResponse, ErrorResponse)),
    tags((name = "books", description = "Book submissions"))
)]
pub struct ApiDoc;
