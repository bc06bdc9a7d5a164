//! HTTP handler for book submissions.

use axum::{Json, extract::State, extract::rejection::BytesRejection};
use bytes::Bytes;
use std::time::Duration;

use crate::AppState;
use crate::api::models::books::{BookCreatedResponse, ParsedPayload};
use crate::errors::{Error, ErrorResponse, Result};
use crate::store::{RecordCreated, RecordStore, StoreError};
use crate::validation::{ContentRecord, Filename, ValidatedPayload, ValidationVerdict, validate};

#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    summary = "Submit book",
    description = "Validate a book submission and store its body under `filename`.",
    request_body(content = crate::api::models::books::BookSubmission, content_type = "application/json"),
    responses(
        (status = 200, description = "Record created", body = BookCreatedResponse),
        (status = 400, description = "Malformed JSON or invalid parameters", body = ErrorResponse),
        (status = 413, description = "Request body too large", body = ErrorResponse),
        (status = 500, description = "Record could not be stored", body = ErrorResponse),
    )
)]
#[tracing::instrument(skip_all, fields(filename = tracing::field::Empty))]
pub async fn create_book(
    State(state): State<AppState>,
    body: std::result::Result<Bytes, BytesRejection>,
) -> Result<Json<BookCreatedResponse>> {
    let body = body.map_err(|rejection| Error::from_body_rejection(rejection, state.config.max_body_size))?;

    let payload = ParsedPayload::parse(&body)?;

    let ValidatedPayload { filename, record } = match validate(payload.filename.as_ref(), payload.contents.as_ref()) {
        ValidationVerdict::Valid(valid) => valid,
        ValidationVerdict::Invalid { reason } => {
            tracing::debug!(reason = %reason, "Book submission failed validation");
            let reason = state.config.expose_validation_reasons.then_some(reason);
            return Err(Error::InvalidParameters { reason });
        }
    };
    tracing::Span::current().record("filename", filename.as_str());

    let created = persist(state.store.as_ref(), &filename, &record, state.config.store_timeout).await?;

    tracing::info!(filename = %filename, "Book record created");
    Ok(Json(BookCreatedResponse { message: created.message }))
}

/// Await a single store write, giving up after `timeout`
async fn persist(
    store: &dyn RecordStore,
    filename: &Filename,
    record: &ContentRecord,
    timeout: Duration,
) -> std::result::Result<RecordCreated, StoreError> {
    match tokio::time::timeout(timeout, store.create(filename, record)).await {
        Ok(outcome) => outcome,
        Err(_) => Err(StoreError::TimedOut { after: timeout }),
    }
}

#[cfg(test)]
mod tests {
    use crate::store::InMemoryRecordStore;
    use crate::test_utils::{FailingRecordStore, SlowRecordStore, create_test_app, create_test_config};
    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use std::time::Duration;

    fn valid_contents() -> Value {
        json!({ "name": "woo", "age": 4, "body": "wogp90r8y" })
    }

    #[test_log::test(tokio::test)]
    async fn test_valid_payload_creates_record() {
        let store = Arc::new(InMemoryRecordStore::new());
        let server = create_test_app(create_test_config(), store.clone());

        let response = server
            .post("/books")
            .json(&json!({ "filename": "foo.md", "contents": valid_contents() }))
            .await;

        response.assert_status(StatusCode::OK);
        response.assert_json(&json!({ "message": "record created at foo.md" }));
        assert_eq!(response.header("content-type"), "application/json");

        let record = store.get("foo.md").expect("record should be stored");
        assert_eq!(record.body(), "wogp90r8y");
    }

    #[tokio::test]
    async fn test_unparseable_body_is_bad_request() {
        let store = Arc::new(InMemoryRecordStore::new());
        let server = create_test_app(create_test_config(), store.clone());

        for body in ["f209t8429", "", "null", "{\"filename\": \"foo.md\""] {
            let response = server.post("/books").text(body).await;

            response.assert_status(StatusCode::BAD_REQUEST);
            response.assert_json(&json!({ "error": "Invalid JSON" }));
        }
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_non_object_json_fails_validation() {
        let server = create_test_app(create_test_config(), Arc::new(InMemoryRecordStore::new()));

        for body in [json!([]), json!(42), json!("foo.md")] {
            let response = server.post("/books").json(&body).await;

            response.assert_status(StatusCode::BAD_REQUEST);
            response.assert_json(&json!({ "error": "Invalid parameters: Filename must be a string" }));
        }
    }

    #[tokio::test]
    async fn test_directory_traversal_rejected() {
        let store = Arc::new(InMemoryRecordStore::new());
        let server = create_test_app(create_test_config(), store.clone());

        let response = server
            .post("/books")
            .json(&json!({ "filename": "../.git", "contents": valid_contents() }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "error": "Invalid parameters: Directory traversal not permitted" }));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_age_out_of_range_rejected() {
        let server = create_test_app(create_test_config(), Arc::new(InMemoryRecordStore::new()));

        let response = server
            .post("/books")
            .json(&json!({ "filename": "foo.md", "contents": { "name": "woo", "age": 100, "body": "x" } }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "error": "Invalid parameters: Contents property age above maximum" }));
    }

    #[tokio::test]
    async fn test_invalid_payloads() {
        let server = create_test_app(create_test_config(), Arc::new(InMemoryRecordStore::new()));

        let cases = [
            (json!({ "filename": "grht24t", "contents": [] }), "Contents must be a plain object"),
            (json!({ "filename": "grht24t", "contents": null }), "Contents must be a plain object"),
            (
                json!({ "filename": "grht24t", "contents": { "name": "gr4t", "age": "fe", "body": "wegrht" } }),
                "Contents property age wrong type",
            ),
            (json!({ "filename": 35, "contents": valid_contents() }), "Filename must be a string"),
            (
                json!({ "filename": "foo.md", "contents": { "name": "woo", "age": 1, "body": "x" } }),
                "Contents property age below minimum",
            ),
            (
                json!({ "filename": "foo.md", "contents": { "name": "woo", "age": 10.5, "body": "x" } }),
                "Age 10.5 is not an integer",
            ),
            (
                json!({ "filename": "foo.md", "contents": { "name": "", "age": 4, "body": "x" } }),
                "Contents property name below minimum",
            ),
            (
                json!({ "filename": "foo.md", "contents": { "name": "qfeght", "body": "", "age": 10 } }),
                "Contents property body below minimum",
            ),
            (json!({ "filename": "foo.md", "contents": { "age": 2 } }), "Contents missing property name"),
            (
                json!({ "filename": "dqfmoeg90r89yhu0we8hf029eh9w7gf7qetr8f07gq9e0hg", "contents": valid_contents() }),
                "Filename too long",
            ),
        ];

        for (payload, reason) in cases {
            let response = server.post("/books").json(&payload).await;

            response.assert_status(StatusCode::BAD_REQUEST);
            let body: Value = response.json();
            assert_eq!(body["error"], format!("Invalid parameters: {reason}"), "payload: {payload}");
        }
    }

    #[tokio::test]
    async fn test_validation_reasons_can_be_hidden() {
        let mut config = create_test_config();
        config.expose_validation_reasons = false;
        let server = create_test_app(config, Arc::new(InMemoryRecordStore::new()));

        let response = server
            .post("/books")
            .json(&json!({ "filename": "../.git", "contents": valid_contents() }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "error": "Invalid parameters" }));
    }

    #[test_log::test(tokio::test)]
    async fn test_store_failure_is_internal_error() {
        let server = create_test_app(create_test_config(), Arc::new(FailingRecordStore));

        let response = server
            .post("/books")
            .json(&json!({ "filename": "foo.md", "contents": valid_contents() }))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_json(&json!({ "error": "Internal Error" }));
    }

    #[tokio::test]
    async fn test_slow_store_times_out() {
        let mut config = create_test_config();
        config.store_timeout = Duration::from_millis(20);
        let server = create_test_app(config, Arc::new(SlowRecordStore::new(Duration::from_secs(5))));

        let response = server
            .post("/books")
            .json(&json!({ "filename": "foo.md", "contents": valid_contents() }))
            .await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_json(&json!({ "error": "Internal Error" }));
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let mut config = create_test_config();
        config.max_body_size = 64;
        let server = create_test_app(config, Arc::new(InMemoryRecordStore::new()));

        let response = server
            .post("/books")
            .json(&json!({ "filename": "foo.md", "contents": { "name": "woo", "age": 4, "body": "a".repeat(200) } }))
            .await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        response.assert_json(&json!({ "error": "Payload Too Large" }));
    }

    #[tokio::test]
    async fn test_wrong_method_and_path() {
        let server = create_test_app(create_test_config(), Arc::new(InMemoryRecordStore::new()));

        for path in ["/", "/books", "/anything/else"] {
            let response = server.get(path).await;
            response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
            response.assert_json(&json!({ "error": "Method Not Allowed" }));
        }

        let response = server.put("/books").json(&json!({})).await;
        response.assert_status(StatusCode::METHOD_NOT_ALLOWED);

        for path in ["/", "/book", "/books/extra"] {
            let response = server.post(path).json(&json!({})).await;
            response.assert_status(StatusCode::NOT_FOUND);
            response.assert_json(&json!({ "error": "Not Found" }));
        }
    }

    #[tokio::test]
    async fn test_configured_books_path() {
        let mut config = create_test_config();
        config.books_path = "/api/v1/books".to_string();
        let server = create_test_app(config, Arc::new(InMemoryRecordStore::new()));

        server
            .post("/books")
            .json(&json!({ "filename": "foo.md", "contents": valid_contents() }))
            .await
            .assert_status(StatusCode::NOT_FOUND);

        server
            .post("/api/v1/books")
            .json(&json!({ "filename": "foo.md", "contents": valid_contents() }))
            .await
            .assert_status(StatusCode::OK);
    }
}
