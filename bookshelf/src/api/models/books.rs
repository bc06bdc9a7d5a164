use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::errors::Error;

/// Request body decoded into untyped fields, before validation.
///
/// A field is `None` when the key is absent, or when the body is valid JSON but not an object
/// (an array, a number, ...): validation then reports it like any other missing field.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParsedPayload {
    pub filename: Option<Value>,
    pub contents: Option<Value>,
}

impl ParsedPayload {
    /// Decode a raw request body. Malformed JSON and a bare `null` are both [`Error::InvalidJson`].
    pub fn parse(raw: &[u8]) -> Result<Self, Error> {
        let value: Value = serde_json::from_slice(raw).map_err(|e| {
            tracing::debug!("Request body is not valid JSON: {}", e);
            Error::InvalidJson
        })?;

        match value {
            Value::Null => Err(Error::InvalidJson),
            Value::Object(mut fields) => Ok(Self {
                filename: fields.remove("filename"),
                contents: fields.remove("contents"),
            }),
            _ => Ok(Self::default()),
        }
    }
}

/// Book submission, as documented in the OpenAPI schema
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookSubmission {
    /// Name of the stored record; no `..` allowed
    #[schema(max_length = 30, example = "foo.md")]
    pub filename: String,
    pub contents: BookContents,
}

/// Book contents
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookContents {
    #[schema(min_length = 1, max_length = 30, example = "woo")]
    pub name: String,
    #[schema(minimum = 2, maximum = 20, example = 4)]
    pub age: u8,
    /// Text written to the record file
    #[schema(min_length = 1, max_length = 10000)]
    pub body: String,
}

/// Response for a stored record
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BookCreatedResponse {
    #[schema(example = "record created at foo.md")]
    pub message: String,
}
