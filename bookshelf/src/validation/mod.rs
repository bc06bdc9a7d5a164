//! Payload validation for book submissions.
//!
//! Validation is split in two layers:
//!
//! - **Field validators** ([`validate_filename`], [`validate_contents`]) check one payload field
//!   each and return `Err` on the first violated constraint. On success they hand back the typed
//!   value ([`Filename`], [`ContentRecord`]) so nothing downstream has to look at raw JSON again.
//! - **[`validate`]** runs both field validators in order and folds the first error into a
//!   [`ValidationVerdict`]. Callers outside this module only ever see the verdict.
//!
//! Validation never accumulates errors: the filename is checked before the contents, and the
//! first failure across both is the one reported.

mod contents;
mod filename;

pub use contents::{ContentRecord, validate_contents};
pub use filename::{Filename, validate_filename};

use serde_json::Value;
use thiserror::Error;

/// A violated payload constraint, carrying the message reported to the client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The value has the wrong JSON type (or a number is not integral)
    #[error("{0}")]
    TypeMismatch(String),

    /// A number or string length falls outside its allowed bounds
    #[error("{0}")]
    RangeViolation(String),

    /// The value would escape the storage root
    #[error("{0}")]
    SecurityViolation(String),

    /// A required attribute is absent
    #[error("{0}")]
    MissingField(String),
}

/// A payload whose fields have both passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPayload {
    pub filename: Filename,
    pub record: ContentRecord,
}

/// Outcome of [`validate`].
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationVerdict {
    Valid(ValidatedPayload),
    Invalid { reason: String },
}

impl ValidationVerdict {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationVerdict::Valid(_))
    }
}

impl From<ValidationError> for ValidationVerdict {
    fn from(err: ValidationError) -> Self {
        ValidationVerdict::Invalid { reason: err.to_string() }
    }
}

/// Validate both payload fields, filename first.
///
/// `None` stands for a field missing from the payload.
pub fn validate(filename: Option<&Value>, contents: Option<&Value>) -> ValidationVerdict {
    let checked = validate_filename(filename).and_then(|filename| {
        let record = validate_contents(contents)?;
        Ok(ValidatedPayload { filename, record })
    });

    match checked {
        Ok(payload) => ValidationVerdict::Valid(payload),
        Err(err) => err.into(),
    }
}
