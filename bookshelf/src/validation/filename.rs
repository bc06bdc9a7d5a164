use serde::Serialize;
use serde_json::Value;
use std::borrow::Borrow;
use std::fmt;

use super::ValidationError;

/// Maximum filename length, in characters
pub const MAX_FILENAME_LEN: usize = 30;

/// A filename that passed [`validate_filename`]: at most 30 characters, no `..` anywhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Filename(String);

impl Filename {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Filename {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Filename {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Filename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validate the `filename` field of a payload.
///
/// Checks run in order (type, length, traversal) and the first failure is returned.
pub fn validate_filename(input: Option<&Value>) -> Result<Filename, ValidationError> {
    let Some(Value::String(filename)) = input else {
        return Err(ValidationError::TypeMismatch("Filename must be a string".to_string()));
    };

    if filename.chars().count() > MAX_FILENAME_LEN {
        return Err(ValidationError::RangeViolation("Filename too long".to_string()));
    }

    if filename.contains("..") {
        return Err(ValidationError::SecurityViolation(
            "Directory traversal not permitted".to_string(),
        ));
    }

    Ok(Filename(filename.clone()))
}
