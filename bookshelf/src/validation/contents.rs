use serde::Serialize;
use serde_json::{Map, Value};

use super::ValidationError;

/// JSON type an attribute must have
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    String,
    Number,
}

impl FieldKind {
    fn matches(self, value: &Value) -> bool {
        match self {
            FieldKind::String => value.is_string(),
            FieldKind::Number => value.is_number(),
        }
    }

    /// The quantity bounds apply to: the value itself for numbers, the length for strings.
    fn measure(self, value: &Value) -> Option<f64> {
        match self {
            FieldKind::String => value.as_str().map(|s| s.chars().count() as f64),
            FieldKind::Number => value.as_f64(),
        }
    }
}

/// One row of the contents constraint table. Bounds are inclusive.
#[derive(Debug)]
struct FieldConstraint {
    attr: &'static str,
    kind: FieldKind,
    min: Option<f64>,
    max: Option<f64>,
}

/// Checked in this order; the first violation wins.
const CONSTRAINTS: &[FieldConstraint] = &[
    FieldConstraint {
        attr: "name",
        kind: FieldKind::String,
        min: Some(1.0),
        max: Some(30.0),
    },
    FieldConstraint {
        attr: "age",
        kind: FieldKind::Number,
        min: Some(2.0),
        max: Some(20.0),
    },
    FieldConstraint {
        attr: "body",
        kind: FieldKind::String,
        min: Some(1.0),
        max: Some(10_000.0),
    },
];

impl FieldConstraint {
    fn check(&self, object: &Map<String, Value>) -> Result<(), ValidationError> {
        let attr = self.attr;

        let Some(value) = object.get(attr) else {
            return Err(ValidationError::MissingField(format!("Contents missing property {attr}")));
        };

        if !self.kind.matches(value) {
            return Err(wrong_type(attr));
        }
        let measured = self.kind.measure(value).ok_or_else(|| wrong_type(attr))?;

        if self.min.is_some_and(|min| measured < min) {
            return Err(ValidationError::RangeViolation(format!(
                "Contents property {attr} below minimum"
            )));
        }

        if self.max.is_some_and(|max| measured > max) {
            return Err(ValidationError::RangeViolation(format!(
                "Contents property {attr} above maximum"
            )));
        }

        Ok(())
    }
}

fn wrong_type(attr: &str) -> ValidationError {
    ValidationError::TypeMismatch(format!("Contents property {attr} wrong type"))
}

/// Validated book contents.
///
/// Only [`validate_contents`] builds one, so every instance satisfies the constraint table and
/// carries an integral age.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentRecord {
    name: String,
    age: u8,
    body: String,
}

impl ContentRecord {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> u8 {
        self.age
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Validate the `contents` field of a payload.
///
/// The value must be a JSON object (not null, not an array). Each row of the constraint table is
/// then checked for presence, type, lower bound and upper bound, and finally `age` must be a whole
/// number. Returns the first violation found.
pub fn validate_contents(input: Option<&Value>) -> Result<ContentRecord, ValidationError> {
    let Some(Value::Object(object)) = input else {
        return Err(ValidationError::TypeMismatch("Contents must be a plain object".to_string()));
    };

    for constraint in CONSTRAINTS {
        constraint.check(object)?;
    }

    let age = object.get("age").ok_or_else(|| wrong_type("age"))?;
    let age_value = age.as_f64().ok_or_else(|| wrong_type("age"))?;
    if age_value.fract() != 0.0 {
        return Err(ValidationError::TypeMismatch(format!("Age {age} is not an integer")));
    }

    Ok(ContentRecord {
        name: string_attr(object, "name")?,
        // In range and integral, checked above
        age: age_value as u8,
        body: string_attr(object, "body")?,
    })
}

fn string_attr(object: &Map<String, Value>, attr: &str) -> Result<String, ValidationError> {
    object
        .get(attr)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| wrong_type(attr))
}
