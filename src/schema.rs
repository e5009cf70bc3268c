//! Response-body contracts.
//!
//! A [`Schema`] accepts a parsed JSON value silently or reports the first
//! mismatch as a [`SchemaViolation`]. [`JsonSchema`] compiles a JSON Schema
//! document with the `jsonschema` crate; any closure with the right
//! signature works as a schema too.

use std::fmt;

use serde_json::Value;

use crate::{Result, VerifyError};

/// First mismatch found while validating a body.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{path}: {message}")]
pub struct SchemaViolation {
    /// JSON pointer to the mismatch, e.g. `/tags/0/name`.
    pub path: String,
    pub message: String,
}

impl SchemaViolation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Validator contract for response bodies.
pub trait Schema {
    fn validate(&self, value: &Value) -> std::result::Result<(), SchemaViolation>;
}

impl<F> Schema for F
where
    F: Fn(&Value) -> std::result::Result<(), SchemaViolation>,
{
    fn validate(&self, value: &Value) -> std::result::Result<(), SchemaViolation> {
        self(value)
    }
}

impl Schema for jsonschema::Validator {
    fn validate(&self, value: &Value) -> std::result::Result<(), SchemaViolation> {
        match self.iter_errors(value).next() {
            None => Ok(()),
            Some(error) => Err(SchemaViolation::new(
                pointer(error.instance_path.to_string()),
                error.to_string(),
            )),
        }
    }
}

/// A compiled JSON Schema document.
pub struct JsonSchema {
    document: Value,
    validator: jsonschema::Validator,
}

impl JsonSchema {
    /// Compiles `document`; a malformed schema is a configuration error.
    pub fn new(document: Value) -> Result<Self> {
        let validator = jsonschema::validator_for(&document)
            .map_err(|err| VerifyError::Config(format!("invalid JSON schema: {err}")))?;
        Ok(Self {
            document,
            validator,
        })
    }

    /// Schema accepting every JSON value.
    pub fn any() -> Result<Self> {
        Self::new(Value::Bool(true))
    }

    pub fn document(&self) -> &Value {
        &self.document
    }
}

impl fmt::Debug for JsonSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSchema")
            .field("document", &self.document)
            .finish_non_exhaustive()
    }
}

impl Schema for JsonSchema {
    fn validate(&self, value: &Value) -> std::result::Result<(), SchemaViolation> {
        Schema::validate(&self.validator, value)
    }
}

// `jsonschema` renders the root as an empty pointer.
fn pointer(location: String) -> String {
    if location.is_empty() {
        "/".to_owned()
    } else {
        location
    }
}
