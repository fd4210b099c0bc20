//! Input validation errors.
//!
//! Field-level messages are collected into a single error so a form can show
//! every problem inline at once.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use validator::{Validate, ValidationErrors};

/// Validation failure for a user-supplied payload, keyed by field name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct InputError {
    pub fields: BTreeMap<String, Vec<String>>,
}

impl InputError {
    /// Error for a single field.
    pub fn field(name: impl Into<String>, message: impl Into<String>) -> Self {
        let mut err = Self::default();
        err.push(name, message);
        err
    }

    /// Add a message for a field.
    pub fn push(&mut self, name: impl Into<String>, message: impl Into<String>) {
        self.fields
            .entry(name.into())
            .or_default()
            .push(message.into());
    }

    /// Merge another error into this one.
    pub fn merge(&mut self, other: InputError) {
        for (name, messages) in other.fields {
            self.fields.entry(name).or_default().extend(messages);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// First message recorded for a field.
    pub fn message_for(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(|m| m.first())
            .map(String::as_str)
    }
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .fields
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join(", ")))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for InputError {}

impl From<ValidationErrors> for InputError {
    fn from(errors: ValidationErrors) -> Self {
        let mut out = InputError::default();
        for (field, list) in errors.field_errors() {
            for e in list.iter() {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                out.push(field.to_string(), message);
            }
        }
        out
    }
}

/// Run derive-based validation and convert the result.
pub fn validate_input<T: Validate>(input: &T) -> Result<(), InputError> {
    input.validate().map_err(InputError::from)
}
