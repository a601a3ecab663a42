//! Validation error types and handling

use std::collections::BTreeMap;
use std::fmt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub type ValidationResult<T> = Result<T, ValidationErrors>;

/// Individual validation error for a specific field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationError {
    /// The field that failed validation (concrete path, e.g. `tags.2`)
    pub field: String,
    /// Human-readable error message
    pub message: String,
    /// Rule code, e.g. `required` or `max.string`
    pub code: String,
    /// Message placeholders such as `min`, `max` or `other`
    pub context: Option<Value>,
}

impl ValidationError {
    /// Create a new validation error
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: "validation_failed".to_string(),
            context: None,
        }
    }

    /// Create a validation error with a specific code
    pub fn with_code(field: impl Into<String>, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: code.into(),
            context: None,
        }
    }

    /// Set the error code
    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    /// Set the placeholder context
    pub fn context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self
    }

    /// Rule name without the size suffix (`max.string` -> `max`)
    pub fn rule(&self) -> &str {
        self.code.split('.').next().unwrap_or(&self.code)
    }

    /// Look up a single placeholder value
    pub fn param(&self, key: &str) -> Option<&Value> {
        self.context.as_ref().and_then(|ctx| ctx.get(key))
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Collection of validation errors keyed by field.
///
/// Fields are kept sorted so that API responses and logs are stable.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Error, PartialEq)]
pub struct ValidationErrors {
    pub errors: BTreeMap<String, Vec<ValidationError>>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single validation error
    pub fn add(&mut self, error: ValidationError) {
        self.errors
            .entry(error.field.clone())
            .or_default()
            .push(error);
    }

    /// Add a plain message for a field, as cross-field hooks do
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.add(ValidationError::new(field.into(), message));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of fields with errors
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Total number of errors across all fields
    pub fn total_errors(&self) -> usize {
        self.errors.values().map(|v| v.len()).sum()
    }

    pub fn get_field_errors(&self, field: &str) -> Option<&Vec<ValidationError>> {
        self.errors.get(field)
    }

    pub fn has_field_errors(&self, field: &str) -> bool {
        self.errors.get(field).is_some_and(|errors| !errors.is_empty())
    }

    /// First message recorded for a field
    pub fn first(&self, field: &str) -> Option<&str> {
        self.errors
            .get(field)
            .and_then(|errors| errors.first())
            .map(|error| error.message.as_str())
    }

    /// Field names that failed, in sorted order
    pub fn fields(&self) -> Vec<&str> {
        self.errors.keys().map(String::as_str).collect()
    }

    /// Merge another error bag into this one
    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, errors) in other.errors {
            self.errors.entry(field).or_default().extend(errors);
        }
    }

    pub fn from_error(error: ValidationError) -> Self {
        let mut errors = Self::new();
        errors.add(error);
        errors
    }

    /// Field -> messages, the shape returned to API clients
    pub fn messages(&self) -> BTreeMap<String, Vec<String>> {
        self.errors
            .iter()
            .map(|(field, errors)| {
                (
                    field.clone(),
                    errors.iter().map(|e| e.message.clone()).collect(),
                )
            })
            .collect()
    }

    /// Convert to the JSON body of a 422 response
    pub fn to_json(&self) -> Value {
        let first = self
            .errors
            .values()
            .flatten()
            .next()
            .map(|e| e.message.clone())
            .unwrap_or_else(|| "Los datos proporcionados no son válidos.".to_string());
        let extra = self.total_errors().saturating_sub(1);
        let message = match extra {
            0 => first,
            1 => format!("{} (y 1 error más)", first),
            n => format!("{} (y {} errores más)", first, n),
        };

        serde_json::json!({
            "message": message,
            "errors": self.messages(),
        })
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            write!(f, "No validation errors")
        } else {
            write!(f, "Validation failed for {} field(s):", self.errors.len())?;
            for (field, field_errors) in &self.errors {
                for error in field_errors {
                    write!(f, "\n  {}: {}", field, error.message)?;
                }
            }
            Ok(())
        }
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self::from_error(error)
    }
}

/// A rule declaration that could not be turned into a validator
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RuleParseError {
    #[error("unknown validation rule '{rule}' on field '{field}'")]
    UnknownRule { field: String, rule: String },

    #[error("rule '{rule}' on field '{field}' expects {expected}")]
    InvalidArguments {
        field: String,
        rule: String,
        expected: String,
    },

    #[error("invalid pattern on field '{field}': {message}")]
    InvalidPattern { field: String, message: String },
}
