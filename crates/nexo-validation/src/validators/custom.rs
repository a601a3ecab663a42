//! Custom validation functions and closures

use crate::error::{ValidationError, ValidationResult};
use crate::traits::{RuleContext, ValidationRule};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Type alias for sync validation functions
pub type SyncValidationFn = Arc<dyn Fn(&Value, &str) -> ValidationResult<()> + Send + Sync>;

/// Custom validator that accepts user-defined validation functions.
///
/// As a request-level rule it receives the whole input object under the
/// field name it was registered with.
#[derive(Clone)]
pub struct CustomValidator {
    /// Name/identifier for this custom validator
    pub name: String,
    validator: SyncValidationFn,
    /// Custom error message
    pub message: Option<String>,
}

impl CustomValidator {
    pub fn new<F>(name: impl Into<String>, validator: F) -> Self
    where
        F: Fn(&Value, &str) -> ValidationResult<()> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            validator: Arc::new(validator),
            message: None,
        }
    }

    /// Set custom error message
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Validator from a predicate; `message` is used on failure
    pub fn predicate<F>(name: impl Into<String>, message: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        let name = name.into();
        let code = name.clone();
        let message = message.into();
        Self::new(name, move |value, field| {
            if check(value) {
                Ok(())
            } else {
                Err(ValidationError::with_code(field, message.clone(), code.clone()).into())
            }
        })
    }
}

impl std::fmt::Debug for CustomValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomValidator")
            .field("name", &self.name)
            .field("message", &self.message)
            .finish()
    }
}

#[async_trait]
impl ValidationRule for CustomValidator {
    async fn validate(&self, value: &Value, field: &str, _ctx: &RuleContext<'_>) -> ValidationResult<()> {
        if value.is_null() {
            return Ok(());
        }

        match ((self.validator)(value, field), &self.message) {
            (Err(mut errors), Some(custom_message)) => {
                for field_errors in errors.errors.values_mut() {
                    for error in field_errors {
                        error.message = custom_message.clone();
                    }
                }
                Err(errors)
            }
            (result, _) => result,
        }
    }

    fn rule_name(&self) -> &'static str {
        "custom"
    }

    fn parameters(&self) -> Option<Value> {
        let mut params = serde_json::Map::new();
        params.insert("name".to_string(), Value::String(self.name.clone()));
        if let Some(ref message) = self.message {
            params.insert("message".to_string(), Value::String(message.clone()));
        }
        Some(Value::Object(params))
    }
}
