//! Email format validator

use crate::error::{ValidationError, ValidationResult};
use crate::lang;
use crate::traits::{RuleContext, ValidationRule};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

// ASCII local part, dotted domain with a TLD of two letters or more
static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9]([a-zA-Z0-9._%+-]*[a-zA-Z0-9])?@[a-zA-Z0-9]([a-zA-Z0-9.-]*[a-zA-Z0-9])?\.[a-zA-Z]{2,}$",
    )
    .expect("email pattern is valid")
});

/// Validator for email address format
#[derive(Debug, Clone, Default)]
pub struct EmailValidator {
    /// Custom error message
    pub message: Option<String>,
}

impl EmailValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom error message
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn is_valid(email: &str) -> bool {
        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };

        // RFC 5321 limits
        if local.len() > 64 || domain.len() > 253 {
            return false;
        }
        if local.contains("..") || domain.contains("..") {
            return false;
        }

        EMAIL.is_match(email)
    }
}

#[async_trait]
impl ValidationRule for EmailValidator {
    async fn validate(&self, value: &Value, field: &str, _ctx: &RuleContext<'_>) -> ValidationResult<()> {
        if value.as_str().is_some_and(Self::is_valid) {
            return Ok(());
        }

        match &self.message {
            Some(message) => Err(ValidationError::with_code(field, message.clone(), "email").into()),
            None => Err(lang::error(field, "email", Value::Null).into()),
        }
    }

    fn rule_name(&self) -> &'static str {
        "email"
    }
}
