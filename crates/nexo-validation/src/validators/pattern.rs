//! Regular expression rules (`regex:/.../flags`)

use crate::error::{RuleParseError, ValidationError, ValidationResult};
use crate::lang;
use crate::traits::{RuleContext, ValidationRule};
use async_trait::async_trait;
use regex::Regex;
use serde_json::{json, Value};

/// Validator for regular expression patterns
#[derive(Debug, Clone)]
pub struct PatternValidator {
    pattern: Regex,
    /// Custom error message
    pub message: Option<String>,
}

impl PatternValidator {
    /// Create a validator from a bare pattern (no delimiters)
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            message: None,
        })
    }

    /// Parse the delimited form used in rule strings: `/^[A-Z]\d+$/i`
    pub fn from_delimited(field: &str, source: &str) -> Result<Self, RuleParseError> {
        let invalid = |message: String| RuleParseError::InvalidPattern {
            field: field.to_string(),
            message,
        };

        let delimiter = source
            .chars()
            .next()
            .ok_or_else(|| invalid("empty pattern".to_string()))?;
        let end = source
            .rfind(delimiter)
            .filter(|&end| end > 0)
            .ok_or_else(|| invalid(format!("pattern {} is not delimited", source)))?;

        let body = &source[delimiter.len_utf8()..end];
        let flags = &source[end + delimiter.len_utf8()..];

        let mut inline = String::new();
        for flag in flags.chars() {
            match flag {
                'i' | 'm' | 's' | 'x' => inline.push(flag),
                // PCRE's unicode flag is the default here
                'u' => {}
                other => return Err(invalid(format!("unsupported flag '{}'", other))),
            }
        }

        let pattern = if inline.is_empty() {
            body.to_string()
        } else {
            format!("(?{}){}", inline, body)
        };

        Self::new(&pattern).map_err(|e| invalid(e.to_string()))
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn pattern_string(&self) -> &str {
        self.pattern.as_str()
    }
}

#[async_trait]
impl ValidationRule for PatternValidator {
    async fn validate(&self, value: &Value, field: &str, _ctx: &RuleContext<'_>) -> ValidationResult<()> {
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return Err(lang::error(field, "regex", Value::Null).into()),
        };

        if self.pattern.is_match(&text) {
            return Ok(());
        }

        match &self.message {
            Some(message) => Err(ValidationError::with_code(field, message.clone(), "regex").into()),
            None => Err(lang::error(field, "regex", Value::Null).into()),
        }
    }

    fn rule_name(&self) -> &'static str {
        "regex"
    }

    fn parameters(&self) -> Option<Value> {
        Some(json!({ "pattern": self.pattern.as_str() }))
    }
}
