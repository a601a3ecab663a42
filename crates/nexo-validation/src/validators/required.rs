//! Presence rules: `required` and its conditional variants, `accepted`

use crate::data::{get_path, is_empty_value, loosely_equals};
use crate::error::{ValidationError, ValidationResult};
use crate::lang;
use crate::traits::{RuleContext, ValidationRule};
use async_trait::async_trait;
use serde_json::{json, Value};

/// Validator that ensures a field is present and not empty
#[derive(Debug, Clone, Default)]
pub struct RequiredValidator {
    /// Custom error message
    pub message: Option<String>,
}

impl RequiredValidator {
    pub fn new() -> Self {
        Self { message: None }
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }
}

#[async_trait]
impl ValidationRule for RequiredValidator {
    async fn validate(&self, value: &Value, field: &str, _ctx: &RuleContext<'_>) -> ValidationResult<()> {
        if !is_empty_value(value) {
            return Ok(());
        }
        match &self.message {
            Some(message) => Err(ValidationError::with_code(field, message.clone(), "required").into()),
            None => Err(lang::error(field, "required", Value::Null).into()),
        }
    }

    fn rule_name(&self) -> &'static str {
        "required"
    }

    fn parameters(&self) -> Option<Value> {
        self.message.as_ref().map(|msg| json!({ "message": msg }))
    }

    fn is_implicit(&self) -> bool {
        true
    }
}

/// `required_if:other,v1,v2` and `required_unless:other,v1,v2`
#[derive(Debug, Clone)]
pub struct RequiredIfValidator {
    pub other: String,
    pub values: Vec<String>,
    /// `required_unless` when set
    pub unless: bool,
}

impl RequiredIfValidator {
    pub fn new(other: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            other: other.into(),
            values,
            unless: false,
        }
    }

    pub fn unless(other: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            unless: true,
            ..Self::new(other, values)
        }
    }

    fn condition_holds(&self, ctx: &RuleContext<'_>) -> bool {
        let matches = get_path(ctx.data, &self.other)
            .is_some_and(|other| self.values.iter().any(|v| loosely_equals(other, v)));
        matches != self.unless
    }
}

#[async_trait]
impl ValidationRule for RequiredIfValidator {
    async fn validate(&self, value: &Value, field: &str, ctx: &RuleContext<'_>) -> ValidationResult<()> {
        if !self.condition_holds(ctx) || !is_empty_value(value) {
            return Ok(());
        }
        let code = self.rule_name();
        let params = json!({
            "other": self.other,
            "value": self.values.join(", "),
            "values": self.values,
        });
        Err(lang::error(field, code, params).into())
    }

    fn rule_name(&self) -> &'static str {
        if self.unless {
            "required_unless"
        } else {
            "required_if"
        }
    }

    fn parameters(&self) -> Option<Value> {
        Some(json!({ "other": self.other, "values": self.values }))
    }

    fn is_implicit(&self) -> bool {
        true
    }
}

/// `required_with:a,b` (any present) and `required_without:a,b` (any absent)
#[derive(Debug, Clone)]
pub struct RequiredWithValidator {
    pub others: Vec<String>,
    pub without: bool,
}

impl RequiredWithValidator {
    pub fn with(others: Vec<String>) -> Self {
        Self { others, without: false }
    }

    pub fn without(others: Vec<String>) -> Self {
        Self { others, without: true }
    }

    fn condition_holds(&self, ctx: &RuleContext<'_>) -> bool {
        let filled = |name: &String| get_path(ctx.data, name).is_some_and(|v| !is_empty_value(v));
        if self.without {
            self.others.iter().any(|name| !filled(name))
        } else {
            self.others.iter().any(filled)
        }
    }
}

#[async_trait]
impl ValidationRule for RequiredWithValidator {
    async fn validate(&self, value: &Value, field: &str, ctx: &RuleContext<'_>) -> ValidationResult<()> {
        if !self.condition_holds(ctx) || !is_empty_value(value) {
            return Ok(());
        }
        let params = json!({ "others": self.others, "values": self.others });
        Err(lang::error(field, self.rule_name(), params).into())
    }

    fn rule_name(&self) -> &'static str {
        if self.without {
            "required_without"
        } else {
            "required_with"
        }
    }

    fn parameters(&self) -> Option<Value> {
        Some(json!({ "others": self.others }))
    }

    fn is_implicit(&self) -> bool {
        true
    }
}

/// `accepted`: yes / on / 1 / true
#[derive(Debug, Clone, Default)]
pub struct AcceptedValidator;

#[async_trait]
impl ValidationRule for AcceptedValidator {
    async fn validate(&self, value: &Value, field: &str, _ctx: &RuleContext<'_>) -> ValidationResult<()> {
        let accepted = match value {
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_i64() == Some(1),
            Value::String(s) => matches!(s.to_lowercase().as_str(), "yes" | "on" | "1" | "true" | "si" | "sí"),
            _ => false,
        };
        if accepted {
            Ok(())
        } else {
            Err(lang::error(field, "accepted", Value::Null).into())
        }
    }

    fn rule_name(&self) -> &'static str {
        "accepted"
    }

    fn is_implicit(&self) -> bool {
        true
    }
}
