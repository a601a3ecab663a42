//! `in` / `not_in` list membership

use crate::data::scalar_text;
use crate::error::ValidationResult;
use crate::lang;
use crate::traits::{RuleContext, ValidationRule};
use async_trait::async_trait;
use serde_json::{json, Value};

/// Value must (or must not) be one of a fixed list
#[derive(Debug, Clone)]
pub struct InValidator {
    pub values: Vec<String>,
    pub negate: bool,
}

impl InValidator {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            negate: false,
        }
    }

    pub fn not_in<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            negate: true,
            ..Self::new(values)
        }
    }

    fn contains(&self, value: &Value) -> bool {
        scalar_text(value).is_some_and(|text| self.values.iter().any(|v| *v == text))
    }

    fn passes(&self, value: &Value) -> bool {
        match value {
            // arrays pass when every element passes
            Value::Array(items) => items.iter().all(|item| self.contains(item) != self.negate),
            _ => self.contains(value) != self.negate,
        }
    }
}

#[async_trait]
impl ValidationRule for InValidator {
    async fn validate(&self, value: &Value, field: &str, _ctx: &RuleContext<'_>) -> ValidationResult<()> {
        if self.passes(value) {
            Ok(())
        } else {
            Err(lang::error(field, self.rule_name(), json!({ "values": self.values })).into())
        }
    }

    fn rule_name(&self) -> &'static str {
        if self.negate {
            "not_in"
        } else {
            "in"
        }
    }

    fn parameters(&self) -> Option<Value> {
        Some(json!({ "values": self.values }))
    }
}
