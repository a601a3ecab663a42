//! Size rules (`min`, `max`, `between`, `size`) for strings, numbers and arrays

use crate::data::as_number;
use crate::error::ValidationResult;
use crate::lang;
use crate::traits::{RuleContext, SizeKind, ValidationRule};
use async_trait::async_trait;
use serde_json::{json, Map, Value};

/// Which size rule this validator was declared as
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeRule {
    Min(f64),
    Max(f64),
    Between(f64, f64),
    Exactly(f64),
}

/// Validator for size constraints; the unit depends on the field's type rules
#[derive(Debug, Clone)]
pub struct SizeValidator {
    pub rule: SizeRule,
}

impl SizeValidator {
    pub fn min(min: f64) -> Self {
        Self { rule: SizeRule::Min(min) }
    }

    pub fn max(max: f64) -> Self {
        Self { rule: SizeRule::Max(max) }
    }

    pub fn between(min: f64, max: f64) -> Self {
        Self {
            rule: SizeRule::Between(min, max),
        }
    }

    pub fn exactly(size: f64) -> Self {
        Self {
            rule: SizeRule::Exactly(size),
        }
    }

    /// Measure the value; the second element is the message suffix
    fn measure(&self, value: &Value, kind: SizeKind) -> Option<(f64, &'static str)> {
        match value {
            Value::Array(items) => Some((items.len() as f64, "array")),
            _ if kind == SizeKind::Numeric => as_number(value).map(|n| (n, "numeric")),
            // unicode-aware length
            Value::String(s) => Some((s.chars().count() as f64, "string")),
            Value::Number(n) => Some((n.to_string().chars().count() as f64, "string")),
            _ => None,
        }
    }

    fn passes(&self, size: f64) -> bool {
        match self.rule {
            SizeRule::Min(min) => size >= min,
            SizeRule::Max(max) => size <= max,
            SizeRule::Between(min, max) => size >= min && size <= max,
            SizeRule::Exactly(expected) => (size - expected).abs() < f64::EPSILON,
        }
    }

    fn params(&self) -> Value {
        let mut params = Map::new();
        match self.rule {
            SizeRule::Min(min) => {
                params.insert("min".into(), json!(min));
            }
            SizeRule::Max(max) => {
                params.insert("max".into(), json!(max));
            }
            SizeRule::Between(min, max) => {
                params.insert("min".into(), json!(min));
                params.insert("max".into(), json!(max));
            }
            SizeRule::Exactly(size) => {
                params.insert("size".into(), json!(size));
            }
        }
        Value::Object(params)
    }
}

#[async_trait]
impl ValidationRule for SizeValidator {
    async fn validate(&self, value: &Value, field: &str, ctx: &RuleContext<'_>) -> ValidationResult<()> {
        let Some((size, unit)) = self.measure(value, ctx.size_kind) else {
            // null/bool/object values are left to the type rules
            return Ok(());
        };

        if self.passes(size) {
            Ok(())
        } else {
            let code = format!("{}.{}", self.rule_name(), unit);
            Err(lang::error(field, &code, self.params()).into())
        }
    }

    fn rule_name(&self) -> &'static str {
        match self.rule {
            SizeRule::Min(_) => "min",
            SizeRule::Max(_) => "max",
            SizeRule::Between(_, _) => "between",
            SizeRule::Exactly(_) => "size",
        }
    }

    fn parameters(&self) -> Option<Value> {
        Some(self.params())
    }
}
