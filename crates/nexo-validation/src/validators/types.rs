//! Type rules: `string`, `integer`, `numeric`, `boolean`, `array`, `uuid`,
//! `ip`, `alpha_dash`

use crate::error::ValidationResult;
use crate::lang;
use crate::traits::{RuleContext, ValidationRule};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::net::IpAddr;

static ALPHA_DASH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}\p{M}\p{N}_-]+$").expect("alpha_dash pattern is valid"));

/// The value shapes a type rule can demand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    String,
    Integer,
    Numeric,
    Boolean,
    Array,
    Uuid,
    Ip,
    AlphaDash,
}

impl ValueType {
    pub fn rule_name(&self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Integer => "integer",
            ValueType::Numeric => "numeric",
            ValueType::Boolean => "boolean",
            ValueType::Array => "array",
            ValueType::Uuid => "uuid",
            ValueType::Ip => "ip",
            ValueType::AlphaDash => "alpha_dash",
        }
    }

    fn accepts(&self, value: &Value) -> bool {
        match self {
            ValueType::String => value.is_string(),
            ValueType::Integer => match value {
                Value::Number(n) => n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0),
                Value::String(s) => s.trim().parse::<i64>().is_ok(),
                _ => false,
            },
            ValueType::Numeric => crate::data::as_number(value).is_some(),
            ValueType::Boolean => match value {
                Value::Bool(_) => true,
                Value::Number(n) => matches!(n.as_i64(), Some(0) | Some(1)),
                Value::String(s) => matches!(s.as_str(), "0" | "1" | "true" | "false"),
                _ => false,
            },
            ValueType::Array => value.is_array(),
            ValueType::Uuid => value
                .as_str()
                .is_some_and(|s| uuid::Uuid::parse_str(s).is_ok()),
            ValueType::Ip => value
                .as_str()
                .is_some_and(|s| s.parse::<IpAddr>().is_ok()),
            ValueType::AlphaDash => match value {
                Value::String(s) => ALPHA_DASH.is_match(s),
                Value::Number(n) => n.is_u64(),
                _ => false,
            },
        }
    }
}

/// Validator requiring a value of a given shape
#[derive(Debug, Clone)]
pub struct TypeValidator {
    pub value_type: ValueType,
}

impl TypeValidator {
    pub fn new(value_type: ValueType) -> Self {
        Self { value_type }
    }
}

#[async_trait]
impl ValidationRule for TypeValidator {
    async fn validate(&self, value: &Value, field: &str, _ctx: &RuleContext<'_>) -> ValidationResult<()> {
        if self.value_type.accepts(value) {
            Ok(())
        } else {
            Err(lang::error(field, self.value_type.rule_name(), Value::Null).into())
        }
    }

    fn rule_name(&self) -> &'static str {
        self.value_type.rule_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Data;
    use serde_json::json;

    async fn passes(value_type: ValueType, value: Value) -> bool {
        let input = Data::new();
        let ctx = RuleContext::new(&input);
        TypeValidator::new(value_type).validate(&value, "field", &ctx).await.is_ok()
    }

    #[tokio::test]
    async fn test_integer() {
        assert!(passes(ValueType::Integer, json!(42)).await);
        assert!(passes(ValueType::Integer, json!("42")).await);
        assert!(passes(ValueType::Integer, json!(3.0)).await);
        assert!(!passes(ValueType::Integer, json!(3.5)).await);
        assert!(!passes(ValueType::Integer, json!("tres")).await);
        assert!(!passes(ValueType::Integer, Value::Null).await);
    }

    #[tokio::test]
    async fn test_numeric_and_boolean() {
        assert!(passes(ValueType::Numeric, json!("12.75")).await);
        assert!(!passes(ValueType::Numeric, json!("12,75")).await);
        assert!(passes(ValueType::Boolean, json!(false)).await);
        assert!(passes(ValueType::Boolean, json!("1")).await);
        assert!(!passes(ValueType::Boolean, json!("sí")).await);
    }

    #[tokio::test]
    async fn test_string_rejects_null() {
        assert!(passes(ValueType::String, json!("hola")).await);
        assert!(!passes(ValueType::String, Value::Null).await);
        assert!(!passes(ValueType::String, json!(12)).await);
    }

    #[tokio::test]
    async fn test_uuid_ip_alpha_dash() {
        assert!(passes(ValueType::Uuid, json!("67e55044-10b1-426f-9247-bb680e5fe0c8")).await);
        assert!(!passes(ValueType::Uuid, json!("not-a-uuid")).await);
        assert!(passes(ValueType::Ip, json!("192.168.1.10")).await);
        assert!(passes(ValueType::Ip, json!("::1")).await);
        assert!(!passes(ValueType::Ip, json!("999.1.1.1")).await);
        assert!(passes(ValueType::AlphaDash, json!("energia-solar_2024")).await);
        assert!(passes(ValueType::AlphaDash, json!("cañada")).await);
        assert!(!passes(ValueType::AlphaDash, json!("con espacios")).await);
    }

    #[tokio::test]
    async fn test_message_is_spanish() {
        let input = Data::new();
        let ctx = RuleContext::new(&input);
        let errors = TypeValidator::new(ValueType::Integer)
            .validate(&json!("x"), "duration_minutes", &ctx)
            .await
            .unwrap_err();
        assert_eq!(
            errors.first("duration_minutes"),
            Some("El campo duration minutes debe ser un número entero.")
        );
    }
}
