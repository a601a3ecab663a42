//! Cross-field equality rules: `confirmed`, `same`, `different`

use crate::data::{get_path, NULL};
use crate::error::ValidationResult;
use crate::lang;
use crate::traits::{RuleContext, ValidationRule};
use async_trait::async_trait;
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldComparison {
    /// `<field>_confirmation` must equal the value
    Confirmed,
    Same,
    Different,
}

#[derive(Debug, Clone)]
pub struct CompareValidator {
    pub comparison: FieldComparison,
    /// Other field; unused for `confirmed`, which derives it
    pub other: Option<String>,
}

impl CompareValidator {
    pub fn confirmed() -> Self {
        Self {
            comparison: FieldComparison::Confirmed,
            other: None,
        }
    }

    pub fn same(other: impl Into<String>) -> Self {
        Self {
            comparison: FieldComparison::Same,
            other: Some(other.into()),
        }
    }

    pub fn different(other: impl Into<String>) -> Self {
        Self {
            comparison: FieldComparison::Different,
            other: Some(other.into()),
        }
    }

    fn other_field(&self, field: &str) -> String {
        match &self.other {
            Some(other) => other.clone(),
            None => format!("{}_confirmation", field),
        }
    }
}

#[async_trait]
impl ValidationRule for CompareValidator {
    async fn validate(&self, value: &Value, field: &str, ctx: &RuleContext<'_>) -> ValidationResult<()> {
        let other = self.other_field(field);
        let other_value = get_path(ctx.data, &other).unwrap_or(&NULL);

        let passes = match self.comparison {
            FieldComparison::Confirmed | FieldComparison::Same => value == other_value,
            FieldComparison::Different => value != other_value,
        };

        if passes {
            return Ok(());
        }

        let params = match self.comparison {
            FieldComparison::Confirmed => Value::Null,
            _ => json!({ "other": other }),
        };
        Err(lang::error(field, self.rule_name(), params).into())
    }

    fn rule_name(&self) -> &'static str {
        match self.comparison {
            FieldComparison::Confirmed => "confirmed",
            FieldComparison::Same => "same",
            FieldComparison::Different => "different",
        }
    }

    fn parameters(&self) -> Option<Value> {
        self.other.as_ref().map(|other| json!({ "other": other }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Data;

    fn data(value: Value) -> Data {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_confirmed() {
        let input = data(json!({"password": "s3creta!", "password_confirmation": "s3creta!"}));
        let ctx = RuleContext::new(&input);
        assert!(CompareValidator::confirmed().validate(&json!("s3creta!"), "password", &ctx).await.is_ok());

        let input = data(json!({"password": "s3creta!"}));
        let ctx = RuleContext::new(&input);
        let errors = CompareValidator::confirmed()
            .validate(&json!("s3creta!"), "password", &ctx)
            .await
            .unwrap_err();
        assert_eq!(errors.first("password"), Some("La confirmación de password no coincide."));
    }

    #[tokio::test]
    async fn test_same_and_different() {
        let input = data(json!({"legal_name": "Goiener S.Coop."}));
        let ctx = RuleContext::new(&input);

        assert!(CompareValidator::same("legal_name")
            .validate(&json!("Goiener S.Coop."), "name", &ctx)
            .await
            .is_ok());

        let errors = CompareValidator::different("legal_name")
            .validate(&json!("Goiener S.Coop."), "name", &ctx)
            .await
            .unwrap_err();
        assert_eq!(
            errors.first("name"),
            Some("El campo name y legal_name deben ser diferentes.")
        );
    }
}
