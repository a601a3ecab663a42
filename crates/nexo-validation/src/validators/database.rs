//! Store-backed rules: `unique` and `exists`

use crate::error::ValidationResult;
use crate::lang;
use crate::traits::{RuleContext, ValidationRule};
use async_trait::async_trait;
use serde_json::{json, Value};

/// Column a rule checks when none was given: the field's last named segment
fn default_column(field: &str) -> &str {
    field
        .rsplit('.')
        .find(|segment| segment.parse::<usize>().is_err())
        .unwrap_or(field)
}

/// Read an ignore id the way it appears in rule strings (`5`, `"abc"`, `NULL`)
pub fn parse_ignore_id(text: &str) -> Option<Value> {
    match text {
        "" | "NULL" | "null" => None,
        _ => match text.parse::<i64>() {
            Ok(id) => Some(json!(id)),
            Err(_) => Some(Value::String(text.to_string())),
        },
    }
}

fn unavailable(field: &str) -> crate::error::ValidationErrors {
    tracing::warn!(field, "presence verifier not configured, failing closed");
    lang::error(field, "presence_unavailable", Value::Null).into()
}

/// `unique:table[,column[,ignore_id[,id_column]]]`
#[derive(Debug, Clone)]
pub struct UniqueValidator {
    pub table: String,
    pub column: Option<String>,
    /// Row excluded from the check: `(id_column, id)`
    pub ignore: Option<(String, Value)>,
}

impl UniqueValidator {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: None,
            ignore: None,
        }
    }

    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn ignore(mut self, id: Value) -> Self {
        self.ignore = Some(("id".to_string(), id));
        self
    }

    pub fn ignore_by(mut self, id_column: impl Into<String>, id: Value) -> Self {
        self.ignore = Some((id_column.into(), id));
        self
    }
}

#[async_trait]
impl ValidationRule for UniqueValidator {
    async fn validate(&self, value: &Value, field: &str, ctx: &RuleContext<'_>) -> ValidationResult<()> {
        let Some(presence) = ctx.presence else {
            return Err(unavailable(field));
        };

        let column = self.column.as_deref().unwrap_or_else(|| default_column(field));
        let ignore = self
            .ignore
            .as_ref()
            .map(|(id_column, id)| (id_column.as_str(), id));

        let taken = presence.count(&self.table, &[(column, value)], ignore).await;
        if taken == 0 {
            Ok(())
        } else {
            tracing::debug!(table = %self.table, column, "unique check found {} row(s)", taken);
            Err(lang::error(field, "unique", Value::Null).into())
        }
    }

    fn rule_name(&self) -> &'static str {
        "unique"
    }

    fn parameters(&self) -> Option<Value> {
        Some(json!({
            "table": self.table,
            "column": self.column,
            "ignore": self.ignore.as_ref().map(|(column, id)| json!({ "column": column, "id": id })),
        }))
    }
}

/// `exists:table[,column]`
#[derive(Debug, Clone)]
pub struct ExistsValidator {
    pub table: String,
    pub column: Option<String>,
}

impl ExistsValidator {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: None,
        }
    }

    pub fn column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }
}

#[async_trait]
impl ValidationRule for ExistsValidator {
    async fn validate(&self, value: &Value, field: &str, ctx: &RuleContext<'_>) -> ValidationResult<()> {
        let Some(presence) = ctx.presence else {
            return Err(unavailable(field));
        };

        let column = self.column.as_deref().unwrap_or_else(|| default_column(field));

        // arrays must have every element present
        let values: Vec<&Value> = match value {
            Value::Array(items) => items.iter().collect(),
            other => vec![other],
        };

        for value in values {
            if !presence.exists(&self.table, &[(column, value)]).await {
                return Err(lang::error(field, "exists", Value::Null).into());
            }
        }
        Ok(())
    }

    fn rule_name(&self) -> &'static str {
        "exists"
    }

    fn parameters(&self) -> Option<Value> {
        Some(json!({ "table": self.table, "column": self.column }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Data;
    use crate::presence::PresenceVerifier;

    /// Rows of a single `cooperatives` table
    struct FakeStore {
        rows: Vec<Value>,
    }

    #[async_trait]
    impl PresenceVerifier for FakeStore {
        async fn count(
            &self,
            table: &str,
            conditions: &[(&str, &Value)],
            ignore: Option<(&str, &Value)>,
        ) -> usize {
            if table != "cooperatives" {
                return 0;
            }
            self.rows
                .iter()
                .filter(|row| conditions.iter().all(|(column, value)| row.get(*column) == Some(*value)))
                .filter(|row| ignore.map_or(true, |(column, id)| row.get(column) != Some(id)))
                .count()
        }
    }

    fn store() -> FakeStore {
        FakeStore {
            rows: vec![
                json!({"id": 1, "tax_id": "F12345678"}),
                json!({"id": 2, "tax_id": "F87654321"}),
            ],
        }
    }

    #[tokio::test]
    async fn test_unique() {
        let input = Data::new();
        let store = store();
        let ctx = RuleContext::new(&input).with_presence(&store);
        let validator = UniqueValidator::new("cooperatives");

        assert!(validator.validate(&json!("F00000000"), "tax_id", &ctx).await.is_ok());
        let errors = validator.validate(&json!("F12345678"), "tax_id", &ctx).await.unwrap_err();
        assert_eq!(errors.first("tax_id"), Some("El campo tax id ya ha sido registrado."));

        // a record may keep its own value
        let validator = UniqueValidator::new("cooperatives").ignore(json!(1));
        assert!(validator.validate(&json!("F12345678"), "tax_id", &ctx).await.is_ok());
    }

    #[tokio::test]
    async fn test_exists_and_explicit_column() {
        let input = Data::new();
        let store = store();
        let ctx = RuleContext::new(&input).with_presence(&store);
        let validator = ExistsValidator::new("cooperatives").column("id");

        assert!(validator.validate(&json!(2), "cooperative_id", &ctx).await.is_ok());
        assert!(validator.validate(&json!([1, 2]), "cooperative_ids", &ctx).await.is_ok());
        assert!(validator.validate(&json!(9), "cooperative_id", &ctx).await.is_err());
    }

    #[tokio::test]
    async fn test_fails_closed_without_verifier() {
        let input = Data::new();
        let ctx = RuleContext::new(&input);
        let errors = UniqueValidator::new("cooperatives")
            .validate(&json!("F00000000"), "tax_id", &ctx)
            .await
            .unwrap_err();
        assert_eq!(errors.get_field_errors("tax_id").unwrap()[0].code, "presence_unavailable");
    }

    #[test]
    fn test_helpers() {
        assert_eq!(default_column("tags.0"), "tags");
        assert_eq!(default_column("items.1.sku"), "sku");
        assert_eq!(parse_ignore_id("7"), Some(json!(7)));
        assert_eq!(parse_ignore_id("NULL"), None);
    }
}
