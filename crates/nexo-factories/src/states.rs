//! Factory states for applying common model variations

use crate::error::FactoryResult;
use crate::traits::{Attributes, FactoryState};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::sync::Arc;

fn now_rfc3339() -> Value {
    json!(Utc::now().to_rfc3339())
}

/// `is_active = true`
#[derive(Debug, Clone)]
pub struct ActiveState;

impl FactoryState for ActiveState {
    fn apply(&self, attributes: &mut Attributes) -> FactoryResult<()> {
        attributes.insert("is_active".to_string(), json!(true));
        Ok(())
    }

    fn state_name(&self) -> &str {
        "active"
    }
}

#[derive(Debug, Clone)]
pub struct InactiveState;

impl FactoryState for InactiveState {
    fn apply(&self, attributes: &mut Attributes) -> FactoryResult<()> {
        attributes.insert("is_active".to_string(), json!(false));
        Ok(())
    }

    fn state_name(&self) -> &str {
        "inactive"
    }
}

#[derive(Debug, Clone)]
pub struct VerifiedState;

impl FactoryState for VerifiedState {
    fn apply(&self, attributes: &mut Attributes) -> FactoryResult<()> {
        attributes.insert("is_verified".to_string(), json!(true));
        Ok(())
    }

    fn state_name(&self) -> &str {
        "verified"
    }
}

/// Published content: status, and a publication moment in the past
#[derive(Debug, Clone)]
pub struct PublishedState;

impl FactoryState for PublishedState {
    fn apply(&self, attributes: &mut Attributes) -> FactoryResult<()> {
        attributes.insert("status".to_string(), json!("published"));
        attributes.insert(
            "published_at".to_string(),
            json!(crate::fake::past_datetime(365).to_rfc3339()),
        );
        Ok(())
    }

    fn state_name(&self) -> &str {
        "published"
    }
}

#[derive(Debug, Clone)]
pub struct DraftState;

impl FactoryState for DraftState {
    fn apply(&self, attributes: &mut Attributes) -> FactoryResult<()> {
        attributes.insert("status".to_string(), json!("draft"));
        attributes.insert("published_at".to_string(), Value::Null);
        Ok(())
    }

    fn state_name(&self) -> &str {
        "draft"
    }
}

#[derive(Debug, Clone)]
pub struct FeaturedState;

impl FactoryState for FeaturedState {
    fn apply(&self, attributes: &mut Attributes) -> FactoryResult<()> {
        attributes.insert("is_featured".to_string(), json!(true));
        Ok(())
    }

    fn state_name(&self) -> &str {
        "featured"
    }
}

/// Custom state builder for flexible state creation
#[derive(Debug, Clone)]
pub struct CustomState {
    modifications: Attributes,
    name: String,
}

impl CustomState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            modifications: Attributes::new(),
            name: name.into(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.modifications.insert(key.into(), value);
        self
    }

    pub fn with_status(self, status: impl Into<String>) -> Self {
        self.with("status", json!(status.into()))
    }

    pub fn with_bool_flag(self, flag: impl Into<String>, value: bool) -> Self {
        self.with(flag.into(), json!(value))
    }

    pub fn with_timestamp(self, field: impl Into<String>, datetime: DateTime<Utc>) -> Self {
        self.with(field.into(), json!(datetime.to_rfc3339()))
    }

    /// Timestamp taken when the state is applied
    pub fn with_now(self, field: impl Into<String>) -> Self {
        self.with(field.into(), now_rfc3339())
    }

    pub fn with_null(self, field: impl Into<String>) -> Self {
        self.with(field.into(), Value::Null)
    }
}

impl FactoryState for CustomState {
    fn apply(&self, attributes: &mut Attributes) -> FactoryResult<()> {
        for (key, value) in &self.modifications {
            attributes.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    fn state_name(&self) -> &str {
        &self.name
    }
}

/// State backed by a closure, for mutations that depend on other attributes
#[derive(Clone)]
pub struct StateFn {
    name: &'static str,
    apply: Arc<dyn Fn(&mut Attributes) + Send + Sync>,
}

impl StateFn {
    pub fn new(name: &'static str, apply: impl Fn(&mut Attributes) + Send + Sync + 'static) -> Self {
        Self {
            name,
            apply: Arc::new(apply),
        }
    }
}

impl std::fmt::Debug for StateFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateFn").field("name", &self.name).finish()
    }
}

impl FactoryState for StateFn {
    fn apply(&self, attributes: &mut Attributes) -> FactoryResult<()> {
        (self.apply)(attributes);
        Ok(())
    }

    fn state_name(&self) -> &str {
        self.name
    }
}

/// Macro for creating fixed-value states easily
#[macro_export]
macro_rules! factory_state {
    ($name:ident as $label:literal { $($field:ident: $value:expr),* $(,)? }) => {
        #[derive(Debug, Clone)]
        pub struct $name;

        impl $crate::FactoryState for $name {
            fn apply(&self, attributes: &mut $crate::Attributes) -> $crate::FactoryResult<()> {
                $(
                    attributes.insert(stringify!($field).to_string(), $crate::__serde_json::json!($value));
                )*
                Ok(())
            }

            fn state_name(&self) -> &str {
                $label
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_and_inactive() {
        let mut attributes = Attributes::new();
        ActiveState.apply(&mut attributes).unwrap();
        assert_eq!(attributes["is_active"], json!(true));

        InactiveState.apply(&mut attributes).unwrap();
        assert_eq!(attributes["is_active"], json!(false));
        assert_eq!(InactiveState.state_name(), "inactive");
    }

    #[test]
    fn test_published_then_draft() {
        let mut attributes = Attributes::new();
        PublishedState.apply(&mut attributes).unwrap();
        assert_eq!(attributes["status"], json!("published"));
        assert!(attributes["published_at"].is_string());

        DraftState.apply(&mut attributes).unwrap();
        assert_eq!(attributes["status"], json!("draft"));
        assert!(attributes["published_at"].is_null());
    }

    #[test]
    fn test_custom_state() {
        let state = CustomState::new("revoked")
            .with("custom_field", json!("custom_value"))
            .with_status("revoked")
            .with_bool_flag("is_active", false)
            .with_null("last_used_at");

        let mut attributes = Attributes::new();
        state.apply(&mut attributes).unwrap();

        assert_eq!(attributes["custom_field"], json!("custom_value"));
        assert_eq!(attributes["status"], json!("revoked"));
        assert_eq!(attributes["is_active"], json!(false));
        assert!(attributes["last_used_at"].is_null());
        assert_eq!(state.state_name(), "revoked");
    }

    #[test]
    fn test_state_fn_reads_other_attributes() {
        let state = StateFn::new("doubled", |attributes| {
            let points = attributes.get("points").and_then(Value::as_i64).unwrap_or(0);
            attributes.insert("points".into(), json!(points * 2));
        });

        let mut attributes = Attributes::new();
        attributes.insert("points".into(), json!(25));
        state.apply(&mut attributes).unwrap();
        assert_eq!(attributes["points"], json!(50));
    }

    factory_state!(SecretState as "secret" {
        is_secret: true,
        points: 100,
    });

    #[test]
    fn test_macro_generated_state() {
        let mut attributes = Attributes::new();
        SecretState.apply(&mut attributes).unwrap();

        assert_eq!(attributes["is_secret"], json!(true));
        assert_eq!(attributes["points"], json!(100));
        assert_eq!(SecretState.state_name(), "secret");
    }
}
