//! Core validation traits

use crate::data::Data;
use crate::error::ValidationResult;
use crate::presence::PresenceVerifier;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// How `min`, `max`, `between` and `size` measure a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeKind {
    /// Character count
    #[default]
    String,
    /// The numeric value itself
    Numeric,
    /// Element count
    Array,
}

/// Everything a rule may look at besides its own value
pub struct RuleContext<'a> {
    /// The whole (normalized) input, for cross-field rules
    pub data: &'a Data,
    /// Store lookups for `unique` / `exists`
    pub presence: Option<&'a dyn PresenceVerifier>,
    /// Reference instant for relative dates (`today`, `now`)
    pub now: DateTime<Utc>,
    /// Size semantics derived from the field's type rules
    pub size_kind: SizeKind,
}

impl<'a> RuleContext<'a> {
    pub fn new(data: &'a Data) -> Self {
        Self {
            data,
            presence: None,
            now: Utc::now(),
            size_kind: SizeKind::default(),
        }
    }

    pub fn with_size_kind(mut self, size_kind: SizeKind) -> Self {
        self.size_kind = size_kind;
        self
    }

    pub fn with_presence(mut self, presence: &'a dyn PresenceVerifier) -> Self {
        self.presence = Some(presence);
        self
    }

    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }
}

/// Core validation trait that all validators must implement
#[async_trait]
pub trait ValidationRule: Send + Sync {
    /// Validate a single value; `value` is null when the field is absent
    async fn validate(&self, value: &Value, field: &str, ctx: &RuleContext<'_>) -> ValidationResult<()>;

    /// Rule name as written in rule strings
    fn rule_name(&self) -> &'static str;

    /// Rule arguments as JSON, used when describing rule sets
    fn parameters(&self) -> Option<Value> {
        None
    }

    /// Implicit rules run even when the field is missing or null
    fn is_implicit(&self) -> bool {
        false
    }
}
