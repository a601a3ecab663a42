//! Date rules: `date` and the `after` / `before` comparisons

use crate::data::{get_path, parse_date};
use crate::error::ValidationResult;
use crate::lang;
use crate::traits::{RuleContext, ValidationRule};
use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime};
use serde_json::{json, Value};

/// `date`: the value parses as a date or date-time
#[derive(Debug, Clone, Default)]
pub struct DateValidator;

#[async_trait]
impl ValidationRule for DateValidator {
    async fn validate(&self, value: &Value, field: &str, _ctx: &RuleContext<'_>) -> ValidationResult<()> {
        if value.as_str().and_then(parse_date).is_some() {
            Ok(())
        } else {
            Err(lang::error(field, "date", Value::Null).into())
        }
    }

    fn rule_name(&self) -> &'static str {
        "date"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateComparison {
    After,
    AfterOrEqual,
    Before,
    BeforeOrEqual,
}

impl DateComparison {
    pub fn rule_name(&self) -> &'static str {
        match self {
            DateComparison::After => "after",
            DateComparison::AfterOrEqual => "after_or_equal",
            DateComparison::Before => "before",
            DateComparison::BeforeOrEqual => "before_or_equal",
        }
    }

    fn holds(&self, value: NaiveDateTime, target: NaiveDateTime) -> bool {
        match self {
            DateComparison::After => value > target,
            DateComparison::AfterOrEqual => value >= target,
            DateComparison::Before => value < target,
            DateComparison::BeforeOrEqual => value <= target,
        }
    }
}

/// What a date is compared against
#[derive(Debug, Clone, PartialEq)]
pub enum DateTarget {
    Today,
    Tomorrow,
    Yesterday,
    Now,
    /// A fixed date, kept with its original text for messages
    Literal(NaiveDateTime, String),
    /// Another input field
    Field(String),
}

impl DateTarget {
    /// Read a rule argument: keyword, literal date, or field name
    pub fn parse(argument: &str) -> Self {
        match argument {
            "today" => DateTarget::Today,
            "tomorrow" => DateTarget::Tomorrow,
            "yesterday" => DateTarget::Yesterday,
            "now" => DateTarget::Now,
            other => match parse_date(other) {
                Some(date) => DateTarget::Literal(date, other.to_string()),
                None => DateTarget::Field(other.to_string()),
            },
        }
    }

    fn resolve(&self, ctx: &RuleContext<'_>) -> Option<NaiveDateTime> {
        let midnight = ctx.now.date_naive().and_hms_opt(0, 0, 0);
        match self {
            DateTarget::Today => midnight,
            DateTarget::Tomorrow => midnight.map(|d| d + Duration::days(1)),
            DateTarget::Yesterday => midnight.map(|d| d - Duration::days(1)),
            DateTarget::Now => Some(ctx.now.naive_utc()),
            DateTarget::Literal(date, _) => Some(*date),
            DateTarget::Field(name) => get_path(ctx.data, name).and_then(Value::as_str).and_then(parse_date),
        }
    }

    fn params(&self) -> Value {
        match self {
            DateTarget::Today => json!({ "date": lang::date_keyword("today") }),
            DateTarget::Tomorrow => json!({ "date": lang::date_keyword("tomorrow") }),
            DateTarget::Yesterday => json!({ "date": lang::date_keyword("yesterday") }),
            DateTarget::Now => json!({ "date": lang::date_keyword("now") }),
            DateTarget::Literal(_, text) => json!({ "date": text }),
            // the validator swaps the field name for its display attribute
            DateTarget::Field(name) => json!({ "date": lang::display_attribute(name), "date_field": name }),
        }
    }
}

/// `after:x`, `after_or_equal:x`, `before:x`, `before_or_equal:x`
#[derive(Debug, Clone)]
pub struct DateCompareValidator {
    pub comparison: DateComparison,
    pub target: DateTarget,
}

impl DateCompareValidator {
    pub fn new(comparison: DateComparison, target: DateTarget) -> Self {
        Self { comparison, target }
    }

    pub fn after(target: &str) -> Self {
        Self::new(DateComparison::After, DateTarget::parse(target))
    }

    pub fn before(target: &str) -> Self {
        Self::new(DateComparison::Before, DateTarget::parse(target))
    }
}

#[async_trait]
impl ValidationRule for DateCompareValidator {
    async fn validate(&self, value: &Value, field: &str, ctx: &RuleContext<'_>) -> ValidationResult<()> {
        let Some(date) = value.as_str().and_then(parse_date) else {
            return Err(lang::error(field, "date", Value::Null).into());
        };

        // an unresolvable reference field fails the comparison
        let passes = self
            .target
            .resolve(ctx)
            .is_some_and(|target| self.comparison.holds(date, target));

        if passes {
            Ok(())
        } else {
            Err(lang::error(field, self.comparison.rule_name(), self.target.params()).into())
        }
    }

    fn rule_name(&self) -> &'static str {
        self.comparison.rule_name()
    }

    fn parameters(&self) -> Option<Value> {
        Some(self.target.params())
    }
}
