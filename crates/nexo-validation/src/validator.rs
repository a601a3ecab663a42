//! Runs a [`Rules`] set over request input

use crate::data::{expand_wildcards, get_path, normalize_input, Data, NULL};
use crate::error::{RuleParseError, ValidationError, ValidationErrors, ValidationResult};
use crate::lang;
use crate::presence::PresenceVerifier;
use crate::rules::Rules;
use crate::traits::RuleContext;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;

/// Validates input against a rule set, with per-request messages and
/// attribute names.
pub struct Validator<'a> {
    rules: &'a Rules,
    messages: HashMap<String, String>,
    attributes: HashMap<String, String>,
    presence: Option<&'a dyn PresenceVerifier>,
    now: DateTime<Utc>,
}

impl<'a> Validator<'a> {
    /// Fails when any rule declaration could not be parsed
    pub fn new(rules: &'a Rules) -> Result<Self, RuleParseError> {
        rules.ensure_valid()?;
        Ok(Self {
            rules,
            messages: HashMap::new(),
            attributes: HashMap::new(),
            presence: None,
            now: Utc::now(),
        })
    }

    /// Custom messages keyed `field.rule` or `rule`
    pub fn messages(mut self, messages: HashMap<String, String>) -> Self {
        self.messages = messages;
        self
    }

    /// Display names for fields
    pub fn attributes(mut self, attributes: HashMap<String, String>) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn presence(mut self, presence: &'a dyn PresenceVerifier) -> Self {
        self.presence = Some(presence);
        self
    }

    /// Reference instant for `today` / `now`
    pub fn now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Validate and return the validated subset of the normalized input
    pub async fn validate(&self, input: &Data) -> ValidationResult<Data> {
        let mut data = input.clone();
        normalize_input(&mut data);

        let mut errors = ValidationErrors::new();

        for (pattern, field_rules) in self.rules.fields() {
            let mut ctx = RuleContext::new(&data).at(self.now).with_size_kind(field_rules.size_kind());
            if let Some(presence) = self.presence {
                ctx = ctx.with_presence(presence);
            }

            for path in expand_wildcards(pattern, &data) {
                let present = get_path(&data, &path);
                if present.is_none() && field_rules.sometimes {
                    continue;
                }
                let value = present.unwrap_or(&NULL);

                for rule in &field_rules.rules {
                    if !rule.is_implicit() && (present.is_none() || (value.is_null() && field_rules.nullable)) {
                        continue;
                    }

                    if let Err(failures) = rule.validate(value, &path, &ctx).await {
                        tracing::debug!(field = %path, rule = rule.rule_name(), "validation rule failed");
                        for error in failures.errors.into_values().flatten() {
                            errors.add(self.localize(error, pattern));
                        }
                        // one failure per field
                        break;
                    }
                }
            }
        }

        if !self.rules.get_request_rules().is_empty() {
            let whole = Value::Object(data.clone());
            let mut ctx = RuleContext::new(&data).at(self.now);
            if let Some(presence) = self.presence {
                ctx = ctx.with_presence(presence);
            }
            for rule in self.rules.get_request_rules() {
                if let Err(failures) = rule.validate(&whole, "request", &ctx).await {
                    errors.merge(failures);
                }
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(self.validated(&data))
    }

    /// Copy the top-level keys named by the rule patterns
    fn validated(&self, data: &Data) -> Data {
        let mut validated = Data::new();
        for (pattern, _) in self.rules.fields() {
            let key = pattern.split('.').next().unwrap_or(pattern);
            if let Some(value) = data.get(key) {
                validated.insert(key.to_string(), value.clone());
            }
        }
        validated
    }

    fn attribute(&self, field: &str, pattern: Option<&str>) -> String {
        self.attributes
            .get(field)
            .or_else(|| pattern.and_then(|p| self.attributes.get(p)))
            .cloned()
            .unwrap_or_else(|| lang::display_attribute(field))
    }

    fn custom_message(&self, path: &str, pattern: &str, error: &ValidationError) -> Option<&String> {
        let rule = error.rule();
        [
            format!("{}.{}", path, error.code),
            format!("{}.{}", path, rule),
            format!("{}.{}", pattern, rule),
            error.code.clone(),
            rule.to_string(),
        ]
        .iter()
        .find_map(|key| self.messages.get(key))
    }

    /// Field names inside the placeholders become display attributes too
    fn localize_params(&self, error: &ValidationError) -> Option<Value> {
        let mut params = match &error.context {
            Some(Value::Object(map)) => map.clone(),
            _ => return error.context.clone(),
        };

        if let Some(Value::String(other)) = params.get("other").cloned() {
            params.insert("other".into(), Value::String(self.attribute(&other, None)));
        }
        if let Some(Value::String(field)) = params.get("date_field").cloned() {
            params.insert("date".into(), Value::String(self.attribute(&field, None)));
        }
        if matches!(error.code.as_str(), "required_with" | "required_without") {
            if let Some(Value::Array(fields)) = params.get("values").cloned() {
                let names: Vec<Value> = fields
                    .iter()
                    .filter_map(Value::as_str)
                    .map(|f| Value::String(self.attribute(f, None)))
                    .collect();
                params.insert("values".into(), Value::Array(names));
            }
        }

        Some(Value::Object(params))
    }

    /// Apply custom messages and attribute names to a rule failure.
    ///
    /// Only catalogue messages are re-rendered; a message a rule set itself
    /// is left alone unless a custom message overrides it.
    fn localize(&self, mut error: ValidationError, pattern: &str) -> ValidationError {
        let path = error.field.clone();
        let attribute = self.attribute(&path, Some(pattern));
        let params = self.localize_params(&error);

        if let Some(custom) = self.custom_message(&path, pattern, &error) {
            error.message = lang::render(custom, &attribute, params.as_ref());
            return error;
        }

        let default = lang::render(
            lang::template(&error.code),
            &lang::display_attribute(&path),
            error.context.as_ref(),
        );
        if error.message == default {
            error.message = lang::render(lang::template(&error.code), &attribute, params.as_ref());
        }
        error
    }
}
