//! Validation rules builder and composition system

use crate::error::RuleParseError;
use crate::parser::{parse_token, tokenize, Modifier, Parsed};
use crate::traits::{SizeKind, ValidationRule};
use serde_json::{json, Value};
use std::sync::Arc;

/// The rules declared for one field pattern (`email`, `tags.*`)
#[derive(Clone, Default)]
pub struct FieldRules {
    pub rules: Vec<Arc<dyn ValidationRule>>,
    /// Null values skip the non-implicit rules
    pub nullable: bool,
    /// A missing field skips every rule
    pub sometimes: bool,
    /// Accepted for compatibility; a field always stops at its first failure
    pub bail: bool,
    /// Rule strings as declared, for listings
    descriptions: Vec<String>,
}

impl FieldRules {
    /// Parse a `|`-separated rule string
    pub fn parse(field: &str, spec: &str) -> Result<Self, RuleParseError> {
        let mut rules = Self::default();
        rules.extend(field, spec)?;
        Ok(rules)
    }

    fn extend(&mut self, field: &str, spec: &str) -> Result<(), RuleParseError> {
        for token in tokenize(spec) {
            match parse_token(field, &token)? {
                Parsed::Modifier(Modifier::Nullable) => self.nullable = true,
                Parsed::Modifier(Modifier::Sometimes) => self.sometimes = true,
                Parsed::Modifier(Modifier::Bail) => self.bail = true,
                Parsed::Rule(rule) => self.rules.push(rule),
            }
            self.descriptions.push(match token.arguments {
                Some(arguments) => format!("{}:{}", token.name, arguments),
                None => token.name,
            });
        }
        Ok(())
    }

    pub fn push(&mut self, rule: Arc<dyn ValidationRule>) {
        self.descriptions.push(describe_rule(rule.as_ref()));
        self.rules.push(rule);
    }

    pub fn has_rule(&self, name: &str) -> bool {
        self.rules.iter().any(|rule| rule.rule_name() == name)
    }

    /// Size semantics: numeric with `integer`/`numeric`, count with `array`
    pub fn size_kind(&self) -> SizeKind {
        if self.has_rule("integer") || self.has_rule("numeric") {
            SizeKind::Numeric
        } else if self.has_rule("array") {
            SizeKind::Array
        } else {
            SizeKind::String
        }
    }

    pub fn descriptions(&self) -> &[String] {
        &self.descriptions
    }
}

impl std::fmt::Debug for FieldRules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldRules")
            .field("rules", &self.descriptions)
            .field("nullable", &self.nullable)
            .field("sometimes", &self.sometimes)
            .finish()
    }
}

fn describe_rule(rule: &dyn ValidationRule) -> String {
    match rule.parameters() {
        Some(params) => format!("{}:{}", rule.rule_name(), params),
        None => rule.rule_name().to_string(),
    }
}

/// Collection of validation rules for a request, in declaration order.
///
/// Rule strings are parsed as they are added; a bad declaration is kept and
/// reported by [`Rules::ensure_valid`] so builder chains stay infallible.
#[derive(Clone, Default)]
pub struct Rules {
    fields: Vec<(String, FieldRules)>,
    request_rules: Vec<Arc<dyn ValidationRule>>,
    parse_errors: Vec<RuleParseError>,
}

impl std::fmt::Debug for Rules {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rules")
            .field("field_rules_count", &self.fields.len())
            .field("request_rules_count", &self.request_rules.len())
            .field("validated_fields", &self.get_validated_fields())
            .finish()
    }
}

impl Rules {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, field: &str) -> &mut FieldRules {
        let index = match self.fields.iter().position(|(name, _)| name == field) {
            Some(index) => index,
            None => {
                self.fields.push((field.to_string(), FieldRules::default()));
                self.fields.len() - 1
            }
        };
        &mut self.fields[index].1
    }

    /// Add rules for a field from a rule string, e.g. `"required|string|max:255"`
    pub fn field(mut self, field: impl Into<String>, spec: &str) -> Self {
        let field = field.into();
        if let Err(error) = self.entry(&field).extend(&field, spec) {
            self.parse_errors.push(error);
        }
        self
    }

    /// Add a typed validation rule for a field
    pub fn rule<R>(mut self, field: impl Into<String>, rule: R) -> Self
    where
        R: ValidationRule + 'static,
    {
        let field = field.into();
        self.entry(&field).push(Arc::new(rule));
        self
    }

    /// Add a request-level validation rule (cross-field validation)
    pub fn request<R>(mut self, rule: R) -> Self
    where
        R: ValidationRule + 'static,
    {
        self.request_rules.push(Arc::new(rule));
        self
    }

    /// Fail with the first declaration that could not be parsed
    pub fn ensure_valid(&self) -> Result<(), RuleParseError> {
        match self.parse_errors.first() {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    pub fn parse_errors(&self) -> &[RuleParseError] {
        &self.parse_errors
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldRules)> {
        self.fields.iter().map(|(name, rules)| (name.as_str(), rules))
    }

    pub fn get_field_rules(&self, field: &str) -> Option<&FieldRules> {
        self.fields.iter().find(|(name, _)| name == field).map(|(_, rules)| rules)
    }

    pub fn get_request_rules(&self) -> &[Arc<dyn ValidationRule>] {
        &self.request_rules
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.request_rules.is_empty()
    }

    pub fn field_rule_count(&self) -> usize {
        self.fields.len()
    }

    pub fn request_rule_count(&self) -> usize {
        self.request_rules.len()
    }

    /// Field patterns that have rules, in declaration order
    pub fn get_validated_fields(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Rule table as JSON: `[{"field": .., "rules": [..]}, ..]`
    pub fn describe(&self) -> Value {
        let fields: Vec<Value> = self
            .fields
            .iter()
            .map(|(name, rules)| json!({ "field": name, "rules": rules.descriptions() }))
            .collect();
        let request: Vec<String> = self.request_rules.iter().map(|r| describe_rule(r.as_ref())).collect();
        json!({ "fields": fields, "request": request })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::{CustomValidator, RequiredValidator};

    #[test]
    fn test_rules_keep_declaration_order() {
        let rules = Rules::new()
            .field("title", "nullable|string|max:255")
            .field("content", "required|string|between:10,5000")
            .field("tags.*", "string|max:30");

        assert_eq!(rules.get_validated_fields(), vec!["title", "content", "tags.*"]);
        assert!(rules.ensure_valid().is_ok());

        let title = rules.get_field_rules("title").unwrap();
        assert!(title.nullable);
        assert_eq!(title.rules.len(), 2);
        assert_eq!(title.descriptions(), &["nullable", "string", "max:255"]);
    }

    #[test]
    fn test_size_kind() {
        let rules = Rules::new()
            .field("duration_minutes", "nullable|integer|between:1,480")
            .field("scopes", "required|array|min:1")
            .field("name", "required|string|max:100");

        assert_eq!(rules.get_field_rules("duration_minutes").unwrap().size_kind(), SizeKind::Numeric);
        assert_eq!(rules.get_field_rules("scopes").unwrap().size_kind(), SizeKind::Array);
        assert_eq!(rules.get_field_rules("name").unwrap().size_kind(), SizeKind::String);
    }

    #[test]
    fn test_parse_errors_are_reported() {
        let rules = Rules::new()
            .field("email", "required|emial")
            .field("name", "required");

        match rules.ensure_valid() {
            Err(RuleParseError::UnknownRule { field, rule }) => {
                assert_eq!(field, "email");
                assert_eq!(rule, "emial");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_typed_rules_merge_with_strings() {
        let rules = Rules::new()
            .field("name", "string")
            .rule("name", RequiredValidator::new())
            .request(CustomValidator::new("noop", |_, _| Ok(())));

        assert_eq!(rules.field_rule_count(), 1);
        assert_eq!(rules.request_rule_count(), 1);
        assert!(rules.get_field_rules("name").unwrap().has_rule("required"));

        let described = rules.describe();
        assert_eq!(described["fields"][0]["rules"][1], "required");
    }
}
