//! Rule-string parsing: `"required|string|max:255"` into validators

use crate::error::RuleParseError;
use crate::traits::ValidationRule;
use crate::validators::database::parse_ignore_id;
use crate::validators::*;
use std::sync::Arc;

/// Field-level switches that are not validators themselves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Nullable,
    Sometimes,
    Bail,
}

/// One `|`-separated entry of a rule string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleToken {
    pub name: String,
    /// Raw argument text after the first `:`
    pub arguments: Option<String>,
}

impl RuleToken {
    fn args(&self) -> Vec<String> {
        match &self.arguments {
            Some(text) if !text.is_empty() => text.split(',').map(|a| a.trim().to_string()).collect(),
            _ => Vec::new(),
        }
    }
}

/// What a single token turned into
pub enum Parsed {
    Modifier(Modifier),
    Rule(Arc<dyn ValidationRule>),
}

/// Split a rule string on `|`, keeping `regex:` patterns that contain `|`
/// in one piece.
pub fn tokenize(spec: &str) -> Vec<RuleToken> {
    let mut tokens = Vec::new();
    let mut pieces = spec.split('|');

    while let Some(raw) = pieces.next() {
        let piece = raw.trim();
        if piece.is_empty() {
            continue;
        }

        // regex arguments keep their whitespace; everything else is trimmed
        let (name, arguments) = match raw.trim_start().split_once(':') {
            Some((name, args)) if name.trim() == "regex" => (name.trim(), Some(args.to_string())),
            Some((name, args)) => (name.trim(), Some(args.trim_end().to_string())),
            None => (piece, None),
        };

        let arguments = match (name, arguments) {
            ("regex", Some(mut pattern)) => {
                while !pattern_closed(pattern.trim_end()) {
                    match pieces.next() {
                        Some(rest) => {
                            pattern.push('|');
                            pattern.push_str(rest);
                        }
                        None => break,
                    }
                }
                Some(pattern.trim_end().to_string())
            }
            (_, arguments) => arguments,
        };

        tokens.push(RuleToken {
            name: name.to_string(),
            arguments,
        });
    }

    tokens
}

/// A delimited pattern is closed once its delimiter reappears followed only
/// by flag letters.
fn pattern_closed(pattern: &str) -> bool {
    let mut chars = pattern.chars();
    let Some(delimiter) = chars.next() else {
        return true;
    };
    let body = chars.as_str();
    match body.rfind(delimiter) {
        Some(end) => body[end + delimiter.len_utf8()..]
            .chars()
            .all(|c| c.is_ascii_alphabetic()),
        None => false,
    }
}

fn arity(
    field: &str,
    token: &RuleToken,
    args: &[String],
    min: usize,
    max: Option<usize>,
    expected: &str,
) -> Result<(), RuleParseError> {
    let count = args.len();
    if count < min || max.is_some_and(|max| count > max) {
        return Err(RuleParseError::InvalidArguments {
            field: field.to_string(),
            rule: token.name.clone(),
            expected: expected.to_string(),
        });
    }
    Ok(())
}

fn number(field: &str, token: &RuleToken, text: &str) -> Result<f64, RuleParseError> {
    text.parse::<f64>().map_err(|_| RuleParseError::InvalidArguments {
        field: field.to_string(),
        rule: token.name.clone(),
        expected: "numeric arguments".to_string(),
    })
}

/// Turn one token into a modifier or a validator
pub fn parse_token(field: &str, token: &RuleToken) -> Result<Parsed, RuleParseError> {
    let args = token.args();
    let rule = |rule: Arc<dyn ValidationRule>| -> Result<Parsed, RuleParseError> { Ok(Parsed::Rule(rule)) };

    match token.name.as_str() {
        "nullable" => Ok(Parsed::Modifier(Modifier::Nullable)),
        "sometimes" => Ok(Parsed::Modifier(Modifier::Sometimes)),
        "bail" => Ok(Parsed::Modifier(Modifier::Bail)),

        "required" => rule(Arc::new(RequiredValidator::new())),
        "required_if" | "required_unless" => {
            arity(field, token, &args, 2, None, "a field and at least one value")?;
            let (other, values) = (args[0].clone(), args[1..].to_vec());
            if token.name == "required_if" {
                rule(Arc::new(RequiredIfValidator::new(other, values)))
            } else {
                rule(Arc::new(RequiredIfValidator::unless(other, values)))
            }
        }
        "required_with" | "required_without" => {
            arity(field, token, &args, 1, None, "at least one field")?;
            if token.name == "required_with" {
                rule(Arc::new(RequiredWithValidator::with(args)))
            } else {
                rule(Arc::new(RequiredWithValidator::without(args)))
            }
        }
        "accepted" => rule(Arc::new(AcceptedValidator)),

        "string" => rule(Arc::new(TypeValidator::new(ValueType::String))),
        "integer" => rule(Arc::new(TypeValidator::new(ValueType::Integer))),
        "numeric" => rule(Arc::new(TypeValidator::new(ValueType::Numeric))),
        "boolean" => rule(Arc::new(TypeValidator::new(ValueType::Boolean))),
        "array" => rule(Arc::new(TypeValidator::new(ValueType::Array))),
        "uuid" => rule(Arc::new(TypeValidator::new(ValueType::Uuid))),
        "ip" => rule(Arc::new(TypeValidator::new(ValueType::Ip))),
        "alpha_dash" => rule(Arc::new(TypeValidator::new(ValueType::AlphaDash))),
        "date" => rule(Arc::new(DateValidator)),
        "email" => rule(Arc::new(EmailValidator::new())),
        "url" => rule(Arc::new(UrlValidator)),

        "min" | "max" | "size" => {
            arity(field, token, &args, 1, Some(1), "one numeric argument")?;
            let n = number(field, token, &args[0])?;
            let validator = match token.name.as_str() {
                "min" => SizeValidator::min(n),
                "max" => SizeValidator::max(n),
                _ => SizeValidator::exactly(n),
            };
            rule(Arc::new(validator))
        }
        "between" => {
            arity(field, token, &args, 2, Some(2), "two numeric arguments")?;
            let min = number(field, token, &args[0])?;
            let max = number(field, token, &args[1])?;
            rule(Arc::new(SizeValidator::between(min, max)))
        }

        "in" => {
            arity(field, token, &args, 1, None, "at least one value")?;
            rule(Arc::new(InValidator::new(args)))
        }
        "not_in" => {
            arity(field, token, &args, 1, None, "at least one value")?;
            rule(Arc::new(InValidator::not_in(args)))
        }

        "regex" => {
            let source = token.arguments.as_deref().unwrap_or_default();
            rule(Arc::new(PatternValidator::from_delimited(field, source)?))
        }

        "after" | "after_or_equal" | "before" | "before_or_equal" => {
            arity(field, token, &args, 1, Some(1), "a date, a keyword or a field")?;
            let comparison = match token.name.as_str() {
                "after" => DateComparison::After,
                "after_or_equal" => DateComparison::AfterOrEqual,
                "before" => DateComparison::Before,
                _ => DateComparison::BeforeOrEqual,
            };
            rule(Arc::new(DateCompareValidator::new(comparison, DateTarget::parse(&args[0]))))
        }

        "confirmed" => rule(Arc::new(CompareValidator::confirmed())),
        "same" | "different" => {
            arity(field, token, &args, 1, Some(1), "another field")?;
            if token.name == "same" {
                rule(Arc::new(CompareValidator::same(args[0].clone())))
            } else {
                rule(Arc::new(CompareValidator::different(args[0].clone())))
            }
        }

        "unique" => {
            arity(field, token, &args, 1, Some(4), "table[,column[,ignore_id[,id_column]]]")?;
            let mut validator = UniqueValidator::new(args[0].clone());
            if let Some(column) = args.get(1).filter(|c| !c.is_empty() && c.as_str() != "NULL") {
                validator = validator.column(column.clone());
            }
            if let Some(id) = args.get(2).and_then(|id| parse_ignore_id(id)) {
                let id_column = args.get(3).cloned().unwrap_or_else(|| "id".to_string());
                validator = validator.ignore_by(id_column, id);
            }
            rule(Arc::new(validator))
        }
        "exists" => {
            arity(field, token, &args, 1, Some(2), "table[,column]")?;
            let mut validator = ExistsValidator::new(args[0].clone());
            if let Some(column) = args.get(1) {
                validator = validator.column(column.clone());
            }
            rule(Arc::new(validator))
        }

        other => Err(RuleParseError::UnknownRule {
            field: field.to_string(),
            rule: other.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(spec: &str) -> Vec<String> {
        tokenize(spec).into_iter().map(|t| t.name).collect()
    }

    #[test]
    fn test_tokenize_simple() {
        assert_eq!(names("required|string|max:255"), vec!["required", "string", "max"]);
        assert_eq!(names(" nullable | in:a,b "), vec!["nullable", "in"]);
    }

    #[test]
    fn test_tokenize_keeps_regex_alternation() {
        let tokens = tokenize("required|regex:/^(kg|km|kwh)$/i|max:10");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].arguments.as_deref(), Some("/^(kg|km|kwh)$/i"));
        assert_eq!(tokens[2].name, "max");
    }

    #[test]
    fn test_tokenize_keeps_whitespace_inside_regex() {
        let tokens = tokenize("regex:/^(a |b)$/");
        assert_eq!(tokens[0].arguments.as_deref(), Some("/^(a |b)$/"));

        let tokens = tokenize("nullable | regex:/^x y$/ | max:3");
        assert_eq!(tokens[1].arguments.as_deref(), Some("/^x y$/"));
        assert_eq!(tokens[2].name, "max");
        assert_eq!(tokens[2].arguments.as_deref(), Some("3"));
    }

    #[test]
    fn test_unknown_rule() {
        let token = RuleToken {
            name: "reqired".to_string(),
            arguments: None,
        };
        match parse_token("title", &token) {
            Err(RuleParseError::UnknownRule { field, rule }) => {
                assert_eq!(field, "title");
                assert_eq!(rule, "reqired");
            }
            _ => panic!("expected an unknown rule error"),
        }
    }

    #[test]
    fn test_argument_errors() {
        for spec in ["max", "max:diez", "between:1", "required_if:status", "in"] {
            let token = tokenize(spec).remove(0);
            assert!(
                matches!(parse_token("f", &token), Err(RuleParseError::InvalidArguments { .. })),
                "{} should be rejected",
                spec
            );
        }
    }

    #[test]
    fn test_parses_known_rules() {
        let spec = "required|string|between:10,5000|in:a,b|after:today|unique:users,email,5|exists:topics,id|confirmed";
        for token in tokenize(spec) {
            match parse_token("f", &token) {
                Ok(Parsed::Rule(rule)) => assert_eq!(rule.rule_name(), token.name),
                _ => panic!("{} did not parse", token.name),
            }
        }
    }
}
