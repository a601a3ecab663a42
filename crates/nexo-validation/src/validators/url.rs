//! `url` rule: absolute http(s) URLs with a host

use crate::error::ValidationResult;
use crate::lang;
use crate::traits::{RuleContext, ValidationRule};
use async_trait::async_trait;
use serde_json::Value;
use ::url::Url;

#[derive(Debug, Clone, Default)]
pub struct UrlValidator;

impl UrlValidator {
    fn is_valid(text: &str) -> bool {
        match Url::parse(text) {
            Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty()),
            Err(_) => false,
        }
    }
}

#[async_trait]
impl ValidationRule for UrlValidator {
    async fn validate(&self, value: &Value, field: &str, _ctx: &RuleContext<'_>) -> ValidationResult<()> {
        if value.as_str().is_some_and(Self::is_valid) {
            Ok(())
        } else {
            Err(lang::error(field, "url", Value::Null).into())
        }
    }

    fn rule_name(&self) -> &'static str {
        "url"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Data;
    use serde_json::json;

    #[tokio::test]
    async fn test_url() {
        let input = Data::new();
        let ctx = RuleContext::new(&input);

        assert!(UrlValidator.validate(&json!("https://www.goiener.com/tarifas"), "website", &ctx).await.is_ok());
        assert!(UrlValidator.validate(&json!("http://localhost:8080"), "website", &ctx).await.is_ok());
        assert!(UrlValidator.validate(&json!("ftp://files.example.org"), "website", &ctx).await.is_err());
        assert!(UrlValidator.validate(&json!("www.sin-esquema.es"), "website", &ctx).await.is_err());

        let errors = UrlValidator
            .validate(&json!("no es una url"), "media_url", &ctx)
            .await
            .unwrap_err();
        assert_eq!(errors.first("media_url"), Some("El campo media url debe ser una URL válida."));
    }
}
