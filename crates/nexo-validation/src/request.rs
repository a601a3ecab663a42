//! Form requests: authorization, rules, cross-field checks and the enriched
//! payload handed to the caller.

use crate::data::{normalize_input, Data};
use crate::error::{RuleParseError, ValidationErrors};
use crate::presence::PresenceVerifier;
use crate::rules::Rules;
use crate::validator::Validator;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use thiserror::Error;

pub const FORBIDDEN_MESSAGE: &str = "Esta acción no está autorizada.";

/// Who is making the request, and when
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    pub user_id: Option<i64>,
    pub user_role: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub now: DateTime<Utc>,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self {
            user_id: None,
            user_role: None,
            ip_address: None,
            user_agent: None,
            now: Utc::now(),
        }
    }
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn role(mut self, role: impl Into<String>) -> Self {
        self.user_role = Some(role.into());
        self
    }

    pub fn ip(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    pub fn has_role(&self, roles: &[&str]) -> bool {
        self.user_role.as_deref().is_some_and(|role| roles.contains(&role))
    }

    /// Timestamp as stored in processed payloads
    pub fn timestamp(&self) -> Value {
        Value::String(self.now.to_rfc3339())
    }

    /// `user_id`, `ip_address` and `user_agent` as JSON values (null when unknown)
    pub fn audit_fields(&self) -> [(&'static str, Value); 3] {
        [
            ("user_id", json!(self.user_id)),
            ("ip_address", json!(self.ip_address)),
            ("user_agent", json!(self.user_agent)),
        ]
    }
}

/// Why a request was rejected
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("{}", FORBIDDEN_MESSAGE)]
    Forbidden,

    #[error("request body must be a JSON object, got {0}")]
    MalformedInput(&'static str),

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("invalid rule declaration: {0}")]
    InvalidRules(#[from] RuleParseError),
}

impl RequestError {
    /// HTTP status a controller would answer with
    pub fn status_code(&self) -> u16 {
        match self {
            RequestError::Forbidden => 403,
            RequestError::MalformedInput(_) => 400,
            RequestError::Validation(_) => 422,
            RequestError::InvalidRules(_) => 500,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            RequestError::Validation(errors) => errors.to_json(),
            other => json!({ "message": other.to_string() }),
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// One endpoint's input contract
#[async_trait]
pub trait FormRequest: Send + Sync {
    fn name(&self) -> &'static str;

    fn authorize(&self, _ctx: &RequestContext) -> bool {
        true
    }

    fn rules(&self, ctx: &RequestContext) -> Rules;

    /// Custom messages keyed `field.rule` or `rule`
    fn messages(&self) -> HashMap<String, String> {
        HashMap::new()
    }

    /// Display names for fields
    fn attributes(&self) -> HashMap<String, String> {
        HashMap::new()
    }

    /// Adjust the normalized input before any rule runs
    fn prepare_for_validation(&self, _input: &mut Data, _ctx: &RequestContext) {}

    /// Cross-field checks; runs even when field rules failed, over the
    /// prepared input, and adds to the same error bag
    async fn after(
        &self,
        _input: &Data,
        _ctx: &RequestContext,
        _presence: Option<&dyn PresenceVerifier>,
        _errors: &mut ValidationErrors,
    ) {
    }

    /// Enrich validated data for the caller
    fn processed_data(&self, validated: Data, _ctx: &RequestContext) -> Data {
        validated
    }
}

/// Authorize, validate and enrich one request
pub async fn handle<R>(
    request: &R,
    input: Value,
    ctx: &RequestContext,
    presence: Option<&dyn PresenceVerifier>,
) -> Result<Data, RequestError>
where
    R: FormRequest + ?Sized,
{
    let name = request.name();

    if !request.authorize(ctx) {
        tracing::info!(request = name, user_id = ?ctx.user_id, "request not authorized");
        return Err(RequestError::Forbidden);
    }

    let mut input = match input {
        Value::Object(map) => map,
        other => return Err(RequestError::MalformedInput(kind_of(&other))),
    };

    normalize_input(&mut input);
    request.prepare_for_validation(&mut input, ctx);

    let rules = request.rules(ctx);
    let mut validator = Validator::new(&rules)?
        .messages(request.messages())
        .attributes(request.attributes())
        .now(ctx.now);
    if let Some(presence) = presence {
        validator = validator.presence(presence);
    }

    let (validated, mut errors) = match validator.validate(&input).await {
        Ok(validated) => (Some(validated), ValidationErrors::new()),
        Err(errors) => (None, errors),
    };

    request.after(&input, ctx, presence, &mut errors).await;

    match validated {
        Some(validated) if errors.is_empty() => {
            tracing::debug!(request = name, fields = validated.len(), "request validated");
            Ok(request.processed_data(validated, ctx))
        }
        _ => {
            tracing::debug!(
                request = name,
                failed_fields = errors.len(),
                "request failed validation"
            );
            Err(RequestError::Validation(errors))
        }
    }
}
