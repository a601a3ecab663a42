use super::{exit, print_json};
use crate::config::AppConfig;
use anyhow::Context;
use clap::Args;
use nexo_domain::{requests, DatabaseSeeder};
use nexo_factories::{fake, RecordStore};
use nexo_validation::{handle, RequestContext, RequestError};
use serde_json::{json, Value};
use std::io::Read;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Request name, see `nexo requests`
    pub request: String,

    /// JSON payload file; stdin when omitted or `-`
    #[arg(long, short)]
    pub input: Option<PathBuf>,

    #[arg(long)]
    pub user_id: Option<i64>,

    #[arg(long)]
    pub role: Option<String>,

    #[arg(long)]
    pub ip: Option<String>,

    #[arg(long)]
    pub user_agent: Option<String>,

    /// Row an update request targets
    #[arg(long)]
    pub record_id: Option<i64>,

    /// Check `unique`/`exists` against seeded data instead of empty tables
    #[arg(long)]
    pub seeded: bool,
}

impl ValidateArgs {
    fn context(&self) -> RequestContext {
        let mut ctx = RequestContext::new();
        if let Some(user_id) = self.user_id {
            ctx = ctx.user(user_id);
        }
        if let Some(role) = &self.role {
            ctx = ctx.role(role.as_str());
        }
        if let Some(ip) = &self.ip {
            ctx = ctx.ip(ip.as_str());
        }
        if let Some(user_agent) = &self.user_agent {
            ctx = ctx.user_agent(user_agent.as_str());
        }
        ctx
    }

    fn read_input(&self) -> anyhow::Result<Value> {
        let text = match &self.input {
            Some(path) if path.as_os_str() != "-" => {
                std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?
            }
            _ => {
                let mut text = String::new();
                std::io::stdin().read_to_string(&mut text).context("reading stdin")?;
                text
            }
        };
        serde_json::from_str(&text).context("input is not valid JSON")
    }
}

/// Run one payload through a request; the result is the process exit code
pub async fn run(args: &ValidateArgs, config: &AppConfig) -> anyhow::Result<u8> {
    let request = requests::find(&args.request, args.record_id)
        .ok_or_else(|| anyhow::anyhow!("unknown request '{}', see `nexo requests`", args.request))?;
    let input = args.read_input()?;

    let store = RecordStore::new();
    if args.seeded {
        if let Some(seed) = config.seed {
            fake::seed_fake_data(seed);
        }
        DatabaseSeeder::with_counts(&config.seeding).run_for_environment(&store, &config.environment)?;
    }

    let outcome = validate(request.as_ref(), input, &args.context(), &store).await?;
    print_json(&outcome.body)?;
    Ok(outcome.code)
}

pub struct Outcome {
    pub code: u8,
    pub body: Value,
}

/// Map a request result onto an exit code and the JSON to print
pub async fn validate(
    request: &dyn nexo_validation::FormRequest,
    input: Value,
    ctx: &RequestContext,
    store: &RecordStore,
) -> anyhow::Result<Outcome> {
    match handle(request, input, ctx, Some(store)).await {
        Ok(data) => Ok(Outcome {
            code: exit::OK,
            body: Value::Object(data),
        }),
        Err(err @ RequestError::Forbidden) => Ok(Outcome {
            code: exit::FORBIDDEN,
            body: json!({ "status": err.status_code(), "message": err.to_string() }),
        }),
        Err(err @ (RequestError::Validation(_) | RequestError::MalformedInput(_))) => Ok(Outcome {
            code: exit::INVALID,
            body: json!({ "status": err.status_code(), "body": err.to_json() }),
        }),
        Err(err @ RequestError::InvalidRules(_)) => Err(err.into()),
    }
}
