mod commands;
mod config;
mod logging;

use clap::{Parser, Subcommand};
use commands::{factories::MakeArgs, seed::SeedArgs, validate::ValidateArgs};
use config::AppConfig;
use logging::{init_logging, LoggingConfig};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "nexo")]
#[command(about = "Validate requests, generate fake records and seed the Nexo data model")]
struct Cli {
    /// Configuration file (defaults to ./nexo.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging with source locations
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every request with its rules
    Requests {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run a JSON payload through a request
    Validate(ValidateArgs),

    /// List factories and their states
    Factories {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print fake rows from a factory
    Make(MakeArgs),

    /// Seed an in-memory database and report row counts
    Seed(SeedArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {}", err);
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = init_logging(&LoggingConfig::from_app(&config, cli.verbose)) {
        eprintln!("warning: logging disabled: {}", err);
    }
    tracing::debug!(
        environment = %config.environment,
        source = ?config.source_of("environment"),
        "configuration loaded"
    );

    match dispatch(cli.command, &config).await {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(command: Commands, config: &AppConfig) -> anyhow::Result<u8> {
    match command {
        Commands::Requests { json } => commands::requests::run(json)?,
        Commands::Validate(args) => return commands::validate::run(&args, config).await,
        Commands::Factories { json } => commands::factories::list(&nexo_domain::registry(), json)?,
        Commands::Make(args) => commands::factories::run_make(&nexo_domain::registry(), &args, config)?,
        Commands::Seed(args) => commands::seed::run(&args, config)?,
    }
    Ok(commands::exit::OK)
}
