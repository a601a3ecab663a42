//! tracing-subscriber setup for the CLI.
//!
//! Output goes to stderr so command results on stdout stay machine-readable.

use crate::config::{AppConfig, ConfigError};
use std::io;
use std::str::FromStr;
use tracing_subscriber::{fmt::Layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Plain,
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" | "text" => Ok(LogFormat::Plain),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(ConfigError::invalid_value("log_format", s, "plain, pretty or json")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Level or full filter directive, e.g. "warn" or "nexo_factories=debug"
    pub level: String,
    pub format: LogFormat,
    pub include_location: bool,
}

impl LoggingConfig {
    pub fn from_app(config: &AppConfig, verbose: bool) -> Self {
        Self {
            level: if verbose { "debug".to_string() } else { config.log_level.clone() },
            format: config.log_format,
            include_location: verbose,
        }
    }
}

/// Install the global subscriber; `RUST_LOG` wins over the configured level
pub fn init_logging(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&config.level))?;
    let layer = Layer::new()
        .with_writer(io::stderr)
        .with_file(config.include_location)
        .with_line_number(config.include_location);

    match config.format {
        LogFormat::Json => tracing_subscriber::registry().with(filter).with(layer.json()).try_init()?,
        LogFormat::Pretty => tracing_subscriber::registry().with(filter).with(layer.pretty()).try_init()?,
        LogFormat::Plain => tracing_subscriber::registry().with(filter).with(layer).try_init()?,
    }

    tracing::debug!(
        target: "nexo::logging",
        "logging initialized (level: {}, format: {:?})",
        config.level,
        config.format
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("text".parse::<LogFormat>().unwrap(), LogFormat::Plain);
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn test_verbose_forces_debug() {
        let config = AppConfig::default();
        assert_eq!(LoggingConfig::from_app(&config, false).level, "warn");
        let verbose = LoggingConfig::from_app(&config, true);
        assert_eq!(verbose.level, "debug");
        assert!(verbose.include_location);
    }
}
