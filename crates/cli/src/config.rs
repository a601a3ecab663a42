//! CLI configuration: defaults, an optional `nexo.toml`, then `NEXO_*`
//! environment variables.

use crate::logging::LogFormat;
use nexo_domain::SeedCounts;
use nexo_factories::Environment;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::{env, fs};
use thiserror::Error;

/// File read when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "nexo.toml";

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for field '{field}': '{value}'. Expected: {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: String,
    },

    #[error("Cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ConfigError {
    pub fn invalid_value(field: impl Into<String>, value: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }
}

/// Where a setting came from, for `--verbose` output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Default,
    File(String),
    EnvVar(&'static str),
}

/// Shape of `nexo.toml`; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    environment: Option<String>,
    log_level: Option<String>,
    log_format: Option<String>,
    seed: Option<u64>,
    seeding: Option<SeedCounts>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: Environment,
    pub log_level: String,
    pub log_format: LogFormat,
    /// Fixed RNG seed for reproducible fake data
    pub seed: Option<u64>,
    pub seeding: SeedCounts,
    pub(crate) sources: HashMap<&'static str, ConfigSource>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            log_level: "warn".to_string(),
            log_format: LogFormat::Plain,
            seed: None,
            seeding: SeedCounts::default(),
            sources: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Defaults, then `path` (or `nexo.toml` when present), then the
    /// environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        match path {
            Some(path) => config.merge_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => config.merge_file(Path::new(DEFAULT_CONFIG_FILE))?,
            None => {}
        }

        config.merge_env(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn merge_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let file: FileConfig = toml::from_str(&text)?;
        let origin = ConfigSource::File(path.display().to_string());

        if let Some(environment) = file.environment {
            self.environment = parse_environment(&environment);
            self.sources.insert("environment", origin.clone());
        }
        if let Some(level) = file.log_level {
            self.log_level = level;
            self.sources.insert("log_level", origin.clone());
        }
        if let Some(format) = file.log_format {
            self.log_format = format.parse()?;
            self.sources.insert("log_format", origin.clone());
        }
        if let Some(seed) = file.seed {
            self.seed = Some(seed);
            self.sources.insert("seed", origin.clone());
        }
        if let Some(seeding) = file.seeding {
            self.seeding = seeding;
            self.sources.insert("seeding", origin);
        }
        Ok(())
    }

    /// Apply `NEXO_ENV`, `NEXO_LOG`, `NEXO_LOG_FORMAT` and `NEXO_SEED`
    fn merge_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(environment) = var("NEXO_ENV") {
            self.environment = parse_environment(&environment);
            self.sources.insert("environment", ConfigSource::EnvVar("NEXO_ENV"));
        }
        if let Some(level) = var("NEXO_LOG") {
            self.log_level = level;
            self.sources.insert("log_level", ConfigSource::EnvVar("NEXO_LOG"));
        }
        if let Some(format) = var("NEXO_LOG_FORMAT") {
            self.log_format = format.parse()?;
            self.sources.insert("log_format", ConfigSource::EnvVar("NEXO_LOG_FORMAT"));
        }
        if let Some(seed) = var("NEXO_SEED") {
            let parsed = seed
                .parse()
                .map_err(|_| ConfigError::invalid_value("seed", &seed, "an unsigned integer"))?;
            self.seed = Some(parsed);
            self.sources.insert("seed", ConfigSource::EnvVar("NEXO_SEED"));
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        // a bare level or a full EnvFilter directive such as "nexo_domain=debug"
        let plain_level = !self.log_level.contains('=') && !self.log_level.contains(',');
        if plain_level && !LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(ConfigError::invalid_value(
                "log_level",
                &self.log_level,
                format!("one of: {}", LOG_LEVELS.join(", ")),
            ));
        }

        if let Environment::Custom(name) = &self.environment {
            if name.trim().is_empty() {
                return Err(ConfigError::invalid_value("environment", name, "a non-empty name"));
            }
        }

        Ok(())
    }

    pub fn source_of(&self, field: &str) -> ConfigSource {
        self.sources.get(field).cloned().unwrap_or(ConfigSource::Default)
    }
}

fn parse_environment(text: &str) -> Environment {
    match text.parse() {
        Ok(environment) => environment,
        Err(never) => match never {},
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.source_of("log_level"), ConfigSource::Default);
    }

    #[test]
    fn test_file_then_environment() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "environment = \"staging\"\nlog_level = \"info\"\nseed = 11\n\n[seeding]\nusers = 2\ntopics = 1"
        )
        .unwrap();

        let mut config = AppConfig::default();
        config.merge_file(file.path()).unwrap();
        assert_eq!(config.environment, Environment::Staging);
        assert_eq!(config.seed, Some(11));
        assert_eq!(config.seeding.users, 2);
        assert_eq!(config.seeding.people, SeedCounts::default().people);

        config
            .merge_env(vars(&[("NEXO_ENV", "test"), ("NEXO_LOG_FORMAT", "json")]))
            .unwrap();
        assert_eq!(config.environment, Environment::Testing);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.source_of("environment"), ConfigSource::EnvVar("NEXO_ENV"));
        assert!(matches!(config.source_of("seed"), ConfigSource::File(_)));
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let mut config = AppConfig::default();
        assert!(config.merge_env(vars(&[("NEXO_SEED", "many")])).is_err());

        config.log_level = "loud".to_string();
        assert!(config.validate().is_err());

        config.log_level = "nexo_domain=debug,warn".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 3000").unwrap();
        let mut config = AppConfig::default();
        assert!(matches!(config.merge_file(file.path()), Err(ConfigError::Toml(_))));
    }
}
