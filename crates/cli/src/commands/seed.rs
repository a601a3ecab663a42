use crate::config::AppConfig;
use anyhow::Context;
use clap::Args;
use nexo_domain::DatabaseSeeder;
use nexo_factories::{fake, Environment, RecordStore};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct SeedArgs {
    /// Environment to seed for; defaults to the configured one
    #[arg(long)]
    pub env: Option<Environment>,

    /// Seed production or custom environments anyway
    #[arg(long)]
    pub force: bool,

    /// RNG seed for reproducible data
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write every seeded table as JSON to this file
    #[arg(long)]
    pub dump: Option<PathBuf>,
}

/// Seed a fresh store and return it with its per-table counts
pub fn seed(args: &SeedArgs, config: &AppConfig) -> anyhow::Result<(RecordStore, BTreeMap<String, usize>)> {
    let environment = args.env.clone().unwrap_or_else(|| config.environment.clone());
    if let Some(seed) = args.seed.or(config.seed) {
        fake::seed_fake_data(seed);
    }

    let store = RecordStore::new();
    let manager = DatabaseSeeder::with_counts(&config.seeding);

    if !environment.is_safe_for_seeding() && args.force {
        tracing::warn!(environment = %environment, "forced seeding");
        manager.run_production_force(&store)?;
    } else {
        manager.run_for_environment(&store, &environment)?;
    }

    let counts = store.counts();
    Ok((store, counts))
}

pub fn run(args: &SeedArgs, config: &AppConfig) -> anyhow::Result<()> {
    let (store, counts) = seed(args, config)?;

    for (table, count) in &counts {
        println!("{:<26} {:>6}", table, count);
    }
    println!("{:<26} {:>6}", "total", counts.values().sum::<usize>());

    if let Some(path) = &args.dump {
        let json = serde_json::to_string_pretty(&store.dump())?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        println!("dumped to {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexo_domain::SeedCounts;

    fn config() -> AppConfig {
        AppConfig {
            seeding: SeedCounts {
                users: 2,
                news_articles: 3,
                ..SeedCounts::default()
            },
            ..AppConfig::default()
        }
    }

    fn args(env: Option<Environment>, force: bool) -> SeedArgs {
        SeedArgs {
            env,
            force,
            seed: Some(1),
            dump: None,
        }
    }

    #[test]
    fn test_seed_counts_follow_config() {
        let (_, counts) = seed(&args(None, false), &config()).unwrap();
        assert_eq!(counts["users"], 3);
        assert_eq!(counts["news_articles"], 3);
    }

    #[test]
    fn test_production_needs_force() {
        assert!(seed(&args(Some(Environment::Production), false), &config()).is_err());
        let (_, counts) = seed(&args(Some(Environment::Production), true), &config()).unwrap();
        assert_eq!(counts["users"], 3);
    }

    #[test]
    fn test_dump_writes_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.json");
        let mut seed_args = args(None, false);
        seed_args.dump = Some(path.clone());

        run(&seed_args, &config()).unwrap();
        let dumped: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(dumped["news_articles"].as_array().unwrap().len(), 3);
    }
}
