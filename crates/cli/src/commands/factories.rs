use super::{parse_assignment, print_json};
use crate::config::AppConfig;
use clap::Args;
use nexo_factories::{fake, Attributes, FactoryRegistry};
use serde_json::{json, Value};

#[derive(Debug, Args)]
pub struct MakeArgs {
    /// Factory (table) name, see `nexo factories`
    pub factory: String,

    /// Number of rows
    #[arg(long, short = 'n', default_value_t = 1)]
    pub count: usize,

    /// Named state, applied in order; repeatable
    #[arg(long = "state")]
    pub states: Vec<String>,

    /// Attribute override as key=json; repeatable
    #[arg(long = "set")]
    pub overrides: Vec<String>,

    /// RNG seed for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn list(registry: &FactoryRegistry, as_json: bool) -> anyhow::Result<()> {
    let listing: Vec<Value> = registry
        .names()
        .map(|name| {
            let states = registry.get(name).map(|f| f.state_names()).unwrap_or_default();
            json!({ "factory": name, "states": states })
        })
        .collect();

    if as_json {
        return print_json(&listing);
    }
    for entry in &listing {
        let states: Vec<&str> = entry["states"]
            .as_array()
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
            .collect();
        println!("{:<26} {}", entry["factory"].as_str().unwrap_or_default(), states.join(", "));
    }
    Ok(())
}

/// Raw rows from a factory; foreign keys are left for the caller to set
pub fn make(registry: &FactoryRegistry, args: &MakeArgs, config: &AppConfig) -> anyhow::Result<Vec<Value>> {
    let factory = registry.get(&args.factory)?;

    if let Some(unknown) = args
        .states
        .iter()
        .find(|state| !factory.state_names().contains(&state.as_str()))
    {
        anyhow::bail!(
            "factory '{}' has no state '{}' (available: {})",
            args.factory,
            unknown,
            factory.state_names().join(", ")
        );
    }

    let mut overrides = Attributes::new();
    for assignment in &args.overrides {
        let (key, value) = parse_assignment(assignment)?;
        overrides.insert(key, value);
    }

    if let Some(seed) = args.seed.or(config.seed) {
        fake::seed_fake_data(seed);
    }

    (0..args.count)
        .map(|_| -> anyhow::Result<Value> { Ok(Value::Object(factory.raw(&args.states, &overrides)?)) })
        .collect()
}

pub fn run_make(registry: &FactoryRegistry, args: &MakeArgs, config: &AppConfig) -> anyhow::Result<()> {
    let rows = make(registry, args, config)?;
    match rows.as_slice() {
        [single] => print_json(single),
        _ => print_json(&rows),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(factory: &str) -> MakeArgs {
        MakeArgs {
            factory: factory.to_string(),
            count: 2,
            states: vec![],
            overrides: vec![],
            seed: Some(3),
        }
    }

    #[test]
    fn test_make_applies_states_and_overrides() {
        let registry = nexo_domain::registry();
        let mut make_args = args("cooperatives");
        make_args.states = vec!["verified".to_string()];
        make_args.overrides = vec!["members_count=42".to_string()];

        let rows = make(&registry, &make_args, &AppConfig::default()).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|row| row["is_verified"] == true && row["members_count"] == 42));
    }

    #[test]
    fn test_same_seed_same_rows() {
        let registry = nexo_domain::registry();
        let first = make(&registry, &args("topics"), &AppConfig::default()).unwrap();
        let second = make(&registry, &args("topics"), &AppConfig::default()).unwrap();
        assert_eq!(first[0]["name"], second[0]["name"]);
        assert_eq!(first[0]["color"], second[0]["color"]);
    }

    #[test]
    fn test_unknown_factory_and_state() {
        let registry = nexo_domain::registry();
        assert!(make(&registry, &args("spaceships"), &AppConfig::default()).is_err());

        let mut make_args = args("users");
        make_args.states = vec!["banned".to_string()];
        let err = make(&registry, &make_args, &AppConfig::default()).unwrap_err();
        assert!(err.to_string().contains("no state 'banned'"));
    }
}
