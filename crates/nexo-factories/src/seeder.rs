//! Seeding system with environment controls

use crate::error::{FactoryError, FactoryResult};
use crate::factory::{Factory, FactoryBuilder};
use crate::store::RecordStore;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

/// Environment types for seeding control
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Environment {
    #[default]
    Development,
    Testing,
    Staging,
    Production,
    Custom(String),
}

impl Environment {
    pub fn as_str(&self) -> &str {
        match self {
            Environment::Development => "development",
            Environment::Testing => "testing",
            Environment::Staging => "staging",
            Environment::Production => "production",
            Environment::Custom(name) => name,
        }
    }

    /// Production and custom environments need an explicit opt-in
    pub fn is_safe_for_seeding(&self) -> bool {
        matches!(
            self,
            Environment::Development | Environment::Testing | Environment::Staging
        )
    }
}

impl FromStr for Environment {
    type Err = std::convert::Infallible;

    fn from_str(env: &str) -> Result<Self, Self::Err> {
        Ok(match env.trim().to_lowercase().as_str() {
            "development" | "dev" | "local" => Environment::Development,
            "testing" | "test" => Environment::Testing,
            "staging" | "stage" => Environment::Staging,
            "production" | "prod" => Environment::Production,
            custom => Environment::Custom(custom.to_string()),
        })
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of seeding work
pub trait Seeder: Send + Sync {
    /// Seeder name, used for logging and dependency references
    fn name(&self) -> &str;

    fn environments(&self) -> Vec<Environment> {
        vec![Environment::Development, Environment::Testing]
    }

    fn should_run(&self, env: &Environment) -> bool {
        self.environments().contains(env)
    }

    fn run(&self, store: &RecordStore) -> FactoryResult<()>;

    /// Lower numbers run first among seeders that are ready at the same time
    fn priority(&self) -> i32 {
        100
    }

    /// Seeders that must run first
    fn dependencies(&self) -> Vec<String> {
        vec![]
    }
}

/// Creates `count` rows through a factory builder
pub struct FactorySeeder<F: Factory> {
    name: String,
    builder: FactoryBuilder<F>,
    count: usize,
    environments: Vec<Environment>,
    priority: i32,
    dependencies: Vec<String>,
}

impl<F: Factory> FactorySeeder<F> {
    pub fn new(name: impl Into<String>, builder: FactoryBuilder<F>, count: usize) -> Self {
        Self {
            name: name.into(),
            builder,
            count,
            environments: vec![
                Environment::Development,
                Environment::Testing,
                Environment::Staging,
            ],
            priority: 100,
            dependencies: vec![],
        }
    }

    pub fn environments(mut self, envs: Vec<Environment>) -> Self {
        self.environments = envs;
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn depends_on<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }
}

impl<F: Factory> Seeder for FactorySeeder<F> {
    fn name(&self) -> &str {
        &self.name
    }

    fn environments(&self) -> Vec<Environment> {
        self.environments.clone()
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn dependencies(&self) -> Vec<String> {
        self.dependencies.clone()
    }

    fn run(&self, store: &RecordStore) -> FactoryResult<()> {
        tracing::info!("Running seeder: {} (creating {} records)", self.name, self.count);

        for _ in 0..self.count {
            self.builder.create_raw(store)?;
        }

        tracing::info!("Seeder {} completed: created {} records", self.name, self.count);
        Ok(())
    }
}

/// Runs seeders in dependency order
#[derive(Default)]
pub struct SeederManager {
    seeders: Vec<Box<dyn Seeder>>,
}

impl SeederManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<S: Seeder + 'static>(mut self, seeder: S) -> Self {
        self.seeders.push(Box::new(seeder));
        self
    }

    pub fn add_factory<F: Factory + 'static>(
        self,
        name: impl Into<String>,
        builder: FactoryBuilder<F>,
        count: usize,
    ) -> Self {
        self.add(FactorySeeder::new(name, builder, count))
    }

    pub fn len(&self) -> usize {
        self.seeders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeders.is_empty()
    }

    /// Seeder names in the order they would run for `env`
    pub fn plan(&self, env: &Environment) -> FactoryResult<Vec<String>> {
        let applicable = self.seeders.iter().filter(|s| s.should_run(env)).collect();
        Ok(Self::resolve_dependencies(applicable)?
            .into_iter()
            .map(|s| s.name().to_string())
            .collect())
    }

    /// Run all seeders for the given environment
    pub fn run_for_environment(&self, store: &RecordStore, env: &Environment) -> FactoryResult<()> {
        if !env.is_safe_for_seeding() {
            return Err(FactoryError::seeding(format!(
                "environment '{}' is not safe for automatic seeding, use an explicit opt-in",
                env
            )));
        }

        let applicable: Vec<&Box<dyn Seeder>> = self.seeders.iter().filter(|s| s.should_run(env)).collect();
        tracing::info!("Running {} seeders for environment: {}", applicable.len(), env);

        for seeder in Self::resolve_dependencies(applicable)? {
            seeder.run(store)?;
        }

        tracing::info!("All seeders completed successfully");
        Ok(())
    }

    /// Run every seeder in production, bypassing the environment filter
    pub fn run_production_force(&self, store: &RecordStore) -> FactoryResult<()> {
        let ordered = Self::resolve_dependencies(self.seeders.iter().collect())?;

        tracing::warn!("Force running {} seeders in PRODUCTION environment", ordered.len());

        for seeder in ordered {
            tracing::warn!("Running production seeder: {}", seeder.name());
            seeder.run(store)?;
        }
        Ok(())
    }

    /// Kahn's algorithm; ties broken by priority, then registration order
    fn resolve_dependencies<'a>(seeders: Vec<&'a Box<dyn Seeder>>) -> FactoryResult<Vec<&'a Box<dyn Seeder>>> {
        let index: HashMap<String, usize> = seeders
            .iter()
            .enumerate()
            .map(|(i, s)| (s.name().to_string(), i))
            .collect();

        let mut in_degree = vec![0usize; seeders.len()];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); seeders.len()];

        for (i, seeder) in seeders.iter().enumerate() {
            for dep in seeder.dependencies() {
                let Some(&j) = index.get(&dep) else {
                    return Err(FactoryError::seeding(format!(
                        "seeder '{}' depends on '{}', which is not registered for this run",
                        seeder.name(),
                        dep
                    )));
                };
                in_degree[i] += 1;
                dependents[j].push(i);
            }
        }

        let mut ready: BTreeSet<(i32, usize)> = seeders
            .iter()
            .enumerate()
            .filter(|(i, _)| in_degree[*i] == 0)
            .map(|(i, s)| (s.priority(), i))
            .collect();
        let mut ordered = Vec::with_capacity(seeders.len());

        while let Some(next) = ready.pop_first() {
            let (_, i) = next;
            ordered.push(seeders[i]);
            for &d in &dependents[i] {
                in_degree[d] -= 1;
                if in_degree[d] == 0 {
                    ready.insert((seeders[d].priority(), d));
                }
            }
        }

        if ordered.len() != seeders.len() {
            let stuck: Vec<&str> = seeders
                .iter()
                .enumerate()
                .filter(|(i, _)| in_degree[*i] > 0)
                .map(|(_, s)| s.name())
                .collect();
            return Err(FactoryError::seeding(format!(
                "circular dependency detected in seeders: {}",
                stuck.join(", ")
            )));
        }

        Ok(ordered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recording {
        name: &'static str,
        deps: Vec<&'static str>,
        priority: i32,
        log: std::sync::Arc<Mutex<Vec<String>>>,
    }

    impl Seeder for Recording {
        fn name(&self) -> &str {
            self.name
        }

        fn run(&self, _store: &RecordStore) -> FactoryResult<()> {
            self.log.lock().unwrap().push(self.name.to_string());
            Ok(())
        }

        fn priority(&self) -> i32 {
            self.priority
        }

        fn dependencies(&self) -> Vec<String> {
            self.deps.iter().map(|d| d.to_string()).collect()
        }
    }

    fn seeder(
        name: &'static str,
        deps: &[&'static str],
        priority: i32,
        log: &std::sync::Arc<Mutex<Vec<String>>>,
    ) -> Recording {
        Recording {
            name,
            deps: deps.to_vec(),
            priority,
            log: log.clone(),
        }
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!("dev".parse::<Environment>().unwrap(), Environment::Development);
        assert_eq!("PROD".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!(
            "qa".parse::<Environment>().unwrap(),
            Environment::Custom("qa".to_string())
        );
        assert!(Environment::Staging.is_safe_for_seeding());
        assert!(!Environment::Production.is_safe_for_seeding());
        assert!(!Environment::Custom("qa".into()).is_safe_for_seeding());
    }

    #[test]
    fn test_dependencies_run_before_dependents() {
        let log = Default::default();
        // registered out of order, and the dependent has the lower priority
        let manager = SeederManager::new()
            .add(seeder("posts", &["users", "topics"], 1, &log))
            .add(seeder("topics", &[], 100, &log))
            .add(seeder("users", &[], 50, &log));

        manager
            .run_for_environment(&RecordStore::new(), &Environment::Testing)
            .unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["users", "topics", "posts"]);
    }

    #[test]
    fn test_missing_dependency_and_cycle_are_errors() {
        let log = Default::default();
        let missing = SeederManager::new().add(seeder("posts", &["users"], 100, &log));
        let err = missing.plan(&Environment::Development).unwrap_err();
        assert!(err.to_string().contains("'users'"));

        let cyclic = SeederManager::new()
            .add(seeder("a", &["b"], 100, &log))
            .add(seeder("b", &["a"], 100, &log))
            .add(seeder("c", &[], 100, &log));
        let err = cyclic.plan(&Environment::Development).unwrap_err();
        assert!(err.to_string().contains("circular dependency"));
        assert!(err.to_string().contains("a, b"));
    }

    #[test]
    fn test_production_requires_force() {
        let log: std::sync::Arc<Mutex<Vec<String>>> = Default::default();
        let manager = SeederManager::new().add(seeder("users", &[], 100, &log));
        let store = RecordStore::new();

        assert!(manager
            .run_for_environment(&store, &Environment::Production)
            .is_err());
        assert!(log.lock().unwrap().is_empty());

        manager.run_production_force(&store).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["users"]);
    }
}
