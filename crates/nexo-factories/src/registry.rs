//! Name-addressable factories for tooling that does not know model types

use crate::error::{FactoryError, FactoryResult};
use crate::factory::{Factory, FactoryBuilder};
use crate::store::RecordStore;
use crate::traits::{Attributes, Model};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Type-erased view of a factory
pub trait DynFactory: Send + Sync {
    fn table(&self) -> &'static str;

    fn state_names(&self) -> &'static [&'static str];

    /// Attributes after the named states and overrides
    fn raw(&self, states: &[String], overrides: &Attributes) -> FactoryResult<Attributes>;

    fn create(&self, store: &RecordStore, states: &[String], overrides: &Attributes) -> FactoryResult<Attributes>;
}

struct Erased<F> {
    make: fn() -> F,
}

impl<F: Factory + 'static> Erased<F> {
    fn builder(&self, states: &[String], overrides: &Attributes) -> FactoryBuilder<F> {
        let builder = states
            .iter()
            .fold((self.make)().builder(), |builder, state| builder.state_named(state.clone()));
        builder.with_attributes(overrides.clone())
    }
}

impl<F: Factory + 'static> DynFactory for Erased<F> {
    fn table(&self) -> &'static str {
        F::Model::table_name()
    }

    fn state_names(&self) -> &'static [&'static str] {
        (self.make)().state_names()
    }

    fn raw(&self, states: &[String], overrides: &Attributes) -> FactoryResult<Attributes> {
        self.builder(states, overrides).raw()
    }

    fn create(&self, store: &RecordStore, states: &[String], overrides: &Attributes) -> FactoryResult<Attributes> {
        self.builder(states, overrides).create_raw(store)
    }
}

/// Factories keyed by table name
#[derive(Default, Clone)]
pub struct FactoryRegistry {
    factories: BTreeMap<&'static str, Arc<dyn DynFactory>>,
}

impl FactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under its model's table name
    pub fn register<F: Factory + Default + 'static>(mut self) -> Self {
        let erased = Erased::<F> { make: F::default };
        self.factories.insert(erased.table(), Arc::new(erased));
        self
    }

    pub fn get(&self, name: &str) -> FactoryResult<Arc<dyn DynFactory>> {
        self.factories
            .get(name)
            .cloned()
            .ok_or_else(|| FactoryError::UnknownFactory(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::states::ActiveState;
    use crate::FactoryState;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Serialize, Deserialize)]
    struct Tag {
        id: Option<i64>,
        label: String,
        is_active: bool,
    }

    impl Model for Tag {
        fn table_name() -> &'static str {
            "tags"
        }
    }

    #[derive(Default)]
    struct TagFactory;

    impl Factory for TagFactory {
        type Model = Tag;

        fn definition(&self) -> Attributes {
            let mut attributes = Attributes::new();
            attributes.insert("label".into(), json!("energía"));
            attributes.insert("is_active".into(), json!(false));
            attributes
        }

        fn state(&self, name: &str) -> Option<Box<dyn FactoryState>> {
            (name == "active").then(|| Box::new(ActiveState) as Box<dyn FactoryState>)
        }

        fn state_names(&self) -> &'static [&'static str] {
            &["active"]
        }
    }

    #[test]
    fn test_registry_lookup_and_erased_calls() {
        let registry = FactoryRegistry::new().register::<TagFactory>();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["tags"]);

        let tags = registry.get("tags").unwrap();
        assert_eq!(tags.state_names(), &["active"]);

        let mut overrides = Attributes::new();
        overrides.insert("label".into(), json!("solar"));
        let raw = tags.raw(&["active".to_string()], &overrides).unwrap();
        assert_eq!(raw["is_active"], json!(true));
        assert_eq!(raw["label"], json!("solar"));

        let store = RecordStore::new();
        let row = tags.create(&store, &[], &Attributes::new()).unwrap();
        assert_eq!(row["id"], json!(1));

        assert!(matches!(registry.get("nope"), Err(FactoryError::UnknownFactory(_))));
    }
}
