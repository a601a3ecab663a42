//! Factory trait and the builder that layers states and overrides

use crate::error::{FactoryError, FactoryResult};
use crate::store::RecordStore;
use crate::traits::{Attributes, BelongsTo, FactoryState, Model};
use serde_json::Value;
use std::sync::Arc;

/// Generation attempts before a unique-column collision becomes an error
pub const MAX_UNIQUE_ATTEMPTS: usize = 10;

/// Core factory trait that all model factories implement
pub trait Factory: Send + Sync {
    type Model: Model;

    /// Default attributes for one fresh model
    fn definition(&self) -> Attributes;

    /// Look up a named state
    fn state(&self, _name: &str) -> Option<Box<dyn FactoryState>> {
        None
    }

    fn state_names(&self) -> &'static [&'static str] {
        &[]
    }

    /// Foreign keys resolved against the store on `create`
    fn belongs_to(&self) -> Vec<BelongsTo> {
        Vec::new()
    }

    /// Columns that must not repeat within the table
    fn unique_columns(&self) -> &'static [&'static str] {
        &[]
    }

    fn builder(self) -> FactoryBuilder<Self>
    where
        Self: Sized,
    {
        FactoryBuilder::new(self)
    }
}

#[derive(Clone)]
enum StateRef {
    Named(String),
    Boxed(Arc<dyn FactoryState>),
}

/// Accumulates states and overrides, then makes or creates models.
///
/// Attributes are built as definition, then states in the order they were
/// added, then overrides.
#[derive(Clone)]
pub struct FactoryBuilder<F> {
    factory: F,
    states: Vec<StateRef>,
    overrides: Attributes,
}

impl<F: Factory> FactoryBuilder<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            states: Vec::new(),
            overrides: Attributes::new(),
        }
    }

    /// Override a single attribute
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.overrides.insert(key.into(), value.into());
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.overrides.extend(attributes);
        self
    }

    pub fn state<S: FactoryState + 'static>(mut self, state: S) -> Self {
        self.states.push(StateRef::Boxed(Arc::new(state)));
        self
    }

    /// Apply a state by the name the factory knows it under
    pub fn state_named(mut self, name: impl Into<String>) -> Self {
        self.states.push(StateRef::Named(name.into()));
        self
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    /// Generated attributes, without persisting anything
    pub fn raw(&self) -> FactoryResult<Attributes> {
        let mut attributes = self.factory.definition();

        for state in &self.states {
            match state {
                StateRef::Boxed(state) => state.apply(&mut attributes)?,
                StateRef::Named(name) => {
                    let state = self.factory.state(name).ok_or_else(|| FactoryError::UnknownState {
                        table: F::Model::table_name().to_string(),
                        state: name.clone(),
                    })?;
                    state.apply(&mut attributes)?;
                }
            }
        }

        for (key, value) in &self.overrides {
            attributes.insert(key.clone(), value.clone());
        }

        Ok(attributes)
    }

    /// Generated attributes with belongs-to keys pointing at existing rows,
    /// without persisting anything
    pub fn raw_with_parents(&self, store: &RecordStore) -> FactoryResult<Attributes> {
        let mut attributes = self.raw()?;
        self.resolve_parents(store, &mut attributes)?;
        Ok(attributes)
    }

    pub fn make(&self) -> FactoryResult<F::Model> {
        let attributes = self.raw()?;
        Ok(serde_json::from_value(Value::Object(attributes))?)
    }

    pub fn make_many(&self, count: usize) -> FactoryResult<Vec<F::Model>> {
        (0..count).map(|_| self.make()).collect()
    }

    /// Persist one row and return its stored attributes
    pub fn create_raw(&self, store: &RecordStore) -> FactoryResult<Attributes> {
        let table = F::Model::table_name();
        let unique_columns = self.factory.unique_columns();

        for attempt in 1..=MAX_UNIQUE_ATTEMPTS {
            let attributes = self.raw_with_parents(store)?;

            let collision = unique_columns.iter().find(|column| match attributes.get(**column) {
                Some(value) if !value.is_null() => store.count_where(table, &[(**column, value)], None) > 0,
                _ => false,
            });

            match collision {
                Some(column) => {
                    tracing::debug!(table, column, attempt, "unique collision, regenerating");
                }
                None => {
                    let row = store.insert(table, attributes);
                    tracing::debug!(table, id = ?row.get("id"), "created record");
                    return Ok(row);
                }
            }
        }

        Err(FactoryError::UniqueExhausted {
            table: table.to_string(),
            column: unique_columns.join(","),
            attempts: MAX_UNIQUE_ATTEMPTS,
        })
    }

    pub fn create(&self, store: &RecordStore) -> FactoryResult<F::Model> {
        let row = self.create_raw(store)?;
        Ok(serde_json::from_value(Value::Object(row))?)
    }

    pub fn create_many(&self, store: &RecordStore, count: usize) -> FactoryResult<Vec<F::Model>> {
        (0..count).map(|_| self.create(store)).collect()
    }

    fn resolve_parents(&self, store: &RecordStore, attributes: &mut Attributes) -> FactoryResult<()> {
        for relation in self.factory.belongs_to() {
            // an explicit null on an optional key is kept
            let unset = match attributes.get(relation.column) {
                None => true,
                Some(Value::Null) => !relation.optional,
                Some(_) => false,
            };
            if !unset {
                continue;
            }

            match store.random_id(relation.parent_table) {
                Some(id) => {
                    attributes.insert(relation.column.to_string(), Value::from(id));
                }
                None if relation.optional => {
                    attributes.insert(relation.column.to_string(), Value::Null);
                }
                None => {
                    return Err(FactoryError::MissingParent {
                        table: F::Model::table_name().to_string(),
                        column: relation.column.to_string(),
                        parent: relation.parent_table.to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::states::{ActiveState, CustomState, InactiveState};
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, Serialize, Deserialize)]
    struct Widget {
        id: Option<i64>,
        owner_id: Option<i64>,
        code: String,
        is_active: bool,
        created_at: Option<DateTime<Utc>>,
        updated_at: Option<DateTime<Utc>>,
    }

    impl Model for Widget {
        fn table_name() -> &'static str {
            "widgets"
        }
    }

    #[derive(Default)]
    struct WidgetFactory {
        calls: AtomicUsize,
        fixed_code: bool,
        optional_owner: bool,
    }

    impl Factory for WidgetFactory {
        type Model = Widget;

        fn definition(&self) -> Attributes {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            let code = if self.fixed_code { "W-0".to_string() } else { format!("W-{n}") };
            let mut attributes = Attributes::new();
            attributes.insert("owner_id".into(), Value::Null);
            attributes.insert("code".into(), json!(code));
            attributes.insert("is_active".into(), json!(true));
            attributes
        }

        fn state(&self, name: &str) -> Option<Box<dyn FactoryState>> {
            match name {
                "inactive" => Some(Box::new(InactiveState)),
                _ => None,
            }
        }

        fn state_names(&self) -> &'static [&'static str] {
            &["inactive"]
        }

        fn belongs_to(&self) -> Vec<BelongsTo> {
            if self.optional_owner {
                vec![BelongsTo::optional("owner_id", "owners")]
            } else {
                vec![BelongsTo::required("owner_id", "owners")]
            }
        }

        fn unique_columns(&self) -> &'static [&'static str] {
            &["code"]
        }
    }

    #[test]
    fn test_states_apply_in_order_then_overrides() {
        let builder = WidgetFactory::default()
            .builder()
            .state_named("inactive")
            .state(ActiveState)
            .with("code", "FIXED");

        let widget = builder.make().unwrap();
        assert!(widget.is_active);
        assert_eq!(widget.code, "FIXED");
        assert!(widget.id.is_none());

        let widget = WidgetFactory::default()
            .builder()
            .state(ActiveState)
            .state(CustomState::new("off").with_bool_flag("is_active", false))
            .make()
            .unwrap();
        assert!(!widget.is_active);
    }

    #[test]
    fn test_unknown_state_is_an_error() {
        let err = WidgetFactory::default().builder().state_named("shiny").raw().unwrap_err();
        assert!(matches!(err, FactoryError::UnknownState { ref state, .. } if state == "shiny"));
    }

    #[test]
    fn test_create_requires_parent_rows() {
        let store = RecordStore::new();
        let err = WidgetFactory::default().builder().create(&store).unwrap_err();
        assert!(matches!(err, FactoryError::MissingParent { ref parent, .. } if parent == "owners"));

        let optional = WidgetFactory {
            optional_owner: true,
            ..Default::default()
        };
        let widget = optional.builder().create(&store).unwrap();
        assert!(widget.owner_id.is_none());
    }

    #[test]
    fn test_create_assigns_id_timestamps_and_parent() {
        let store = RecordStore::new();
        store.insert("owners", Attributes::new());

        let widgets = WidgetFactory::default().builder().create_many(&store, 3).unwrap();
        assert_eq!(widgets.len(), 3);
        assert_eq!(widgets[0].id, Some(1));
        assert_eq!(widgets[2].id, Some(3));
        assert!(widgets.iter().all(|w| w.owner_id == Some(1)));
        assert!(widgets[0].created_at.is_some());
        assert_eq!(store.count("widgets"), 3);
    }

    #[test]
    fn test_unique_collisions_are_retried_then_exhausted() {
        let store = RecordStore::new();
        store.insert("owners", Attributes::new());

        let fixed = WidgetFactory {
            fixed_code: true,
            ..Default::default()
        };
        fixed.builder().create(&store).unwrap();

        let builder = WidgetFactory {
            fixed_code: true,
            ..Default::default()
        }
        .builder();
        let err = builder.create(&store).unwrap_err();
        assert!(matches!(err, FactoryError::UniqueExhausted { attempts: MAX_UNIQUE_ATTEMPTS, .. }));
        assert_eq!(builder.factory().calls.load(Ordering::SeqCst), MAX_UNIQUE_ATTEMPTS);
    }
}
