//! Factory trait definitions and core abstractions

use crate::error::FactoryResult;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

/// Column name -> value, as produced by a factory definition
pub type Attributes = Map<String, Value>;

/// A persisted entity that factories can produce
pub trait Model: Serialize + DeserializeOwned + Send + Sync + 'static {
    fn table_name() -> &'static str;
}

/// Trait for factory states that modify generated attributes
pub trait FactoryState: Send + Sync {
    /// Apply state modifications to the attributes
    fn apply(&self, attributes: &mut Attributes) -> FactoryResult<()>;

    /// Get the name of this state for debugging
    fn state_name(&self) -> &str;
}

/// A foreign key filled from an existing parent row on `create`.
///
/// Missing keys are always resolved. A key explicitly set to null is resolved
/// only when the relation is required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BelongsTo {
    pub column: &'static str,
    pub parent_table: &'static str,
    /// Left null instead of failing when the parent table is empty
    pub optional: bool,
}

impl BelongsTo {
    pub const fn required(column: &'static str, parent_table: &'static str) -> Self {
        Self {
            column,
            parent_table,
            optional: false,
        }
    }

    pub const fn optional(column: &'static str, parent_table: &'static str) -> Self {
        Self {
            column,
            parent_table,
            optional: true,
        }
    }
}

/// Models that name their default factory
pub trait HasFactory: Model + Sized {
    type Factory: crate::Factory<Model = Self> + Default;

    fn factory() -> crate::FactoryBuilder<Self::Factory> {
        crate::FactoryBuilder::new(Self::Factory::default())
    }
}
