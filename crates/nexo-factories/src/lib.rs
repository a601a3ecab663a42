//! # nexo-factories
//!
//! Model factories for the nexo platform: Spanish-locale fake data, named
//! states, an in-memory [`RecordStore`] that resolves foreign keys and
//! answers validation presence checks, and dependency-ordered seeders.
//!
//! ```ignore
//! let store = RecordStore::new();
//! let users = UserFactory::default().builder().state_named("admin").create_many(&store, 3)?;
//! ```

pub mod error;
pub mod factory;
pub mod fake;
pub mod registry;
pub mod seeder;
pub mod sequence;
pub mod states;
pub mod store;
pub mod traits;

pub use error::{FactoryError, FactoryResult};
pub use factory::{Factory, FactoryBuilder, MAX_UNIQUE_ATTEMPTS};
pub use registry::{DynFactory, FactoryRegistry};
pub use seeder::{Environment, FactorySeeder, Seeder, SeederManager};
pub use sequence::Sequence;
pub use states::{
    ActiveState, CustomState, DraftState, FeaturedState, InactiveState, PublishedState, StateFn, VerifiedState,
};
pub use store::RecordStore;
pub use traits::{Attributes, BelongsTo, FactoryState, HasFactory, Model};

#[doc(hidden)]
pub use serde_json as __serde_json;
