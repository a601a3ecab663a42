//! Model factories.
//!
//! Every factory emits attributes that pass the matching store request, so
//! seeded data can be replayed through validation.

use nexo_factories::FactoryRegistry;

/// Build an attribute map from `"column" => value` pairs
macro_rules! attributes {
    ($($key:literal => $value:expr),* $(,)?) => {{
        let mut attributes = nexo_factories::Attributes::new();
        $(
            attributes.insert($key.to_string(), serde_json::json!($value));
        )*
        attributes
    }};
}

/// Look up a named state among `name => state` arms
macro_rules! states {
    ($name:expr, { $($label:literal => $state:expr),* $(,)? }) => {
        match $name {
            $($label => Some(Box::new($state) as Box<dyn nexo_factories::FactoryState>),)*
            _ => None,
        }
    };
}

pub mod accounts;
pub mod community;
pub mod culture;
pub mod energy;
pub mod news;

pub use accounts::{ApiKeyFactory, UserFactory};
pub use community::{AchievementFactory, InteractionFactory, UserGeneratedContentFactory};
pub use culture::{ArtistFactory, AwardFactory, AwardWinnerFactory, PersonFactory};
pub use energy::{
    CarbonEquivalenceFactory, CooperativeFactory, EnergyServiceFactory, MunicipalityFactory, PlantSpeciesFactory,
};
pub use news::{NewsArticleFactory, TopicFactory};

/// Every factory, addressable by table name
pub fn registry() -> FactoryRegistry {
    FactoryRegistry::new()
        .register::<UserFactory>()
        .register::<ApiKeyFactory>()
        .register::<PersonFactory>()
        .register::<ArtistFactory>()
        .register::<AwardFactory>()
        .register::<AwardWinnerFactory>()
        .register::<MunicipalityFactory>()
        .register::<CooperativeFactory>()
        .register::<EnergyServiceFactory>()
        .register::<CarbonEquivalenceFactory>()
        .register::<PlantSpeciesFactory>()
        .register::<TopicFactory>()
        .register::<NewsArticleFactory>()
        .register::<UserGeneratedContentFactory>()
        .register::<InteractionFactory>()
        .register::<AchievementFactory>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_every_table() {
        let registry = registry();
        assert_eq!(registry.len(), 16);
        assert!(registry.get("award_winners").is_ok());
        assert!(registry.get("cooperatives").unwrap().state_names().contains(&"verified"));
    }
}
