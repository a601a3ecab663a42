//! Persisted entities, one serde struct per table.
//!
//! Enumerated columns are plain strings; the accepted values live next to
//! each model so factories and requests draw from the same list.

pub mod accounts;
pub mod community;
pub mod culture;
pub mod energy;
pub mod news;

pub use accounts::{ApiKey, User};
pub use community::{Achievement, Interaction, UserGeneratedContent};
pub use culture::{Artist, Award, AwardWinner, Person};
pub use energy::{CarbonEquivalence, Cooperative, EnergyService, Municipality, PlantSpecies};
pub use news::{NewsArticle, Topic};

/// Languages content can be written in
pub const LANGUAGES: &[&str] = &["es", "ca", "eu", "gl", "en"];

macro_rules! table {
    ($($model:ty => $table:literal),* $(,)?) => {
        $(
            impl nexo_factories::Model for $model {
                fn table_name() -> &'static str {
                    $table
                }
            }
        )*
    };
}

table! {
    User => "users",
    ApiKey => "api_keys",
    Person => "people",
    Artist => "artists",
    Award => "awards",
    AwardWinner => "award_winners",
    Municipality => "municipalities",
    Cooperative => "cooperatives",
    EnergyService => "energy_services",
    CarbonEquivalence => "carbon_equivalences",
    PlantSpecies => "plant_species",
    Topic => "topics",
    NewsArticle => "news_articles",
    UserGeneratedContent => "user_generated_contents",
    Interaction => "interactions",
    Achievement => "achievements",
}

/// `"in:a,b,c"` for a value list
pub fn in_rule(values: &[&str]) -> String {
    format!("in:{}", values.join(","))
}
