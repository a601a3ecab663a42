//! The database seeder: every factory, in foreign-key order.

use crate::factories::*;
use nexo_factories::{Environment, Factory, FactorySeeder, SeederManager};
use serde::{Deserialize, Serialize};

/// Rows created per table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedCounts {
    pub users: usize,
    pub admins: usize,
    pub people: usize,
    pub municipalities: usize,
    pub cooperatives: usize,
    pub energy_services: usize,
    pub carbon_equivalences: usize,
    pub plant_species: usize,
    pub topics: usize,
    pub news_articles: usize,
    pub artists: usize,
    pub awards: usize,
    pub award_winners: usize,
    pub api_keys: usize,
    pub user_generated_contents: usize,
    pub interactions: usize,
    pub achievements: usize,
}

impl Default for SeedCounts {
    fn default() -> Self {
        Self {
            users: 20,
            admins: 1,
            people: 30,
            municipalities: 15,
            cooperatives: 12,
            energy_services: 30,
            carbon_equivalences: 20,
            plant_species: 25,
            topics: 8,
            news_articles: 40,
            artists: 15,
            awards: 10,
            award_winners: 25,
            api_keys: 10,
            user_generated_contents: 50,
            interactions: 30,
            achievements: 15,
        }
    }
}

impl SeedCounts {
    /// Rows in `users`, admins included
    pub fn total_users(&self) -> usize {
        self.users + self.admins
    }

    /// Expected row count per table after a full run
    pub fn per_table(&self) -> Vec<(&'static str, usize)> {
        vec![
            ("users", self.total_users()),
            ("people", self.people),
            ("municipalities", self.municipalities),
            ("cooperatives", self.cooperatives),
            ("energy_services", self.energy_services),
            ("carbon_equivalences", self.carbon_equivalences),
            ("plant_species", self.plant_species),
            ("topics", self.topics),
            ("news_articles", self.news_articles),
            ("artists", self.artists),
            ("awards", self.awards),
            ("award_winners", self.award_winners),
            ("api_keys", self.api_keys),
            ("user_generated_contents", self.user_generated_contents),
            ("interactions", self.interactions),
            ("achievements", self.achievements),
        ]
    }
}

pub struct DatabaseSeeder;

impl DatabaseSeeder {
    /// The full seeder set with default counts
    pub fn manager() -> SeederManager {
        Self::with_counts(&SeedCounts::default())
    }

    pub fn with_counts(counts: &SeedCounts) -> SeederManager {
        let local = vec![Environment::Development, Environment::Testing];

        SeederManager::new()
            // roots
            .add(FactorySeeder::new("users", UserFactory.builder(), counts.users).with_priority(10))
            .add(
                FactorySeeder::new("admins", UserFactory.builder().state_named("admin"), counts.admins)
                    .with_priority(10)
                    .environments(local)
                    .depends_on(["users"]),
            )
            .add(FactorySeeder::new("people", PersonFactory.builder(), counts.people).with_priority(10))
            .add(
                FactorySeeder::new("municipalities", MunicipalityFactory.builder(), counts.municipalities)
                    .with_priority(10),
            )
            // energy
            .add(
                FactorySeeder::new("cooperatives", CooperativeFactory.builder(), counts.cooperatives)
                    .depends_on(["municipalities"]),
            )
            .add(
                FactorySeeder::new("energy_services", EnergyServiceFactory.builder(), counts.energy_services)
                    .depends_on(["cooperatives"]),
            )
            .add_factory(
                "carbon_equivalences",
                CarbonEquivalenceFactory.builder(),
                counts.carbon_equivalences,
            )
            .add_factory("plant_species", PlantSpeciesFactory.builder(), counts.plant_species)
            // news
            .add(FactorySeeder::new("topics", TopicFactory.builder(), counts.topics).with_priority(20))
            .add(
                FactorySeeder::new("news_articles", NewsArticleFactory.builder(), counts.news_articles)
                    .depends_on(["topics"]),
            )
            // culture
            .add(FactorySeeder::new("artists", ArtistFactory.builder(), counts.artists).depends_on(["people"]))
            .add(FactorySeeder::new("awards", AwardFactory.builder(), counts.awards).with_priority(20))
            .add(
                FactorySeeder::new("award_winners", AwardWinnerFactory.builder(), counts.award_winners)
                    .depends_on(["awards", "people"]),
            )
            // accounts and community
            .add(FactorySeeder::new("api_keys", ApiKeyFactory.builder(), counts.api_keys).depends_on(["users"]))
            .add(
                FactorySeeder::new(
                    "user_generated_contents",
                    UserGeneratedContentFactory.builder(),
                    counts.user_generated_contents,
                )
                .depends_on(["users"]),
            )
            .add(
                FactorySeeder::new("interactions", InteractionFactory.builder(), counts.interactions)
                    .depends_on(["users"]),
            )
            .add_factory("achievements", AchievementFactory.builder(), counts.achievements)
    }
}
