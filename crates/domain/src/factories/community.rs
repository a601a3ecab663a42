use crate::models::community::{
    points_range, ACHIEVEMENT_CATEGORIES, CONTENT_TYPES, INTERACTABLE_TYPES, OUTCOMES, RARITIES, RELATED_TYPES,
    SENTIMENTS,
};
use crate::models::{Achievement, Interaction, UserGeneratedContent, LANGUAGES};
use nexo_factories::{factory_state, fake, BelongsTo, CustomState, Factory, FactoryState, HasFactory, Sequence, StateFn};
use serde_json::{json, Value};

factory_state!(SecretAchievementState as "secret" { is_secret: true, icon: "lock" });

#[derive(Debug, Default, Clone)]
pub struct UserGeneratedContentFactory;

impl Factory for UserGeneratedContentFactory {
    type Model = UserGeneratedContent;

    fn definition(&self) -> nexo_factories::Attributes {
        let content_type = fake::random_element(CONTENT_TYPES);
        let mut attributes = attributes! {
            "content_type" => content_type,
            "related_type" => fake::random_element(RELATED_TYPES),
            "related_id" => fake::number_between(1, 500),
            "title" => Value::Null,
            "content" => fake::text(600),
            "rating" => Value::Null,
            "media_url" => Value::Null,
            "language" => if fake::random_bool(0.85) { "es" } else { fake::random_element(LANGUAGES) },
            "is_anonymous" => false,
            "status" => "pending",
            "moderated_at" => Value::Null,
            "moderation_notes" => Value::Null,
        };

        // shape per content type
        match content_type {
            "review" => {
                attributes.insert("title".into(), json!(fake::sentence_between(3, 6)));
                attributes.insert("rating".into(), json!(fake::number_between(1, 5)));
            }
            "photo" => {
                attributes.insert("media_url".into(), json!(format!("{}.jpg", fake::url())));
                attributes.insert("content".into(), json!(fake::sentence()));
            }
            "suggestion" => {
                attributes.insert("title".into(), json!(fake::sentence_between(3, 6)));
                attributes.insert("is_anonymous".into(), json!(fake::random_bool(0.2)));
            }
            "comment" => {
                attributes.insert("is_anonymous".into(), json!(fake::random_bool(0.1)));
            }
            _ => {}
        }

        attributes
    }

    fn state(&self, name: &str) -> Option<Box<dyn FactoryState>> {
        states!(name, {
            "approved" => CustomState::new("approved").with_status("approved").with_now("moderated_at"),
            "rejected" => CustomState::new("rejected")
                .with_status("rejected")
                .with_now("moderated_at")
                .with("moderation_notes", json!("El contenido no cumple las normas de la comunidad.")),
            "pending" => CustomState::new("pending")
                .with_status("pending")
                .with_null("moderated_at")
                .with_null("moderation_notes"),
            // corrections are never anonymous
            "anonymous" => StateFn::new("anonymous", |attributes| {
                if attributes.get("content_type").and_then(Value::as_str) == Some("correction") {
                    attributes.insert("content_type".into(), json!("comment"));
                }
                attributes.insert("is_anonymous".into(), json!(true));
            }),
        })
    }

    fn state_names(&self) -> &'static [&'static str] {
        &["approved", "rejected", "anonymous", "pending"]
    }

    fn belongs_to(&self) -> Vec<BelongsTo> {
        vec![BelongsTo::required("user_id", "users")]
    }
}

impl HasFactory for UserGeneratedContent {
    type Factory = UserGeneratedContentFactory;
}

/// Channel options and duration range in minutes per interaction type
fn interaction_shape(interaction_type: &str) -> (&'static [&'static str], Option<(i64, i64)>) {
    match interaction_type {
        "call" => (&["phone"], Some((5, 60))),
        "meeting" => (&["in_person", "video"], Some((30, 120))),
        "visit" => (&["in_person"], Some((20, 180))),
        "event" => (&["in_person", "social"], Some((60, 480))),
        "email" => (&["email"], None),
        _ => (&["chat", "social"], None),
    }
}

#[derive(Debug, Default, Clone)]
pub struct InteractionFactory;

impl Factory for InteractionFactory {
    type Model = Interaction;

    fn definition(&self) -> nexo_factories::Attributes {
        let interaction_type = fake::random_element(crate::models::community::INTERACTION_TYPES);
        let (channels, duration) = interaction_shape(interaction_type);
        let follow_up_needed = fake::random_bool(0.3);

        attributes! {
            "interactable_type" => fake::random_element(INTERACTABLE_TYPES),
            "interactable_id" => fake::number_between(1, 200),
            "interaction_type" => interaction_type,
            "channel" => fake::random_element(channels),
            "outcome" => fake::random_element(OUTCOMES),
            "notes" => fake::optional(0.6, || fake::text(400)),
            "sentiment" => fake::optional(0.7, || fake::random_element(SENTIMENTS)),
            "follow_up_needed" => follow_up_needed,
            "follow_up_date" => follow_up_needed.then(|| fake::future_date(60)),
            "duration_minutes" => duration.map(|(min, max)| fake::number_between(min, max)),
        }
    }

    fn state(&self, name: &str) -> Option<Box<dyn FactoryState>> {
        states!(name, {
            "needs_follow_up" => StateFn::new("needs_follow_up", |attributes| {
                attributes.insert("follow_up_needed".into(), json!(true));
                attributes.insert("follow_up_date".into(), json!(fake::future_date(30)));
            }),
        })
    }

    fn state_names(&self) -> &'static [&'static str] {
        &["needs_follow_up"]
    }

    fn belongs_to(&self) -> Vec<BelongsTo> {
        vec![BelongsTo::required("user_id", "users")]
    }
}

impl HasFactory for Interaction {
    type Factory = InteractionFactory;
}

/// Name stems per achievement category
fn achievement_names(category: &str) -> &'static [&'static str] {
    match category {
        "energy" => &["Ahorrador", "Productor solar", "Kilovatio verde", "Cero emisiones"],
        "community" => &["Buen vecino", "Asambleísta", "Voz de la cooperativa"],
        "learning" => &["Curioso", "Experto en tarifas", "Lector incansable"],
        "engagement" => &["Primera reseña", "Constante", "Embajador"],
        _ => &["Melómano", "Cinéfilo", "Agitador cultural"],
    }
}

const ICONS: &[&str] = &["star", "bolt", "leaf", "trophy", "heart", "book", "sun"];

static ACHIEVEMENT_SLUGS: Sequence = Sequence::starting_at(1);

#[derive(Debug, Default, Clone)]
pub struct AchievementFactory;

impl Factory for AchievementFactory {
    type Model = Achievement;

    fn definition(&self) -> nexo_factories::Attributes {
        let category = fake::random_element(ACHIEVEMENT_CATEGORIES);
        let rarity = fake::random_element(RARITIES);
        let (min, max) = points_range(rarity);
        let name = fake::random_element(achievement_names(category));

        attributes! {
            "name" => name,
            "slug" => ACHIEVEMENT_SLUGS.next_with(&fake::slugify(name)),
            "description" => fake::sentence(),
            "category" => category,
            "rarity" => rarity,
            "points" => fake::number_between(min, max),
            "icon" => fake::random_element(ICONS),
            "is_secret" => false,
        }
    }

    fn state(&self, name: &str) -> Option<Box<dyn FactoryState>> {
        states!(name, { "secret" => SecretAchievementState })
    }

    fn state_names(&self) -> &'static [&'static str] {
        &["secret"]
    }

    fn unique_columns(&self) -> &'static [&'static str] {
        &["slug"]
    }
}

impl HasFactory for Achievement {
    type Factory = AchievementFactory;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::community::TIMED_INTERACTIONS;

    #[test]
    fn test_content_shape_follows_type() {
        for content in UserGeneratedContent::factory().make_many(60).unwrap() {
            match content.content_type.as_str() {
                "review" => assert!(matches!(content.rating, Some(1..=5))),
                "photo" => assert!(content.media_url.is_some()),
                _ => assert!(content.rating.is_none()),
            }
            if content.content_type == "correction" {
                assert!(!content.is_anonymous);
            }
        }
    }

    #[test]
    fn test_anonymous_state_never_yields_anonymous_corrections() {
        let items = UserGeneratedContent::factory()
            .state_named("anonymous")
            .make_many(40)
            .unwrap();
        assert!(items.iter().all(|c| c.is_anonymous && c.content_type != "correction"));
    }

    #[test]
    fn test_interaction_shape() {
        for interaction in Interaction::factory().make_many(60).unwrap() {
            if TIMED_INTERACTIONS.contains(&interaction.interaction_type.as_str()) {
                assert!(interaction.duration_minutes.is_some());
            }
            assert_eq!(interaction.follow_up_needed, interaction.follow_up_date.is_some());
        }

        let pending = Interaction::factory().state_named("needs_follow_up").make().unwrap();
        assert!(pending.follow_up_needed);
        assert!(pending.follow_up_date.unwrap() > chrono::Utc::now().date_naive());
    }

    #[test]
    fn test_points_follow_rarity() {
        for achievement in Achievement::factory().make_many(50).unwrap() {
            let (min, max) = points_range(&achievement.rarity);
            assert!((min..=max).contains(&achievement.points));
        }
        assert!(Achievement::factory().state_named("secret").make().unwrap().is_secret);
    }
}
