use crate::models::{NewsArticle, Topic, LANGUAGES};
use nexo_factories::{
    fake, BelongsTo, DraftState, Factory, FactoryState, FeaturedState, HasFactory, InactiveState, PublishedState,
    Sequence,
};

/// (name, icon) pairs topics are drawn from
const TOPICS: &[(&str, &str)] = &[
    ("Transición energética", "bolt"),
    ("Autoconsumo", "sun"),
    ("Cooperativismo", "users"),
    ("Cambio climático", "thermometer"),
    ("Movilidad sostenible", "bicycle"),
    ("Cultura", "music"),
    ("Biodiversidad", "leaf"),
    ("Economía social", "handshake"),
];

static TOPIC_SLUGS: Sequence = Sequence::starting_at(1);
static ARTICLE_SLUGS: Sequence = Sequence::starting_at(1);

#[derive(Debug, Default, Clone)]
pub struct TopicFactory;

impl Factory for TopicFactory {
    type Model = Topic;

    fn definition(&self) -> nexo_factories::Attributes {
        let (name, icon) = fake::random_element(TOPICS);

        attributes! {
            "name" => name,
            "slug" => TOPIC_SLUGS.next_with(&fake::slugify(name)),
            "description" => fake::optional(0.8, fake::sentence),
            "color" => fake::hex_color(),
            "icon" => icon,
            "is_active" => true,
        }
    }

    fn state(&self, name: &str) -> Option<Box<dyn FactoryState>> {
        states!(name, { "inactive" => InactiveState })
    }

    fn state_names(&self) -> &'static [&'static str] {
        &["inactive"]
    }

    fn unique_columns(&self) -> &'static [&'static str] {
        &["slug"]
    }
}

impl HasFactory for Topic {
    type Factory = TopicFactory;
}

const HEADLINE_OPENERS: &[&str] = &[
    "La cooperativa",
    "Vecinos de",
    "El ayuntamiento de",
    "Nuevo proyecto en",
    "Récord de autoconsumo en",
];

const MEDIA: &[&str] = &["El Salto", "Diario Rural", "Agencia Clima", "Revista Comunitaria", "Nexo Noticias"];

#[derive(Debug, Default, Clone)]
pub struct NewsArticleFactory;

impl Factory for NewsArticleFactory {
    type Model = NewsArticle;

    fn definition(&self) -> nexo_factories::Attributes {
        let (_, town) = fake::municipality();
        let title = format!(
            "{} {} {}",
            fake::random_element(HEADLINE_OPENERS),
            town,
            fake::sentence_between(3, 6).to_lowercase().trim_end_matches('.')
        );
        let published = fake::random_bool(0.7);
        let tag_count = fake::number_between(0, 5) as usize;

        attributes! {
            "title" => title,
            "slug" => ARTICLE_SLUGS.next_with(&fake::slugify(&title)),
            "summary" => fake::optional(0.9, || fake::text(300)),
            "content" => fake::paragraphs(3),
            "source_url" => fake::optional(0.6, fake::url),
            "author" => fake::optional(0.8, || format!("{} / {}", fake::name(), fake::random_element(MEDIA))),
            "status" => if published { "published" } else { "draft" },
            "published_at" => published.then(|| fake::past_datetime(180).to_rfc3339()),
            "views_count" => if published { fake::number_between(0, 25_000) } else { 0 },
            "is_featured" => fake::random_bool(0.1),
            "language" => if fake::random_bool(0.8) { "es" } else { fake::random_element(LANGUAGES) },
            "tags" => fake::words(tag_count),
        }
    }

    fn state(&self, name: &str) -> Option<Box<dyn FactoryState>> {
        states!(name, {
            "published" => PublishedState,
            "draft" => DraftState,
            "featured" => FeaturedState,
        })
    }

    fn state_names(&self) -> &'static [&'static str] {
        &["published", "draft", "featured"]
    }

    fn belongs_to(&self) -> Vec<BelongsTo> {
        vec![BelongsTo::required("topic_id", "topics")]
    }

    fn unique_columns(&self) -> &'static [&'static str] {
        &["slug"]
    }
}

impl HasFactory for NewsArticle {
    type Factory = NewsArticleFactory;
}
