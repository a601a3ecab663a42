use crate::models::culture::{AWARD_CATEGORIES, FIRST_WINNER_YEAR, MUSIC_GENRES};
use crate::models::{Artist, Award, AwardWinner, Person};
use chrono::{Datelike, Duration, NaiveDate};
use nexo_factories::{fake, ActiveState, BelongsTo, Factory, FactoryState, HasFactory, Sequence, StateFn};
use serde_json::{json, Value};

/// Last year the award winner factory draws from
pub const LAST_WINNER_YEAR: i32 = 2024;

const NATIONALITIES: &[&str] = &["ES", "ES", "ES", "ES", "PT", "FR", "AR", "MX", "IT"];

#[derive(Debug, Default, Clone)]
pub struct PersonFactory;

impl Factory for PersonFactory {
    type Model = Person;

    fn definition(&self) -> nexo_factories::Attributes {
        let today = chrono::Utc::now().date_naive();

        attributes! {
            "first_name" => fake::first_name(),
            "last_name" => format!("{} {}", fake::last_name(), fake::last_name()),
            "birth_date" => fake::date_between(today - Duration::days(94 * 365), today - Duration::days(20 * 365)),
            "death_date" => Value::Null,
            "nationality" => fake::random_element(NATIONALITIES),
            "biography" => fake::optional(0.6, || fake::text(800)),
        }
    }

    fn state(&self, name: &str) -> Option<Box<dyn FactoryState>> {
        states!(name, {
            "deceased" => StateFn::new("deceased", |attributes| {
                let birth = attributes
                    .get("birth_date")
                    .and_then(Value::as_str)
                    .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
                    .unwrap_or_else(|| fake::past_date(80));
                let yesterday = chrono::Utc::now().date_naive() - Duration::days(1);
                let death = fake::date_between(birth + Duration::days(18 * 365), yesterday);
                attributes.insert("death_date".into(), json!(death.max(birth)));
            }),
        })
    }

    fn state_names(&self) -> &'static [&'static str] {
        &["deceased"]
    }
}

impl HasFactory for Person {
    type Factory = PersonFactory;
}

/// Stage name patterns and home countries per genre
fn genre_profile(genre: &str) -> (&'static [&'static str], &'static [&'static str]) {
    match genre {
        "flamenco" => (&["El {last}", "La Niña de {first}", "{first} de {town}"], &["ES"]),
        "folk" => (&["{first} {last}", "Cantares de {town}", "Banda {word}"], &["ES", "PT"]),
        "rock" => (&["Los {word}s", "{word} Eléctrico", "{first} y los {word}s"], &["ES", "AR", "MX"]),
        "electronic" => (&["DJ {first}", "{word} Sound System", "{first}{last}"], &["ES", "FR", "DE"]),
        "classical" => (&["{first} {last}", "Cuarteto {town}", "Orquesta de {town}"], &["ES", "IT", "AT"]),
        "hip_hop" => (&["MC {first}", "{word} Crew", "{first} {word}"], &["ES", "US", "MX"]),
        "jazz" => (&["{first} {last} Trío", "{town} Jazz Band"], &["ES", "US", "FR"]),
        _ => (&["{first} {last}", "{word}", "{first}"], &["ES", "MX", "CO", "AR"]),
    }
}

#[derive(Debug, Default, Clone)]
pub struct ArtistFactory;

impl Factory for ArtistFactory {
    type Model = Artist;

    fn definition(&self) -> nexo_factories::Attributes {
        let genre = fake::random_element(MUSIC_GENRES);
        let (patterns, countries) = genre_profile(genre);
        let mut word = fake::word();
        if let Some(first) = word.chars().next() {
            let upper: String = first.to_uppercase().collect();
            word.replace_range(..first.len_utf8(), &upper);
        }
        let stage_name = fake::random_element(patterns)
            .replace("{first}", &fake::first_name())
            .replace("{last}", &fake::last_name())
            .replace("{town}", &fake::municipality().1)
            .replace("{word}", &word);
        let current_year = chrono::Utc::now().year();

        attributes! {
            "stage_name" => stage_name,
            "genre" => genre,
            "country" => fake::random_element(countries),
            "biography" => fake::optional(0.7, || fake::text(1_000)),
            "active_since" => fake::number_between(1960, current_year as i64),
            "is_active" => fake::random_bool(0.8),
        }
    }

    fn state(&self, name: &str) -> Option<Box<dyn FactoryState>> {
        states!(name, { "active" => ActiveState })
    }

    fn state_names(&self) -> &'static [&'static str] {
        &["active"]
    }

    fn belongs_to(&self) -> Vec<BelongsTo> {
        vec![BelongsTo::optional("person_id", "people")]
    }
}

impl HasFactory for Artist {
    type Factory = ArtistFactory;
}

/// (name, organization, first year) per award category
fn award_catalogue(category: &str) -> &'static [(&'static str, &'static str, i32)] {
    match category {
        "music" => &[
            ("Premio Nacional de las Músicas Actuales", "Ministerio de Cultura", 2009),
            ("Premios MIN", "Unión Fonográfica Independiente", 2009),
            ("Premio Ondas de Música", "Radio Barcelona", 1954),
        ],
        "literature" => &[
            ("Premio Cervantes", "Ministerio de Cultura", 1976),
            ("Premio Nacional de Narrativa", "Ministerio de Cultura", 1977),
            ("Premio Euskadi de Literatura", "Gobierno Vasco", 1989),
        ],
        "cinema" => &[
            ("Premio Goya", "Academia de Cine", 1987),
            ("Concha de Oro", "Festival de San Sebastián", 1957),
        ],
        "science" => &[
            ("Premio Princesa de Asturias de Investigación", "Fundación Princesa de Asturias", 1981),
            ("Premio Nacional de Investigación", "Ministerio de Ciencia", 1982),
        ],
        _ => &[
            ("Premio Medio Ambiente", "Fundación Biodiversidad", 1998),
            ("Premio Cooperativa Sostenible", "Cooperativas Agro-alimentarias", 2005),
        ],
    }
}

static AWARD_SLUGS: Sequence = Sequence::starting_at(1);

#[derive(Debug, Default, Clone)]
pub struct AwardFactory;

impl Factory for AwardFactory {
    type Model = Award;

    fn definition(&self) -> nexo_factories::Attributes {
        let category = fake::random_element(AWARD_CATEGORIES);
        let (name, organization, first_year) = fake::random_element(award_catalogue(category));

        attributes! {
            "name" => name,
            "slug" => AWARD_SLUGS.next_with(&fake::slugify(name)),
            "category" => category,
            "organization" => organization,
            "description" => fake::optional(0.7, fake::sentence),
            "first_awarded_year" => first_year,
            "is_active" => fake::random_bool(0.9),
        }
    }

    fn unique_columns(&self) -> &'static [&'static str] {
        &["slug"]
    }
}

impl HasFactory for Award {
    type Factory = AwardFactory;
}

#[derive(Debug, Default, Clone)]
pub struct AwardWinnerFactory;

impl Factory for AwardWinnerFactory {
    type Model = AwardWinner;

    fn definition(&self) -> nexo_factories::Attributes {
        let work_title = fake::optional(0.7, || {
            let title = fake::sentence_between(2, 5);
            title.trim_end_matches('.').to_string()
        });

        attributes! {
            "year" => fake::number_between(FIRST_WINNER_YEAR as i64, LAST_WINNER_YEAR as i64),
            "category" => fake::optional(0.4, || fake::random_element(&["Mejor obra", "Trayectoria", "Revelación"])),
            "work_title" => work_title,
            "is_shared" => fake::random_bool(0.1),
        }
    }

    fn state(&self, name: &str) -> Option<Box<dyn FactoryState>> {
        states!(name, {
            "shared" => nexo_factories::CustomState::new("shared").with_bool_flag("is_shared", true),
        })
    }

    fn state_names(&self) -> &'static [&'static str] {
        &["shared"]
    }

    fn belongs_to(&self) -> Vec<BelongsTo> {
        vec![
            BelongsTo::required("award_id", "awards"),
            BelongsTo::required("person_id", "people"),
        ]
    }
}

impl HasFactory for AwardWinner {
    type Factory = AwardWinnerFactory;
}
