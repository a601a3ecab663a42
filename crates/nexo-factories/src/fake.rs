//! Spanish-locale fake data for factories.
//!
//! Every generator draws from one thread-local RNG so a run can be replayed
//! with [`seed_fake_data`].

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;

thread_local! {
    static RNG: RefCell<StdRng> = RefCell::new(StdRng::from_entropy());
}

/// Initialize RNG with a specific seed for deterministic generation
pub fn seed_fake_data(seed: u64) {
    RNG.with(|rng| {
        *rng.borrow_mut() = StdRng::seed_from_u64(seed);
    });
}

fn with_rng<T>(f: impl FnOnce(&mut StdRng) -> T) -> T {
    RNG.with(|rng| f(&mut rng.borrow_mut()))
}

const FIRST_NAMES: &[&str] = &[
    "Ainhoa", "Alba", "Alejandro", "Ander", "Andrea", "Antonio", "Carmen", "Daniel", "Elena", "Enrique", "Francisco",
    "Iker", "Irene", "Javier", "Jordi", "Josefa", "Laia", "Lucía", "Manuel", "María", "Marta", "Miguel", "Montserrat",
    "Nerea", "Pablo", "Paula", "Pilar", "Raúl", "Rocío", "Sergio", "Xabier", "Xoán",
];

const LAST_NAMES: &[&str] = &[
    "García", "Fernández", "González", "Rodríguez", "López", "Martínez", "Sánchez", "Pérez", "Gómez", "Martín",
    "Jiménez", "Ruiz", "Hernández", "Díaz", "Moreno", "Álvarez", "Romero", "Navarro", "Torres", "Etxeberria",
    "Puig", "Ferrer", "Castro", "Otero", "Iglesias", "Vidal",
];

const WORDS: &[&str] = &[
    "energía", "comunidad", "solar", "cooperativa", "consumo", "local", "red", "ahorro", "transición", "renovable",
    "vecinos", "proyecto", "instalación", "autoconsumo", "eficiencia", "cultura", "territorio", "agua", "bosque",
    "clima", "futuro", "participación", "socios", "asamblea", "barrio", "mercado", "producción", "eólica",
    "movilidad", "sostenible", "información", "datos", "rural", "huerta", "biodiversidad", "compartida",
];

/// Province -> a few of its municipalities
pub const PROVINCES: &[(&str, &[&str])] = &[
    ("Madrid", &["Madrid", "Alcalá de Henares", "Getafe", "Leganés", "Rivas-Vaciamadrid"]),
    ("Barcelona", &["Barcelona", "Sabadell", "Terrassa", "Mataró", "Vic"]),
    ("Valencia", &["Valencia", "Gandia", "Torrent", "Sagunto", "Alzira"]),
    ("Sevilla", &["Sevilla", "Dos Hermanas", "Utrera", "Écija", "Carmona"]),
    ("Bizkaia", &["Bilbao", "Getxo", "Barakaldo", "Durango", "Gernika-Lumo"]),
    ("Gipuzkoa", &["Donostia", "Irun", "Errenteria", "Eibar", "Tolosa"]),
    ("A Coruña", &["A Coruña", "Santiago de Compostela", "Ferrol", "Carballo", "Betanzos"]),
    ("Navarra", &["Pamplona", "Tudela", "Estella-Lizarra", "Tafalla", "Burlada"]),
    ("Zaragoza", &["Zaragoza", "Calatayud", "Utebo", "Ejea de los Caballeros", "Tarazona"]),
    ("Girona", &["Girona", "Figueres", "Olot", "Blanes", "Banyoles"]),
    ("Asturias", &["Oviedo", "Gijón", "Avilés", "Mieres", "Llanes"]),
    ("Málaga", &["Málaga", "Marbella", "Ronda", "Antequera", "Vélez-Málaga"]),
];

const EMAIL_DOMAINS: &[&str] = &["example.es", "correo.test", "coop.test", "ejemplo.org", "nexo.test"];

const URL_HOSTS: &[&str] = &[
    "www.example.es",
    "noticias.example.org",
    "coop.example.net",
    "datos.example.com",
    "cultura.example.eus",
];

/// A random integer in `min..=max`
pub fn number_between(min: i64, max: i64) -> i64 {
    with_rng(|rng| rng.gen_range(min..=max))
}

/// `true` with the given probability (0.0 - 1.0)
pub fn random_bool(probability: f64) -> bool {
    with_rng(|rng| rng.gen_bool(probability.clamp(0.0, 1.0)))
}

/// A random float in `min..=max` rounded to `precision` decimals
pub fn decimal(min: f64, max: f64, precision: u32) -> f64 {
    let raw = with_rng(|rng| rng.gen_range(min..=max));
    let factor = 10f64.powi(precision as i32);
    ((raw * factor).round() / factor).clamp(min, max)
}

/// Pick one element.
///
/// # Panics
/// Panics if `items` is empty.
pub fn random_element<T: Clone>(items: &[T]) -> T {
    let index = with_rng(|rng| rng.gen_range(0..items.len()));
    items[index].clone()
}

/// Pick `count` distinct elements (fewer if `items` is shorter)
pub fn random_elements<T: Clone>(items: &[T], count: usize) -> Vec<T> {
    with_rng(|rng| items.choose_multiple(rng, count).cloned().collect())
}

/// `Some(generate())` with the given probability, else `None`
pub fn optional<T>(probability: f64, generate: impl FnOnce() -> T) -> Option<T> {
    if random_bool(probability) {
        Some(generate())
    } else {
        None
    }
}

/// Replace every `#` with a random digit
pub fn numerify(pattern: &str) -> String {
    pattern
        .chars()
        .map(|c| {
            if c == '#' {
                char::from(b'0' + number_between(0, 9) as u8)
            } else {
                c
            }
        })
        .collect()
}

/// Random ASCII letters and digits
pub fn alphanumeric(length: usize) -> String {
    with_rng(|rng| {
        rng.sample_iter(&rand::distributions::Alphanumeric)
            .take(length)
            .map(char::from)
            .collect()
    })
}

pub fn random_uuid() -> String {
    let bytes: [u8; 16] = with_rng(|rng| rng.gen());
    uuid::Builder::from_random_bytes(bytes).into_uuid().to_string()
}

pub fn first_name() -> String {
    random_element(FIRST_NAMES).to_string()
}

pub fn last_name() -> String {
    random_element(LAST_NAMES).to_string()
}

/// First name and two surnames
pub fn name() -> String {
    format!("{} {} {}", first_name(), last_name(), last_name())
}

pub fn word() -> String {
    random_element(WORDS).to_string()
}

pub fn words(count: usize) -> Vec<String> {
    (0..count).map(|_| word()).collect()
}

/// A capitalized sentence of `min..=max` words
pub fn sentence_between(min: usize, max: usize) -> String {
    let count = number_between(min as i64, max as i64) as usize;
    let mut text = words(count).join(" ");
    if let Some(first) = text.chars().next() {
        let upper: String = first.to_uppercase().collect();
        text.replace_range(..first.len_utf8(), &upper);
    }
    text.push('.');
    text
}

pub fn sentence() -> String {
    sentence_between(6, 12)
}

pub fn paragraph() -> String {
    let count = number_between(3, 6);
    (0..count).map(|_| sentence()).collect::<Vec<_>>().join(" ")
}

pub fn paragraphs(count: usize) -> String {
    (0..count).map(|_| paragraph()).collect::<Vec<_>>().join("\n\n")
}

/// Text trimmed to at most `max` characters, ending on a full stop
pub fn text(max: usize) -> String {
    let mut text = paragraph();
    while text.chars().count() > max {
        match text.trim_end_matches('.').rfind(' ') {
            Some(cut) => {
                text.truncate(cut);
                let kept = text.trim_end_matches('.').len();
                text.truncate(kept);
                text.push('.');
            }
            None => {
                text = text.chars().take(max.saturating_sub(1)).collect();
                text.push('.');
            }
        }
    }
    text
}

/// Lowercase ASCII slug: `Energía Solar` -> `energia-solar`
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for c in text.to_lowercase().chars() {
        let c = match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            'ç' => 'c',
            other => other,
        };
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_end_matches('-').to_string()
}

pub fn email() -> String {
    format!(
        "{}.{}{}@{}",
        slugify(&first_name()),
        slugify(&last_name()),
        number_between(1, 999),
        random_element(EMAIL_DOMAINS)
    )
}

/// Spanish phone: mobile `6## ### ###` or landline `9## ### ###`
pub fn phone() -> String {
    let prefix = random_element(&["6", "7", "9"]);
    numerify(&format!("+34 {}## ### ###", prefix))
}

pub fn url() -> String {
    format!("https://{}/{}", random_element(URL_HOSTS), slugify(&words(2).join(" ")))
}

/// `(province, municipality)`
pub fn municipality() -> (String, String) {
    let (province, towns) = random_element(PROVINCES);
    (province.to_string(), random_element(towns).to_string())
}

pub fn province() -> String {
    random_element(PROVINCES).0.to_string()
}

const CIF_ORG_LETTERS: &[char] = &['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'N', 'P', 'Q', 'R', 'S', 'U', 'V', 'W'];

/// Tax id (CIF) with a valid control character for the given organisation
/// letter; cooperatives use `F`.
pub fn cif_for(letter: char) -> String {
    let digits: Vec<u32> = (0..7).map(|_| number_between(0, 9) as u32).collect();

    let mut sum = 0;
    for (i, digit) in digits.iter().enumerate() {
        if i % 2 == 0 {
            let doubled = digit * 2;
            sum += doubled / 10 + doubled % 10;
        } else {
            sum += digit;
        }
    }
    let control = (10 - sum % 10) % 10;

    let control_char = if matches!(letter, 'N' | 'P' | 'Q' | 'R' | 'S' | 'W') {
        char::from(b'A' + control as u8 - 1 + if control == 0 { 10 } else { 0 })
    } else {
        char::from_digit(control, 10).unwrap_or('0')
    };

    let body: String = digits.iter().filter_map(|d| char::from_digit(*d, 10)).collect();
    format!("{}{}{}", letter, body, control_char)
}

pub fn cif() -> String {
    cif_for(random_element(CIF_ORG_LETTERS))
}

/// A date in `start..=end`
pub fn date_between(start: NaiveDate, end: NaiveDate) -> NaiveDate {
    let span = (end - start).num_days().max(0);
    start + Duration::days(number_between(0, span))
}

/// A moment within the last `days` days
pub fn past_datetime(days: i64) -> DateTime<Utc> {
    Utc::now() - Duration::minutes(number_between(1, days.max(1) * 24 * 60))
}

/// A moment within the next `days` days (at least a day ahead)
pub fn future_datetime(days: i64) -> DateTime<Utc> {
    Utc::now() + Duration::minutes(number_between(24 * 60, days.max(1) * 24 * 60 + 24 * 60))
}

/// A date at least one day after today and within `days` days
pub fn future_date(days: i64) -> NaiveDate {
    let today = Utc::now().date_naive();
    today + Duration::days(number_between(1, days.max(1)))
}

/// A date between `years` years ago and yesterday
pub fn past_date(years: i64) -> NaiveDate {
    let today = Utc::now().date_naive();
    date_between(today - Duration::days(years * 365), today - Duration::days(1))
}

/// Hex color such as `#1f8a4c`
pub fn hex_color() -> String {
    format!("#{:06x}", number_between(0, 0xFF_FFFF))
}

pub fn ipv4() -> String {
    format!(
        "{}.{}.{}.{}",
        number_between(1, 223),
        number_between(0, 255),
        number_between(0, 255),
        number_between(1, 254)
    )
}
