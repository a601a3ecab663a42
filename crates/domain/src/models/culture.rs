use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const MUSIC_GENRES: &[&str] = &["folk", "rock", "pop", "flamenco", "jazz", "electronic", "classical", "hip_hop"];

pub const AWARD_CATEGORIES: &[&str] = &["music", "literature", "cinema", "science", "sustainability"];

/// First year award winners are recorded for
pub const FIRST_WINNER_YEAR: i32 = 1990;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub death_date: Option<NaiveDate>,
    pub nationality: String,
    pub biography: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Person {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artist {
    pub id: Option<i64>,
    pub person_id: Option<i64>,
    pub stage_name: String,
    pub genre: String,
    pub country: String,
    pub biography: Option<String>,
    pub active_since: Option<i32>,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Award {
    pub id: Option<i64>,
    pub name: String,
    pub slug: String,
    pub category: String,
    pub organization: String,
    pub description: Option<String>,
    pub first_awarded_year: i32,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwardWinner {
    pub id: Option<i64>,
    pub award_id: Option<i64>,
    pub person_id: Option<i64>,
    pub year: i32,
    pub category: Option<String>,
    pub work_title: Option<String>,
    pub is_shared: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
