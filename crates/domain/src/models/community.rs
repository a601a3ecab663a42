use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const CONTENT_TYPES: &[&str] = &["comment", "review", "suggestion", "correction", "photo"];

/// Entities user content and interactions can point at
pub const RELATED_TYPES: &[&str] = &[
    "cooperative",
    "energy_service",
    "news_article",
    "artist",
    "plant_species",
    "topic",
];

pub const CONTENT_STATUSES: &[&str] = &["pending", "approved", "rejected", "flagged"];

pub const INTERACTABLE_TYPES: &[&str] = &["cooperative", "user", "artist", "energy_service", "news_article"];

pub const INTERACTION_TYPES: &[&str] = &["call", "meeting", "email", "visit", "message", "event"];

pub const CHANNELS: &[&str] = &["phone", "email", "in_person", "video", "chat", "social"];

pub const OUTCOMES: &[&str] = &["successful", "pending", "no_answer", "rescheduled", "cancelled"];

pub const SENTIMENTS: &[&str] = &["positive", "neutral", "negative"];

/// Interaction types whose duration must be recorded
pub const TIMED_INTERACTIONS: &[&str] = &["call", "meeting"];

pub const ACHIEVEMENT_CATEGORIES: &[&str] = &["energy", "community", "learning", "engagement", "culture"];

pub const RARITIES: &[&str] = &["common", "uncommon", "rare", "epic", "legendary"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserGeneratedContent {
    pub id: Option<i64>,
    pub user_id: Option<i64>,
    pub content_type: String,
    pub related_type: String,
    pub related_id: i64,
    pub title: Option<String>,
    pub content: String,
    pub rating: Option<i64>,
    pub media_url: Option<String>,
    pub language: String,
    pub is_anonymous: bool,
    pub status: String,
    pub moderated_at: Option<DateTime<Utc>>,
    pub moderation_notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    pub id: Option<i64>,
    pub user_id: Option<i64>,
    pub interactable_type: String,
    pub interactable_id: i64,
    pub interaction_type: String,
    pub channel: Option<String>,
    pub outcome: String,
    pub notes: Option<String>,
    pub sentiment: Option<String>,
    pub follow_up_needed: bool,
    pub follow_up_date: Option<NaiveDate>,
    pub duration_minutes: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub id: Option<i64>,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub category: String,
    pub rarity: String,
    pub points: i64,
    pub icon: Option<String>,
    pub is_secret: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Points range awarded for each rarity
pub fn points_range(rarity: &str) -> (i64, i64) {
    match rarity {
        "common" => (10, 50),
        "uncommon" => (50, 100),
        "rare" => (100, 250),
        "epic" => (250, 500),
        _ => (500, 1000),
    }
}
