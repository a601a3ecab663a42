use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const ARTICLE_STATUSES: &[&str] = &["draft", "review", "published", "archived"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub id: Option<i64>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    pub id: Option<i64>,
    pub topic_id: Option<i64>,
    pub title: String,
    pub slug: String,
    pub summary: Option<String>,
    pub content: String,
    pub source_url: Option<String>,
    pub author: Option<String>,
    pub status: String,
    pub published_at: Option<DateTime<Utc>>,
    pub views_count: i64,
    pub is_featured: bool,
    pub language: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl NewsArticle {
    pub fn is_published(&self) -> bool {
        self.status == "published" && self.published_at.is_some()
    }
}
