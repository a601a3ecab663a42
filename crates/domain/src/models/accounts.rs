use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const ROLES: &[&str] = &["user", "moderator", "admin"];

pub const API_KEY_PREFIX: &str = "nx_";
pub const API_KEY_RANDOM_LENGTH: usize = 40;

pub const API_SCOPES: &[&str] = &[
    "read",
    "write",
    "news:read",
    "cooperatives:read",
    "cooperatives:write",
    "culture:read",
    "stats:read",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub role: String,
    pub locale: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_verified(&self) -> bool {
        self.email_verified_at.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKey {
    pub id: Option<i64>,
    pub user_id: Option<i64>,
    pub name: String,
    pub key: String,
    pub scopes: Vec<String>,
    pub rate_limit: i64,
    pub last_used_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ApiKey {
    /// A fresh key from the OS-seeded generator, `nx_` followed by 40
    /// alphanumerics
    pub fn generate_key() -> String {
        let random: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(API_KEY_RANDOM_LENGTH)
            .map(char::from)
            .collect();
        format!("{API_KEY_PREFIX}{random}")
    }

    pub fn is_well_formed(key: &str) -> bool {
        key.strip_prefix(API_KEY_PREFIX).is_some_and(|rest| {
            rest.len() == API_KEY_RANDOM_LENGTH && rest.chars().all(|c| c.is_ascii_alphanumeric())
        })
    }

    pub fn is_usable_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.expires_at.map_or(true, |expires| expires > now)
    }
}
