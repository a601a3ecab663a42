use crate::models::accounts::{API_KEY_PREFIX, API_KEY_RANDOM_LENGTH, API_SCOPES};
use crate::models::{ApiKey, User, LANGUAGES};
use nexo_factories::{fake, factory_state, BelongsTo, CustomState, Factory, FactoryState, HasFactory, InactiveState};
use serde_json::Value;

factory_state!(AdminState as "admin" { role: "admin" });
factory_state!(ModeratorState as "moderator" { role: "moderator" });

#[derive(Debug, Default, Clone)]
pub struct UserFactory;

impl Factory for UserFactory {
    type Model = User;

    fn definition(&self) -> nexo_factories::Attributes {
        let locale = if fake::random_bool(0.7) {
            "es"
        } else {
            fake::random_element(LANGUAGES)
        };

        attributes! {
            "name" => fake::name(),
            "email" => fake::email(),
            "email_verified_at" => fake::past_datetime(365).to_rfc3339(),
            "role" => "user",
            "locale" => locale,
        }
    }

    fn state(&self, name: &str) -> Option<Box<dyn FactoryState>> {
        states!(name, {
            "unverified" => CustomState::new("unverified").with_null("email_verified_at"),
            "admin" => AdminState,
            "moderator" => ModeratorState,
        })
    }

    fn state_names(&self) -> &'static [&'static str] {
        &["unverified", "admin", "moderator"]
    }

    fn unique_columns(&self) -> &'static [&'static str] {
        &["email"]
    }
}

impl HasFactory for User {
    type Factory = UserFactory;
}

#[derive(Debug, Default, Clone)]
pub struct ApiKeyFactory;

const KEY_NAMES: &[&str] = &[
    "Integración web",
    "Panel de socios",
    "App móvil",
    "Exportación de datos",
    "Observatorio energético",
    "Agenda cultural",
];

impl Factory for ApiKeyFactory {
    type Model = ApiKey;

    fn definition(&self) -> nexo_factories::Attributes {
        let scope_count = fake::number_between(1, 3) as usize;
        let expires_at = fake::optional(0.6, || fake::future_datetime(365).to_rfc3339());
        let last_used_at = fake::optional(0.5, || fake::past_datetime(30).to_rfc3339());

        attributes! {
            "name" => fake::random_element(KEY_NAMES),
            "key" => format!("{}{}", API_KEY_PREFIX, fake::alphanumeric(API_KEY_RANDOM_LENGTH)),
            "scopes" => fake::random_elements(API_SCOPES, scope_count),
            "rate_limit" => fake::random_element(&[60, 120, 600, 1000, 5000]),
            "last_used_at" => last_used_at,
            "expires_at" => expires_at,
            "is_active" => true,
        }
    }

    fn state(&self, name: &str) -> Option<Box<dyn FactoryState>> {
        states!(name, {
            "revoked" => InactiveState,
            "expired" => CustomState::new("expired")
                .with("expires_at", Value::String(fake::past_datetime(90).to_rfc3339())),
        })
    }

    fn state_names(&self) -> &'static [&'static str] {
        &["revoked", "expired"]
    }

    fn belongs_to(&self) -> Vec<BelongsTo> {
        vec![BelongsTo::required("user_id", "users")]
    }

    fn unique_columns(&self) -> &'static [&'static str] {
        &["key"]
    }
}

impl HasFactory for ApiKey {
    type Factory = ApiKeyFactory;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use nexo_factories::RecordStore;

    #[test]
    fn test_user_states() {
        let admin = User::factory().state_named("admin").make().unwrap();
        assert_eq!(admin.role, "admin");
        assert!(admin.is_verified());

        let unverified = User::factory().state_named("unverified").make().unwrap();
        assert!(!unverified.is_verified());
        assert_eq!(unverified.role, "user");
    }

    #[test]
    fn test_api_keys_are_unique_and_well_formed() {
        let store = RecordStore::new();
        User::factory().create(&store).unwrap();

        let keys = ApiKey::factory().create_many(&store, 20).unwrap();
        let mut seen: Vec<&str> = keys.iter().map(|k| k.key.as_str()).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 20);
        assert!(keys.iter().all(|k| ApiKey::is_well_formed(&k.key)));
        assert!(keys.iter().all(|k| k.user_id == Some(1) && !k.scopes.is_empty()));
    }

    #[test]
    fn test_expired_and_revoked_keys_are_unusable() {
        let now = Utc::now();
        let expired = ApiKey::factory().state_named("expired").make().unwrap();
        assert!(!expired.is_usable_at(now));

        let revoked = ApiKey::factory().state_named("revoked").make().unwrap();
        assert!(!revoked.is_active);
        assert!(!revoked.is_usable_at(now));
    }
}
