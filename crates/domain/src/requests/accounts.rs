use super::{is_blank, text_map};
use crate::models::accounts::{ApiKey, API_SCOPES};
use crate::models::{in_rule, LANGUAGES};
use async_trait::async_trait;
use nexo_validation::{Data, FormRequest, RequestContext, Rules};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Requests per hour a key gets when none is asked for
pub const DEFAULT_RATE_LIMIT: i64 = 1_000;

pub struct StoreApiKeyRequest;

#[async_trait]
impl FormRequest for StoreApiKeyRequest {
    fn name(&self) -> &'static str {
        "store_api_key"
    }

    fn authorize(&self, ctx: &RequestContext) -> bool {
        ctx.is_authenticated()
    }

    fn rules(&self, _ctx: &RequestContext) -> Rules {
        Rules::new()
            .field("name", "required|string|max:100")
            .field("scopes", "required|array|min:1")
            .field("scopes.*", &format!("required|{}", in_rule(API_SCOPES)))
            .field("rate_limit", "nullable|integer|between:10,10000")
            .field("expires_at", "nullable|date|after:today")
    }

    fn messages(&self) -> HashMap<String, String> {
        text_map(&[
            ("scopes.required", "Selecciona al menos un permiso."),
            ("scopes.min", "Selecciona al menos un permiso."),
            ("scopes.*.in", "Uno de los permisos no existe."),
        ])
    }

    fn attributes(&self) -> HashMap<String, String> {
        text_map(&[
            ("name", "nombre"),
            ("scopes", "permisos"),
            ("rate_limit", "límite de peticiones"),
            ("expires_at", "fecha de caducidad"),
        ])
    }

    /// Duplicate scopes are dropped, keeping the first occurrence
    fn prepare_for_validation(&self, input: &mut Data, _ctx: &RequestContext) {
        if let Some(Value::Array(scopes)) = input.get_mut("scopes") {
            let mut seen = Vec::with_capacity(scopes.len());
            scopes.retain(|scope| {
                if seen.contains(scope) {
                    false
                } else {
                    seen.push(scope.clone());
                    true
                }
            });
        }
    }

    fn processed_data(&self, mut validated: Data, ctx: &RequestContext) -> Data {
        if is_blank(&validated, "rate_limit") {
            validated.insert("rate_limit".into(), json!(DEFAULT_RATE_LIMIT));
        }
        validated.insert("user_id".into(), json!(ctx.user_id));
        validated.insert("key".into(), json!(ApiKey::generate_key()));
        validated.insert("is_active".into(), json!(true));
        validated.insert("created_at".into(), ctx.timestamp());
        validated
    }
}

/// Changes to the signed-in user's own profile
pub struct UpdateProfileRequest;

#[async_trait]
impl FormRequest for UpdateProfileRequest {
    fn name(&self) -> &'static str {
        "update_profile"
    }

    fn authorize(&self, ctx: &RequestContext) -> bool {
        ctx.is_authenticated()
    }

    fn rules(&self, ctx: &RequestContext) -> Rules {
        let unique_email = match ctx.user_id {
            Some(id) => format!("unique:users,email,{id}"),
            None => "unique:users,email".to_string(),
        };

        Rules::new()
            .field("name", "sometimes|required|string|max:255")
            .field("email", &format!("sometimes|required|email|max:255|{unique_email}"))
            .field("locale", &format!("sometimes|required|{}", in_rule(LANGUAGES)))
            .field("password", "nullable|string|min:8|confirmed")
    }

    fn messages(&self) -> HashMap<String, String> {
        text_map(&[
            ("email.unique", "Este correo ya está en uso."),
            ("password.confirmed", "Las contraseñas no coinciden."),
        ])
    }

    fn attributes(&self) -> HashMap<String, String> {
        text_map(&[("name", "nombre"), ("email", "correo"), ("locale", "idioma"), ("password", "contraseña")])
    }

    fn prepare_for_validation(&self, input: &mut Data, _ctx: &RequestContext) {
        if let Some(Value::String(email)) = input.get_mut("email") {
            *email = email.to_lowercase();
        }
    }

    /// The confirmation never leaves the request, and a blank password
    /// means "unchanged"
    fn processed_data(&self, mut validated: Data, _ctx: &RequestContext) -> Data {
        validated.remove("password_confirmation");
        if is_blank(&validated, "password") {
            validated.remove("password");
        }
        validated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factories::UserFactory;
    use nexo_factories::{Factory, RecordStore};
    use nexo_validation::{handle, RequestError, ValidationErrors};

    fn errors_of(result: Result<Data, RequestError>) -> ValidationErrors {
        match result {
            Err(RequestError::Validation(errors)) => errors,
            other => panic!("expected validation errors, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_api_key_payload_carries_a_fresh_key() {
        let ctx = RequestContext::new().user(12);
        let input = json!({"name": "Panel de control", "scopes": ["read", "news:read", "read"]});
        let data = handle(&StoreApiKeyRequest, input, &ctx, None).await.unwrap();

        assert_eq!(data["scopes"], json!(["read", "news:read"]));
        assert_eq!(data["user_id"], json!(12));
        assert_eq!(data["rate_limit"], json!(DEFAULT_RATE_LIMIT));
        assert_eq!(data["is_active"], json!(true));
        assert!(ApiKey::is_well_formed(data["key"].as_str().unwrap()));
    }

    #[tokio::test]
    async fn test_api_key_scopes_are_checked() {
        let ctx = RequestContext::new().user(12);

        let errors = errors_of(handle(&StoreApiKeyRequest, json!({"name": "x", "scopes": []}), &ctx, None).await);
        assert_eq!(errors.first("scopes"), Some("Selecciona al menos un permiso."));

        let input = json!({"name": "x", "scopes": ["read", "admin"], "expires_at": "2001-01-01"});
        let errors = errors_of(handle(&StoreApiKeyRequest, input, &ctx, None).await);
        assert_eq!(errors.first("scopes.1"), Some("Uno de los permisos no existe."));
        assert!(errors.has_field_errors("expires_at"));
    }

    #[tokio::test]
    async fn test_profile_email_may_stay_the_same() {
        let store = RecordStore::new();
        let me = UserFactory.builder().with("email", "ana@example.org").create(&store).unwrap();
        UserFactory.builder().with("email", "luis@example.org").create(&store).unwrap();
        let ctx = RequestContext::new().user(me.id.unwrap());

        let data = handle(&UpdateProfileRequest, json!({"email": "ANA@example.org"}), &ctx, Some(&store))
            .await
            .unwrap();
        assert_eq!(data["email"], json!("ana@example.org"));

        let errors = errors_of(
            handle(&UpdateProfileRequest, json!({"email": "luis@example.org"}), &ctx, Some(&store)).await,
        );
        assert_eq!(errors.first("email"), Some("Este correo ya está en uso."));
    }

    #[tokio::test]
    async fn test_profile_password_confirmation() {
        let ctx = RequestContext::new().user(1);

        let input = json!({"password": "correcto-caballo", "password_confirmation": "otra-cosa"});
        let errors = errors_of(handle(&UpdateProfileRequest, input, &ctx, None).await);
        assert_eq!(errors.first("password"), Some("Las contraseñas no coinciden."));

        let input = json!({"password": "correcto-caballo", "password_confirmation": "correcto-caballo"});
        let data = handle(&UpdateProfileRequest, input, &ctx, None).await.unwrap();
        assert_eq!(data["password"], json!("correcto-caballo"));
        assert!(!data.contains_key("password_confirmation"));

        let data = handle(&UpdateProfileRequest, json!({"locale": "eu"}), &ctx, None).await.unwrap();
        assert!(!data.contains_key("password"));
    }
}
