use super::{is_blank, text_map, with_audit};
use crate::models::community::{
    CHANNELS, CONTENT_TYPES, INTERACTABLE_TYPES, INTERACTION_TYPES, OUTCOMES, RELATED_TYPES, SENTIMENTS,
    TIMED_INTERACTIONS,
};
use crate::models::{in_rule, LANGUAGES};
use async_trait::async_trait;
use nexo_validation::data::is_truthy;
use nexo_validation::{Data, FormRequest, PresenceVerifier, RequestContext, Rules, ValidationErrors};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};
use std::collections::HashMap;

/// Links allowed in one piece of user content before it counts as spam
pub const MAX_LINKS: usize = 3;

static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(?:https?://|www\.)\S+").expect("valid link pattern"));

fn count_links(text: &str) -> usize {
    LINK.find_iter(text).count()
}

/// Logging a contact with a member, cooperative or artist
pub struct RecordInteractionRequest;

#[async_trait]
impl FormRequest for RecordInteractionRequest {
    fn name(&self) -> &'static str {
        "record_interaction"
    }

    fn authorize(&self, ctx: &RequestContext) -> bool {
        ctx.is_authenticated()
    }

    fn rules(&self, _ctx: &RequestContext) -> Rules {
        Rules::new()
            .field("interactable_type", &format!("required|{}", in_rule(INTERACTABLE_TYPES)))
            .field("interactable_id", "required|integer|min:1")
            .field("interaction_type", &format!("required|{}", in_rule(INTERACTION_TYPES)))
            .field("channel", &format!("nullable|{}", in_rule(CHANNELS)))
            .field("outcome", &format!("required|{}", in_rule(OUTCOMES)))
            .field("notes", "nullable|string|max:2000")
            .field("sentiment", &format!("nullable|{}", in_rule(SENTIMENTS)))
            .field("follow_up_needed", "boolean")
            .field("follow_up_date", "nullable|date|after:today")
            .field("duration_minutes", "nullable|integer|between:1,480")
    }

    fn messages(&self) -> HashMap<String, String> {
        text_map(&[
            ("interactable_type.required", "Indica con quién fue la interacción."),
            ("interaction_type.in", "El tipo de interacción no es válido."),
            ("follow_up_date.after", "La fecha de seguimiento debe ser posterior a hoy."),
            ("duration_minutes.between", "La duración debe estar entre 1 y 480 minutos."),
        ])
    }

    fn attributes(&self) -> HashMap<String, String> {
        text_map(&[
            ("interactable_type", "tipo de destinatario"),
            ("interactable_id", "destinatario"),
            ("interaction_type", "tipo de interacción"),
            ("channel", "canal"),
            ("outcome", "resultado"),
            ("notes", "notas"),
            ("sentiment", "valoración"),
            ("follow_up_needed", "seguimiento"),
            ("follow_up_date", "fecha de seguimiento"),
            ("duration_minutes", "duración"),
        ])
    }

    async fn after(
        &self,
        input: &Data,
        _ctx: &RequestContext,
        _presence: Option<&dyn PresenceVerifier>,
        errors: &mut ValidationErrors,
    ) {
        let follow_up_needed = is_truthy(input.get("follow_up_needed"));
        let has_follow_up_date = !is_blank(input, "follow_up_date");

        if follow_up_needed && !has_follow_up_date {
            errors.add_error(
                "follow_up_date",
                "La fecha de seguimiento es obligatoria cuando se requiere seguimiento.",
            );
        }
        if !follow_up_needed && has_follow_up_date {
            errors.add_error(
                "follow_up_date",
                "No se puede indicar fecha de seguimiento si no se requiere seguimiento.",
            );
        }

        let timed = input
            .get("interaction_type")
            .and_then(Value::as_str)
            .is_some_and(|kind| TIMED_INTERACTIONS.contains(&kind));
        if timed && is_blank(input, "duration_minutes") {
            errors.add_error(
                "duration_minutes",
                "La duración es obligatoria para llamadas y reuniones.",
            );
        }
    }

    fn processed_data(&self, mut validated: Data, ctx: &RequestContext) -> Data {
        if is_blank(&validated, "follow_up_needed") {
            validated.insert("follow_up_needed".into(), json!(false));
        }
        with_audit(validated, ctx, "recorded_at")
    }
}

/// Comments, reviews, suggestions, corrections and photos sent by users
pub struct StoreUserGeneratedContentRequest;

#[async_trait]
impl FormRequest for StoreUserGeneratedContentRequest {
    fn name(&self) -> &'static str {
        "store_user_generated_content"
    }

    fn authorize(&self, ctx: &RequestContext) -> bool {
        ctx.is_authenticated()
    }

    fn rules(&self, _ctx: &RequestContext) -> Rules {
        Rules::new()
            .field("content_type", &format!("required|{}", in_rule(CONTENT_TYPES)))
            .field("related_type", &format!("required|{}", in_rule(RELATED_TYPES)))
            .field("related_id", "required|integer|min:1")
            .field("title", "nullable|string|max:255")
            .field("content", "required|string|between:10,5000")
            .field("rating", "required_if:content_type,review|nullable|integer|between:1,5")
            .field("media_url", "required_if:content_type,photo|nullable|url|max:500")
            .field("language", &format!("required|{}", in_rule(LANGUAGES)))
            .field("is_anonymous", "boolean")
    }

    fn messages(&self) -> HashMap<String, String> {
        text_map(&[
            ("content.required", "Escribe el contenido de tu aportación."),
            ("content.between", "El contenido debe tener entre 10 y 5000 caracteres."),
            ("rating.required_if", "Las reseñas necesitan una valoración de 1 a 5."),
            ("media_url.required_if", "Las fotos necesitan la dirección de la imagen."),
        ])
    }

    fn attributes(&self) -> HashMap<String, String> {
        text_map(&[
            ("content_type", "tipo de contenido"),
            ("related_type", "tipo de elemento"),
            ("related_id", "elemento"),
            ("title", "título"),
            ("content", "contenido"),
            ("rating", "valoración"),
            ("media_url", "imagen"),
            ("language", "idioma"),
            ("is_anonymous", "anónimo"),
        ])
    }

    async fn after(
        &self,
        input: &Data,
        _ctx: &RequestContext,
        _presence: Option<&dyn PresenceVerifier>,
        errors: &mut ValidationErrors,
    ) {
        let content_type = input.get("content_type").and_then(Value::as_str);

        if !is_blank(input, "rating") && content_type != Some("review") {
            errors.add_error("rating", "Solo las reseñas pueden incluir una valoración.");
        }

        if content_type == Some("correction") && is_truthy(input.get("is_anonymous")) {
            errors.add_error("is_anonymous", "Las correcciones no pueden enviarse de forma anónima.");
        }

        if let Some(text) = input.get("content").and_then(Value::as_str) {
            if count_links(text) > MAX_LINKS {
                errors.add_error("content", "El contenido parece spam: incluye demasiados enlaces.");
            }
        }
    }

    fn processed_data(&self, validated: Data, ctx: &RequestContext) -> Data {
        let anonymous = is_truthy(validated.get("is_anonymous"));
        let mut data = with_audit(validated, ctx, "submitted_at");
        if anonymous {
            data.insert("user_id".into(), Value::Null);
        }
        data.insert("is_anonymous".into(), json!(anonymous));
        data.insert("status".into(), json!("pending"));
        data
    }
}

/// A moderator's decision on a piece of user content
pub struct ModerateContentRequest;

#[async_trait]
impl FormRequest for ModerateContentRequest {
    fn name(&self) -> &'static str {
        "moderate_content"
    }

    fn authorize(&self, ctx: &RequestContext) -> bool {
        ctx.has_role(&["moderator", "admin"])
    }

    fn rules(&self, _ctx: &RequestContext) -> Rules {
        Rules::new()
            .field("status", "required|in:approved,rejected,flagged")
            .field("moderation_notes", "required_if:status,rejected|nullable|string|max:1000")
            .field("notify_user", "boolean")
    }

    fn messages(&self) -> HashMap<String, String> {
        text_map(&[(
            "moderation_notes.required_if",
            "Explica el motivo del rechazo.",
        )])
    }

    fn processed_data(&self, mut validated: Data, ctx: &RequestContext) -> Data {
        tracing::info!(moderator = ?ctx.user_id, status = ?validated.get("status"), "content moderated");
        validated.insert("moderated_by".into(), json!(ctx.user_id));
        validated.insert("moderated_at".into(), ctx.timestamp());
        if is_blank(&validated, "notify_user") {
            validated.insert("notify_user".into(), json!(true));
        }
        validated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use nexo_validation::{handle, RequestError};

    fn ctx() -> RequestContext {
        RequestContext::new()
            .user(42)
            .ip("192.168.1.20")
            .user_agent("nexo-tests")
    }

    fn errors_of(result: Result<Data, RequestError>) -> ValidationErrors {
        match result {
            Err(RequestError::Validation(errors)) => errors,
            other => panic!("expected validation errors, got {:?}", other),
        }
    }

    fn tomorrow() -> String {
        (Utc::now().date_naive() + Duration::days(1)).to_string()
    }

    #[tokio::test]
    async fn test_follow_up_needed_requires_date() {
        let input = json!({
            "interactable_type": "cooperative",
            "interactable_id": 4,
            "interaction_type": "email",
            "outcome": "pending",
            "follow_up_needed": true,
            "follow_up_date": ""
        });
        let errors = errors_of(handle(&RecordInteractionRequest, input, &ctx(), None).await);
        assert_eq!(errors.fields(), vec!["follow_up_date"]);
        assert_eq!(
            errors.first("follow_up_date"),
            Some("La fecha de seguimiento es obligatoria cuando se requiere seguimiento.")
        );
    }

    #[tokio::test]
    async fn test_calls_need_duration_and_dates_need_follow_up() {
        let input = json!({
            "interactable_type": "user",
            "interactable_id": 9,
            "interaction_type": "call",
            "outcome": "successful",
            "follow_up_needed": false,
            "follow_up_date": tomorrow()
        });
        let errors = errors_of(handle(&RecordInteractionRequest, input, &ctx(), None).await);
        assert!(errors.has_field_errors("duration_minutes"));
        assert!(errors.has_field_errors("follow_up_date"));
    }

    #[tokio::test]
    async fn test_past_follow_up_date_uses_custom_message() {
        let input = json!({
            "interactable_type": "user",
            "interactable_id": 9,
            "interaction_type": "meeting",
            "outcome": "rescheduled",
            "follow_up_needed": true,
            "follow_up_date": "2020-01-01",
            "duration_minutes": 45
        });
        let errors = errors_of(handle(&RecordInteractionRequest, input, &ctx(), None).await);
        assert_eq!(
            errors.first("follow_up_date"),
            Some("La fecha de seguimiento debe ser posterior a hoy.")
        );
    }

    #[tokio::test]
    async fn test_interaction_processed_data() {
        let input = json!({
            "interactable_type": "artist",
            "interactable_id": "12",
            "interaction_type": "meeting",
            "channel": "video",
            "outcome": "successful",
            "sentiment": "positive",
            "duration_minutes": 60
        });
        let data = handle(&RecordInteractionRequest, input, &ctx(), None).await.unwrap();
        assert_eq!(data["follow_up_needed"], json!(false));
        assert_eq!(data["user_id"], json!(42));
        assert_eq!(data["ip_address"], json!("192.168.1.20"));
        assert_eq!(data["user_agent"], json!("nexo-tests"));
        assert!(data["recorded_at"].is_string());
    }

    #[tokio::test]
    async fn test_interaction_requires_login() {
        let input = json!({});
        let err = handle(&RecordInteractionRequest, input, &RequestContext::new(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, RequestError::Forbidden));
    }

    #[tokio::test]
    async fn test_review_requires_rating_with_custom_message() {
        let input = json!({
            "content_type": "review",
            "related_type": "cooperative",
            "related_id": 3,
            "content": "Muy buena atención en la oficina.",
            "language": "es"
        });
        let errors = errors_of(handle(&StoreUserGeneratedContentRequest, input, &ctx(), None).await);
        assert_eq!(errors.first("rating"), Some("Las reseñas necesitan una valoración de 1 a 5."));
    }

    #[tokio::test]
    async fn test_content_cross_field_rules() {
        let spam = "Mira https://a.example http://b.example www.c.example https://d.example ya";
        let input = json!({
            "content_type": "correction",
            "related_type": "news_article",
            "related_id": 3,
            "content": spam,
            "rating": 4,
            "language": "es",
            "is_anonymous": true
        });
        let errors = errors_of(handle(&StoreUserGeneratedContentRequest, input, &ctx(), None).await);
        assert_eq!(errors.fields(), vec!["content", "is_anonymous", "rating"]);
        assert_eq!(
            errors.first("rating"),
            Some("Solo las reseñas pueden incluir una valoración.")
        );
    }

    #[test]
    fn test_count_links_counts_each_url_once() {
        assert_eq!(count_links("https://www.a.es https://www.b.es"), 2);
        assert_eq!(count_links("Fuentes: https://www.miteco.gob.es y www.idae.es"), 2);
        assert_eq!(count_links("sin enlaces"), 0);
    }

    #[tokio::test]
    async fn test_link_limit_boundary() {
        let comment = |content: &str| {
            json!({
                "content_type": "comment",
                "related_type": "news_article",
                "related_id": 3,
                "content": content,
                "language": "es"
            })
        };

        let three = "Fuentes: https://www.a.es, https://www.b.es y https://www.c.es";
        assert!(handle(&StoreUserGeneratedContentRequest, comment(three), &ctx(), None).await.is_ok());

        let four = "Fuentes: https://www.a.es, https://www.b.es, https://www.c.es y https://www.d.es";
        let errors = errors_of(handle(&StoreUserGeneratedContentRequest, comment(four), &ctx(), None).await);
        assert_eq!(
            errors.first("content"),
            Some("El contenido parece spam: incluye demasiados enlaces.")
        );
    }

    #[tokio::test]
    async fn test_anonymous_content_hides_author() {
        let input = json!({
            "content_type": "comment",
            "related_type": "topic",
            "related_id": 1,
            "content": "Gracias por compartir la asamblea.",
            "language": "eu",
            "is_anonymous": "1"
        });
        let data = handle(&StoreUserGeneratedContentRequest, input, &ctx(), None).await.unwrap();
        assert!(data["user_id"].is_null());
        assert_eq!(data["status"], json!("pending"));
        assert_eq!(data["is_anonymous"], json!(true));
        assert!(data["submitted_at"].is_string());
    }

    #[tokio::test]
    async fn test_moderation_is_restricted_and_rejection_needs_notes() {
        let input = json!({"status": "rejected"});
        let err = handle(&ModerateContentRequest, input.clone(), &ctx(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, RequestError::Forbidden));

        let moderator = ctx().role("moderator");
        let errors = errors_of(handle(&ModerateContentRequest, input, &moderator, None).await);
        assert_eq!(errors.first("moderation_notes"), Some("Explica el motivo del rechazo."));

        let data = handle(&ModerateContentRequest, json!({"status": "approved"}), &moderator, None)
            .await
            .unwrap();
        assert_eq!(data["moderated_by"], json!(42));
        assert_eq!(data["notify_user"], json!(true));
    }
}
