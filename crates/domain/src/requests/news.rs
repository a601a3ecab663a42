use super::{is_blank, text_map};
use crate::models::news::ARTICLE_STATUSES;
use crate::models::{in_rule, LANGUAGES};
use async_trait::async_trait;
use nexo_factories::fake::slugify;
use nexo_validation::data::parse_date;
use nexo_validation::{Data, FormRequest, PresenceVerifier, RequestContext, Rules, ValidationErrors};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Fill `slug` from `source` when it was left out
fn derive_slug(input: &mut Data, source: &str) {
    if !is_blank(input, "slug") {
        return;
    }
    if let Some(Value::String(text)) = input.get(source) {
        let slug = slugify(text);
        input.insert("slug".into(), Value::String(slug));
    }
}

pub struct StoreTopicRequest;

#[async_trait]
impl FormRequest for StoreTopicRequest {
    fn name(&self) -> &'static str {
        "store_topic"
    }

    fn authorize(&self, ctx: &RequestContext) -> bool {
        ctx.has_role(&["admin", "moderator"])
    }

    fn rules(&self, _ctx: &RequestContext) -> Rules {
        Rules::new()
            .field("name", "required|string|max:100")
            .field("slug", "required|alpha_dash|max:120|unique:topics,slug")
            .field("description", "nullable|string|max:500")
            .field("color", "nullable|regex:/^#[0-9a-fA-F]{6}$/")
            .field("icon", "nullable|string|max:50")
            .field("is_active", "boolean")
    }

    fn messages(&self) -> HashMap<String, String> {
        text_map(&[("color.regex", "El color debe ser un código hexadecimal como #1a2b3c.")])
    }

    fn attributes(&self) -> HashMap<String, String> {
        text_map(&[("name", "nombre"), ("description", "descripción"), ("icon", "icono")])
    }

    fn prepare_for_validation(&self, input: &mut Data, _ctx: &RequestContext) {
        derive_slug(input, "name");
    }

    fn processed_data(&self, mut validated: Data, _ctx: &RequestContext) -> Data {
        if is_blank(&validated, "is_active") {
            validated.insert("is_active".into(), json!(true));
        }
        validated
    }
}

pub struct StoreNewsArticleRequest;

#[async_trait]
impl FormRequest for StoreNewsArticleRequest {
    fn name(&self) -> &'static str {
        "store_news_article"
    }

    fn authorize(&self, ctx: &RequestContext) -> bool {
        ctx.is_authenticated()
    }

    fn rules(&self, _ctx: &RequestContext) -> Rules {
        Rules::new()
            .field("topic_id", "required|integer|exists:topics,id")
            .field("title", "required|string|max:255")
            .field("slug", "required|alpha_dash|max:255|unique:news_articles,slug")
            .field("summary", "nullable|string|max:500")
            .field("content", "required|string|min:50")
            .field("source_url", "nullable|url|max:500")
            .field("author", "nullable|string|max:255")
            .field("status", &format!("required|{}", in_rule(ARTICLE_STATUSES)))
            .field("published_at", "required_if:status,published|nullable|date")
            .field("language", &format!("required|{}", in_rule(LANGUAGES)))
            .field("tags", "nullable|array|max:10")
            .field("tags.*", "string|max:50")
            .field("is_featured", "boolean")
    }

    fn messages(&self) -> HashMap<String, String> {
        text_map(&[
            ("content.min", "El contenido debe tener al menos :min caracteres."),
            ("published_at.required_if", "Indica la fecha de publicación de un artículo publicado."),
            ("tags.*.max", "Cada etiqueta puede tener como máximo :max caracteres."),
        ])
    }

    fn attributes(&self) -> HashMap<String, String> {
        text_map(&[
            ("topic_id", "tema"),
            ("title", "título"),
            ("summary", "resumen"),
            ("content", "contenido"),
            ("source_url", "fuente"),
            ("author", "autor"),
            ("status", "estado"),
            ("published_at", "fecha de publicación"),
            ("language", "idioma"),
            ("tags", "etiquetas"),
            ("tags.*", "etiqueta"),
        ])
    }

    fn prepare_for_validation(&self, input: &mut Data, _ctx: &RequestContext) {
        derive_slug(input, "title");
        if is_blank(input, "language") {
            input.insert("language".into(), json!("es"));
        }
    }

    async fn after(
        &self,
        input: &Data,
        ctx: &RequestContext,
        _presence: Option<&dyn PresenceVerifier>,
        errors: &mut ValidationErrors,
    ) {
        if input.get("status").and_then(Value::as_str) != Some("published") {
            return;
        }
        let published_at = input
            .get("published_at")
            .and_then(Value::as_str)
            .and_then(parse_date);
        if published_at.is_some_and(|at| at > ctx.now.naive_utc()) {
            errors.add_error(
                "published_at",
                "Un artículo publicado no puede tener fecha de publicación futura.",
            );
        }
    }

    fn processed_data(&self, mut validated: Data, ctx: &RequestContext) -> Data {
        validated.insert("author_id".into(), json!(ctx.user_id));
        validated.insert("views_count".into(), json!(0));
        if is_blank(&validated, "tags") {
            validated.insert("tags".into(), json!([]));
        }
        validated
    }
}
