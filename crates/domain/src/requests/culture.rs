use super::text_map;
use crate::models::culture::{FIRST_WINNER_YEAR, MUSIC_GENRES};
use crate::models::in_rule;
use async_trait::async_trait;
use chrono::Datelike;
use nexo_validation::{Data, FormRequest, PresenceVerifier, RequestContext, Rules, ValidationErrors};
use serde_json::Value;
use std::collections::HashMap;

pub struct StoreArtistRequest;

#[async_trait]
impl FormRequest for StoreArtistRequest {
    fn name(&self) -> &'static str {
        "store_artist"
    }

    fn authorize(&self, ctx: &RequestContext) -> bool {
        ctx.is_authenticated()
    }

    fn rules(&self, ctx: &RequestContext) -> Rules {
        Rules::new()
            .field("person_id", "nullable|integer|exists:people,id")
            .field("stage_name", "required|string|max:255")
            .field("genre", &format!("required|{}", in_rule(MUSIC_GENRES)))
            .field("country", "required|string|size:2")
            .field("biography", "nullable|string|max:5000")
            .field("active_since", &format!("nullable|integer|between:1900,{}", ctx.now.year()))
            .field("is_active", "boolean")
    }

    fn attributes(&self) -> HashMap<String, String> {
        text_map(&[
            ("person_id", "persona"),
            ("stage_name", "nombre artístico"),
            ("genre", "género"),
            ("country", "país"),
            ("biography", "biografía"),
            ("active_since", "año de inicio"),
        ])
    }

    /// ISO country codes are stored upper case
    fn prepare_for_validation(&self, input: &mut Data, _ctx: &RequestContext) {
        if let Some(Value::String(country)) = input.get_mut("country") {
            *country = country.to_uppercase();
        }
    }
}

pub struct StoreAwardWinnerRequest;

#[async_trait]
impl FormRequest for StoreAwardWinnerRequest {
    fn name(&self) -> &'static str {
        "store_award_winner"
    }

    fn authorize(&self, ctx: &RequestContext) -> bool {
        ctx.has_role(&["admin", "moderator"])
    }

    fn rules(&self, ctx: &RequestContext) -> Rules {
        Rules::new()
            .field("award_id", "required|integer|exists:awards,id")
            .field("person_id", "required|integer|exists:people,id")
            .field(
                "year",
                &format!("required|integer|between:{FIRST_WINNER_YEAR},{}", ctx.now.year()),
            )
            .field("category", "nullable|string|max:255")
            .field("work_title", "nullable|string|max:255")
            .field("is_shared", "boolean")
    }

    fn attributes(&self) -> HashMap<String, String> {
        text_map(&[
            ("award_id", "premio"),
            ("person_id", "persona"),
            ("year", "año"),
            ("category", "categoría"),
            ("work_title", "obra"),
        ])
    }

    /// One person wins a given award at most once per year
    async fn after(
        &self,
        input: &Data,
        _ctx: &RequestContext,
        presence: Option<&dyn PresenceVerifier>,
        errors: &mut ValidationErrors,
    ) {
        let (Some(presence), Some(award), Some(person), Some(year)) = (
            presence,
            input.get("award_id"),
            input.get("person_id"),
            input.get("year"),
        ) else {
            return;
        };

        let conditions = [("award_id", award), ("person_id", person), ("year", year)];
        if presence.count("award_winners", &conditions, None).await > 0 {
            errors.add_error("year", "Esta persona ya recibió este premio ese año.");
        }
    }
}
