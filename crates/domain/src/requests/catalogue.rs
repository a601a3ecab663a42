use crate::models::energy::{CARBON_CATEGORIES, PLANT_TYPES, WATER_NEEDS};
use crate::models::in_rule;
use async_trait::async_trait;
use nexo_validation::{Data, FormRequest, RequestContext, Rules};
use serde_json::Value;
use std::collections::HashMap;

/// Genus capitalised, species epithet lower case, optional infraspecific part
const SCIENTIFIC_NAME_PATTERN: &str = "/^[A-Z][a-z]+ [a-z]+(?: (?:subsp\\.|var\\.)? ?[a-z]+)?$/";

pub struct StoreCarbonEquivalenceRequest;

#[async_trait]
impl FormRequest for StoreCarbonEquivalenceRequest {
    fn name(&self) -> &'static str {
        "store_carbon_equivalence"
    }

    fn authorize(&self, ctx: &RequestContext) -> bool {
        ctx.has_role(&["admin", "moderator"])
    }

    fn rules(&self, _ctx: &RequestContext) -> Rules {
        Rules::new()
            .field("name", "required|string|max:255")
            .field("slug", "required|alpha_dash|max:255|unique:carbon_equivalences,slug")
            .field("category", &format!("required|{}", in_rule(CARBON_CATEGORIES)))
            .field("co2_kg_equivalent", "required|numeric|min:0")
            .field("unit", "required|string|max:50")
            .field("description", "nullable|string|max:1000")
            .field("source", "nullable|string|max:255")
            .field("is_verified", "boolean")
    }

    fn attributes(&self) -> HashMap<String, String> {
        HashMap::from([
            ("name".to_string(), "nombre".to_string()),
            ("category".to_string(), "categoría".to_string()),
            ("co2_kg_equivalent".to_string(), "kg de CO2 equivalente".to_string()),
            ("unit".to_string(), "unidad".to_string()),
            ("source".to_string(), "fuente".to_string()),
        ])
    }

    /// Derive the slug from the name when none was sent
    fn prepare_for_validation(&self, input: &mut Data, _ctx: &RequestContext) {
        if super::is_blank(input, "slug") {
            if let Some(Value::String(name)) = input.get("name") {
                let slug = nexo_factories::fake::slugify(name);
                input.insert("slug".into(), Value::String(slug));
            }
        }
    }
}

pub struct StorePlantSpeciesRequest;

#[async_trait]
impl FormRequest for StorePlantSpeciesRequest {
    fn name(&self) -> &'static str {
        "store_plant_species"
    }

    fn authorize(&self, ctx: &RequestContext) -> bool {
        ctx.has_role(&["admin", "moderator"])
    }

    fn rules(&self, _ctx: &RequestContext) -> Rules {
        Rules::new()
            .field("common_name", "required|string|max:255")
            .field(
                "scientific_name",
                &format!("required|string|max:255|regex:{SCIENTIFIC_NAME_PATTERN}"),
            )
            .field("family", "nullable|string|max:100")
            .field("plant_type", &format!("required|{}", in_rule(PLANT_TYPES)))
            .field("co2_absorption_kg_year", "required|numeric|between:0,1000")
            .field("max_height_m", "nullable|numeric|min:0|max:150")
            .field("water_needs", &format!("required|{}", in_rule(WATER_NEEDS)))
            .field("native_region", "nullable|string|max:255")
            .field("is_endemic", "boolean")
            .field("is_verified", "boolean")
    }

    fn messages(&self) -> HashMap<String, String> {
        HashMap::from([(
            "scientific_name.regex".to_string(),
            "El nombre científico debe seguir la forma «Género especie».".to_string(),
        )])
    }

    fn attributes(&self) -> HashMap<String, String> {
        HashMap::from([
            ("common_name".to_string(), "nombre común".to_string()),
            ("scientific_name".to_string(), "nombre científico".to_string()),
            ("plant_type".to_string(), "tipo de planta".to_string()),
            ("co2_absorption_kg_year".to_string(), "absorción de CO2".to_string()),
            ("max_height_m".to_string(), "altura máxima".to_string()),
            ("water_needs".to_string(), "necesidades de agua".to_string()),
        ])
    }

    /// Collapse repeated spaces in the binomial
    fn prepare_for_validation(&self, input: &mut Data, _ctx: &RequestContext) {
        if let Some(Value::String(name)) = input.get_mut("scientific_name") {
            *name = name.split_whitespace().collect::<Vec<_>>().join(" ");
        }
    }
}
