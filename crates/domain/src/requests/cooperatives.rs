use super::with_audit;
use crate::models::energy::{COOPERATIVE_TYPES, ENERGY_SERVICE_CATEGORIES, PRICE_UNITS, TAX_ID_PATTERN};
use crate::models::in_rule;
use async_trait::async_trait;
use nexo_validation::{Data, FormRequest, RequestContext, Rules};
use serde_json::Value;
use std::collections::HashMap;

fn cooperative_attributes() -> HashMap<String, String> {
    [
        ("name", "nombre"),
        ("legal_name", "razón social"),
        ("tax_id", "CIF"),
        ("cooperative_type", "tipo de cooperativa"),
        ("municipality_id", "municipio"),
        ("founded_at", "fecha de fundación"),
        ("members_count", "número de socios"),
        ("website", "web"),
        ("phone", "teléfono"),
        ("description", "descripción"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Cooperative rules; `modifier` is prepended to every required field
/// (`sometimes|` on update) and `ignore_id` lets a row keep its own CIF
fn cooperative_rules(modifier: &str, ignore_id: Option<i64>) -> Rules {
    let unique_tax_id = match ignore_id {
        Some(id) => format!("unique:cooperatives,tax_id,{id}"),
        None => "unique:cooperatives,tax_id".to_string(),
    };

    Rules::new()
        .field("name", &format!("{modifier}required|string|max:255"))
        .field("legal_name", "nullable|string|max:255")
        .field(
            "tax_id",
            &format!("{modifier}required|string|regex:{TAX_ID_PATTERN}|{unique_tax_id}"),
        )
        .field(
            "cooperative_type",
            &format!("{modifier}required|{}", in_rule(COOPERATIVE_TYPES)),
        )
        .field(
            "municipality_id",
            &format!("{modifier}required|integer|exists:municipalities,id"),
        )
        .field("founded_at", "nullable|date|before_or_equal:today")
        .field("members_count", "nullable|integer|min:0")
        .field("website", "nullable|url|max:255")
        .field("email", &format!("{modifier}required|email|max:255"))
        .field("phone", "nullable|string|max:20")
        .field("description", "nullable|string|max:2000")
        .field("is_verified", "boolean")
        .field("is_active", "boolean")
        .field("accepts_new_members", "boolean")
}

fn cooperative_messages() -> HashMap<String, String> {
    HashMap::from([
        (
            "tax_id.regex".to_string(),
            "El CIF no tiene un formato válido.".to_string(),
        ),
        (
            "tax_id.unique".to_string(),
            "Ya existe una cooperativa con este CIF.".to_string(),
        ),
    ])
}

/// Upper-case the CIF and drop separators users tend to type
fn normalize_tax_id(input: &mut Data) {
    if let Some(Value::String(tax_id)) = input.get_mut("tax_id") {
        *tax_id = tax_id
            .chars()
            .filter(|c| !matches!(c, '-' | ' ' | '.'))
            .collect::<String>()
            .to_uppercase();
    }
}

pub struct StoreCooperativeRequest;

#[async_trait]
impl FormRequest for StoreCooperativeRequest {
    fn name(&self) -> &'static str {
        "store_cooperative"
    }

    fn authorize(&self, ctx: &RequestContext) -> bool {
        ctx.is_authenticated()
    }

    fn rules(&self, _ctx: &RequestContext) -> Rules {
        cooperative_rules("", None)
    }

    fn messages(&self) -> HashMap<String, String> {
        cooperative_messages()
    }

    fn attributes(&self) -> HashMap<String, String> {
        cooperative_attributes()
    }

    fn prepare_for_validation(&self, input: &mut Data, _ctx: &RequestContext) {
        normalize_tax_id(input);
    }

    fn processed_data(&self, validated: Data, ctx: &RequestContext) -> Data {
        let mut data = with_audit(validated, ctx, "submitted_at");
        if let Some(user_id) = data.remove("user_id") {
            data.insert("created_by".into(), user_id);
        }
        data
    }
}

/// Partial update of an existing cooperative
#[derive(Debug, Default, Clone)]
pub struct UpdateCooperativeRequest {
    pub cooperative_id: Option<i64>,
}

impl UpdateCooperativeRequest {
    pub const NAME: &'static str = "update_cooperative";

    pub fn new(cooperative_id: i64) -> Self {
        Self {
            cooperative_id: Some(cooperative_id),
        }
    }
}

#[async_trait]
impl FormRequest for UpdateCooperativeRequest {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn authorize(&self, ctx: &RequestContext) -> bool {
        ctx.is_authenticated()
    }

    fn rules(&self, _ctx: &RequestContext) -> Rules {
        cooperative_rules("sometimes|", self.cooperative_id)
    }

    fn messages(&self) -> HashMap<String, String> {
        cooperative_messages()
    }

    fn attributes(&self) -> HashMap<String, String> {
        cooperative_attributes()
    }

    fn prepare_for_validation(&self, input: &mut Data, _ctx: &RequestContext) {
        normalize_tax_id(input);
    }

    fn processed_data(&self, mut validated: Data, ctx: &RequestContext) -> Data {
        validated.insert("updated_by".into(), serde_json::json!(ctx.user_id));
        validated
    }
}

/// A service offered by a cooperative
pub struct StoreEnergyServiceRequest;

#[async_trait]
impl FormRequest for StoreEnergyServiceRequest {
    fn name(&self) -> &'static str {
        "store_energy_service"
    }

    fn authorize(&self, ctx: &RequestContext) -> bool {
        ctx.is_authenticated()
    }

    fn rules(&self, _ctx: &RequestContext) -> Rules {
        Rules::new()
            .field("cooperative_id", "required|integer|exists:cooperatives,id")
            .field(
                "category",
                &format!("required|{}", in_rule(ENERGY_SERVICE_CATEGORIES)),
            )
            .field("name", "required|string|max:255")
            .field("description", "nullable|string|max:2000")
            .field("price", "nullable|numeric|min:0")
            .field("price_unit", &format!("nullable|required_with:price|{}", in_rule(PRICE_UNITS)))
            .field("is_active", "boolean")
            .field("is_featured", "boolean")
    }

    fn attributes(&self) -> HashMap<String, String> {
        HashMap::from([
            ("cooperative_id".to_string(), "cooperativa".to_string()),
            ("category".to_string(), "categoría".to_string()),
            ("price".to_string(), "precio".to_string()),
            ("price_unit".to_string(), "unidad de precio".to_string()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factories::{CooperativeFactory, MunicipalityFactory};
    use nexo_factories::{Factory, RecordStore};
    use nexo_validation::{handle, RequestError};
    use serde_json::json;

    fn ctx() -> RequestContext {
        RequestContext::new().user(5)
    }

    fn store_with_municipality() -> RecordStore {
        let store = RecordStore::new();
        MunicipalityFactory.builder().create(&store).unwrap();
        store
    }

    #[tokio::test]
    async fn test_store_normalizes_tax_id_and_checks_municipality() {
        let store = store_with_municipality();
        let input = json!({
            "name": "Som Energia Vic",
            "tax_id": "f-1234567-4",
            "cooperative_type": "energy",
            "municipality_id": 1,
            "email": "info@somenergia.coop"
        });

        let data = handle(&StoreCooperativeRequest, input, &ctx(), Some(&store)).await.unwrap();
        assert_eq!(data["tax_id"], json!("F12345674"));
        assert_eq!(data["created_by"], json!(5));
        assert!(!data.contains_key("user_id"));

        let input = json!({
            "name": "Sin municipio",
            "tax_id": "F12345674",
            "cooperative_type": "energy",
            "municipality_id": 99,
            "email": "info@example.coop"
        });
        let err = handle(&StoreCooperativeRequest, input, &ctx(), Some(&store)).await.unwrap_err();
        let RequestError::Validation(errors) = err else {
            panic!("expected validation errors");
        };
        assert_eq!(errors.fields(), vec!["municipality_id"]);
        assert_eq!(errors.first("municipality_id"), Some("El campo municipio seleccionado no existe."));
    }

    #[tokio::test]
    async fn test_duplicate_tax_id_is_rejected_except_for_the_same_row() {
        let store = store_with_municipality();
        let existing = CooperativeFactory.builder().create(&store).unwrap();

        let input = json!({
            "name": "Copia",
            "tax_id": existing.tax_id,
            "cooperative_type": "housing",
            "municipality_id": 1,
            "email": "copia@example.coop"
        });
        let err = handle(&StoreCooperativeRequest, input.clone(), &ctx(), Some(&store))
            .await
            .unwrap_err();
        let RequestError::Validation(errors) = err else {
            panic!("expected validation errors");
        };
        assert_eq!(errors.first("tax_id"), Some("Ya existe una cooperativa con este CIF."));

        let update = UpdateCooperativeRequest::new(existing.id.unwrap());
        assert!(handle(&update, input, &ctx(), Some(&store)).await.is_ok());
    }

    #[tokio::test]
    async fn test_update_only_checks_present_fields() {
        let store = store_with_municipality();
        let update = UpdateCooperativeRequest::new(1);

        let data = handle(&update, json!({"members_count": 120}), &ctx(), Some(&store))
            .await
            .unwrap();
        assert_eq!(data["members_count"], json!(120));
        assert_eq!(data["updated_by"], json!(5));

        let err = handle(&update, json!({"name": ""}), &ctx(), Some(&store)).await.unwrap_err();
        assert_eq!(err.status_code(), 422);
    }

    #[tokio::test]
    async fn test_unique_fails_closed_without_store() {
        let input = json!({
            "name": "Som Energia Vic",
            "tax_id": "F12345674",
            "cooperative_type": "energy",
            "municipality_id": 1,
            "email": "info@somenergia.coop"
        });
        let err = handle(&StoreCooperativeRequest, input, &ctx(), None).await.unwrap_err();
        let RequestError::Validation(errors) = err else {
            panic!("expected validation errors");
        };
        let tax_errors = errors.get_field_errors("tax_id").unwrap();
        assert_eq!(tax_errors[0].code, "presence_unavailable");
    }

    #[tokio::test]
    async fn test_price_unit_required_with_price() {
        let store = store_with_municipality();
        CooperativeFactory.builder().create(&store).unwrap();

        let input = json!({
            "cooperative_id": 1,
            "category": "ev_charging",
            "name": "Recarga",
            "price": 0.35
        });
        let err = handle(&StoreEnergyServiceRequest, input, &ctx(), Some(&store))
            .await
            .unwrap_err();
        let RequestError::Validation(errors) = err else {
            panic!("expected validation errors");
        };
        assert_eq!(
            errors.first("price_unit"),
            Some("El campo unidad de precio es obligatorio cuando precio está presente.")
        );
    }
}
