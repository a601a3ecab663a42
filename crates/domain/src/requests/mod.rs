//! Form requests, one per endpoint.

use nexo_validation::{Data, FormRequest, RequestContext};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

pub mod accounts;
pub mod catalogue;
pub mod community;
pub mod cooperatives;
pub mod culture;
pub mod news;

pub use accounts::{StoreApiKeyRequest, UpdateProfileRequest};
pub use catalogue::{StoreCarbonEquivalenceRequest, StorePlantSpeciesRequest};
pub use community::{ModerateContentRequest, RecordInteractionRequest, StoreUserGeneratedContentRequest};
pub use cooperatives::{StoreCooperativeRequest, StoreEnergyServiceRequest, UpdateCooperativeRequest};
pub use culture::{StoreArtistRequest, StoreAwardWinnerRequest};
pub use news::{StoreNewsArticleRequest, StoreTopicRequest};

/// Copy `user_id`, `ip_address` and `user_agent` from the context, and stamp
/// `timestamp_key` with the request time
pub(crate) fn with_audit(mut data: Data, ctx: &RequestContext, timestamp_key: &str) -> Data {
    for (key, value) in ctx.audit_fields() {
        data.insert(key.to_string(), value);
    }
    data.insert(timestamp_key.to_string(), ctx.timestamp());
    data
}

/// Whether an input key is absent or null
pub(crate) fn is_blank(input: &Data, key: &str) -> bool {
    input.get(key).map_or(true, Value::is_null)
}

/// Owned message or attribute table from literal pairs
pub(crate) fn text_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

/// Every request, for listing
pub fn all() -> Vec<Arc<dyn FormRequest>> {
    vec![
        Arc::new(RecordInteractionRequest),
        Arc::new(StoreUserGeneratedContentRequest),
        Arc::new(ModerateContentRequest),
        Arc::new(StoreCooperativeRequest),
        Arc::new(UpdateCooperativeRequest::default()),
        Arc::new(StoreEnergyServiceRequest),
        Arc::new(StoreCarbonEquivalenceRequest),
        Arc::new(StorePlantSpeciesRequest),
        Arc::new(StoreTopicRequest),
        Arc::new(StoreNewsArticleRequest),
        Arc::new(StoreArtistRequest),
        Arc::new(StoreAwardWinnerRequest),
        Arc::new(StoreApiKeyRequest),
        Arc::new(UpdateProfileRequest),
    ]
}

/// Look a request up by name; `record_id` is the row an update request
/// targets
pub fn find(name: &str, record_id: Option<i64>) -> Option<Arc<dyn FormRequest>> {
    if name == UpdateCooperativeRequest::NAME {
        return Some(Arc::new(UpdateCooperativeRequest {
            cooperative_id: record_id,
        }));
    }
    all().into_iter().find(|request| request.name() == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_names_are_unique_and_rules_parse() {
        let ctx = RequestContext::new().user(1);
        let requests = all();
        let mut names: Vec<&str> = requests.iter().map(|r| r.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 14);

        for request in &requests {
            let rules = request.rules(&ctx);
            assert!(rules.ensure_valid().is_ok(), "{} has invalid rules", request.name());
            assert!(!rules.is_empty());
        }
    }

    #[test]
    fn test_find_binds_record_id() {
        assert!(find("store_topic", None).is_some());
        assert!(find("nope", None).is_none());
        let update = find("update_cooperative", Some(3)).unwrap();
        let rules = update.rules(&RequestContext::new());
        let tax_id = rules.get_field_rules("tax_id").unwrap();
        assert!(tax_id.descriptions().iter().any(|d| d == "unique:cooperatives,tax_id,3"));
    }
}
