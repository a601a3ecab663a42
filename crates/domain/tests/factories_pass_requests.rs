//! Rows produced by the factories must be accepted by the request that
//! stores them.

use nexo_domain::factories::*;
use nexo_domain::requests;
use nexo_factories::{Attributes, Factory, FactoryBuilder, RecordStore};
use nexo_validation::{handle, FormRequest, RequestContext, RequestError};
use serde_json::Value;

const SAMPLES: usize = 25;

fn staff() -> RequestContext {
    RequestContext::new()
        .user(1)
        .role("admin")
        .ip("10.0.0.7")
        .user_agent("nexo-tests")
}

fn seeded_store() -> RecordStore {
    let store = RecordStore::new();
    UserFactory.builder().create_many(&store, 3).unwrap();
    PersonFactory.builder().create_many(&store, 3).unwrap();
    MunicipalityFactory.builder().create_many(&store, 3).unwrap();
    CooperativeFactory.builder().create_many(&store, 2).unwrap();
    TopicFactory.builder().create_many(&store, 2).unwrap();
    AwardFactory.builder().create_many(&store, 2).unwrap();
    store
}

async fn assert_accepted<F: Factory>(request: &dyn FormRequest, builder: FactoryBuilder<F>, store: &RecordStore) {
    let ctx = staff();
    for _ in 0..SAMPLES {
        let attributes: Attributes = builder.raw_with_parents(store).unwrap();
        let input = Value::Object(attributes.clone());
        match handle(request, input, &ctx, Some(store)).await {
            Ok(_) => {}
            Err(RequestError::Validation(errors)) => panic!(
                "{} rejected factory row {}: {}",
                request.name(),
                Value::Object(attributes),
                errors.to_json()
            ),
            Err(other) => panic!("{} failed: {}", request.name(), other),
        }
    }
}

#[tokio::test]
async fn test_energy_factories_pass_their_requests() {
    let store = seeded_store();
    assert_accepted(&requests::StoreCooperativeRequest, CooperativeFactory.builder(), &store).await;
    assert_accepted(
        &requests::StoreCooperativeRequest,
        CooperativeFactory.builder().state_named("energy").state_named("inactive"),
        &store,
    )
    .await;
    assert_accepted(&requests::StoreEnergyServiceRequest, EnergyServiceFactory.builder(), &store).await;
}

#[tokio::test]
async fn test_catalogue_factories_pass_their_requests() {
    let store = seeded_store();
    assert_accepted(
        &requests::StoreCarbonEquivalenceRequest,
        CarbonEquivalenceFactory.builder(),
        &store,
    )
    .await;
    assert_accepted(&requests::StorePlantSpeciesRequest, PlantSpeciesFactory.builder(), &store).await;
    assert_accepted(
        &requests::StorePlantSpeciesRequest,
        PlantSpeciesFactory.builder().state_named("endemic"),
        &store,
    )
    .await;
}

#[tokio::test]
async fn test_news_factories_pass_their_requests() {
    let store = seeded_store();
    assert_accepted(&requests::StoreTopicRequest, TopicFactory.builder(), &store).await;
    assert_accepted(&requests::StoreNewsArticleRequest, NewsArticleFactory.builder(), &store).await;
    assert_accepted(
        &requests::StoreNewsArticleRequest,
        NewsArticleFactory.builder().state_named("published"),
        &store,
    )
    .await;
}

#[tokio::test]
async fn test_culture_factories_pass_their_requests() {
    let store = seeded_store();
    assert_accepted(&requests::StoreArtistRequest, ArtistFactory.builder(), &store).await;
    assert_accepted(&requests::StoreAwardWinnerRequest, AwardWinnerFactory.builder(), &store).await;
}

#[tokio::test]
async fn test_account_factories_pass_their_requests() {
    let store = RecordStore::new();
    assert_accepted(&requests::StoreApiKeyRequest, ApiKeyFactory.builder(), &seeded_store()).await;
    assert_accepted(&requests::UpdateProfileRequest, UserFactory.builder(), &store).await;
}

#[tokio::test]
async fn test_community_factories_pass_their_requests() {
    let store = seeded_store();
    assert_accepted(
        &requests::StoreUserGeneratedContentRequest,
        UserGeneratedContentFactory.builder(),
        &store,
    )
    .await;
    assert_accepted(
        &requests::StoreUserGeneratedContentRequest,
        UserGeneratedContentFactory.builder().state_named("anonymous"),
        &store,
    )
    .await;
    assert_accepted(&requests::RecordInteractionRequest, InteractionFactory.builder(), &store).await;
    assert_accepted(
        &requests::RecordInteractionRequest,
        InteractionFactory.builder().state_named("needs_follow_up"),
        &store,
    )
    .await;
}

#[tokio::test]
async fn test_rejected_content_passes_moderation() {
    let store = seeded_store();
    let content = UserGeneratedContentFactory
        .builder()
        .state_named("rejected")
        .raw_with_parents(&store)
        .unwrap();

    let input = serde_json::json!({
        "status": content["status"],
        "moderation_notes": content["moderation_notes"],
    });
    let data = handle(&requests::ModerateContentRequest, input, &staff(), Some(&store))
        .await
        .unwrap();
    assert_eq!(data["status"], "rejected");
    assert_eq!(data["moderated_by"], 1);
}
