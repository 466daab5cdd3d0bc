//! Integration tests for RegistryClient.
//!
//! Uses wiremock for HTTP mocking. Covers payload envelopes, status code
//! mapping, query_state's never-raise contract and the one-entry-per-
//! mutating-call audit trail.

use doiman_registry::{
    DataCiteInstance, DoiAttributes, DoiEvent, DoiState, MemorySink, RegistryClient,
    RegistryConfig, RegistryError, Title,
};
use wiremock::matchers::{basic_auth, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_client(server: &MockServer) -> RegistryClient {
    let config = RegistryConfig::new(DataCiteInstance::Test, "REPO.ID", "secret", "10.5438")
        .with_api_url(server.uri());
    RegistryClient::new(&config).expect("failed to create client")
}

fn doi_body(doi: &str, state: &str) -> serde_json::Value {
    serde_json::json!({
        "data": {
            "id": doi,
            "type": "dois",
            "attributes": { "doi": doi, "state": state, "url": "https://example.org/landing/1" }
        }
    })
}

#[tokio::test]
async fn create_draft_posts_without_doi_attribute() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/dois"))
        .and(basic_auth("REPO.ID", "secret"))
        .respond_with(ResponseTemplate::new(201).set_body_json(doi_body("10.5438/rand-1", "draft")))
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let sink = MemorySink::new();
    let doi = client
        .create_draft(None, None, &sink)
        .await
        .expect("draft creation failed");

    assert_eq!(doi, "10.5438/rand-1");
    assert_eq!(sink.len(), 1);

    // The authority assigns the suffix: the payload must carry the prefix
    // but no doi attribute.
    let requests = server.received_requests().await.unwrap();
    let payload: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(payload["data"]["type"], "dois");
    assert_eq!(payload["data"]["attributes"]["prefix"], "10.5438");
    assert!(payload["data"]["attributes"].get("doi").is_none());
    assert!(payload["data"]["attributes"].get("event").is_none());
}

#[tokio::test]
async fn create_draft_with_explicit_doi_validates_prefix() {
    let server = MockServer::start().await;
    let client = create_test_client(&server);
    let sink = MemorySink::new();

    let result = client
        .create_draft(None, Some("10.9999/mine"), &sink)
        .await;
    assert!(matches!(result, Err(RegistryError::WrongPrefix { .. })));

    // Validation fails before any network call or history entry.
    assert!(server.received_requests().await.unwrap().is_empty());
    assert!(sink.is_empty());
}

#[tokio::test]
async fn create_public_sets_publish_event_and_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/dois"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(doi_body("10.5438/pub-1", "findable")),
        )
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let sink = MemorySink::new();
    let metadata = DoiAttributes {
        titles: vec![Title {
            lang: "en".to_string(),
            title: "A dataset".to_string(),
        }],
        ..Default::default()
    };
    client
        .create_public(metadata, "https://example.org/landing/1", None, &sink)
        .await
        .expect("public creation failed");

    let requests = server.received_requests().await.unwrap();
    let payload: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(payload["data"]["attributes"]["event"], "publish");
    assert_eq!(
        payload["data"]["attributes"]["url"],
        "https://example.org/landing/1"
    );
}

#[tokio::test]
async fn change_state_puts_explicit_event() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/dois/10.5438/0012"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(doi_body("10.5438/0012", "registered")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let sink = MemorySink::new();
    let attrs = client
        .change_state("10.5438/0012", DoiEvent::Register, DoiAttributes::default(), &sink)
        .await
        .expect("change_state failed");

    assert_eq!(attrs.state.as_deref(), Some("registered"));
    assert_eq!(sink.len(), 1);

    let requests = server.received_requests().await.unwrap();
    let payload: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(payload["data"]["attributes"]["event"], "register");
}

#[tokio::test]
async fn hide_puts_hide_event() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/dois/10.5438/0012"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(doi_body("10.5438/0012", "registered")),
        )
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let sink = MemorySink::new();
    client
        .hide("10.5438/0012", &sink)
        .await
        .expect("hide failed");

    let requests = server.received_requests().await.unwrap();
    let payload: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(payload["data"]["attributes"]["event"], "hide");
}

#[tokio::test]
async fn show_puts_publish_event() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/dois/10.5438/0012"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(doi_body("10.5438/0012", "findable")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let sink = MemorySink::new();
    let attrs = client
        .show("10.5438/0012", &sink)
        .await
        .expect("show failed");

    assert_eq!(attrs.state.as_deref(), Some("findable"));
    assert_eq!(sink.len(), 1);

    let requests = server.received_requests().await.unwrap();
    let payload: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(payload["data"]["attributes"]["event"], "publish");
}

#[tokio::test]
async fn fetch_media_extracts_relationships() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dois/10.5438/0012"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {
                "id": "10.5438/0012",
                "type": "dois",
                "attributes": { "doi": "10.5438/0012", "state": "findable" },
                "relationships": {
                    "media": { "data": [{ "id": "media-1", "type": "media" }] }
                }
            }
        })))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let media = client
        .fetch_media("10.5438/0012")
        .await
        .expect("fetch_media failed");
    assert_eq!(media["media"]["data"][0]["id"], "media-1");
}

#[tokio::test]
async fn fetch_media_without_relationships_is_invalid() {
    let server = MockServer::start().await;
    // doi_body carries no relationships object.
    Mock::given(method("GET"))
        .and(path("/dois/10.5438/0012"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(doi_body("10.5438/0012", "findable")),
        )
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let result = client.fetch_media("10.5438/0012").await;
    assert!(matches!(result, Err(RegistryError::InvalidResponse { .. })));
}

#[tokio::test]
async fn query_state_maps_state_attribute() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dois/10.5438/0012"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(doi_body("10.5438/0012", "findable")),
        )
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let (state, found) = client.query_state(Some("10.5438/0012")).await;
    assert_eq!(state, DoiState::Findable);
    assert!(found);
}

#[tokio::test]
async fn query_state_never_raises() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dois/10.5438/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = create_test_client(&server);

    // 404 response
    let (state, found) = client.query_state(Some("10.5438/gone")).await;
    assert_eq!(state, DoiState::Unset);
    assert!(!found);

    // No DOI at all
    let (state, found) = client.query_state(None).await;
    assert_eq!(state, DoiState::Unset);
    assert!(!found);

    // Unreachable authority
    let config = RegistryConfig::new(DataCiteInstance::Test, "REPO.ID", "secret", "10.5438")
        .with_api_url("http://127.0.0.1:1");
    let dead_client = RegistryClient::new(&config).unwrap();
    let (state, found) = dead_client.query_state(Some("10.5438/0012")).await;
    assert_eq!(state, DoiState::Unset);
    assert!(!found);
}

#[tokio::test]
async fn get_operations_append_no_history() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dois/10.5438/0012"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(doi_body("10.5438/0012", "findable")),
        )
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let _ = client.query_state(Some("10.5438/0012")).await;
    let _ = client.fetch_metadata("10.5438/0012").await;
    let _ = client.fetch_url("10.5438/0012").await;
    // query/fetch paths take no sink at all; nothing to assert beyond the
    // calls not requiring one. This guards the API shape.
}

#[tokio::test]
async fn fetch_metadata_maps_error_statuses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/dois/10.5438/gone"))
        .respond_with(ResponseTemplate::new(410).set_body_string("deleted"))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    match client.fetch_metadata("10.5438/gone").await {
        Err(RegistryError::Gone { body }) => assert_eq!(body, "deleted"),
        other => panic!("expected Gone, got {other:?}"),
    }
}

#[tokio::test]
async fn mutating_failure_still_appends_one_entry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/dois"))
        .respond_with(ResponseTemplate::new(400).set_body_string("invalid payload"))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let sink = MemorySink::new();
    let result = client.create_draft(None, None, &sink).await;
    assert!(matches!(result, Err(RegistryError::BadRequest { .. })));

    let entries = sink.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].response_status, Some(400));
    assert_eq!(entries[0].response_body.as_deref(), Some("invalid payload"));
}

#[tokio::test]
async fn transport_failure_appends_error_entry() {
    let config = RegistryConfig::new(DataCiteInstance::Test, "REPO.ID", "secret", "10.5438")
        .with_api_url("http://127.0.0.1:1");
    let client = RegistryClient::new(&config).unwrap();
    let sink = MemorySink::new();

    let result = client.create_draft(None, None, &sink).await;
    assert!(matches!(result, Err(RegistryError::Transport { .. })));

    let entries = sink.entries();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].response_status.is_none());
    assert!(entries[0].error.is_some());
}

#[tokio::test]
async fn delete_expects_204() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/dois/10.5438/draft-1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/dois/10.5438/public-1"))
        .respond_with(ResponseTemplate::new(403).set_body_string("not a draft"))
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let sink = MemorySink::new();

    client
        .delete("10.5438/draft-1", &sink)
        .await
        .expect("draft delete failed");
    let result = client.delete("10.5438/public-1", &sink).await;
    assert!(matches!(result, Err(RegistryError::Forbidden { .. })));

    // One entry per call, success and failure alike.
    assert_eq!(sink.len(), 2);
}

#[tokio::test]
async fn update_merges_url_into_payload() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/dois/10.5438/0012"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(doi_body("10.5438/0012", "findable")),
        )
        .mount(&server)
        .await;

    let client = create_test_client(&server);
    let sink = MemorySink::new();
    client
        .update("10.5438/0012", None, Some("https://example.org/new"), &sink)
        .await
        .expect("update failed");

    let requests = server.received_requests().await.unwrap();
    let payload: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(payload["data"]["attributes"]["url"], "https://example.org/new");
    assert_eq!(payload["data"]["attributes"]["doi"], "10.5438/0012");
}
