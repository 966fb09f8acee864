//! Backend API endpoint tests using wiremock.
//!
//! These tests verify that the BackendClient calls the three backend
//! endpoints with the expected shapes and that every failure mode is
//! normalized into the uniform error string.

use veritas_tui::backend::BackendClient;
use veritas_tui::models::{ModelId, TrialFilters};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn retrieve_sends_query_topk_and_serialized_filters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/retrieve"))
        .and(query_param("query", "heart failure"))
        .and(query_param("top_k", "3"))
        .and(query_param("filters_serialized", "{}"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ids": ["NCT001", "NCT002"],
            "documents": ["First trial", "Second trial"],
        })))
        .mount(&mock_server)
        .await;

    let client = BackendClient::with_base_url(mock_server.uri());
    let result = client
        .retrieve("heart failure", 3, &TrialFilters::default())
        .await;

    let response = result.expect("expected Ok");
    assert_eq!(response.ids, vec!["NCT001", "NCT002"]);
    assert_eq!(response.documents, vec!["First trial", "Second trial"]);
}

#[tokio::test]
async fn retrieve_serializes_set_filters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/retrieve"))
        .and(query_param(
            "filters_serialized",
            r#"{"studyType":"INTERVENTIONAL","minAge":18}"#,
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "ids": [],
            "documents": [],
        })))
        .mount(&mock_server)
        .await;

    let filters = TrialFilters {
        study_type: Some("INTERVENTIONAL".to_string()),
        min_age: Some(18),
        ..Default::default()
    };
    let client = BackendClient::with_base_url(mock_server.uri());
    let result = client.retrieve("anything", 5, &filters).await;
    assert!(result.is_ok(), "expected Ok, got {result:?}");
}

#[tokio::test]
async fn server_error_with_details_body_formats_uniformly() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/retrieve"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(serde_json::json!({ "details": "boom" })),
        )
        .mount(&mock_server)
        .await;

    let client = BackendClient::with_base_url(mock_server.uri());
    let err = client
        .retrieve("q", 3, &TrialFilters::default())
        .await
        .expect_err("expected Err");
    assert_eq!(
        err.to_string(),
        "Status 500 (Internal Server Error); caused by:\n\nboom"
    );
}

#[tokio::test]
async fn server_error_without_details_falls_back_to_raw_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/meta/NCT404"))
        .respond_with(ResponseTemplate::new(404).set_body_string("nope"))
        .mount(&mock_server)
        .await;

    let client = BackendClient::with_base_url(mock_server.uri());
    let err = client.meta("NCT404").await.expect_err("expected Err");
    assert_eq!(err.to_string(), "Status 404 (Not Found); caused by:\n\nnope");
}

#[tokio::test]
async fn server_error_with_empty_body_uses_generic_fallback() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/meta/NCT500"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let client = BackendClient::with_base_url(mock_server.uri());
    let err = client.meta("NCT500").await.expect_err("expected Err");
    assert_eq!(
        err.to_string(),
        "Status 502 (Bad Gateway); caused by:\n\nUnknown error"
    );
}

#[tokio::test]
async fn meta_unwraps_the_metadata_envelope() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/meta/NCT123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "metadata": {
                "shortTitle": "A trial",
                "longTitle": "A longer trial title",
                "references": [{"pmid": "99", "citation": "Doe J."}],
            }
        })))
        .mount(&mock_server)
        .await;

    let client = BackendClient::with_base_url(mock_server.uri());
    let meta = client.meta("NCT123").await.expect("expected Ok");
    assert_eq!(meta.short_title, "A trial");
    assert_eq!(meta.references[0].pmid, "99");
}

#[tokio::test]
async fn chat_posts_query_to_model_and_trial_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/6894888983713546240/NCT123"))
        .and(body_json(serde_json::json!({ "query": "what is the dose?" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": "The dose is 10mg daily."
        })))
        .mount(&mock_server)
        .await;

    let client = BackendClient::with_base_url(mock_server.uri());
    let response = client
        .chat("what is the dose?", ModelId::Finetuned, "NCT123")
        .await
        .expect("expected Ok");
    assert_eq!(response, "The dose is 10mg daily.");
}

#[tokio::test]
async fn malformed_success_payload_is_an_error_not_a_panic() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/gemini-1.5-flash-001/NCT123"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let client = BackendClient::with_base_url(mock_server.uri());
    let result = client.chat("hi", ModelId::GeminiFlash, "NCT123").await;
    assert!(result.is_err());
}

#[tokio::test]
async fn heartbeat_reports_backend_liveness() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/heartbeat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "timestamp": 1724900000000000000u64 })),
        )
        .mount(&mock_server)
        .await;

    let client = BackendClient::with_base_url(mock_server.uri());
    assert!(client.heartbeat().await.expect("expected Ok"));
}

#[tokio::test]
async fn transport_failure_normalizes_to_a_string() {
    // Port is closed: the request never reaches a server
    let client = BackendClient::with_base_url("http://127.0.0.1:1");
    let err = client
        .retrieve("q", 3, &TrialFilters::default())
        .await
        .expect_err("expected Err");
    assert!(!err.to_string().is_empty());
}
