//! Integration tests for `OutletApiClient` using wiremock HTTP mocks.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use outletmap_client::{ClientError, OutletApiClient};

fn test_client(base_url: &str) -> OutletApiClient {
    OutletApiClient::with_base_url(base_url, 5, "outletmap-test/0.1")
        .expect("client construction should not fail")
}

fn outlets_fixture() -> serde_json::Value {
    json!([
        {
            "id": 1,
            "name": "Subway Menara Ken TTDI",
            "address": "Jalan Tun Mohd Fuad, Taman Tun Dr Ismail, Kuala Lumpur",
            "operating_hours": "Monday - Sunday, 8:00 AM - 10:00 PM",
            "latitude": 3.1409,
            "longitude": 101.6932,
            "waze_link": "https://waze.com/ul?ll=3.1409,101.6932"
        },
        {
            "id": 2,
            "name": "Subway Jalan Tun Razak",
            "address": "Jalan Tun Razak, Kuala Lumpur",
            "operating_hours": null,
            "latitude": null,
            "longitude": null,
            "waze_link": null
        }
    ])
}

// ---------------------------------------------------------------------------
// GET /outlets
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fetch_outlets_parses_backend_records() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/outlets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(outlets_fixture()))
        .expect(1)
        .mount(&server)
        .await;

    let outlets = test_client(&server.uri())
        .fetch_outlets()
        .await
        .expect("should parse outlets");

    assert_eq!(outlets.len(), 2);
    assert_eq!(outlets[0].name, "Subway Menara Ken TTDI");
    assert_eq!(outlets[0].latitude, Some(3.1409));
    assert!(outlets[1].coordinate().is_none());
    assert!(outlets[1].operating_hours.is_none());
}

#[tokio::test]
async fn fetch_outlets_works_with_trailing_slash_base_url() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/outlets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let outlets = test_client(&format!("{}/", server.uri()))
        .fetch_outlets()
        .await
        .unwrap();
    assert!(outlets.is_empty());
}

#[tokio::test]
async fn fetch_outlets_maps_404_to_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/outlets"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "detail": "No Subway outlets found" })),
        )
        .mount(&server)
        .await;

    let err = test_client(&server.uri()).fetch_outlets().await.unwrap_err();
    assert!(
        matches!(err, ClientError::NotFound { ref url } if url.ends_with("/outlets")),
        "expected NotFound, got: {err:?}"
    );
}

#[tokio::test]
async fn fetch_outlets_maps_bare_500_to_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/outlets"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri()).fetch_outlets().await.unwrap_err();
    assert!(
        matches!(err, ClientError::UnexpectedStatus { status: 500, .. }),
        "expected UnexpectedStatus(500), got: {err:?}"
    );
}

#[tokio::test]
async fn fetch_outlets_rejects_non_array_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/outlets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "outlets": [] })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri()).fetch_outlets().await.unwrap_err();
    assert!(
        matches!(err, ClientError::Deserialize { ref context, .. } if context.contains("outlet list")),
        "expected Deserialize, got: {err:?}"
    );
}

#[tokio::test]
async fn fetch_outlets_surfaces_connection_failure_as_http_error() {
    // Nothing listens on port 1.
    let err = test_client("http://127.0.0.1:1")
        .fetch_outlets()
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Http(_)), "expected Http, got: {err:?}");
}

// ---------------------------------------------------------------------------
// POST /chatbot
// ---------------------------------------------------------------------------

#[tokio::test]
async fn send_chat_posts_query_and_returns_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chatbot"))
        .and(header("content-type", "application/json"))
        .and(header("accept", "application/json"))
        .and(body_json(json!({ "query": "How many outlets in Bangsar?" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "<p>There are <b>2</b> Subway outlets in <b>Bangsar</b>.</p>"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let reply = test_client(&server.uri())
        .send_chat("How many outlets in Bangsar?")
        .await
        .expect("should return reply");
    assert_eq!(
        reply,
        "<p>There are <b>2</b> Subway outlets in <b>Bangsar</b>.</p>"
    );
}

#[tokio::test]
async fn send_chat_maps_backend_error_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chatbot"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "Internal Server Error",
            "message": "Weaviate is not reachable"
        })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .send_chat("which outlet closes the latest?")
        .await
        .unwrap_err();
    assert!(
        matches!(err, ClientError::Backend { status: 500, ref message } if message == "Weaviate is not reachable"),
        "expected Backend error, got: {err:?}"
    );
    assert_eq!(
        err.to_string(),
        "backend error (500): Weaviate is not reachable"
    );
}

#[tokio::test]
async fn send_chat_maps_validation_detail() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chatbot"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "detail": "Query cannot be empty" })),
        )
        .mount(&server)
        .await;

    let err = test_client(&server.uri()).send_chat(" ").await.unwrap_err();
    assert!(
        matches!(err, ClientError::Backend { status: 400, ref message } if message == "Query cannot be empty"),
        "expected Backend error, got: {err:?}"
    );
}

#[tokio::test]
async fn send_chat_rejects_reply_without_response_field() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chatbot"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "answer": "hi" })))
        .mount(&server)
        .await;

    let err = test_client(&server.uri()).send_chat("hi").await.unwrap_err();
    assert!(
        matches!(err, ClientError::Deserialize { ref context, .. } if context.contains("chatbot reply")),
        "expected Deserialize, got: {err:?}"
    );
}

#[test]
fn with_base_url_rejects_missing_scheme() {
    let result = OutletApiClient::with_base_url("127.0.0.1:8000", 5, "outletmap-test/0.1");
    assert!(matches!(result, Err(ClientError::InvalidBaseUrl { .. })));
}

#[test]
fn with_base_url_rejects_query_string_and_malformed_host() {
    for raw in ["http://h.example/api?key=1", "http://exa mple.com", "http://host:port"] {
        let result = OutletApiClient::with_base_url(raw, 5, "outletmap-test/0.1");
        assert!(
            matches!(result, Err(ClientError::InvalidBaseUrl { .. })),
            "{raw} should be rejected"
        );
    }
}

#[tokio::test]
async fn fetch_outlets_joins_under_base_path_prefix() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/outlets"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let outlets = test_client(&format!("{}/api", server.uri()))
        .fetch_outlets()
        .await
        .unwrap();
    assert!(outlets.is_empty());
}
