//! Integration tests for middleware functionality.

use declarest::middleware::{LoggingLayer, SetHeaderLayer};
use declarest::prelude::*;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{header, method, path},
};

#[rest_client]
pub trait ProtectedApi {
    #[get("/protected")]
    #[headers(authorization = "Bearer declared-token", accept = "application/json")]
    async fn whoami(&self) -> declarest::Result<Response>;

    #[get("/logged")]
    async fn logged(&self) -> declarest::Result<Response>;
}

fn api(server: &MockServer, client: HyperClient) -> RestApi<HyperClient> {
    RestApi::new(client, server.uri()).expect("valid base url")
}

/// Bearer auth set by the transport replaces the declared header.
#[tokio::test]
async fn test_bearer_auth_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/protected"))
        .and(header("Authorization", "Bearer my-secret-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"user": "alice"})),
        )
        .mount(&mock_server)
        .await;

    let client = HyperClient::builder()
        .with_bearer_auth("my-secret-token")
        .build();

    let response = api(&mock_server, client).whoami().await.expect("response");

    assert!(response.is_success());
}

#[tokio::test]
async fn test_if_missing_keeps_declared_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/protected"))
        .and(header("Accept", "application/json"))
        .and(header("X-Client", "declarest"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = HyperClient::builder()
        .layer(SetHeaderLayer::if_missing("Accept", "text/plain"))
        .layer(SetHeaderLayer::if_missing("X-Client", "declarest"))
        .build();

    let response = api(&mock_server, client).whoami().await.expect("response");

    assert_eq!(response.status(), 200);
}

/// Logging must not alter the request/response flow.
#[tokio::test]
async fn test_logging_middleware() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/logged"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&mock_server)
        .await;

    let client = HyperClient::builder().with_logging().build();

    let response = api(&mock_server, client).logged().await.expect("response");

    assert_eq!(response.status(), 503);
    assert_eq!(response.text().expect("utf-8"), "maintenance");
}

#[tokio::test]
async fn test_debug_logging_with_defaults() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/logged"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = HyperClient::builder()
        .with_defaults()
        .layer(LoggingLayer::debug())
        .build();

    let response = api(&mock_server, client).logged().await.expect("response");

    assert!(response.is_success());
}

#[tokio::test]
async fn test_middleware_composition() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/protected"))
        .and(header("Authorization", "Bearer composed"))
        .and(header("X-Trace", "on"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = HyperClient::builder()
        .with_header("X-Trace", "on")
        .with(SetHeaderLayer::bearer("composed"))
        .with_debug_logging()
        .build();

    api(&mock_server, client).whoami().await.expect("response");
}
