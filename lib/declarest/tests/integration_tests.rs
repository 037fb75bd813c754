//! Integration tests for `HyperClient` using wiremock.

use std::time::Duration;

use declarest::{Error, HttpClient, HyperClient, Method, Request};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use url::Url;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct User {
    id: u64,
    name: String,
}

fn url(server: &MockServer, path: &str) -> Url {
    Url::parse(&format!("{}{path}", server.uri())).expect("url")
}

async fn send(client: &HyperClient, request: Request) -> declarest::Result<declarest::Response> {
    let (method, url, options) = request.into_parts();
    client.request(method, url, options).await
}

#[tokio::test]
async fn test_get_request() {
    let mock_server = MockServer::start().await;

    let user = User {
        id: 1,
        name: "Alice".to_string(),
    };

    Mock::given(method("GET"))
        .and(path("/users/1"))
        .and(header("Accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&user))
        .mount(&mock_server)
        .await;

    let client = HyperClient::new();
    let request = Request::builder(Method::Get, url(&mock_server, "/users/1"))
        .header("Accept", "application/json")
        .build();

    let response = send(&client, request).await.expect("response");

    assert!(response.is_success());
    assert_eq!(response.status(), 200);
    assert_eq!(response.json::<User>().expect("json"), user);
}

#[tokio::test]
async fn test_post_request_with_json_body() {
    let mock_server = MockServer::start().await;

    let input = User {
        id: 0,
        name: "Bob".to_string(),
    };
    let output = User {
        id: 42,
        name: "Bob".to_string(),
    };

    Mock::given(method("POST"))
        .and(path("/users"))
        .and(header("Content-Type", "application/json"))
        .and(body_json(&input))
        .respond_with(ResponseTemplate::new(201).set_body_json(&output))
        .mount(&mock_server)
        .await;

    let client = HyperClient::new();
    let request = Request::builder(Method::Post, url(&mock_server, "/users"))
        .json(&input)
        .expect("json body")
        .build();

    let response = send(&client, request).await.expect("response");

    assert_eq!(response.status(), 201);
    assert_eq!(response.json::<User>().expect("json"), output);
}

#[tokio::test]
async fn test_error_status_is_a_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(
            ResponseTemplate::new(404)
                .insert_header("X-Trace", "abc")
                .set_body_string("Not Found"),
        )
        .mount(&mock_server)
        .await;

    let client = HyperClient::new();
    let request = Request::builder(Method::Get, url(&mock_server, "/missing")).build();

    let response = send(&client, request).await.expect("response");

    assert!(response.is_client_error());
    assert_eq!(response.header("x-trace"), Some("abc"));
    assert_eq!(response.text().expect("utf-8"), "Not Found");

    let err = response.error_for_status().expect_err("404 is an error");
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn test_configured_user_agent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/agent"))
        .and(header("User-Agent", "declarest-tests/1.0"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let client = HyperClient::builder()
        .user_agent("declarest-tests/1.0")
        .build();
    let request = Request::builder(Method::Get, url(&mock_server, "/agent")).build();

    let response = send(&client, request).await.expect("response");
    assert_eq!(response.status(), 204);
}

#[tokio::test]
async fn test_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&mock_server)
        .await;

    let client = HyperClient::builder()
        .timeout(Duration::from_millis(100))
        .build();
    let request = Request::builder(Method::Get, url(&mock_server, "/slow")).build();

    let result = send(&client, request).await;
    assert!(matches!(result, Err(Error::Timeout)), "{result:?}");
}

/// Headers arrive at once but the body stalls past the deadline.
#[tokio::test]
async fn test_timeout_covers_slow_body() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("addr").port();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.expect("accept");
        let mut buf = [0_u8; 1024];
        let _ = stream.read(&mut buf).await;
        stream
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 10\r\n\r\nab")
            .await
            .expect("write head");
        tokio::time::sleep(Duration::from_secs(2)).await;
    });

    let client = HyperClient::builder()
        .timeout(Duration::from_millis(200))
        .build();
    let url = Url::parse(&format!("http://127.0.0.1:{port}/")).expect("url");
    let request = Request::builder(Method::Get, url).build();

    let result = send(&client, request).await;
    assert!(matches!(result, Err(Error::Timeout)), "{result:?}");
}

#[tokio::test]
async fn test_connection_refused() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    drop(listener);

    let client = HyperClient::new();
    let url = Url::parse(&format!("http://127.0.0.1:{port}/")).expect("url");
    let request = Request::builder(Method::Get, url).build();

    let result = send(&client, request).await;
    assert!(matches!(result, Err(Error::Connection(_))), "{result:?}");
}

#[tokio::test]
async fn test_client_is_shared_across_tasks() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/ping"))
        .respond_with(ResponseTemplate::new(200))
        .expect(4)
        .mount(&mock_server)
        .await;

    let client = HyperClient::new();
    let mut tasks = Vec::new();
    for _ in 0..4 {
        let client = client.clone();
        let url = url(&mock_server, "/ping");
        tasks.push(tokio::spawn(async move {
            let request = Request::builder(Method::Get, url).build();
            send(&client, request).await.map(|r| r.status())
        }));
    }

    for task in tasks {
        assert_eq!(task.await.expect("join").expect("response"), 200);
    }
}
