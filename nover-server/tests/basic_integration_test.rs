//! Basic integration tests for nover-server

use reqwest::Client;

mod common;

#[tokio::test]
async fn test_health_check() {
    let server = common::TestServer::start().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/health", server.url))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["name"], "nover-test");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_genre_and_bank_lists() {
    let server = common::TestServer::start().await;

    let response = server
        .client
        .get(server.endpoint("/api/v1/genres"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    let genres = body["genreList"].as_array().unwrap();
    assert!(!genres.is_empty());
    assert!(genres[0]["genreName"].is_string());

    let response = server
        .client
        .get(server.endpoint("/api/v1/bank/get"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["bankList"].as_array().unwrap().len() >= 2);
}

#[tokio::test]
async fn test_unknown_book_is_not_found() {
    let server = common::TestServer::start().await;

    let response = server
        .client
        .get(server.endpoint("/api/v1/books/9999"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);
    assert_eq!(common::error_code(response).await, "not_found");
}

#[tokio::test]
async fn test_malformed_id_is_bad_request() {
    let server = common::TestServer::start().await;

    let response = server
        .client
        .get(server.endpoint("/api/v1/chapters/abc"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    assert_eq!(common::error_code(response).await, "bad_request");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let server = common::TestServer::start().await;

    let response = server
        .client
        .post(server.endpoint("/api/auth/login"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 400);
    assert_eq!(common::error_code(response).await, "bad_request");
}
