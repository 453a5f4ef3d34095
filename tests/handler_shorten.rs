mod common;

use axum_test::TestServer;
use chrono::{DateTime, TimeDelta, Utc};
use serde_json::{Value, json};
use shortlink::domain::clock::Clock;
use shortlink::domain::repositories::LinkRepository;

#[tokio::test]
async fn test_shorten_creates_link() {
    let app = common::test_app();
    let server = TestServer::new(app.router).unwrap();

    let response = server
        .post("/api/shorten")
        .json(&json!({ "originalUrl": "https://example.com/some/page" }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);

    let json = response.json::<Value>();
    let id = json["id"].as_str().unwrap();
    assert_eq!(id.len(), 7);
    assert_eq!(json["originalUrl"], "https://example.com/some/page");
    assert_eq!(json["shortUrl"], format!("{}/{}", common::BASE_URL, id));
    assert_eq!(json["clicks"], 0);
    assert!(json["createdAt"].is_string());
    assert!(json["expiresAt"].is_null());

    assert!(app.repo.find_by_id(id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_shorten_with_ttl_sets_expiry() {
    let app = common::test_app();
    let now = app.clock.now();
    let server = TestServer::new(app.router).unwrap();

    let response = server
        .post("/api/shorten")
        .json(&json!({ "originalUrl": "https://example.com", "ttl": 24 }))
        .await;

    response.assert_status(axum::http::StatusCode::CREATED);

    let json = response.json::<Value>();
    let expires_at: DateTime<Utc> = json["expiresAt"].as_str().unwrap().parse().unwrap();
    assert_eq!(expires_at, now + TimeDelta::hours(24));
}

#[tokio::test]
async fn test_shorten_same_url_returns_existing() {
    let app = common::test_app();
    let server = TestServer::new(app.router).unwrap();

    let first = server
        .post("/api/shorten")
        .json(&json!({ "originalUrl": "https://example.com", "ttl": 1 }))
        .await;
    first.assert_status(axum::http::StatusCode::CREATED);

    let second = server
        .post("/api/shorten")
        .json(&json!({ "originalUrl": "https://example.com", "ttl": 72 }))
        .await;
    second.assert_status_ok();

    assert_eq!(first.json::<Value>(), second.json::<Value>());
    assert_eq!(app.repo.len(), 1);
}

#[tokio::test]
async fn test_shorten_non_positive_ttl_is_permanent() {
    let app = common::test_app();
    let server = TestServer::new(app.router).unwrap();

    for (url, ttl) in [("https://a.example.com", 0.0), ("https://b.example.com", -3.0)] {
        let response = server
            .post("/api/shorten")
            .json(&json!({ "originalUrl": url, "ttl": ttl }))
            .await;

        response.assert_status(axum::http::StatusCode::CREATED);
        assert!(response.json::<Value>()["expiresAt"].is_null());
    }
}

#[tokio::test]
async fn test_shorten_invalid_url() {
    let app = common::test_app();
    let server = TestServer::new(app.router).unwrap();

    for url in ["not a url", "ftp://example.com", "javascript:alert(1)", ""] {
        let response = server
            .post("/api/shorten")
            .json(&json!({ "originalUrl": url }))
            .await;

        response.assert_status_bad_request();
        let json = response.json::<Value>();
        assert_eq!(json["error"]["code"], "validation_error");
    }

    assert!(app.repo.is_empty());
}

#[tokio::test]
async fn test_shorten_missing_original_url() {
    let app = common::test_app();
    let server = TestServer::new(app.router).unwrap();

    let response = server.post("/api/shorten").json(&json!({ "ttl": 5 })).await;

    response.assert_status_bad_request();
    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "validation_error");
    assert!(json["error"]["details"]["fields"]["original_url"].is_array());
}

#[tokio::test]
async fn test_shorten_malformed_body() {
    let app = common::test_app();
    let server = TestServer::new(app.router).unwrap();

    let response = server
        .post("/api/shorten")
        .json(&json!({ "originalUrl": "https://example.com", "ttl": "soon" }))
        .await;

    response.assert_status_bad_request();
    assert_eq!(
        response.json::<Value>()["error"]["code"],
        "validation_error"
    );
}

#[tokio::test]
async fn test_shorten_store_unavailable() {
    let app = common::test_app();
    app.repo.set_unavailable(true);
    let server = TestServer::new(app.router).unwrap();

    let response = server
        .post("/api/shorten")
        .json(&json!({ "originalUrl": "https://example.com" }))
        .await;

    response.assert_status(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    let json = response.json::<Value>();
    assert_eq!(json["error"]["code"], "store_unavailable");
    assert!(!json.to_string().contains("marked unavailable"));
}
