//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use shard_cache::{api::create_router, cache::CacheStore, AppState};
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> Router {
    create_router(AppState::new(Arc::new(CacheStore::new(16))))
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn put_request(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/put")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

// == PUT Endpoint Tests ==

#[tokio::test]
async fn test_put_endpoint_success() {
    let app = create_test_app();

    let response = app
        .oneshot(put_request(r#"{"key":"test_key","value":"test_value"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(
        json,
        json!({"status": "OK", "message": "Key inserted/updated successfully."})
    );
}

#[tokio::test]
async fn test_put_endpoint_oversized_value() {
    let app = create_test_app();
    let body = json!({"key": "k", "value": "v".repeat(257)}).to_string();

    let response = app.clone().oneshot(put_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "ERROR");
    assert_eq!(json["message"], "Key and value must be <= 256 characters.");

    // Store unchanged
    let response = app.oneshot(get_request("/get?key=k")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_put_endpoint_missing_value() {
    let app = create_test_app();

    let response = app.oneshot(put_request(r#"{"key":"k"}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["message"], "Missing 'key' or 'value' in request");
}

#[tokio::test]
async fn test_put_endpoint_empty_body() {
    let app = create_test_app();

    let response = app.oneshot(put_request(Body::empty())).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["message"], "Empty request body");
}

#[tokio::test]
async fn test_invalid_json_request() {
    let app = create_test_app();

    let response = app.oneshot(put_request("{invalid json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "ERROR");
    assert!(json["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request format"));
}

// == GET Endpoint Tests ==

#[tokio::test]
async fn test_get_endpoint_success() {
    let app = create_test_app();

    let put_response = app
        .clone()
        .oneshot(put_request(r#"{"key":"get_key","value":"get_value"}"#))
        .await
        .unwrap();
    assert_eq!(put_response.status(), StatusCode::OK);

    let get_response = app.oneshot(get_request("/get?key=get_key")).await.unwrap();

    assert_eq!(get_response.status(), StatusCode::OK);
    let json = body_to_json(get_response.into_body()).await;
    assert_eq!(
        json,
        json!({"status": "OK", "key": "get_key", "value": "get_value"})
    );
}

#[tokio::test]
async fn test_get_endpoint_empty_key_and_value() {
    let app = create_test_app();

    let put_response = app
        .clone()
        .oneshot(put_request(r#"{"key":"","value":""}"#))
        .await
        .unwrap();
    assert_eq!(put_response.status(), StatusCode::OK);

    let get_response = app.oneshot(get_request("/get?key=")).await.unwrap();

    assert_eq!(get_response.status(), StatusCode::OK);
    let json = body_to_json(get_response.into_body()).await;
    assert_eq!(json["value"], "");
}

#[tokio::test]
async fn test_get_endpoint_not_found() {
    let app = create_test_app();

    let response = app.oneshot(get_request("/get?key=missing")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json, json!({"status": "ERROR", "message": "Key not found."}));
}

#[tokio::test]
async fn test_get_endpoint_missing_key_is_not_not_found() {
    let app = create_test_app();

    let response = app.oneshot(get_request("/get")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["message"], "Missing 'key' parameter");
}

#[tokio::test]
async fn test_get_endpoint_repeated_key_uses_first() {
    let app = create_test_app();
    app.clone()
        .oneshot(put_request(r#"{"key":"a","value":"first"}"#))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(get_request("/get?key=a&key=b"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json, json!({"status": "OK", "key": "a", "value": "first"}));

    let response = app.oneshot(get_request("/get?key=b&key=a")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json, json!({"status": "ERROR", "message": "Key not found."}));
}

#[tokio::test]
async fn test_get_endpoint_oversized_key() {
    let app = create_test_app();
    let uri = format!("/get?key={}", "k".repeat(257));

    let response = app.oneshot(get_request(&uri)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["message"], "Key must be <= 256 characters.");
}

#[tokio::test]
async fn test_put_overwrites_value() {
    let app = create_test_app();

    for value in ["first", "second"] {
        let body = json!({"key": "k", "value": value}).to_string();
        let response = app.clone().oneshot(put_request(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.oneshot(get_request("/get?key=k")).await.unwrap();
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["value"], "second");
}

// == STATS Endpoint Tests ==

#[tokio::test]
async fn test_stats_endpoint() {
    let app = create_test_app();

    app.clone()
        .oneshot(put_request(r#"{"key":"a","value":"1"}"#))
        .await
        .unwrap();
    app.clone().oneshot(get_request("/get?key=a")).await.unwrap();
    app.clone().oneshot(get_request("/get?key=b")).await.unwrap();

    let response = app.oneshot(get_request("/stats")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["puts"], 1);
    assert_eq!(json["gets"], 2);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["total_entries"], 1);
    assert_eq!(json["evictions"], 0);
    assert_eq!(json["shard_count"], 16);
}

// == HEALTH Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let response = app.oneshot(get_request("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}

// == Unsupported Requests ==

#[tokio::test]
async fn test_unsupported_endpoint() {
    let app = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/get?key=a")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["message"], "Unsupported endpoint or method");
}

// == Over a Real Socket ==

#[tokio::test]
async fn test_server_roundtrip_over_tcp() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        axum::serve(listener, create_test_app()).await.unwrap();
    });

    let client = reqwest::Client::new();
    let base = format!("http://{}", addr);

    let put: Value = client
        .post(format!("{}/put", base))
        .json(&json!({"key": "remote", "value": "over the wire"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(put["status"], "OK");

    let response = client
        .get(format!("{}/get", base))
        .query(&[("key", "remote")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    let get: Value = response.json().await.unwrap();
    assert_eq!(get["value"], "over the wire");

    server.abort();
}
