//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value as Json};
use std::time::Duration;
use tower::ServiceExt;
use ttl_registry::{api::create_router, AppState, Registry};

// == Helper Functions ==

fn create_test_app() -> Router {
    create_app_with_ttl(Duration::from_secs(300))
}

fn create_app_with_ttl(ttl: Duration) -> Router {
    create_router(AppState::new(Registry::new(ttl)))
}

async fn body_to_json(body: Body) -> Json {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn request(method: &str, uri: &str, body: Option<&str>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    match body {
        Some(body) => builder.body(Body::from(body.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> axum::response::Response {
    app.clone().oneshot(request(method, uri, body)).await.unwrap()
}

// == Append / Get ==

#[tokio::test]
async fn test_append_then_get_each_shape() {
    let app = create_test_app();

    let cases = [
        ("scalar", json!("London is the capital of ...")),
        ("sequence", json!(["Alpha", "Bravo", "Charlie"])),
        ("mapping", json!({"the_first": "Nicolas", "the_second": "Francois"})),
    ];

    for (key, value) in cases {
        let uri = format!("/entries/{}", key);
        let response = send(&app, "POST", &uri, Some(&value.to_string())).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers()["location"], uri.as_str());

        let response = send(&app, "GET", &uri, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("expire-at"));
        assert_eq!(body_to_json(response.into_body()).await, value);
    }
}

#[tokio::test]
async fn test_append_conflict() {
    let app = create_test_app();

    let response = send(&app, "POST", "/entries/dup", Some(r#""first""#)).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(&app, "POST", "/entries/dup", Some(r#""second""#)).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("already exists"));

    let response = send(&app, "GET", "/entries/dup", None).await;
    assert_eq!(body_to_json(response.into_body()).await, json!("first"));
}

#[tokio::test]
async fn test_append_unprocessable_payload() {
    let app = create_test_app();

    for payload in ["42", "[1, 2]", r#"{"a": {"b": "c"}}"#, "garbage"] {
        let response = send(&app, "POST", "/entries/bad", Some(payload)).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    let response = send(&app, "GET", "/entries/bad", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_key_too_long() {
    let app = create_test_app();
    let uri = format!("/entries/{}", "x".repeat(257));

    for method in ["POST", "PUT", "GET", "HEAD", "DELETE"] {
        let response = send(&app, method, &uri, Some(r#""v""#)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", method);
    }
}

#[tokio::test]
async fn test_location_header_is_percent_encoded() {
    let app = create_test_app();

    let cases = [
        ("/entries/a%3Fb%23c", "/entries/a%3Fb%23c"),
        ("/entries/caf%C3%A9", "/entries/caf%C3%A9"),
        ("/entries/50%25%2Foff", "/entries/50%25%2Foff"),
    ];

    for (uri, expected_location) in cases {
        let response = send(&app, "POST", uri, Some(r#""stored""#)).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let location = response.headers()["location"].to_str().unwrap().to_string();
        assert_eq!(location, expected_location);

        // The location leads back to the same entry
        let response = send(&app, "GET", &location, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_to_json(response.into_body()).await, json!("stored"));
    }

    // Nothing was stored under the prefix before '?'
    let response = send(&app, "GET", "/entries/a", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == Update ==

#[tokio::test]
async fn test_update_existing_entry() {
    let app = create_test_app();

    send(&app, "POST", "/entries/city", Some(r#""London""#)).await;

    let response = send(&app, "PUT", "/entries/city", Some(r#"{"capital": "Paris"}"#)).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, "GET", "/entries/city", None).await;
    assert_eq!(
        body_to_json(response.into_body()).await,
        json!({"capital": "Paris"})
    );
}

#[tokio::test]
async fn test_update_missing_entry() {
    let app = create_test_app();

    let response = send(&app, "PUT", "/entries/ghost", Some(r#""v""#)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, "GET", "/entries/ghost", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == Delete / Head ==

#[tokio::test]
async fn test_delete_is_idempotent() {
    let app = create_test_app();

    send(&app, "POST", "/entries/gone", Some(r#""v""#)).await;

    let response = send(&app, "HEAD", "/entries/gone", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    for _ in 0..2 {
        let response = send(&app, "DELETE", "/entries/gone", None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    let response = send(&app, "HEAD", "/entries/gone", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == Keys ==

#[tokio::test]
async fn test_keys_endpoint() {
    let app = create_test_app();

    let response = send(&app, "GET", "/keys", None).await;
    assert_eq!(body_to_json(response.into_body()).await, json!([]));

    send(&app, "POST", "/entries/beta", Some(r#""2""#)).await;
    send(&app, "POST", "/entries/alpha", Some(r#""1""#)).await;

    let response = send(&app, "GET", "/keys", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_to_json(response.into_body()).await,
        json!(["alpha", "beta"])
    );
}

// == Nested Accessors ==

#[tokio::test]
async fn test_nested_index_access() {
    let app = create_test_app();
    send(&app, "POST", "/entries/letters", Some(r#"["Alpha", "Bravo", "Charlie"]"#)).await;

    let response = send(&app, "GET", "/entries/letters/elements/1", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_json(response.into_body()).await, json!("Bravo"));

    for index in ["10", "-1", "3"] {
        let uri = format!("/entries/letters/elements/{}", index);
        let response = send(&app, "GET", &uri, None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    let response = send(&app, "GET", "/entries/nothing/elements/0", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_nested_subkey_access() {
    let app = create_test_app();
    send(&app, "POST", "/entries/numbers", Some(r#"{"1": "One", "2": "Two"}"#)).await;

    let response = send(&app, "GET", "/entries/numbers/entries/2", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_json(response.into_body()).await, json!("Two"));

    let response = send(&app, "GET", "/entries/numbers/entries/9", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_nested_shape_mismatch() {
    let app = create_test_app();
    send(&app, "POST", "/entries/plain", Some(r#""just text""#)).await;

    let response = send(&app, "GET", "/entries/plain/elements/0", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("not a sequence"));

    let response = send(&app, "GET", "/entries/plain/entries/x", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("not a mapping"));
}

// == TTL Expiration via API ==

#[tokio::test]
async fn test_ttl_expiration_via_api() {
    let app = create_app_with_ttl(Duration::from_millis(100));

    send(&app, "POST", "/entries/short", Some(r#""v""#)).await;
    send(&app, "POST", "/entries/dict", Some(r#"{"k": "v"}"#)).await;

    let response = send(&app, "GET", "/entries/short", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(150)).await;

    // No sweeper is running; expiry is applied on read
    let response = send(&app, "GET", "/entries/short", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, "GET", "/entries/dict/entries/k", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&app, "GET", "/keys", None).await;
    assert_eq!(body_to_json(response.into_body()).await, json!([]));

    // An expired key can be created again
    let response = send(&app, "POST", "/entries/short", Some(r#""again""#)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

// == Heartbeat ==

#[tokio::test]
async fn test_heartbeat_endpoint() {
    let app = create_test_app();

    let response = send(&app, "GET", "/heartbeat", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "ok");
    assert!(json["since"].as_str().is_some());
}
