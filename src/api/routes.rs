//! API Routes
//!
//! Configures the Axum router with all registry endpoints.

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    append_handler, delete_handler, exists_handler, get_handler, heartbeat_handler,
    index_handler, keys_handler, subkey_handler, update_handler, AppState,
};
use crate::storage::MAX_BODY_SIZE;

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - Body limit: request bodies above 1 MB are rejected
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/heartbeat", get(heartbeat_handler))
        .route("/keys", get(keys_handler))
        .route(
            "/entries/:key",
            get(get_handler)
                .head(exists_handler)
                .post(append_handler)
                .put(update_handler)
                .delete(delete_handler),
        )
        .route("/entries/:key/elements/:index", get(index_handler))
        .route("/entries/:key/entries/:sub_key", get(subkey_handler))
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Registry;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::time::Duration;
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        let registry = Registry::new(Duration::from_secs(300));
        create_router(AppState::new(registry))
    }

    #[tokio::test]
    async fn test_heartbeat_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/heartbeat")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_heartbeat_head() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("HEAD")
                    .uri("/heartbeat")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_append_endpoint() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/entries/test")
                    .header("content-type", "application/json")
                    .body(Body::from(r#""hello""#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/entries/nonexistent")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_non_numeric_index_rejected() {
        let app = create_test_app();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/entries/list/elements/first")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let app = create_test_app();
        let payload = format!("\"{}\"", "x".repeat(MAX_BODY_SIZE + 1));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/entries/big")
                    .body(Body::from(payload))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
