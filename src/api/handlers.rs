//! API Handlers
//!
//! HTTP request handlers translating verbs and paths into registry calls.

use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use reqwest::Url;
use tracing::debug;

use crate::config::Config;
use crate::error::{RegistryError, Result};
use crate::models::{decode_value, validate_key, HeartbeatResponse};
use crate::storage::{Entry, Registry};

/// Response header carrying the absolute expiration time of the read entry.
pub const EXPIRE_AT_HEADER: &str = "expire-at";

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Shared registry handle
    pub registry: Registry,
    /// When this state (and so the server) was created
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Creates a new AppState around the given registry.
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            started_at: Utc::now(),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(Registry::new(config.ttl()))
    }
}

/// Serializes an entry's value and stamps its expiration time.
fn value_response(entry: &Entry, ttl: Duration) -> Response {
    let remaining = chrono::Duration::from_std(entry.expires_in(ttl))
        .unwrap_or_else(|_| chrono::Duration::zero());
    let expire_at = (Utc::now() + remaining).to_rfc3339();

    (
        [(HeaderName::from_static(EXPIRE_AT_HEADER), expire_at)],
        Json(&entry.value),
    )
        .into_response()
}

/// Builds the `Location` of an entry, percent-encoding the key as one path segment.
fn entry_location(key: &str) -> Option<HeaderValue> {
    let mut url = Url::parse("http://localhost/").ok()?;
    url.path_segments_mut()
        .ok()?
        .pop_if_empty()
        .push("entries")
        .push(key);
    HeaderValue::from_str(url.path()).ok()
}

/// Handler for GET /heartbeat
pub async fn heartbeat_handler(State(state): State<AppState>) -> Json<HeartbeatResponse> {
    Json(HeartbeatResponse::ok(state.started_at))
}

/// Handler for GET /keys
///
/// Returns live keys in sorted order.
pub async fn keys_handler(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.registry.list_keys().into_iter().collect())
}

/// Handler for GET /entries/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Response> {
    validate_key(&key)?;

    match state.registry.get(&key) {
        Some(entry) => Ok(value_response(&entry, state.registry.ttl())),
        None => Err(RegistryError::NotFound(key)),
    }
}

/// Handler for HEAD /entries/:key
pub async fn exists_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<StatusCode> {
    validate_key(&key)?;

    if state.registry.get(&key).is_some() {
        Ok(StatusCode::OK)
    } else {
        Ok(StatusCode::NOT_FOUND)
    }
}

/// Handler for POST /entries/:key
///
/// Creates the entry; conflicts with a live entry of the same key.
pub async fn append_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<(StatusCode, HeaderMap)> {
    validate_key(&key)?;
    let value = decode_value(&body)?;
    let shape = value.shape();

    state.registry.append(key.clone(), value)?;
    debug!(key = %key, shape, "Appended entry");

    let mut headers = HeaderMap::new();
    if let Some(location) = entry_location(&key) {
        headers.insert(header::LOCATION, location);
    }

    Ok((StatusCode::CREATED, headers))
}

/// Handler for PUT /entries/:key
///
/// Replaces the value of a live entry and refreshes its lifetime.
pub async fn update_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    body: Bytes,
) -> Result<StatusCode> {
    validate_key(&key)?;
    let value = decode_value(&body)?;
    let shape = value.shape();

    state.registry.update(&key, value)?;
    debug!(key = %key, shape, "Updated entry");

    Ok(StatusCode::NO_CONTENT)
}

/// Handler for DELETE /entries/:key
///
/// Always answers 204, whether or not the key existed.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<StatusCode> {
    validate_key(&key)?;

    if state.registry.delete(&key) {
        debug!(key = %key, "Deleted entry");
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /entries/:key/elements/:index
pub async fn index_handler(
    State(state): State<AppState>,
    Path((key, index)): Path<(String, i64)>,
) -> Result<Response> {
    validate_key(&key)?;

    match state.registry.get_by_index(&key, index)? {
        Some(entry) => Ok(value_response(&entry, state.registry.ttl())),
        None => Err(RegistryError::NotFound(key)),
    }
}

/// Handler for GET /entries/:key/entries/:sub_key
pub async fn subkey_handler(
    State(state): State<AppState>,
    Path((key, sub_key)): Path<(String, String)>,
) -> Result<Response> {
    validate_key(&key)?;

    match state.registry.get_by_subkey(&key, &sub_key)? {
        Some(entry) => Ok(value_response(&entry, state.registry.ttl())),
        None => Err(RegistryError::NotFound(format!("{}/{}", key, sub_key))),
    }
}
