//! Registry Client
//!
//! Async HTTP client wrapping the registry REST API with a native interface.

use reqwest::{StatusCode, Url};
use thiserror::Error;

use crate::models::{ErrorResponse, HeartbeatResponse};
use crate::storage::Value;

// == Client Error Enum ==
/// Errors that can occur when talking to a registry server.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The base URL or a derived path could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Transport or body decoding failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with an unexpected status
    #[error("Unexpected status {status}: {message}")]
    Status { status: StatusCode, message: String },
}

impl ClientError {
    /// Returns `true` if the server rejected a create for an existing key.
    pub fn is_conflict(&self) -> bool {
        matches!(self, ClientError::Status { status, .. } if *status == StatusCode::CONFLICT)
    }

    /// Returns `true` if the server reported a missing entry.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Status { status, .. } if *status == StatusCode::NOT_FOUND)
    }

    /// Returns `true` for nested accessor misuse (bad index or wrong shape).
    pub fn is_bad_request(&self) -> bool {
        matches!(self, ClientError::Status { status, .. } if *status == StatusCode::BAD_REQUEST)
    }
}

/// Convenience Result type for the client.
pub type ClientResult<T> = std::result::Result<T, ClientError>;

// == Registry Client ==
/// Client for a remote registry server.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    base_url: Url,
    http: reqwest::Client,
}

impl RegistryClient {
    /// Creates a client for the server at `base_url`, e.g. `http://127.0.0.1:3000`.
    pub fn new(base_url: &str) -> ClientResult<Self> {
        Self::with_http_client(base_url, reqwest::Client::new())
    }

    /// Creates a client reusing an existing `reqwest::Client`.
    pub fn with_http_client(base_url: &str, http: reqwest::Client) -> ClientResult<Self> {
        let base_url =
            Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(format!(
                "{} cannot be used as a base URL",
                base_url
            )));
        }
        Ok(Self { base_url, http })
    }

    /// Builds a URL from path segments, percent-encoding each one.
    fn url(&self, segments: &[&str]) -> ClientResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // == Heartbeat ==
    /// Checks that the server is alive.
    pub async fn heartbeat(&self) -> ClientResult<HeartbeatResponse> {
        let response = self.http.get(self.url(&["heartbeat"])?).send().await?;
        Ok(expect_status(response, StatusCode::OK).await?.json().await?)
    }

    // == Keys ==
    /// Lists the keys of all live entries.
    pub async fn keys(&self) -> ClientResult<Vec<String>> {
        let response = self.http.get(self.url(&["keys"])?).send().await?;
        Ok(expect_status(response, StatusCode::OK).await?.json().await?)
    }

    // == Get ==
    /// Fetches the value at `key`, `None` if absent or expired.
    pub async fn get(&self, key: &str) -> ClientResult<Option<Value>> {
        self.fetch(&["entries", key]).await
    }

    // == Exists ==
    /// Probes for a live entry without transferring its value.
    pub async fn exists(&self, key: &str) -> ClientResult<bool> {
        let response = self.http.head(self.url(&["entries", key])?).send().await?;
        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(ClientError::Status {
                status,
                message: String::new(),
            }),
        }
    }

    // == Append ==
    /// Creates an entry; fails with a conflict if the key is live.
    pub async fn append(&self, key: &str, value: &Value) -> ClientResult<()> {
        let response = self
            .http
            .post(self.url(&["entries", key])?)
            .json(value)
            .send()
            .await?;
        expect_status(response, StatusCode::CREATED).await?;
        Ok(())
    }

    // == Update ==
    /// Replaces the value of a live entry.
    pub async fn update(&self, key: &str, value: &Value) -> ClientResult<()> {
        let response = self
            .http
            .put(self.url(&["entries", key])?)
            .json(value)
            .send()
            .await?;
        expect_status(response, StatusCode::NO_CONTENT).await?;
        Ok(())
    }

    // == Delete ==
    /// Deletes `key`; succeeds whether or not it existed.
    pub async fn delete(&self, key: &str) -> ClientResult<()> {
        let response = self.http.delete(self.url(&["entries", key])?).send().await?;
        expect_status(response, StatusCode::NO_CONTENT).await?;
        Ok(())
    }

    // == Get By Index ==
    /// Fetches one element of the sequence at `key`.
    pub async fn get_by_index(&self, key: &str, index: i64) -> ClientResult<Option<Value>> {
        let index = index.to_string();
        self.fetch(&["entries", key, "elements", &index]).await
    }

    // == Get By Subkey ==
    /// Fetches one element of the mapping at `key`.
    pub async fn get_by_subkey(&self, key: &str, sub_key: &str) -> ClientResult<Option<Value>> {
        self.fetch(&["entries", key, "entries", sub_key]).await
    }

    async fn fetch(&self, segments: &[&str]) -> ClientResult<Option<Value>> {
        let response = self.http.get(self.url(segments)?).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let value = expect_status(response, StatusCode::OK).await?.json().await?;
        Ok(Some(value))
    }
}

/// Passes the response through if it has `expected` status, otherwise turns
/// the server's error body into a [`ClientError::Status`].
async fn expect_status(
    response: reqwest::Response,
    expected: StatusCode,
) -> ClientResult<reqwest::Response> {
    let status = response.status();
    if status == expected {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&text)
        .map(|body| body.error)
        .unwrap_or(text);

    Err(ClientError::Status { status, message })
}
