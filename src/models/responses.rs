//! Response DTOs for the registry API
//!
//! Defines the structure of outgoing HTTP response bodies that are not a
//! stored value themselves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response body for the heartbeat endpoint (GET /heartbeat)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeartbeatResponse {
    /// Health status, always "ok" when the server answers
    pub status: String,
    /// Server start time in RFC 3339 format
    pub since: String,
}

impl HeartbeatResponse {
    /// Creates a new HeartbeatResponse for a server started at `started_at`
    pub fn ok(started_at: DateTime<Utc>) -> Self {
        Self {
            status: "ok".to_string(),
            since: started_at.to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
