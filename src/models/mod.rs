//! Request and Response models for the registry API
//!
//! This module defines how HTTP request bodies are decoded into stored
//! values and the DTOs serialized into response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{decode_value, validate_key};
pub use responses::{ErrorResponse, HeartbeatResponse};
