//! Request decoding for the registry API
//!
//! Incoming bodies carry a bare JSON value whose structure picks the shape.

use std::collections::BTreeMap;

use crate::error::{RegistryError, Result};
use crate::storage::{Value, MAX_KEY_LENGTH};

/// Decodes a request body into a [`Value`].
///
/// Shapes are tried in a fixed order: scalar string, then sequence of
/// strings, then string-to-string mapping. The first one that parses wins.
pub fn decode_value(body: &[u8]) -> Result<Value> {
    if let Ok(scalar) = serde_json::from_slice::<String>(body) {
        return Ok(Value::Scalar(scalar));
    }
    if let Ok(items) = serde_json::from_slice::<Vec<String>>(body) {
        return Ok(Value::Sequence(items));
    }
    serde_json::from_slice::<BTreeMap<String, String>>(body)
        .map(Value::Mapping)
        .map_err(|_| {
            RegistryError::Unprocessable(
                "expected a string, an array of strings or an object of strings".to_string(),
            )
        })
}

/// Validates a key taken from the request path.
pub fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(RegistryError::InvalidRequest(
            "Key cannot be empty".to_string(),
        ));
    }
    if key.len() > MAX_KEY_LENGTH {
        return Err(RegistryError::InvalidRequest(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}
