//! Storage Module
//!
//! Provides the concurrent in-memory registry with TTL expiration and the
//! nested accessors for sequence and mapping values.

mod entry;
mod registry;
mod value;


// Re-export public types
pub use entry::Entry;
pub use registry::Registry;
pub use value::Value;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum accepted request body size in bytes
pub const MAX_BODY_SIZE: usize = 1024 * 1024; // 1 MB
