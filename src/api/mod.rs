//! API Module
//!
//! HTTP handlers and routing for the registry REST API.
//!
//! # Endpoints
//! - `GET /heartbeat` - Liveness and server start time
//! - `GET /keys` - List live keys
//! - `GET|HEAD|POST|PUT|DELETE /entries/:key` - Read, existence check, append, update, delete
//! - `GET /entries/:key/elements/:index` - Read one element of a sequence
//! - `GET /entries/:key/entries/:sub_key` - Read one element of a mapping

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
