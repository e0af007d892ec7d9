//! TTL Registry - An in-memory key-value registry with per-entry expiration
//!
//! Stores scalar, sequence and mapping values that disappear once they have
//! not been written for the configured TTL, and serves them over HTTP.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;
pub mod tasks;

pub use api::AppState;
pub use client::{ClientError, RegistryClient};
pub use config::Config;
pub use error::RegistryError;
pub use storage::{Entry, Registry, Value};
pub use tasks::{spawn_sweeper, SweeperHandle};
