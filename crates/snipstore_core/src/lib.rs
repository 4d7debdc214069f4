//! Storage core for snipstore: document models, id allocation, and persistence.

/// Configuration loading and defaults.
pub mod config;
/// Shared constants.
pub mod constants;
/// Database access layer.
pub mod db;
/// Application error types (storage/domain).
pub mod error;
/// Document create/read orchestration and id allocation.
pub mod handler;
/// Document identifier generation.
pub mod ids;
/// Data models for API requests and persistence.
pub mod models;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{Config, IdConfig};
pub use constants::{DEFAULT_ID_LENGTH, DEFAULT_PORT};
pub use db::{Database, DocumentStore};
pub use error::AppError;
pub use handler::DocumentHandler;
pub use models::document::{Document, Extension};
