//! HTTP request handlers.

/// Document endpoints.
pub mod document;
