//! Data models shared by storage and the HTTP layer.

/// Document model and extension tags.
pub mod document;

#[cfg(test)]
mod tests;
