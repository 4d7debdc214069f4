//! Shared constants used across snipstore crates.

/// Default API port.
pub const DEFAULT_PORT: u16 = 9000;

/// Default length of allocated document ids.
pub const DEFAULT_ID_LENGTH: usize = 12;

/// Default cap on id allocation attempts per created document.
pub const DEFAULT_MAX_ID_ATTEMPTS: u32 = 16;

/// Default maximum document size accepted by the API layer, in bytes.
pub const DEFAULT_MAX_DOCUMENT_SIZE: usize = 400_000;

/// Directory name used under the user cache dir when `DB_PATH` is unset.
pub const DEFAULT_DATA_DIR_NAME: &str = "snipstore";
