//! Configuration loading from environment variables.

use crate::constants::{
    DEFAULT_DATA_DIR_NAME, DEFAULT_ID_LENGTH, DEFAULT_MAX_DOCUMENT_SIZE, DEFAULT_MAX_ID_ATTEMPTS,
    DEFAULT_PORT,
};
use crate::error::AppError;
use std::env;
use std::path::PathBuf;

/// Id allocation settings injected into [`crate::DocumentHandler`].
///
/// Fixed for the lifetime of a handler, so every id it allocates has the same
/// length and alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdConfig {
    /// Number of characters in each allocated id.
    pub id_length: usize,
    /// Maximum allocation attempts per document; `None` retries without limit.
    pub max_attempts: Option<u32>,
}

impl Default for IdConfig {
    fn default() -> Self {
        Self {
            id_length: DEFAULT_ID_LENGTH,
            max_attempts: Some(DEFAULT_MAX_ID_ATTEMPTS),
        }
    }
}

impl IdConfig {
    /// Check that the settings can produce ids at all.
    ///
    /// # Errors
    /// Returns [`AppError::InvalidConfig`] for a zero id length or a zero attempt cap.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.id_length == 0 {
            return Err(AppError::InvalidConfig(
                "id_length must be at least 1".to_string(),
            ));
        }
        if self.max_attempts == Some(0) {
            return Err(AppError::InvalidConfig(
                "max_attempts must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }
}

/// Runtime configuration for the snipstore server.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: String,
    pub port: u16,
    /// Explicit `host:port` listener override.
    pub bind: Option<String>,
    pub max_document_size: usize,
    pub allow_public_access: bool,
    pub id: IdConfig,
}

/// Parse a boolean-like environment flag value.
///
/// # Supported Values
/// - Truthy: `1`, `true`, `yes`, `on`
/// - Falsy: `0`, `false`, `no`, `off`, empty string
///
/// Matching is case-insensitive and ignores surrounding whitespace.
///
/// # Returns
/// `Some(bool)` when the value is recognized, otherwise `None`.
pub fn parse_env_flag(value: &str) -> Option<bool> {
    let normalized = value.trim().to_ascii_lowercase();
    match normalized.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_max_attempts(value: &str) -> Option<Option<u32>> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("unbounded") {
        return Some(None);
    }
    match trimmed.parse::<u32>().ok()? {
        0 => Some(None),
        n => Some(Some(n)),
    }
}

fn expand_tilde(path: String, home: Option<&PathBuf>) -> String {
    if let (Some(rest), Some(home)) = (path.strip_prefix("~/"), home) {
        return home.join(rest).to_string_lossy().to_string();
    }
    path
}

fn resolve_home_dir<F>(lookup: &F) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    ["HOME", "USERPROFILE"]
        .iter()
        .filter_map(|key| lookup(*key))
        .find(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| env::current_dir().ok())
}

fn parsed_or_default<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display + Copy,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!("Invalid {}='{}'; using default {}", key, raw, default);
            default
        }
    }
}

impl Config {
    /// Load configuration from process environment variables.
    ///
    /// # Returns
    /// A populated [`Config`] with defaults applied when env vars are missing.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Unparseable or out-of-range values fall back to their defaults.
    ///
    /// # Arguments
    /// - `lookup`: Returns the raw value for a variable name, if set.
    ///
    /// # Returns
    /// A populated [`Config`].
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let home = resolve_home_dir(&lookup);
        let db_path = match lookup("DB_PATH").filter(|p| !p.trim().is_empty()) {
            Some(path) => expand_tilde(path, home.as_ref()),
            None => home
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".cache")
                .join(DEFAULT_DATA_DIR_NAME)
                .join("db")
                .to_string_lossy()
                .to_string(),
        };

        let mut id_length = parsed_or_default(&lookup, "ID_LENGTH", DEFAULT_ID_LENGTH);
        if id_length == 0 {
            tracing::warn!("ID_LENGTH must be positive; using {}", DEFAULT_ID_LENGTH);
            id_length = DEFAULT_ID_LENGTH;
        }

        let max_attempts = match lookup("MAX_ID_ATTEMPTS") {
            None => Some(DEFAULT_MAX_ID_ATTEMPTS),
            Some(raw) => parse_max_attempts(&raw).unwrap_or_else(|| {
                tracing::warn!(
                    "Invalid MAX_ID_ATTEMPTS='{}'; using {}",
                    raw,
                    DEFAULT_MAX_ID_ATTEMPTS
                );
                Some(DEFAULT_MAX_ID_ATTEMPTS)
            }),
        };

        Self {
            db_path,
            port: parsed_or_default(&lookup, "PORT", DEFAULT_PORT),
            bind: lookup("BIND").filter(|value| !value.trim().is_empty()),
            max_document_size: parsed_or_default(
                &lookup,
                "MAX_DOCUMENT_SIZE",
                DEFAULT_MAX_DOCUMENT_SIZE,
            ),
            allow_public_access: lookup("ALLOW_PUBLIC_ACCESS")
                .and_then(|value| parse_env_flag(&value))
                .unwrap_or(false),
            id: IdConfig {
                id_length,
                max_attempts,
            },
        }
    }
}
