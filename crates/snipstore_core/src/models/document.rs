//! Document model and the closed set of recognized extensions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// File-type tag attached to a document for downstream rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extension {
    Py,
    Js,
    Jsx,
    Go,
    Ts,
    Tsx,
    Kt,
    Java,
    Cpp,
    Sql,
    Cs,
    Swift,
    Xml,
    Dart,
    R,
    Rb,
    C,
    H,
    Scala,
    Hs,
    Sh,
    Ps1,
    Php,
    Asm,
    Jl,
    M,
    Pl,
    Cr,
    Json,
    Yaml,
    Toml,
    Txt,
}

impl Extension {
    /// Every recognized extension, in declaration order.
    pub const ALL: [Extension; 32] = [
        Extension::Py,
        Extension::Js,
        Extension::Jsx,
        Extension::Go,
        Extension::Ts,
        Extension::Tsx,
        Extension::Kt,
        Extension::Java,
        Extension::Cpp,
        Extension::Sql,
        Extension::Cs,
        Extension::Swift,
        Extension::Xml,
        Extension::Dart,
        Extension::R,
        Extension::Rb,
        Extension::C,
        Extension::H,
        Extension::Scala,
        Extension::Hs,
        Extension::Sh,
        Extension::Ps1,
        Extension::Php,
        Extension::Asm,
        Extension::Jl,
        Extension::M,
        Extension::Pl,
        Extension::Cr,
        Extension::Json,
        Extension::Yaml,
        Extension::Toml,
        Extension::Txt,
    ];

    /// Lowercase tag as it appears on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Extension::Py => "py",
            Extension::Js => "js",
            Extension::Jsx => "jsx",
            Extension::Go => "go",
            Extension::Ts => "ts",
            Extension::Tsx => "tsx",
            Extension::Kt => "kt",
            Extension::Java => "java",
            Extension::Cpp => "cpp",
            Extension::Sql => "sql",
            Extension::Cs => "cs",
            Extension::Swift => "swift",
            Extension::Xml => "xml",
            Extension::Dart => "dart",
            Extension::R => "r",
            Extension::Rb => "rb",
            Extension::C => "c",
            Extension::H => "h",
            Extension::Scala => "scala",
            Extension::Hs => "hs",
            Extension::Sh => "sh",
            Extension::Ps1 => "ps1",
            Extension::Php => "php",
            Extension::Asm => "asm",
            Extension::Jl => "jl",
            Extension::M => "m",
            Extension::Pl => "pl",
            Extension::Cr => "cr",
            Extension::Json => "json",
            Extension::Yaml => "yaml",
            Extension::Toml => "toml",
            Extension::Txt => "txt",
        }
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a tag is not one of [`Extension::ALL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownExtension(pub String);

impl fmt::Display for UnknownExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unsupported extension '{}'", self.0)
    }
}

impl std::error::Error for UnknownExtension {}

impl FromStr for Extension {
    type Err = UnknownExtension;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Extension::ALL
            .into_iter()
            .find(|ext| ext.as_str() == normalized)
            .ok_or_else(|| UnknownExtension(value.to_string()))
    }
}

/// A stored document. Write-once: no API mutates a persisted document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub content: String,
    pub extension: Extension,
    pub created_at: DateTime<Utc>,
}

impl Document {
    /// Build a new document stamped with the current time.
    ///
    /// # Arguments
    /// - `id`: Allocated identifier.
    /// - `content`: Document body.
    /// - `extension`: File-type tag.
    ///
    /// # Returns
    /// A new [`Document`].
    pub fn new(id: String, content: String, extension: Extension) -> Self {
        Self {
            id,
            content,
            extension,
            created_at: Utc::now(),
        }
    }
}

/// Request payload for creating a document.
///
/// `extension` stays free text here so the HTTP layer can report unknown tags
/// as a validation error of its own.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDocumentRequest {
    pub content: String,
    pub extension: String,
}
