//! Model-level unit tests.

use super::document::*;
use std::collections::HashSet;

#[test]
fn extension_tags_are_unique_and_lowercase() {
    let tags: HashSet<&str> = Extension::ALL.iter().map(|ext| ext.as_str()).collect();
    assert_eq!(tags.len(), Extension::ALL.len());
    for tag in tags {
        assert_eq!(tag, tag.to_ascii_lowercase());
    }
}

#[test]
fn extension_parse_is_case_insensitive_and_trims() {
    assert_eq!("py".parse::<Extension>(), Ok(Extension::Py));
    assert_eq!(" PS1 ".parse::<Extension>(), Ok(Extension::Ps1));
    assert_eq!("Toml".parse::<Extension>(), Ok(Extension::Toml));
}

#[test]
fn extension_parse_rejects_unknown_tags() {
    let err = "rs".parse::<Extension>().expect_err("rs is not recognized");
    assert_eq!(err, UnknownExtension("rs".to_string()));
    assert!("".parse::<Extension>().is_err());
}

#[test]
fn extension_serde_uses_wire_tags() {
    for ext in Extension::ALL {
        let encoded = serde_json::to_string(&ext).expect("serialize");
        assert_eq!(encoded, format!("\"{}\"", ext.as_str()));
    }
    let decoded: Extension = serde_json::from_str("\"cpp\"").expect("deserialize");
    assert_eq!(decoded, Extension::Cpp);
}

#[test]
fn document_new_keeps_fields() {
    let doc = Document::new("abc123".to_string(), "print('hi')".to_string(), Extension::Py);
    assert_eq!(doc.id, "abc123");
    assert_eq!(doc.content, "print('hi')");
    assert_eq!(doc.extension, Extension::Py);
}

#[test]
fn document_survives_bincode_encoding() {
    let doc = Document::new("k".to_string(), "x = 1\n".to_string(), Extension::Toml);
    let bytes = bincode::serialize(&doc).expect("encode");
    let decoded: Document = bincode::deserialize(&bytes).expect("decode");
    assert_eq!(decoded, doc);
}
