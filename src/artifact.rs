//! Serde model of the serialized search index artifact.
//!
//! The artifact is produced by an external index builder and handed to the
//! engine as a single value. Its encoding favors size over uniformity: a
//! term that occurs in exactly one document is stored as a bare id, while
//! multi-document terms store a flat list alternating id and weight. The
//! nested object catalog is keyed by namespace prefix, then bare name.
//! All of these compact forms are normalized away when [`crate::Index`]
//! is built; this module only mirrors the wire shape.

use serde::Deserialize;
use std::collections::HashMap;

use crate::error::SchemaError;

/// Weight assigned to postings stored in the bare-id encoding, which
/// carries no weight of its own.
pub(crate) const BARE_POSTING_WEIGHT: u32 = 1;

/// Fields an artifact must carry to be loadable at all.
const REQUIRED_FIELDS: &[&str] = &["docnames", "filenames", "titles", "terms"];

/// A term's postings as serialized: a bare document id, or a flat list
/// alternating document id and weight.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TermPostings {
    Single(u32),
    Flat(Vec<u32>),
}

impl TermPostings {
    /// Decode into uniform `(document, weight)` pairs.
    pub(crate) fn decode(&self, term: &str) -> Result<Vec<(u32, u32)>, SchemaError> {
        match self {
            Self::Single(id) => Ok(vec![(*id, BARE_POSTING_WEIGHT)]),
            Self::Flat(list) => {
                if list.len() % 2 != 0 {
                    return Err(SchemaError::MalformedPostings {
                        term: term.to_string(),
                        len: list.len(),
                    });
                }
                Ok(list.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect())
            }
        }
    }
}

/// Title-term postings: a bare document id or a list of ids. Title hits
/// carry no per-posting weight; the scorer supplies the title constant.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TitlePostings {
    Single(u32),
    Many(Vec<u32>),
}

impl TitlePostings {
    pub(crate) fn decode(&self) -> Vec<u32> {
        match self {
            Self::Single(id) => vec![*id],
            Self::Many(list) => list.clone(),
        }
    }
}

/// One serialized object catalog entry:
/// `(document, anchor fragment, object type id, priority)`.
pub type RawObjectEntry = (u32, String, u32, i32);

/// The consumed artifact, field names as serialized by the builder.
///
/// `docnames`, `filenames` and `titles` are parallel arrays; position is
/// the document id everywhere else in the artifact.
#[derive(Debug, Clone, Deserialize)]
pub struct Artifact {
    pub docnames: Vec<String>,
    pub filenames: Vec<String>,
    pub titles: Vec<String>,
    pub terms: HashMap<String, TermPostings>,
    #[serde(default)]
    pub titleterms: HashMap<String, TitlePostings>,
    /// Nested catalog: namespace prefix → bare symbol name → entry.
    #[serde(default)]
    pub objects: HashMap<String, HashMap<String, RawObjectEntry>>,
    /// Object type id (as a decimal string key) → `domain:role` tag.
    #[serde(default)]
    pub objtypes: HashMap<String, String>,
    /// Object type id → `(domain, role, display label)`.
    #[serde(default)]
    pub objnames: HashMap<String, (String, String, String)>,
    /// Builder feature set marker, checked against the supported table
    /// when the index is built.
    #[serde(default)]
    pub envversion: HashMap<String, u32>,
}

impl Artifact {
    /// Parse an artifact from its serialized text.
    ///
    /// Accepts either a bare JSON object or the loader-call form the
    /// builder ships for browsers (`Search.setIndex({...});`).
    pub fn from_json(text: &str) -> Result<Self, SchemaError> {
        let stripped = strip_loader_call(text);
        let value: serde_json::Value = serde_json::from_str(stripped)
            .map_err(|e| SchemaError::InvalidJson(e.to_string()))?;
        Self::from_value(value)
    }

    /// Parse an artifact from an already-decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, SchemaError> {
        let object = value
            .as_object()
            .ok_or_else(|| SchemaError::InvalidJson("expected a JSON object".to_string()))?;

        for field in REQUIRED_FIELDS {
            if !object.contains_key(*field) {
                return Err(SchemaError::MissingField(field));
            }
        }

        serde_json::from_value(value).map_err(|e| SchemaError::InvalidJson(e.to_string()))
    }
}

/// Unwrap the browser loader call, leaving the JSON object untouched.
fn strip_loader_call(text: &str) -> &str {
    let text = text.trim();
    let Some(rest) = text.strip_prefix("Search.setIndex(") else {
        return text;
    };
    let rest = rest.trim_end();
    let rest = rest.strip_suffix(';').unwrap_or(rest).trim_end();
    rest.strip_suffix(')').unwrap_or(rest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    const MINIMAL: &str = r#"{
        "docnames": ["index"],
        "filenames": ["index.html"],
        "titles": ["Home"],
        "terms": {"home": 0}
    }"#;

    #[test]
    fn parses_bare_json() {
        let artifact = Artifact::from_json(MINIMAL).unwrap();
        check!(artifact.docnames == vec!["index".to_string()]);
        check!(artifact.titleterms.is_empty());
    }

    #[rstest]
    #[case(format!("Search.setIndex({MINIMAL})"))]
    #[case(format!("Search.setIndex({MINIMAL});"))]
    #[case(format!("  Search.setIndex({MINIMAL}) ; "))]
    fn parses_loader_wrapped_artifact(#[case] wrapped: String) {
        check!(Artifact::from_json(&wrapped).is_ok());
    }

    #[test]
    fn missing_required_field_is_reported_by_name() {
        let text = r#"{"docnames": [], "filenames": [], "titles": []}"#;
        let err = Artifact::from_json(text).unwrap_err();
        check!(err == SchemaError::MissingField("terms"));
    }

    #[test]
    fn invalid_json_is_rejected() {
        let err = Artifact::from_json("Search.setIndex(").unwrap_err();
        check!(matches!(err, SchemaError::InvalidJson(_)));
    }

    #[test]
    fn term_postings_decode_both_encodings() {
        let single = TermPostings::Single(3);
        check!(single.decode("x").unwrap() == vec![(3, BARE_POSTING_WEIGHT)]);

        let flat = TermPostings::Flat(vec![0, 5, 2, 11]);
        check!(flat.decode("x").unwrap() == vec![(0, 5), (2, 11)]);
    }

    #[test]
    fn odd_arity_postings_are_malformed() {
        let flat = TermPostings::Flat(vec![0, 5, 2]);
        let err = flat.decode("board").unwrap_err();
        check!(
            err == SchemaError::MalformedPostings {
                term: "board".to_string(),
                len: 3,
            }
        );
    }
}
