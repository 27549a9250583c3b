//! Error handling types for artifact loading and querying.

use thiserror::Error;

/// Error returned when a serialized index artifact cannot be accepted.
///
/// Every variant is a load-time failure: once an artifact has been accepted,
/// queries against it cannot fail structurally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The artifact text was not valid JSON (after unwrapping the loader
    /// call, if present).
    #[error("artifact is not valid JSON: {0}")]
    InvalidJson(String),

    /// A required top-level field was absent.
    #[error("artifact is missing required field `{0}`")]
    MissingField(&'static str),

    /// `titles` / `filenames` do not line up with `docnames`.
    #[error("field `{field}` has {found} entries, expected {expected}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    /// A postings list had odd arity and cannot be read as (id, weight) pairs.
    #[error("term `{term}` has a malformed postings list of length {len}")]
    MalformedPostings { term: String, len: usize },

    /// A posting or object entry referenced a document outside `docnames`.
    #[error("document id {id} out of range (corpus has {doc_count} documents)")]
    DocumentOutOfRange { id: u32, doc_count: usize },

    /// An object entry referenced a type id with no display label.
    #[error("object `{name}` references unknown type id {type_id}")]
    UnknownObjectType { name: String, type_id: u32 },

    /// An object type table key was not a decimal integer.
    #[error("object type table has non-numeric key `{0}`")]
    InvalidObjectTypeKey(String),

    /// `envversion` declared a builder feature this engine does not
    /// understand, either by name or by version.
    #[error("unsupported schema feature `{feature}` (version {version})")]
    UnsupportedSchema { feature: String, version: u32 },
}

/// Error returned when a query is issued before an index has been loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no search index loaded")]
pub struct NotReadyError;
