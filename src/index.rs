//! Normalized in-memory representation of a loaded search index.
//!
//! [`Index`] is built once from an [`Artifact`] and never mutated again.
//! Building normalizes the artifact's compact encodings into uniform
//! structures: postings become `(document, weight)` records regardless of
//! how they were serialized, and the nested object catalog is flattened
//! into a single map keyed by lowercased fully-qualified symbol name.

use ahash::AHashMap;

use crate::artifact::{Artifact, BARE_POSTING_WEIGHT};
use crate::error::SchemaError;

/// Dense document identifier: the position of a page in the artifact's
/// declared document order.
pub type DocumentId = u32;

/// Builder sub-features this engine knows how to consume, with the highest
/// layout version understood for each. Artifacts declaring anything outside
/// this table are rejected at load time.
const SUPPORTED_SCHEMA: &[(&str, u32)] = &[
    ("core", 1),
    ("terms", 1),
    ("titleterms", 1),
    ("objects", 1),
];

/// A term occurrence in one document, with the builder-assigned strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Posting {
    pub doc: DocumentId,
    pub weight: u32,
}

/// One entry of the symbol catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectEntry {
    pub doc: DocumentId,
    /// Page fragment navigating to the symbol itself.
    pub anchor: String,
    pub type_id: u32,
    /// Display tier: 0 important, 1 default, 2 unimportant, negative hidden.
    pub priority: i32,
    /// Fully-qualified name in its original casing, for display.
    pub name: String,
}

/// The immutable index a query session runs against.
#[derive(Debug)]
pub struct Index {
    documents: Vec<String>,
    titles: Vec<String>,
    locations: Vec<String>,
    terms: AHashMap<String, Vec<Posting>>,
    /// Terms occurring in page titles. The builder indexes title text into
    /// `terms` as well, so entries here refine a posting's category rather
    /// than introduce new documents.
    title_terms: AHashMap<String, Vec<DocumentId>>,
    /// Flattened symbol catalog, keyed by lowercased fully-qualified name.
    objects: AHashMap<String, Vec<ObjectEntry>>,
    object_types: AHashMap<u32, String>,
    schema_version: AHashMap<String, u32>,
}

impl Index {
    /// Validate an artifact and build the normalized index from it.
    pub fn from_artifact(artifact: Artifact) -> Result<Self, SchemaError> {
        check_schema_version(&artifact.envversion)?;

        let doc_count = artifact.docnames.len();
        check_parallel("titles", doc_count, artifact.titles.len())?;
        check_parallel("filenames", doc_count, artifact.filenames.len())?;

        let object_types = decode_object_types(&artifact)?;

        let mut terms: AHashMap<String, Vec<Posting>> =
            AHashMap::with_capacity(artifact.terms.len());
        for (term, encoded) in &artifact.terms {
            let mut postings = Vec::new();
            for (doc, weight) in encoded.decode(term)? {
                check_doc(doc, doc_count)?;
                postings.push(Posting { doc, weight });
            }
            postings.sort_by_key(|p| p.doc);
            terms.insert(term.clone(), postings);
        }

        let mut title_terms: AHashMap<String, Vec<DocumentId>> =
            AHashMap::with_capacity(artifact.titleterms.len());
        for (term, encoded) in &artifact.titleterms {
            let mut docs = encoded.decode();
            for &doc in &docs {
                check_doc(doc, doc_count)?;
            }
            docs.sort_unstable();
            title_terms.insert(term.clone(), docs);
        }

        let mut objects: AHashMap<String, Vec<ObjectEntry>> = AHashMap::new();
        let mut object_count = 0usize;
        for (prefix, members) in &artifact.objects {
            for (name, (doc, anchor, type_id, priority)) in members {
                let full_name = if prefix.is_empty() {
                    name.clone()
                } else {
                    format!("{prefix}.{name}")
                };
                check_doc(*doc, doc_count)?;
                if !object_types.contains_key(type_id) {
                    return Err(SchemaError::UnknownObjectType {
                        name: full_name,
                        type_id: *type_id,
                    });
                }
                // An empty anchor means the symbol anchors under its own name.
                let anchor = if anchor.is_empty() {
                    full_name.clone()
                } else {
                    anchor.clone()
                };
                objects
                    .entry(full_name.to_lowercase())
                    .or_default()
                    .push(ObjectEntry {
                        doc: *doc,
                        anchor,
                        type_id: *type_id,
                        priority: *priority,
                        name: full_name,
                    });
                object_count += 1;
            }
        }

        tracing::info!(
            "Loaded search index: {} documents, {} terms, {} title terms, {} objects",
            doc_count,
            terms.len(),
            title_terms.len(),
            object_count
        );

        Ok(Self {
            documents: artifact.docnames,
            titles: artifact.titles,
            locations: artifact.filenames,
            terms,
            title_terms,
            objects,
            object_types,
            schema_version: artifact.envversion.into_iter().collect(),
        })
    }

    pub fn doc_count(&self) -> usize {
        self.documents.len()
    }

    pub fn document(&self, doc: DocumentId) -> &str {
        &self.documents[doc as usize]
    }

    pub fn title(&self, doc: DocumentId) -> &str {
        &self.titles[doc as usize]
    }

    pub fn location(&self, doc: DocumentId) -> &str {
        &self.locations[doc as usize]
    }

    pub(crate) fn postings(&self, term: &str) -> Option<&[Posting]> {
        self.terms.get(term).map(Vec::as_slice)
    }

    pub(crate) fn title_docs(&self, term: &str) -> Option<&[DocumentId]> {
        self.title_terms.get(term).map(Vec::as_slice)
    }

    /// All indexed terms having `prefix` as a proper prefix.
    pub(crate) fn terms_with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = (&'a str, &'a [Posting])> {
        self.terms.iter().filter_map(move |(term, postings)| {
            (term.len() > prefix.len() && term.starts_with(prefix))
                .then_some((term.as_str(), postings.as_slice()))
        })
    }

    /// Documents whose title contains a term with `prefix` as a proper prefix.
    pub(crate) fn title_docs_with_prefix<'a>(
        &'a self,
        prefix: &'a str,
    ) -> impl Iterator<Item = DocumentId> + 'a {
        self.title_terms
            .iter()
            .filter(move |(term, _)| term.len() > prefix.len() && term.starts_with(prefix))
            .flat_map(|(_, docs)| docs.iter().copied())
    }

    /// The flattened symbol catalog: lowercased name → entries.
    pub(crate) fn objects(&self) -> impl Iterator<Item = (&str, &[ObjectEntry])> {
        self.objects
            .iter()
            .map(|(name, entries)| (name.as_str(), entries.as_slice()))
    }

    pub(crate) fn object_entries(&self, lower_name: &str) -> Option<&[ObjectEntry]> {
        self.objects.get(lower_name).map(Vec::as_slice)
    }

    /// Display label for a symbol kind, e.g. `"command line option"`.
    pub fn object_type_label(&self, type_id: u32) -> Option<&str> {
        self.object_types.get(&type_id).map(String::as_str)
    }

    /// The builder feature set this index was produced with.
    pub fn schema_version(&self) -> &AHashMap<String, u32> {
        &self.schema_version
    }

    /// Weight of `term` in `doc` according to the term postings, falling
    /// back to the bare-posting weight for title-only occurrences.
    pub(crate) fn term_weight(&self, term: &str, doc: DocumentId) -> u32 {
        self.postings(term)
            .and_then(|postings| postings.iter().find(|p| p.doc == doc))
            .map_or(BARE_POSTING_WEIGHT, |p| p.weight)
    }
}

fn check_parallel(field: &'static str, expected: usize, found: usize) -> Result<(), SchemaError> {
    if expected == found {
        Ok(())
    } else {
        Err(SchemaError::LengthMismatch {
            field,
            expected,
            found,
        })
    }
}

fn check_doc(id: DocumentId, doc_count: usize) -> Result<(), SchemaError> {
    if (id as usize) < doc_count {
        Ok(())
    } else {
        Err(SchemaError::DocumentOutOfRange { id, doc_count })
    }
}

/// Reject artifacts produced by a builder feature set we do not understand.
fn check_schema_version(envversion: &std::collections::HashMap<String, u32>) -> Result<(), SchemaError> {
    for (feature, &version) in envversion {
        let supported = SUPPORTED_SCHEMA
            .iter()
            .find_map(|(name, max)| (name == feature).then_some(*max));
        match supported {
            Some(max) if version <= max => {}
            _ => {
                return Err(SchemaError::UnsupportedSchema {
                    feature: feature.clone(),
                    version,
                });
            }
        }
    }
    Ok(())
}

/// Build the type id → display label table.
///
/// `objnames` carries the human label as its third element and wins over
/// the terser `objtypes` tag when both are present.
fn decode_object_types(artifact: &Artifact) -> Result<AHashMap<u32, String>, SchemaError> {
    let mut labels: AHashMap<u32, String> = AHashMap::new();

    for (key, tag) in &artifact.objtypes {
        let id = parse_type_id(key)?;
        labels.insert(id, tag.clone());
    }
    for (key, (_, _, label)) in &artifact.objnames {
        let id = parse_type_id(key)?;
        labels.insert(id, label.clone());
    }

    Ok(labels)
}

fn parse_type_id(key: &str) -> Result<u32, SchemaError> {
    key.parse()
        .map_err(|_| SchemaError::InvalidObjectTypeKey(key.to_string()))
}
