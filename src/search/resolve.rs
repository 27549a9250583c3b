//! Postings resolution: exact term lookup with prefix fallback, plus the
//! symbol catalog.
//!
//! Resolution is recall-oriented: a document qualifies as a candidate when
//! it matches any query term (OR semantics). Preferring documents that
//! cover more of the query is the scorer's job, not a filter here.

use ahash::AHashMap;

use super::tokenize::QueryTerm;
use crate::index::{DocumentId, Index, ObjectEntry};

/// How a query term matched a document. Variant order is ascending
/// precedence, so `Ord` picks the stronger evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum MatchKind {
    BodyPartial,
    BodyExact,
    ObjectPartial,
    TitlePartial,
    TitleExact,
    ObjectExact,
}

impl MatchKind {
    pub(crate) fn is_object(self) -> bool {
        matches!(self, Self::ObjectExact | Self::ObjectPartial)
    }
}

/// Evidence that one query term matched one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TermHit {
    pub kind: MatchKind,
    /// Builder-assigned posting weight; 1 for catalog and title-only hits.
    pub weight: u32,
    /// Symbol display tier; only meaningful for object kinds.
    pub priority: i32,
    /// Fragment navigating to the matched symbol.
    pub anchor: Option<String>,
    /// Symbol kind id, resolvable through the index's label table.
    pub type_id: Option<u32>,
}

impl TermHit {
    fn plain(kind: MatchKind, weight: u32) -> Self {
        Self {
            kind,
            weight,
            priority: 0,
            anchor: None,
            type_id: None,
        }
    }

    fn object(kind: MatchKind, entry: &ObjectEntry) -> Self {
        Self {
            kind,
            weight: 1,
            priority: entry.priority,
            anchor: Some(entry.anchor.clone()),
            type_id: Some(entry.type_id),
        }
    }

    /// Total preference order so merges are deterministic regardless of
    /// map iteration order: stronger kind, then heavier posting, then more
    /// important symbol tier, then the smaller anchor.
    pub(crate) fn replaces(&self, old: &Self) -> bool {
        let key = |hit: &Self| {
            (
                hit.kind,
                hit.weight,
                -i64::from(hit.priority),
                std::cmp::Reverse(hit.anchor.clone()),
            )
        };
        key(self) > key(old)
    }
}

/// Per-document hits, parallel to the normalized query term sequence.
pub(crate) type Candidates = AHashMap<DocumentId, Vec<Option<TermHit>>>;

/// Resolve every query term against the index.
///
/// An empty result is success: nothing matched.
pub(crate) fn resolve(terms: &[QueryTerm], index: &Index) -> Candidates {
    let mut candidates = Candidates::new();

    for (position, term) in terms.iter().enumerate() {
        resolve_term_postings(term, position, terms.len(), index, &mut candidates);
        resolve_objects(term, position, terms.len(), index, &mut candidates);
    }

    candidates
}

fn resolve_term_postings(
    term: &QueryTerm,
    position: usize,
    term_count: usize,
    index: &Index,
    candidates: &mut Candidates,
) {
    let title_docs = index.title_docs(&term.term);
    let in_title = |doc: DocumentId| title_docs.is_some_and(|docs| docs.binary_search(&doc).is_ok());

    if let Some(postings) = index.postings(&term.term) {
        for posting in postings {
            let kind = if in_title(posting.doc) {
                MatchKind::TitleExact
            } else {
                MatchKind::BodyExact
            };
            offer(
                candidates,
                posting.doc,
                position,
                term_count,
                TermHit::plain(kind, posting.weight),
            );
        }
        // Title-only occurrences have no body posting to piggyback on.
        for &doc in title_docs.unwrap_or_default() {
            offer(
                candidates,
                doc,
                position,
                term_count,
                TermHit::plain(MatchKind::TitleExact, index.term_weight(&term.term, doc)),
            );
        }
        return;
    }

    if let Some(docs) = title_docs {
        for &doc in docs {
            offer(
                candidates,
                doc,
                position,
                term_count,
                TermHit::plain(MatchKind::TitleExact, index.term_weight(&term.term, doc)),
            );
        }
        return;
    }

    // No exact entry anywhere: fall back to prefix (partial) matching.
    for (matched_term, postings) in index.terms_with_prefix(&term.term) {
        let partial_title = index.title_docs(matched_term);
        for posting in postings {
            let kind = if partial_title.is_some_and(|docs| docs.binary_search(&posting.doc).is_ok())
            {
                MatchKind::TitlePartial
            } else {
                MatchKind::BodyPartial
            };
            offer(
                candidates,
                posting.doc,
                position,
                term_count,
                TermHit::plain(kind, posting.weight),
            );
        }
    }
    for doc in index.title_docs_with_prefix(&term.term) {
        offer(
            candidates,
            doc,
            position,
            term_count,
            TermHit::plain(MatchKind::TitlePartial, 1),
        );
    }
}

/// Match a term against the symbol catalog by its unstemmed form.
///
/// An exact name or dotted-suffix match is strong evidence; a mere
/// substring hit is kept as weak evidence. Hidden entries never match.
fn resolve_objects(
    term: &QueryTerm,
    position: usize,
    term_count: usize,
    index: &Index,
    candidates: &mut Candidates,
) {
    if term.raw.is_empty() {
        return;
    }
    let suffix = format!(".{}", term.raw);

    for (name, entries) in index.objects() {
        let kind = if name == term.raw || name.ends_with(&suffix) {
            MatchKind::ObjectExact
        } else if name.contains(term.raw.as_str()) {
            MatchKind::ObjectPartial
        } else {
            continue;
        };

        for entry in entries {
            if entry.priority < 0 {
                continue;
            }
            offer(
                candidates,
                entry.doc,
                position,
                term_count,
                TermHit::object(kind, entry),
            );
        }
    }
}

/// Record a hit, keeping only the strongest evidence per (term, document).
fn offer(
    candidates: &mut Candidates,
    doc: DocumentId,
    position: usize,
    term_count: usize,
    hit: TermHit,
) {
    let slots = candidates
        .entry(doc)
        .or_insert_with(|| vec![None; term_count]);
    match &slots[position] {
        Some(existing) if !hit.replaces(existing) => {}
        _ => slots[position] = Some(hit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::Artifact;
    use assert2::check;

    fn index() -> Index {
        let text = r#"{
            "docnames": ["boards", "cables", "api"],
            "filenames": ["boards.html", "cables.html", "api.html"],
            "titles": ["Boards", "Cables", "API"],
            "terms": {
                "board": [0, 10, 1, 2],
                "cabl": 1,
                "jtag": [1, 4, 2, 1]
            },
            "titleterms": {"board": 0, "cabl": 1},
            "objects": {
                "cli": {"write_flash": [2, "cmdoption-write-flash", 0, 1]}
            },
            "objnames": {"0": ["std", "option", "command line option"]},
            "envversion": {"core": 1}
        }"#;
        Index::from_artifact(Artifact::from_json(text).unwrap()).unwrap()
    }

    fn normalized(query: &str) -> Vec<QueryTerm> {
        super::super::tokenize::normalize(query)
    }

    #[test]
    fn exact_term_separates_title_and_body_hits() {
        let index = index();
        let terms = normalized("board");
        let candidates = resolve(&terms, &index);

        let title_hit = candidates[&0][0].as_ref().unwrap();
        check!(title_hit.kind == MatchKind::TitleExact);
        check!(title_hit.weight == 10);

        let body_hit = candidates[&1][0].as_ref().unwrap();
        check!(body_hit.kind == MatchKind::BodyExact);
        check!(body_hit.weight == 2);
    }

    #[test]
    fn missing_term_falls_back_to_prefix() {
        let index = index();
        let terms = normalized("boa");
        let candidates = resolve(&terms, &index);

        check!(candidates[&0][0].as_ref().unwrap().kind == MatchKind::TitlePartial);
        check!(candidates[&1][0].as_ref().unwrap().kind == MatchKind::BodyPartial);
    }

    #[test]
    fn unresolvable_term_yields_no_candidates() {
        let index = index();
        let terms = normalized("zzz");
        check!(resolve(&terms, &index).is_empty());
    }

    #[test]
    fn object_suffix_match_is_exact_evidence() {
        let index = index();
        let terms = normalized("write_flash");
        let candidates = resolve(&terms, &index);

        let hit = candidates[&2][0].as_ref().unwrap();
        check!(hit.kind == MatchKind::ObjectExact);
        check!(hit.anchor.as_deref() == Some("cmdoption-write-flash"));
    }

    #[test]
    fn qualified_object_name_matches_exactly() {
        let index = index();
        let terms = normalized("cli.write_flash");
        check!(terms.len() == 2);
        let candidates = resolve(&terms, &index);

        check!(candidates[&2][1].as_ref().unwrap().kind == MatchKind::ObjectExact);
        // The namespace segment alone is only weak evidence.
        check!(candidates[&2][0].as_ref().unwrap().kind == MatchKind::ObjectPartial);
    }

    #[test]
    fn object_substring_match_is_weak_evidence() {
        let index = index();
        let terms = normalized("flash");
        let candidates = resolve(&terms, &index);
        check!(candidates[&2][0].as_ref().unwrap().kind == MatchKind::ObjectPartial);
    }

    #[test]
    fn or_semantics_collect_single_term_documents() {
        let index = index();
        let terms = normalized("jtag cable");
        let candidates = resolve(&terms, &index);

        // Doc 1 matches both terms, doc 2 only "jtag", doc 0 neither.
        check!(candidates[&1].iter().flatten().count() == 2);
        check!(candidates[&2][0].is_some());
        check!(candidates[&2][1].is_none());
        check!(!candidates.contains_key(&0));
    }
}
