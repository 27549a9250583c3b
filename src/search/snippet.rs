//! Result annotation: where and why a document matched.
//!
//! The engine never re-scans page text (only the index is resident), so a
//! result's "snippet" is structural: the match category, the terms worth
//! highlighting, and for symbol matches the anchor and kind label needed
//! to present the hit as the symbol rather than the page.

use super::resolve::{MatchKind, TermHit};
use super::scoring::RankedDoc;
use super::tokenize::QueryTerm;
use crate::index::{DocumentId, Index};

/// The strongest kind of evidence behind a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
    Object,
    Title,
    Body,
}

/// One entry of the ordered result list handed to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub doc_id: DocumentId,
    /// External document identifier, as declared by the artifact.
    pub doc_name: String,
    pub title: String,
    /// Retrieval path; for symbol evidence the fragment navigates to the
    /// symbol itself, not merely the page.
    pub location: String,
    pub match_kind: ResultKind,
    /// Query terms (surface forms) that matched this document, in query
    /// order, for downstream highlighting.
    pub highlight_terms: Vec<String>,
    /// Display label of the matched symbol's kind, when applicable.
    pub type_label: Option<String>,
    pub score: u64,
}

/// Annotate one ranked document for the caller.
pub(crate) fn annotate(ranked: &RankedDoc, terms: &[QueryTerm], index: &Index) -> SearchResult {
    let best = best_hit(&ranked.hits);

    let match_kind = match best.map(|hit| hit.kind) {
        Some(MatchKind::ObjectExact | MatchKind::ObjectPartial) => ResultKind::Object,
        Some(MatchKind::TitleExact | MatchKind::TitlePartial) => ResultKind::Title,
        _ => ResultKind::Body,
    };

    let mut location = index.location(ranked.doc).to_string();
    let mut type_label = None;
    if let Some(hit) = best
        && hit.kind.is_object()
    {
        if let Some(anchor) = &hit.anchor {
            location = format!("{location}#{anchor}");
        }
        type_label = hit
            .type_id
            .and_then(|id| index.object_type_label(id))
            .map(ToString::to_string);
    }

    SearchResult {
        doc_id: ranked.doc,
        doc_name: index.document(ranked.doc).to_string(),
        title: index.title(ranked.doc).to_string(),
        location,
        match_kind,
        highlight_terms: highlight_terms(&ranked.hits, terms),
        type_label,
        score: ranked.score,
    }
}

/// The single strongest hit across the query terms, by the same preference
/// order used when merging hits.
fn best_hit(hits: &[Option<TermHit>]) -> Option<&TermHit> {
    let mut best: Option<&TermHit> = None;
    for hit in hits.iter().flatten() {
        match best {
            Some(current) if !hit.replaces(current) => {}
            _ => best = Some(hit),
        }
    }
    best
}

/// Matched surface forms in query order, without repeats.
fn highlight_terms(hits: &[Option<TermHit>], terms: &[QueryTerm]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for (position, hit) in hits.iter().enumerate() {
        if hit.is_some() && !out.iter().any(|raw| raw == &terms[position].raw) {
            out.push(terms[position].raw.clone());
        }
    }
    out
}
