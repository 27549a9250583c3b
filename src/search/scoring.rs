//! Scoring and ranking.
//!
//! Scores combine a per-category constant with the builder-assigned posting
//! weight, then a coverage multiplier rewards documents matching more of
//! the query's distinct terms. The literal constants are tunable; their
//! relative ordering is the contract the rest of the engine (and the test
//! suite) relies on.

use super::resolve::{Candidates, MatchKind, TermHit};
use super::tokenize::{self, QueryTerm};
use crate::index::{DocumentId, Index};

/// Score contribution per match category.
///
/// Category ordering must be preserved when tuning: an exact symbol hit
/// outranks an exact title hit, which outranks a partial title hit, then
/// exact and partial body hits. Partial symbol hits are weak evidence and
/// sit just below partial title hits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreWeights {
    pub object_match: u32,
    pub object_partial: u32,
    pub title_match: u32,
    pub partial_title: u32,
    pub term_match: u32,
    pub partial_term: u32,
    /// Per-tier deduction for less important symbols (priority 1, 2, …).
    pub object_priority_step: u32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            object_match: 25,
            object_partial: 6,
            title_match: 15,
            partial_title: 7,
            term_match: 5,
            partial_term: 2,
            object_priority_step: 2,
        }
    }
}

impl ScoreWeights {
    /// Score of a single (term, document) hit.
    pub(crate) fn hit_score(&self, hit: &TermHit) -> u64 {
        let base = match hit.kind {
            MatchKind::ObjectExact => self.object_exact_base(hit.priority),
            MatchKind::ObjectPartial => self.object_partial,
            MatchKind::TitleExact => self.title_match,
            MatchKind::TitlePartial => self.partial_title,
            MatchKind::BodyExact => self.term_match,
            MatchKind::BodyPartial => self.partial_term,
        };
        u64::from(base) * u64::from(hit.weight)
    }

    /// Exact symbol hits step down by priority tier, but never below the
    /// exact-title constant: the category ordering holds for every tier.
    fn object_exact_base(&self, priority: i32) -> u32 {
        let tier = u32::try_from(priority).unwrap_or(0);
        self.object_match
            .saturating_sub(self.object_priority_step.saturating_mul(tier))
            .max(self.title_match + 1)
    }
}

/// A candidate document with its final score and per-term evidence.
#[derive(Debug, Clone)]
pub(crate) struct RankedDoc {
    pub doc: DocumentId,
    pub score: u64,
    /// Hits parallel to the normalized query term sequence.
    pub hits: Vec<Option<TermHit>>,
}

/// Score all candidates and produce the total result ordering.
///
/// Ordering keys, most significant first: documents whose title equals the
/// whole query (compared as normalized term sequences), then score, then
/// document id. The last key makes the order total and stable across runs.
pub(crate) fn rank(
    candidates: Candidates,
    terms: &[QueryTerm],
    index: &Index,
    weights: &ScoreWeights,
) -> Vec<RankedDoc> {
    let mut ranked: Vec<(bool, RankedDoc)> = candidates
        .into_iter()
        .map(|(doc, hits)| {
            let score = score_document(&hits, terms, weights);
            let title_is_query = title_equals_query(index.title(doc), terms);
            (title_is_query, RankedDoc { doc, score, hits })
        })
        .collect();

    ranked.sort_unstable_by(|(a_exact, a), (b_exact, b)| {
        b_exact
            .cmp(a_exact)
            .then_with(|| b.score.cmp(&a.score))
            .then_with(|| a.doc.cmp(&b.doc))
    });

    ranked.into_iter().map(|(_, doc)| doc).collect()
}

/// Sum the matched terms' scores, then scale by coverage: a document
/// matching `k` distinct terms counts `k` times its raw sum, so breadth
/// beats a single heavy hit for multi-term queries.
fn score_document(hits: &[Option<TermHit>], terms: &[QueryTerm], weights: &ScoreWeights) -> u64 {
    let mut sum = 0u64;
    let mut matched = 0u64;

    for (position, hit) in hits.iter().enumerate() {
        let Some(hit) = hit else { continue };
        // A term repeated later in the query contributes once.
        let first = terms
            .iter()
            .position(|t| t.term == terms[position].term)
            .unwrap_or(position);
        if first != position {
            continue;
        }
        sum += weights.hit_score(hit);
        matched += 1;
    }

    sum * matched
}

fn title_equals_query(title: &str, terms: &[QueryTerm]) -> bool {
    let title_terms = tokenize::normalize(title);
    title_terms.len() == terms.len()
        && title_terms
            .iter()
            .zip(terms)
            .all(|(a, b)| a.term == b.term)
}
