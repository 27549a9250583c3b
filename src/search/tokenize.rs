//! Query normalization: splitting, case folding, stop words, stemming.
//!
//! Lookup success depends on normalizing queries exactly the way the index
//! builder normalized source text. The builder stems with the Snowball
//! English algorithm after lowercasing, so this module must too; treat any
//! change here as a breaking change against existing artifacts.

use rust_stemmers::{Algorithm, Stemmer};

/// Function words the index builder leaves out of the term index.
/// A query made only of these still searches (see [`normalize`]).
pub(crate) const STOP_WORDS: &[&str] = &[
    "a", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into", "is", "it",
    "near", "no", "not", "of", "on", "or", "such", "that", "the", "their", "then", "there",
    "these", "they", "this", "to", "was", "will", "with",
];

/// One normalized query term.
///
/// `term` is the stemmed form used against the term index; `raw` is the
/// case-folded surface form, used for symbol catalog lookups (symbol names
/// are case-normalized but never stemmed) and for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTerm {
    pub term: String,
    pub raw: String,
}

/// Normalize a raw query string into an ordered term sequence.
///
/// Tokens are word-character runs (underscore included, so symbol names
/// like `write_flash` stay whole), lowercased and stemmed. Stop words are
/// dropped unless that would leave nothing to search, in which case every
/// token is kept. Adjacent duplicates (after stemming) collapse to one,
/// preserving first-occurrence order.
pub(crate) fn normalize(query: &str) -> Vec<QueryTerm> {
    let stemmer = Stemmer::create(Algorithm::English);

    let tokens: Vec<QueryTerm> = query
        .split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|token| !token.is_empty())
        .map(|token| {
            let raw = token.to_lowercase();
            let term = stemmer.stem(&raw).into_owned();
            QueryTerm { term, raw }
        })
        .collect();

    let searchable: Vec<QueryTerm> = tokens
        .iter()
        .filter(|t| !STOP_WORDS.contains(&t.raw.as_str()))
        .cloned()
        .collect();

    let kept = if searchable.is_empty() {
        tokens
    } else {
        searchable
    };

    dedup_adjacent(kept)
}

fn dedup_adjacent(terms: Vec<QueryTerm>) -> Vec<QueryTerm> {
    let mut out: Vec<QueryTerm> = Vec::with_capacity(terms.len());
    for term in terms {
        if out.last().is_none_or(|prev| prev.term != term.term) {
            out.push(term);
        }
    }
    out
}
