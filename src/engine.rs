//! The search engine: owned, swappable index state and the query pipeline.

use std::sync::{Arc, RwLock};

use crate::artifact::Artifact;
use crate::error::{NotReadyError, SchemaError};
use crate::index::Index;
use crate::search::scoring::{self, ScoreWeights};
use crate::search::snippet::{self, SearchResult};
use crate::search::{resolve, tokenize};

/// A query engine over one loaded documentation index.
///
/// The index is an explicitly owned, swappable value: `load` installs a
/// fully built replacement atomically, and each query computes against the
/// snapshot it observed at entry. Queries are pure and side-effect free,
/// so concurrent callers share the engine freely; independent engines
/// (separate corpora, tests) coexist without interference.
pub struct SearchEngine {
    index: RwLock<Option<Arc<Index>>>,
    weights: ScoreWeights,
}

impl SearchEngine {
    /// An engine with the default scoring table, not yet ready to query.
    pub fn new() -> Self {
        Self::with_weights(ScoreWeights::default())
    }

    /// An engine with a custom scoring table.
    pub fn with_weights(weights: ScoreWeights) -> Self {
        Self {
            index: RwLock::new(None),
            weights,
        }
    }

    /// Validate an artifact and install it as the live index.
    ///
    /// On error the previous index (if any) stays live; a query never
    /// observes a partially loaded replacement.
    pub fn load(&self, artifact: Artifact) -> Result<(), SchemaError> {
        let index = Index::from_artifact(artifact)?;
        *self.index.write().expect("index lock poisoned") = Some(Arc::new(index));
        Ok(())
    }

    /// Parse and load an artifact from its serialized text (bare JSON or
    /// the builder's browser loader call).
    pub fn load_json(&self, text: &str) -> Result<(), SchemaError> {
        self.load(Artifact::from_json(text)?)
    }

    /// Whether a load has succeeded.
    pub fn is_ready(&self) -> bool {
        self.index.read().expect("index lock poisoned").is_some()
    }

    /// Run a query against the loaded index.
    ///
    /// Any input string is a valid query: degenerate input normalizes to an
    /// empty term sequence and yields an empty result list. The only error
    /// is querying before a successful [`load`](Self::load).
    pub fn query(&self, text: &str) -> Result<Vec<SearchResult>, NotReadyError> {
        let index = self
            .index
            .read()
            .expect("index lock poisoned")
            .clone()
            .ok_or(NotReadyError)?;

        let terms = tokenize::normalize(text);
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let candidates = resolve::resolve(&terms, &index);
        let ranked = scoring::rank(candidates, &terms, &index, &self.weights);

        tracing::debug!(
            "Query {:?}: {} terms, {} results",
            text,
            terms.len(),
            ranked.len()
        );

        Ok(ranked
            .iter()
            .map(|doc| snippet::annotate(doc, &terms, &index))
            .collect())
    }

    /// Snapshot of the live index, for callers that want direct lookups
    /// (titles, locations, labels) alongside query results.
    pub fn index(&self) -> Option<Arc<Index>> {
        self.index.read().expect("index lock poisoned").clone()
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;

    #[test]
    fn query_before_load_fails_fast() {
        let engine = SearchEngine::new();
        check!(engine.query("anything") == Err(NotReadyError));
        check!(!engine.is_ready());
    }

    #[test]
    fn failed_load_leaves_previous_index_live() {
        let engine = SearchEngine::new();
        engine
            .load_json(
                r#"{
                    "docnames": ["a"], "filenames": ["a.html"], "titles": ["Alpha"],
                    "terms": {"alpha": 0}
                }"#,
            )
            .unwrap();

        let err = engine.load_json(r#"{"docnames": []}"#);
        check!(err.is_err());

        // The old index still answers.
        let results = engine.query("alpha").unwrap();
        check!(results.len() == 1);
    }
}
