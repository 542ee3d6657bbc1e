//! Scoring implementations for ranking search results.

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::document::TextField;

/// Score of a document matched by a `must` clause without terms.
pub const NEUTRAL_MATCH_SCORE: f32 = 1.0;

/// One matched `(field, term)` pair of a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    /// Field the term matched in.
    pub field: TextField,
    /// The index term that matched.
    pub term: String,
    /// Occurrences of the term in the field.
    pub term_frequency: u32,
    /// Inverse document frequency of the term in the field.
    pub idf: f32,
    /// Fuzzy similarity of the term to the query term.
    pub similarity: f32,
}

impl Contribution {
    /// `tf × idf × similarity`.
    pub fn weight(&self) -> f32 {
        self.term_frequency as f32 * self.idf * self.similarity
    }
}

/// Trait for document scorers.
pub trait Scorer: Send + Sync + Debug {
    /// Inverse document frequency of a term with `doc_freq` matching documents
    /// out of `doc_count`.
    fn idf(&self, doc_freq: u64, doc_count: u64) -> f32;

    /// Score a document from its `must` and `should` contributions.
    fn score(&self, must: &[Contribution], should: &[Contribution]) -> f32;

    /// Get the name of this scorer.
    fn name(&self) -> &'static str;
}

/// Sums `tf × idf × similarity` over every matched term, with `should`
/// matches scaled down by a secondary weight.
#[derive(Debug, Clone)]
pub struct TfIdfScorer {
    should_weight: f32,
    idf_floor: f32,
}

impl TfIdfScorer {
    /// Create a new scorer.
    pub fn new(should_weight: f32, idf_floor: f32) -> Self {
        TfIdfScorer {
            should_weight,
            idf_floor,
        }
    }

    pub fn should_weight(&self) -> f32 {
        self.should_weight
    }
}

impl Default for TfIdfScorer {
    fn default() -> Self {
        TfIdfScorer::new(0.5, 0.01)
    }
}

impl Scorer for TfIdfScorer {
    fn idf(&self, doc_freq: u64, doc_count: u64) -> f32 {
        let n = doc_count.max(doc_freq) as f32;
        let df = doc_freq as f32;

        // IDF = ln(1 + (N - df + 0.5) / (df + 0.5))
        (1.0 + (n - df + 0.5) / (df + 0.5)).ln().max(self.idf_floor)
    }

    fn score(&self, must: &[Contribution], should: &[Contribution]) -> f32 {
        let must_score = if must.is_empty() {
            NEUTRAL_MATCH_SCORE
        } else {
            must.iter().map(Contribution::weight).sum()
        };
        let should_score: f32 = should.iter().map(Contribution::weight).sum();

        must_score + self.should_weight * should_score
    }

    fn name(&self) -> &'static str {
        "tf_idf"
    }
}
