//! Fuzzy term expansion.
//!
//! A query term is expanded into the index terms of a field that lie within a
//! bounded Damerau-Levenshtein distance of it. Only the field's vocabulary is
//! scanned, and only the length buckets that can possibly be within range.

use std::cmp::Reverse;

use serde::{Deserialize, Serialize};

use crate::document::TextField;
use crate::index::inverted::TermIndex;
use crate::util::levenshtein::BoundedDistance;

/// Largest edit distance any fuzziness setting allows.
pub const MAX_EDIT_DISTANCE: usize = 2;

/// Score penalty per edit.
pub const EDIT_PENALTY: f32 = 0.2;

/// How many edits a query term may be away from an index term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fuzziness {
    /// Derived from the term length: 0 edits up to 2 chars, 1 edit up to 5
    /// chars, 2 edits beyond.
    #[default]
    Auto,
    /// A fixed number of edits, capped at [`MAX_EDIT_DISTANCE`].
    Fixed(u8),
}

impl Fuzziness {
    /// Maximum edit distance allowed for `term`.
    pub fn max_edits(self, term: &str) -> usize {
        match self {
            Fuzziness::Auto => match term.chars().count() {
                0..=2 => 0,
                3..=5 => 1,
                _ => 2,
            },
            Fuzziness::Fixed(edits) => usize::from(edits).min(MAX_EDIT_DISTANCE),
        }
    }
}

/// Similarity weight of a match at the given edit distance.
pub fn similarity(edit_distance: usize) -> f32 {
    (1.0 - EDIT_PENALTY * edit_distance as f32).max(0.0)
}

/// An index term matched by fuzzy expansion.
#[derive(Debug, Clone, PartialEq)]
pub struct FuzzyMatch {
    /// The matched index term.
    pub term: String,
    /// Edit distance from the query term.
    pub edit_distance: usize,
    /// Number of documents containing the term in the field.
    pub doc_frequency: usize,
    /// Similarity weight, 1.0 for an exact match.
    pub similarity: f32,
}

/// Expands query terms against the vocabulary of a [`TermIndex`].
#[derive(Debug, Clone)]
pub struct FuzzyMatcher {
    max_expansions: usize,
}

impl FuzzyMatcher {
    /// Create a matcher that keeps at most `max_expansions` terms per query
    /// term.
    pub fn new(max_expansions: usize) -> Self {
        FuzzyMatcher { max_expansions }
    }

    pub fn max_expansions(&self) -> usize {
        self.max_expansions
    }

    /// Index terms of `field` within `max_edits` of `term`, including `term`
    /// itself when indexed.
    ///
    /// Results are ordered by edit distance, then by document frequency
    /// (descending), then lexically. An empty result is not an error.
    pub fn expand(
        &self,
        index: &dyn TermIndex,
        field: TextField,
        term: &str,
        max_edits: usize,
    ) -> Vec<FuzzyMatch> {
        if max_edits == 0 {
            let doc_frequency = index.doc_freq(field, term);
            return if doc_frequency > 0 {
                vec![FuzzyMatch {
                    term: term.to_string(),
                    edit_distance: 0,
                    doc_frequency,
                    similarity: similarity(0),
                }]
            } else {
                Vec::new()
            };
        }

        let matcher = BoundedDistance::new(term);
        let len = matcher.query_len();
        let lengths = len.saturating_sub(max_edits)..=len + max_edits;

        let mut matches: Vec<FuzzyMatch> = index
            .terms_with_length(field, lengths)
            .filter_map(|candidate| {
                matcher
                    .within(candidate, max_edits)
                    .map(|edit_distance| FuzzyMatch {
                        term: candidate.to_string(),
                        edit_distance,
                        doc_frequency: index.doc_freq(field, candidate),
                        similarity: similarity(edit_distance),
                    })
            })
            .collect();

        matches.sort_by(|a, b| {
            (a.edit_distance, Reverse(a.doc_frequency), &a.term).cmp(&(
                b.edit_distance,
                Reverse(b.doc_frequency),
                &b.term,
            ))
        });
        matches.truncate(self.max_expansions);
        matches
    }
}

impl Default for FuzzyMatcher {
    fn default() -> Self {
        FuzzyMatcher::new(50)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::{Analyzer, StandardAnalyzer};
    use crate::index::inverted::MemoryInvertedIndex;

    fn index_of(docs: &[&str]) -> MemoryInvertedIndex {
        let analyzer = StandardAnalyzer::new();
        let mut index = MemoryInvertedIndex::new();
        for (doc_id, text) in docs.iter().enumerate() {
            index.add_postings(
                doc_id as u64,
                TextField::Comment,
                &analyzer.tokens(text).unwrap(),
            );
        }
        index
    }

    fn terms(matches: &[FuzzyMatch]) -> Vec<&str> {
        matches.iter().map(|m| m.term.as_str()).collect()
    }

    #[test]
    fn test_auto_fuzziness() {
        assert_eq!(Fuzziness::Auto.max_edits("ok"), 0);
        assert_eq!(Fuzziness::Auto.max_edits("fun"), 1);
        assert_eq!(Fuzziness::Auto.max_edits("great"), 1);
        assert_eq!(Fuzziness::Auto.max_edits("comedy"), 2);
        assert_eq!(Fuzziness::Auto.max_edits("café"), 1);
        assert_eq!(Fuzziness::Fixed(5).max_edits("a"), 2);
        assert_eq!(Fuzziness::Fixed(0).max_edits("comedy"), 0);
    }

    #[test]
    fn test_similarity() {
        assert_eq!(similarity(0), 1.0);
        assert!((similarity(1) - 0.8).abs() < 1e-6);
        assert!((similarity(2) - 0.6).abs() < 1e-6);
        assert_eq!(similarity(10), 0.0);
    }

    #[test]
    fn test_expand_comedy() {
        let index = index_of(&["comody", "comxxy", "xyzzzy", "comedy"]);
        let matcher = FuzzyMatcher::default();

        let matches = matcher.expand(&index, TextField::Comment, "comedy", 2);
        assert_eq!(terms(&matches), vec!["comedy", "comody", "comxxy"]);
        assert_eq!(matches[0].edit_distance, 0);
        assert_eq!(matches[1].edit_distance, 1);
        assert_eq!(matches[2].edit_distance, 2);
    }

    #[test]
    fn test_expand_exact_only() {
        let index = index_of(&["ok", "oh"]);
        let matcher = FuzzyMatcher::default();

        assert_eq!(
            terms(&matcher.expand(&index, TextField::Comment, "ok", 0)),
            vec!["ok"]
        );
        assert!(matcher.expand(&index, TextField::Comment, "no", 0).is_empty());
        assert!(matcher.expand(&index, TextField::VideoName, "ok", 0).is_empty());
    }

    #[test]
    fn test_expand_orders_by_doc_frequency_and_truncates() {
        let index = index_of(&["cat", "cut", "cut", "cot"]);
        let matcher = FuzzyMatcher::new(2);

        let matches = matcher.expand(&index, TextField::Comment, "cit", 1);
        assert_eq!(terms(&matches), vec!["cut", "cat"]);
        assert_eq!(matches[0].doc_frequency, 2);
    }
}
