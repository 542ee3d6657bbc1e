//! The inverted index: `(field, term)` → postings.
//!
//! Besides the postings themselves the index keeps, per field, the distinct
//! vocabulary bucketed by term length in characters. Fuzzy expansion only has
//! to look at the buckets within the edit distance of the query term, never
//! at the postings.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;
use std::ops::RangeInclusive;

use ahash::{AHashMap, AHashSet};

use crate::analysis::token::Token;
use crate::document::field::{FieldMap, TextField};
use crate::index::posting::{DocId, Posting, PostingList};

/// Storage interface for term postings.
///
/// Lookups are exact-term. Implementations other than the in-memory one can
/// back the index with an external store.
pub trait TermIndex: Send + Sync + Debug {
    /// Record the analyzed tokens of one field of a document.
    fn add_postings(&mut self, doc_id: DocId, field: TextField, tokens: &[Token]);

    /// Remove every posting of a document, in every field. Returns the number
    /// of `(field, term)` postings removed.
    fn remove_postings(&mut self, doc_id: DocId) -> usize;

    /// Postings of an exact term in a field.
    fn term_postings(&self, field: TextField, term: &str) -> Option<&PostingList>;

    /// Number of documents whose field contains the term.
    fn doc_freq(&self, field: TextField, term: &str) -> usize {
        self.term_postings(field, term)
            .map_or(0, PostingList::doc_frequency)
    }

    /// Distinct terms of a field whose length in characters falls in `lengths`.
    fn terms_with_length(
        &self,
        field: TextField,
        lengths: RangeInclusive<usize>,
    ) -> Box<dyn Iterator<Item = &str> + '_>;

    /// Number of distinct terms in a field.
    fn term_count(&self, field: TextField) -> usize;
}

#[derive(Debug, Default)]
struct FieldPostings {
    terms: AHashMap<String, PostingList>,
    by_length: BTreeMap<usize, BTreeSet<String>>,
}

impl FieldPostings {
    fn add(&mut self, doc_id: DocId, term: &str, positions: Vec<u32>) {
        if !self.terms.contains_key(term) {
            self.by_length
                .entry(term.chars().count())
                .or_default()
                .insert(term.to_string());
        }
        self.terms
            .entry(term.to_string())
            .or_insert_with(|| PostingList::new(term))
            .add_posting(Posting::with_positions(doc_id, positions));
    }

    fn remove(&mut self, doc_id: DocId, term: &str) -> bool {
        let Some(list) = self.terms.get_mut(term) else {
            return false;
        };
        let removed = list.remove(doc_id);
        if list.is_empty() {
            self.terms.remove(term);
            let length = term.chars().count();
            if let Some(bucket) = self.by_length.get_mut(&length) {
                bucket.remove(term);
                if bucket.is_empty() {
                    self.by_length.remove(&length);
                }
            }
        }
        removed
    }
}

/// In-memory [`TermIndex`].
#[derive(Debug, Default)]
pub struct MemoryInvertedIndex {
    fields: FieldMap<FieldPostings>,
    doc_terms: AHashMap<DocId, AHashSet<(TextField, String)>>,
}

impl MemoryInvertedIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }
}

impl TermIndex for MemoryInvertedIndex {
    fn add_postings(&mut self, doc_id: DocId, field: TextField, tokens: &[Token]) {
        if tokens.is_empty() {
            return;
        }

        let mut positions: BTreeMap<&str, Vec<u32>> = BTreeMap::new();
        for token in tokens {
            positions
                .entry(token.text.as_str())
                .or_default()
                .push(token.position);
        }

        let postings = self.fields.get_mut(field);
        let terms = self.doc_terms.entry(doc_id).or_default();
        for (term, term_positions) in positions {
            postings.add(doc_id, term, term_positions);
            terms.insert((field, term.to_string()));
        }
    }

    fn remove_postings(&mut self, doc_id: DocId) -> usize {
        let Some(terms) = self.doc_terms.remove(&doc_id) else {
            return 0;
        };

        terms
            .iter()
            .filter(|(field, term)| self.fields.get_mut(*field).remove(doc_id, term))
            .count()
    }

    fn term_postings(&self, field: TextField, term: &str) -> Option<&PostingList> {
        self.fields.get(field).terms.get(term)
    }

    fn terms_with_length(
        &self,
        field: TextField,
        lengths: RangeInclusive<usize>,
    ) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(
            self.fields
                .get(field)
                .by_length
                .range(lengths)
                .flat_map(|(_, bucket)| bucket.iter().map(String::as_str)),
        )
    }

    fn term_count(&self, field: TextField) -> usize {
        self.fields.get(field).terms.len()
    }
}
