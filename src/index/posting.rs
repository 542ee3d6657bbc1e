//! Posting lists for the in-memory inverted index.
//!
//! A [`PostingList`] records, for one `(field, term)` pair, every document the
//! term occurs in together with its frequency and word positions. Postings are
//! kept sorted by document id so lookups and removals are binary searches.

use serde::{Deserialize, Serialize};

/// Internal document identifier, assigned by the index on first insertion.
pub type DocId = u64;

/// A single posting in a posting list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    /// Document ID.
    pub doc_id: DocId,
    /// Term frequency in the field.
    pub frequency: u32,
    /// Word positions of the term in the field, strictly increasing.
    pub positions: Vec<u32>,
}

impl Posting {
    /// Create a posting for a single occurrence at position 0.
    pub fn new(doc_id: DocId) -> Self {
        Posting {
            doc_id,
            frequency: 1,
            positions: vec![0],
        }
    }

    /// Create a posting from the positions the term occurs at.
    pub fn with_positions(doc_id: DocId, mut positions: Vec<u32>) -> Self {
        positions.sort_unstable();
        positions.dedup();
        Posting {
            doc_id,
            frequency: positions.len() as u32,
            positions,
        }
    }
}

/// The postings of one term within one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingList {
    /// The term this list is for.
    pub term: String,
    postings: Vec<Posting>,
    total_frequency: u64,
}

impl PostingList {
    /// Create an empty posting list for a term.
    pub fn new<S: Into<String>>(term: S) -> Self {
        PostingList {
            term: term.into(),
            postings: Vec::new(),
            total_frequency: 0,
        }
    }

    /// Add a posting, replacing any existing posting for the same document.
    pub fn add_posting(&mut self, posting: Posting) {
        match self
            .postings
            .binary_search_by_key(&posting.doc_id, |p| p.doc_id)
        {
            Ok(pos) => {
                let existing = &mut self.postings[pos];
                self.total_frequency -= u64::from(existing.frequency);
                self.total_frequency += u64::from(posting.frequency);
                *existing = posting;
            }
            Err(pos) => {
                self.total_frequency += u64::from(posting.frequency);
                self.postings.insert(pos, posting);
            }
        }
    }

    /// Remove the posting for a document. Returns whether one was present.
    pub fn remove(&mut self, doc_id: DocId) -> bool {
        match self.postings.binary_search_by_key(&doc_id, |p| p.doc_id) {
            Ok(pos) => {
                let removed = self.postings.remove(pos);
                self.total_frequency -= u64::from(removed.frequency);
                true
            }
            Err(_) => false,
        }
    }

    /// Get the posting for a document.
    pub fn get(&self, doc_id: DocId) -> Option<&Posting> {
        self.postings
            .binary_search_by_key(&doc_id, |p| p.doc_id)
            .ok()
            .map(|pos| &self.postings[pos])
    }

    /// Number of documents containing the term.
    pub fn doc_frequency(&self) -> usize {
        self.postings.len()
    }

    /// Sum of the term frequency over all documents.
    pub fn total_frequency(&self) -> u64 {
        self.total_frequency
    }

    /// Get the length of the posting list.
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    /// Check if the posting list is empty.
    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Get an iterator over the postings in document id order.
    pub fn iter(&self) -> std::slice::Iter<'_, Posting> {
        self.postings.iter()
    }
}
