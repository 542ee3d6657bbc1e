//! A live index generation: inverted index and document store together.

use std::sync::Arc;

use ahash::AHashMap;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::Analyzer;
use crate::analysis::token::Token;
use crate::document::{Document, FieldMap, TextField};
use crate::error::Result;
use crate::index::inverted::{MemoryInvertedIndex, TermIndex};
use crate::index::posting::DocId;
use crate::index::store::{DocumentStore, MemoryDocumentStore};

/// A document together with the tokens of each of its text fields.
///
/// Analysis is pure, so it can run before the index write lock is taken.
#[derive(Debug, Clone)]
pub struct AnalyzedDocument {
    /// The document to store.
    pub document: Arc<Document>,
    /// Tokens per text field.
    pub tokens: FieldMap<Vec<Token>>,
}

/// Analyze every text field of a document.
pub fn analyze_document(analyzer: &dyn Analyzer, document: Document) -> Result<AnalyzedDocument> {
    let mut tokens: FieldMap<Vec<Token>> = FieldMap::default();
    for field in TextField::ALL {
        tokens.set(field, analyzer.tokens(document.text(field))?);
    }

    Ok(AnalyzedDocument {
        document: Arc::new(document),
        tokens,
    })
}

/// Statistics about an index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexStats {
    /// Index name.
    pub name: String,
    /// Number of stored documents.
    pub doc_count: u64,
    /// Distinct terms per text field.
    pub term_counts: FieldMap<usize>,
    /// When this generation was created.
    pub created_at: DateTime<Utc>,
}

/// One generation of the index.
///
/// The inverted index and the document store are only mutated together,
/// through [`Index::upsert`] and [`Index::remove`], so every stored document
/// has postings for its non-empty fields and no posting outlives its
/// document.
#[derive(Debug)]
pub struct Index {
    name: String,
    postings: Box<dyn TermIndex>,
    store: Box<dyn DocumentStore>,
    ids: AHashMap<String, DocId>,
    next_doc_id: DocId,
    created_at: DateTime<Utc>,
}

impl Index {
    /// Create an empty in-memory index.
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self::with_backends(
            name,
            Box::new(MemoryInvertedIndex::new()),
            Box::new(MemoryDocumentStore::new()),
        )
    }

    /// Create an empty index over the given postings and document storage.
    pub fn with_backends<S: Into<String>>(
        name: S,
        postings: Box<dyn TermIndex>,
        store: Box<dyn DocumentStore>,
    ) -> Self {
        Index {
            name: name.into(),
            postings,
            store,
            ids: AHashMap::new(),
            next_doc_id: 0,
            created_at: Utc::now(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Insert or replace a document. Returns `true` when an existing document
    /// with the same id was replaced.
    pub fn upsert(&mut self, analyzed: AnalyzedDocument) -> bool {
        let AnalyzedDocument { document, tokens } = analyzed;

        let (doc_id, replaced) = match self.ids.get(document.id()) {
            Some(&doc_id) => {
                self.postings.remove_postings(doc_id);
                (doc_id, true)
            }
            None => {
                let doc_id = self.next_doc_id;
                self.next_doc_id += 1;
                self.ids.insert(document.id().to_string(), doc_id);
                (doc_id, false)
            }
        };

        for (field, field_tokens) in tokens.iter() {
            self.postings.add_postings(doc_id, field, field_tokens);
        }
        self.store.put(doc_id, document);

        replaced
    }

    /// Remove a document by comment id, returning it.
    pub fn remove(&mut self, id: &str) -> Option<Arc<Document>> {
        let doc_id = self.ids.remove(id)?;
        self.postings.remove_postings(doc_id);
        self.store.remove(doc_id)
    }

    /// Fetch a document by comment id.
    pub fn get(&self, id: &str) -> Option<Arc<Document>> {
        self.ids.get(id).and_then(|&doc_id| self.store.get(doc_id))
    }

    /// Fetch a document by internal id.
    pub fn document(&self, doc_id: DocId) -> Option<Arc<Document>> {
        self.store.get(doc_id)
    }

    /// Number of stored documents.
    pub fn doc_count(&self) -> u64 {
        self.store.len() as u64
    }

    /// Number of documents whose field contains the term.
    pub fn doc_freq(&self, field: TextField, term: &str) -> usize {
        self.postings.doc_freq(field, term)
    }

    pub fn postings(&self) -> &dyn TermIndex {
        self.postings.as_ref()
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            name: self.name.clone(),
            doc_count: self.doc_count(),
            term_counts: FieldMap::from_fn(|field| self.postings.term_count(field)),
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::StandardAnalyzer;
    use crate::document::DocumentInput;

    fn analyzed(id: &str, comment: &str) -> AnalyzedDocument {
        let document = DocumentInput::new(id)
            .text(TextField::Comment, comment)
            .text(TextField::UserName, "alice")
            .date("2023-01-01")
            .validate()
            .unwrap()
            .document;
        analyze_document(&StandardAnalyzer::new(), document).unwrap()
    }

    #[test]
    fn test_upsert_replaces_whole_document() {
        let mut index = Index::new("comments");
        assert!(!index.upsert(analyzed("a", "great video")));
        assert!(index.upsert(analyzed("a", "bad content")));

        assert_eq!(index.doc_count(), 1);
        assert_eq!(index.doc_freq(TextField::Comment, "great"), 0);
        assert_eq!(index.doc_freq(TextField::Comment, "content"), 1);
        assert_eq!(index.get("a").unwrap().text(TextField::Comment), "bad content");
    }

    #[test]
    fn test_upsert_is_idempotent() {
        let mut index = Index::new("comments");
        index.upsert(analyzed("a", "great video"));
        index.upsert(analyzed("b", "great fun"));
        let before = index.stats();

        index.upsert(analyzed("a", "great video"));
        assert_eq!(index.doc_freq(TextField::Comment, "great"), 2);
        assert_eq!(index.stats().term_counts, before.term_counts);
        assert_eq!(index.doc_count(), 2);
    }

    #[test]
    fn test_remove() {
        let mut index = Index::new("comments");
        index.upsert(analyzed("a", "great video"));

        assert_eq!(index.remove("a").unwrap().id(), "a");
        assert!(index.remove("a").is_none());
        assert!(index.get("a").is_none());
        assert_eq!(index.doc_freq(TextField::UserName, "alice"), 0);
        assert!(index.store().is_empty());
    }
}
