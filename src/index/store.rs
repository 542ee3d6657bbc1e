//! Document storage keyed by internal document id.

use std::fmt::Debug;
use std::sync::Arc;

use ahash::AHashMap;

use crate::document::Document;
use crate::index::posting::DocId;

/// Holds the full documents of an index for retrieval, filtering and
/// highlighting.
pub trait DocumentStore: Send + Sync + Debug {
    /// Store a document, returning the one it replaced.
    fn put(&mut self, doc_id: DocId, document: Arc<Document>) -> Option<Arc<Document>>;

    /// Fetch a document.
    fn get(&self, doc_id: DocId) -> Option<Arc<Document>>;

    /// Remove a document, returning it.
    fn remove(&mut self, doc_id: DocId) -> Option<Arc<Document>>;

    /// Number of stored documents.
    fn len(&self) -> usize;

    /// Whether the store is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of every stored document, in no particular order.
    fn doc_ids(&self) -> Box<dyn Iterator<Item = DocId> + '_>;
}

/// In-memory [`DocumentStore`].
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: AHashMap<DocId, Arc<Document>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn put(&mut self, doc_id: DocId, document: Arc<Document>) -> Option<Arc<Document>> {
        self.documents.insert(doc_id, document)
    }

    fn get(&self, doc_id: DocId) -> Option<Arc<Document>> {
        self.documents.get(&doc_id).cloned()
    }

    fn remove(&mut self, doc_id: DocId) -> Option<Arc<Document>> {
        self.documents.remove(&doc_id)
    }

    fn len(&self) -> usize {
        self.documents.len()
    }

    fn doc_ids(&self) -> Box<dyn Iterator<Item = DocId> + '_> {
        Box::new(self.documents.keys().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentInput;

    fn doc(id: &str) -> Arc<Document> {
        Arc::new(
            DocumentInput::new(id)
                .date("2023-01-01")
                .validate()
                .unwrap()
                .document,
        )
    }

    #[test]
    fn test_put_get_remove() {
        let mut store = MemoryDocumentStore::new();
        assert!(store.is_empty());

        assert!(store.put(1, doc("a")).is_none());
        let replaced = store.put(1, doc("a2"));
        assert_eq!(replaced.unwrap().id(), "a");
        assert_eq!(store.get(1).unwrap().id(), "a2");
        assert_eq!(store.len(), 1);

        assert_eq!(store.remove(1).unwrap().id(), "a2");
        assert!(store.get(1).is_none());
        assert_eq!(store.doc_ids().count(), 0);
    }
}
