//! Index module for Glaive.
//!
//! An [`Index`] pairs the inverted index with the document store of one
//! dataset generation. The [`IndexManager`] owns the live generation and
//! serializes mutations against concurrent queries.

pub mod inverted;
#[allow(clippy::module_inception)]
pub mod index;
pub mod manager;
pub mod posting;
pub mod store;

pub use index::{AnalyzedDocument, Index, IndexStats, analyze_document};
pub use inverted::{MemoryInvertedIndex, TermIndex};
pub use manager::{BatchReport, IndexManager, UpsertOutcome};
pub use posting::{DocId, Posting, PostingList};
pub use store::{DocumentStore, MemoryDocumentStore};
