//! # Glaive
//!
//! An in-process relevance search core for video comments.
//!
//! ## Features
//!
//! - Unicode word analysis with lowercasing and English stop words
//! - In-memory inverted index with length-bucketed vocabulary
//! - Fuzzy multi-field matching with automatic edit distance
//! - Boolean queries with required, boosting and filter clauses
//! - Ranking by relevance then likes, with global pagination
//! - Whole-field highlighting of matched terms
//! - Concurrent queries alongside chunked batch indexing

pub mod analysis;
pub mod config;
pub mod document;
pub mod error;
pub mod highlight;
pub mod index;
pub mod query;
pub mod search;
pub mod util;

pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::document::{Document, DocumentInput, IngestWarning, TextField};
    pub use crate::error::{GlaiveError, Result};
    pub use crate::index::{BatchReport, IndexManager, UpsertOutcome};
    pub use crate::query::{MatchClause, RangeFilter, SearchQuery};
    pub use crate::search::{Page, SearchHit, SearchRequest};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
