//! Lifecycle and concurrency control for the live index.
//!
//! The manager owns at most one index generation behind a readers-writer
//! lock. Queries share the read lock and run concurrently; `create`, `drop`,
//! upserts and removals take the write lock, so a reader never observes a
//! document between the removal of its old postings and the insertion of
//! its new ones.
//!
//! # Examples
//!
//! ```
//! use glaive::config::EngineConfig;
//! use glaive::document::{DocumentInput, TextField};
//! use glaive::index::IndexManager;
//! use glaive::search::SearchRequest;
//!
//! let manager = IndexManager::new(EngineConfig::default()).unwrap();
//! manager.create().unwrap();
//! manager
//!     .upsert(
//!         DocumentInput::new("c-1")
//!             .text(TextField::Comment, "great video, loved it")
//!             .text(TextField::UserName, "alice")
//!             .date("2023-01-01")
//!             .likes(5),
//!     )
//!     .unwrap();
//!
//! let page = manager.search(&SearchRequest::new("grate")).unwrap();
//! assert_eq!(page.total_hits, 0);
//!
//! let page = manager.search(&SearchRequest::new("videos")).unwrap();
//! assert_eq!(page.hits[0].display_field(TextField::Comment), "great <em>video</em>, loved it");
//! ```

use std::sync::Arc;

use log::{debug, info, warn};
use parking_lot::RwLock;
use rayon::prelude::*;

use crate::analysis::analyzer::{Analyzer, StandardAnalyzer};
use crate::config::EngineConfig;
use crate::document::{Document, DocumentInput, IngestWarning, TextField};
use crate::error::{GlaiveError, Result};
use crate::index::index::{AnalyzedDocument, Index, IndexStats, analyze_document};
use crate::query::boolean::SearchQuery;
use crate::search::request::SearchRequest;
use crate::search::result::Page;
use crate::search::searcher::Searcher;

/// A validated and analyzed record, or the id it was rejected for.
type Prepared = std::result::Result<(AnalyzedDocument, Vec<IngestWarning>), (String, GlaiveError)>;

/// Result of a single upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertOutcome {
    /// Whether a document with the same id was replaced.
    pub replaced: bool,
    /// Fields dropped while validating the record.
    pub warnings: Vec<IngestWarning>,
}

/// Result of a batch upsert.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Documents written, including replacements.
    pub indexed: usize,
    /// Documents that replaced an existing one.
    pub replaced: usize,
    /// Records rejected, with their id and the reason.
    pub failures: Vec<(String, GlaiveError)>,
    /// Fields dropped from accepted records.
    pub warnings: Vec<IngestWarning>,
}

impl BatchReport {
    /// Whether every record was indexed.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Owns the live index generation.
pub struct IndexManager {
    config: EngineConfig,
    analyzer: Arc<dyn Analyzer>,
    searcher: Searcher,
    index: RwLock<Option<Index>>,
}

impl IndexManager {
    /// Create a manager with the standard analyzer. No index exists until
    /// [`IndexManager::create`] is called.
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::with_analyzer(config, Arc::new(StandardAnalyzer::new()))
    }

    /// Create a manager with a custom analyzer, used for both indexing and
    /// querying.
    pub fn with_analyzer(config: EngineConfig, analyzer: Arc<dyn Analyzer>) -> Result<Self> {
        config.validate()?;
        let searcher = Searcher::new(analyzer.clone(), &config);

        Ok(IndexManager {
            config,
            analyzer,
            searcher,
            index: RwLock::new(None),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.config.index_name
    }

    /// Create the index. Fails with `AlreadyExists` when it is live.
    pub fn create(&self) -> Result<()> {
        let mut slot = self.index.write();
        if slot.is_some() {
            return Err(GlaiveError::already_exists(format!(
                "index '{}'",
                self.name()
            )));
        }

        *slot = Some(Index::new(self.name()));
        info!(
            "created index '{}' with analyzer '{}'",
            self.name(),
            self.analyzer.name()
        );
        Ok(())
    }

    /// Drop the index and every document in it. Dropping an absent index is
    /// a no-op. Returns whether an index was dropped.
    pub fn drop_index(&self) -> bool {
        match self.index.write().take() {
            Some(index) => {
                info!(
                    "dropped index '{}' ({} documents)",
                    self.name(),
                    index.doc_count()
                );
                true
            }
            None => false,
        }
    }

    /// Whether the index is live.
    pub fn exists(&self) -> bool {
        self.index.read().is_some()
    }

    /// Validate and insert or replace a document.
    pub fn upsert(&self, input: DocumentInput) -> Result<UpsertOutcome> {
        let validated = input.validate()?;
        log_warnings(&validated.warnings);

        let replaced = self.upsert_document(validated.document)?;
        Ok(UpsertOutcome {
            replaced,
            warnings: validated.warnings,
        })
    }

    /// Insert or replace an already validated document. Returns whether a
    /// document with the same id was replaced.
    pub fn upsert_document(&self, document: Document) -> Result<bool> {
        let analyzed = analyze_document(self.analyzer.as_ref(), document)?;

        let mut slot = self.index.write();
        let index = slot.as_mut().ok_or_else(|| self.index_not_found())?;
        Ok(index.upsert(analyzed))
    }

    /// Validate, analyze and insert many records.
    ///
    /// Records are analyzed in parallel and applied in submission order, at
    /// most `batch_chunk_size` per write-lock hold. A rejected record is
    /// reported and never aborts the rest of the batch.
    pub fn upsert_batch(&self, inputs: Vec<DocumentInput>) -> Result<BatchReport> {
        if !self.exists() {
            return Err(self.index_not_found());
        }

        let total = inputs.len();
        let analyzer = self.analyzer.as_ref();
        let prepared: Vec<Prepared> = inputs
            .into_par_iter()
            .map(|input| -> Prepared {
                let id = input.id.clone();
                let validated = input.validate().map_err(|e| (id.clone(), e))?;
                let analyzed =
                    analyze_document(analyzer, validated.document).map_err(|e| (id, e))?;
                Ok((analyzed, validated.warnings))
            })
            .collect();

        let mut report = BatchReport::default();
        let mut pending = Vec::with_capacity(self.config.batch_chunk_size);
        for entry in prepared {
            match entry {
                Ok((analyzed, warnings)) => {
                    log_warnings(&warnings);
                    report.warnings.extend(warnings);
                    pending.push(analyzed);
                    if pending.len() == self.config.batch_chunk_size {
                        self.apply_chunk(&mut pending, &mut report);
                    }
                }
                Err((id, error)) => {
                    warn!("rejected document '{id}': {error}");
                    report.failures.push((id, error));
                }
            }
        }
        self.apply_chunk(&mut pending, &mut report);

        info!(
            "indexed {} of {} documents into '{}' ({} replaced, {} rejected, {} warnings)",
            report.indexed,
            total,
            self.name(),
            report.replaced,
            report.failures.len(),
            report.warnings.len()
        );
        Ok(report)
    }

    fn apply_chunk(&self, pending: &mut Vec<AnalyzedDocument>, report: &mut BatchReport) {
        if pending.is_empty() {
            return;
        }

        let mut slot = self.index.write();
        match slot.as_mut() {
            Some(index) => {
                for analyzed in pending.drain(..) {
                    report.indexed += 1;
                    if index.upsert(analyzed) {
                        report.replaced += 1;
                    }
                }
                debug!("applied chunk, index now holds {} documents", index.doc_count());
            }
            None => {
                for analyzed in pending.drain(..) {
                    let id = analyzed.document.id().to_string();
                    report.failures.push((id, self.index_not_found()));
                }
            }
        }
    }

    /// Drop, re-create and fill the index from `inputs`.
    pub fn rebuild(&self, inputs: Vec<DocumentInput>) -> Result<BatchReport> {
        self.drop_index();
        self.create()?;
        self.upsert_batch(inputs)
    }

    /// Remove a document by comment id, returning it.
    pub fn remove(&self, id: &str) -> Result<Arc<Document>> {
        let mut slot = self.index.write();
        let index = slot.as_mut().ok_or_else(|| self.index_not_found())?;
        index
            .remove(id)
            .ok_or_else(|| GlaiveError::not_found(format!("document '{id}'")))
    }

    /// Fetch a document by comment id.
    pub fn get(&self, id: &str) -> Result<Arc<Document>> {
        let slot = self.index.read();
        let index = slot.as_ref().ok_or_else(|| self.index_not_found())?;
        index
            .get(id)
            .ok_or_else(|| GlaiveError::not_found(format!("document '{id}'")))
    }

    /// Number of documents in the index.
    pub fn doc_count(&self) -> Result<u64> {
        self.with_index(|index| Ok(index.doc_count()))
    }

    /// Number of documents whose field contains the exact term.
    pub fn doc_freq(&self, field: TextField, term: &str) -> Result<usize> {
        self.with_index(|index| Ok(index.doc_freq(field, term)))
    }

    pub fn stats(&self) -> Result<IndexStats> {
        self.with_index(|index| Ok(index.stats()))
    }

    /// Run a front-end request, returning one page of `page_size` results
    /// starting at the request offset.
    pub fn search(&self, request: &SearchRequest) -> Result<Page> {
        let query = request.to_query(self.config.fuzzy.fuzziness)?;
        self.execute(&query, request.offset, self.config.page_size)
    }

    /// Run a structured query.
    pub fn execute(&self, query: &SearchQuery, offset: usize, limit: usize) -> Result<Page> {
        self.with_index(|index| self.searcher.search(index, query, offset, limit))
    }

    fn with_index<T>(&self, f: impl FnOnce(&Index) -> Result<T>) -> Result<T> {
        let slot = self.index.read();
        let index = slot.as_ref().ok_or_else(|| self.index_not_found())?;
        f(index)
    }

    fn index_not_found(&self) -> GlaiveError {
        GlaiveError::not_found(format!("index '{}'", self.name()))
    }
}

impl std::fmt::Debug for IndexManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IndexManager")
            .field("name", &self.config.index_name)
            .field("analyzer", &self.analyzer.name())
            .field("exists", &self.exists())
            .finish()
    }
}

fn log_warnings(warnings: &[IngestWarning]) {
    for warning in warnings {
        warn!("{warning}");
    }
}
