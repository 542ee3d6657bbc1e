//! Runs queries end to end: plan, execute, rank, highlight.

use std::sync::Arc;

use log::debug;

use crate::analysis::analyzer::Analyzer;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::highlight::Highlighter;
use crate::index::Index;
use crate::query::boolean::SearchQuery;
use crate::query::collector::rank;
use crate::query::executor::QueryExecutor;
use crate::query::fuzzy::FuzzyMatcher;
use crate::query::planner::QueryPlanner;
use crate::query::scorer::{Scorer, TfIdfScorer};
use crate::search::result::{Page, SearchHit};

/// Executes [`SearchQuery`]s against an index generation.
///
/// A searcher holds no index state and never mutates the index, so one
/// instance can serve any number of concurrent readers.
#[derive(Debug, Clone)]
pub struct Searcher {
    planner: QueryPlanner,
    scorer: Arc<dyn Scorer>,
    highlighter: Highlighter,
}

impl Searcher {
    /// Create a searcher using `analyzer` for query text and highlighting.
    pub fn new(analyzer: Arc<dyn Analyzer>, config: &EngineConfig) -> Self {
        Searcher {
            planner: QueryPlanner::new(
                analyzer.clone(),
                FuzzyMatcher::new(config.fuzzy.max_expansions),
            ),
            scorer: Arc::new(TfIdfScorer::new(
                config.scoring.should_weight,
                config.scoring.idf_floor,
            )),
            highlighter: Highlighter::new(analyzer, config.highlight.clone()),
        }
    }

    /// Replace the scorer.
    pub fn with_scorer(mut self, scorer: Arc<dyn Scorer>) -> Self {
        self.scorer = scorer;
        self
    }

    /// Search `index`, returning results `offset..offset + limit` of the
    /// global ranking.
    pub fn search(
        &self,
        index: &Index,
        query: &SearchQuery,
        offset: usize,
        limit: usize,
    ) -> Result<Page> {
        let plan = self.planner.plan(index.postings(), query)?;
        let candidates = QueryExecutor::new(index, self.scorer.as_ref()).execute(&plan);
        let ranked = rank(candidates, offset, limit);

        debug!(
            "query matched {} document(s), returning {} from offset {}",
            ranked.total_hits,
            ranked.hits.len(),
            offset
        );

        let hits = ranked
            .hits
            .into_iter()
            .map(|candidate| {
                let highlights = self.highlighter.highlight(
                    &candidate.document,
                    &candidate.matched_terms(),
                    &plan.highlight_fields,
                )?;
                Ok(SearchHit {
                    document: candidate.document,
                    score: candidate.score,
                    highlights,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Page {
            hits,
            total_hits: ranked.total_hits,
            offset,
        })
    }
}
