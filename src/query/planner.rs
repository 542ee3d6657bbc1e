//! Turns a [`SearchQuery`] into concrete index terms.
//!
//! Each clause's text goes through the same analyzer used at index time, and
//! every resulting query term is fuzzily expanded against the vocabulary of
//! each field the clause targets.

use std::sync::Arc;

use log::debug;

use crate::analysis::analyzer::Analyzer;
use crate::document::TextField;
use crate::error::Result;
use crate::index::inverted::TermIndex;
use crate::query::boolean::{MatchClause, Occur, SearchQuery};
use crate::query::fuzzy::{FuzzyMatch, FuzzyMatcher};
use crate::query::range::RangeFilter;

/// One index term a query term expanded to in one field.
#[derive(Debug, Clone, PartialEq)]
pub struct TermExpansion {
    pub field: TextField,
    pub query_term: String,
    pub matched: FuzzyMatch,
}

/// A planned match clause.
#[derive(Debug, Clone, PartialEq)]
pub struct ClausePlan {
    pub occur: Occur,
    /// Analyzed query terms, deduplicated, in query order.
    pub query_terms: Vec<String>,
    /// Index terms to look up.
    pub expansions: Vec<TermExpansion>,
}

impl ClausePlan {
    /// A clause whose text analyzed to no terms at all.
    ///
    /// A neutral `must` matches every document; a neutral `should` adds
    /// nothing.
    pub fn is_neutral(&self) -> bool {
        self.query_terms.is_empty()
    }
}

/// A fully planned query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub must: ClausePlan,
    pub should: Vec<ClausePlan>,
    pub filters: Vec<RangeFilter>,
    pub highlight_fields: Vec<TextField>,
}

/// Plans queries against a term index.
#[derive(Clone)]
pub struct QueryPlanner {
    analyzer: Arc<dyn Analyzer>,
    matcher: FuzzyMatcher,
}

impl QueryPlanner {
    pub fn new(analyzer: Arc<dyn Analyzer>, matcher: FuzzyMatcher) -> Self {
        QueryPlanner { analyzer, matcher }
    }

    /// Plan every clause of `query`.
    pub fn plan(&self, postings: &dyn TermIndex, query: &SearchQuery) -> Result<QueryPlan> {
        let must = self.plan_clause(postings, query.must_clause(), Occur::Must)?;
        let should = query
            .should_clauses()
            .iter()
            .map(|clause| self.plan_clause(postings, clause, Occur::Should))
            .collect::<Result<Vec<_>>>()?;

        debug!(
            "planned query: must terms {:?} ({} expansions), {} should clause(s), {} filter(s)",
            must.query_terms,
            must.expansions.len(),
            should.len(),
            query.filters().len()
        );

        Ok(QueryPlan {
            must,
            should,
            filters: query.filters().to_vec(),
            highlight_fields: query.highlight_fields().to_vec(),
        })
    }

    /// Analyze and expand one clause.
    pub fn plan_clause(
        &self,
        postings: &dyn TermIndex,
        clause: &MatchClause,
        occur: Occur,
    ) -> Result<ClausePlan> {
        let mut query_terms: Vec<String> = Vec::new();
        for token in self.analyzer.analyze(&clause.text)? {
            if !query_terms.contains(&token.text) {
                query_terms.push(token.text);
            }
        }

        let mut expansions = Vec::new();
        for query_term in &query_terms {
            let max_edits = clause.fuzziness.max_edits(query_term);
            for &field in &clause.fields {
                expansions.extend(
                    self.matcher
                        .expand(postings, field, query_term, max_edits)
                        .into_iter()
                        .map(|matched| TermExpansion {
                            field,
                            query_term: query_term.clone(),
                            matched,
                        }),
                );
            }
        }

        Ok(ClausePlan {
            occur,
            query_terms,
            expansions,
        })
    }
}

impl std::fmt::Debug for QueryPlanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryPlanner")
            .field("analyzer", &self.analyzer.name())
            .field("matcher", &self.matcher)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::StandardAnalyzer;
    use crate::index::inverted::MemoryInvertedIndex;

    fn planner() -> QueryPlanner {
        QueryPlanner::new(Arc::new(StandardAnalyzer::new()), FuzzyMatcher::default())
    }

    #[test]
    fn test_plan_expands_every_field() {
        let analyzer = StandardAnalyzer::new();
        let mut index = MemoryInvertedIndex::new();
        index.add_postings(0, TextField::Comment, &analyzer.tokens("great video").unwrap());
        index.add_postings(0, TextField::VideoName, &analyzer.tokens("Great Escape").unwrap());

        let clause = MatchClause::new("The GREAT!", TextField::QUERYABLE);
        let plan = planner().plan_clause(&index, &clause, Occur::Must).unwrap();

        assert_eq!(plan.query_terms, vec!["great"]);
        let fields: Vec<TextField> = plan.expansions.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec![TextField::VideoName, TextField::Comment]);
        assert!(!plan.is_neutral());
    }

    #[test]
    fn test_stop_words_only_is_neutral() {
        let index = MemoryInvertedIndex::new();
        let clause = MatchClause::new("the and of", TextField::QUERYABLE);
        let plan = planner().plan_clause(&index, &clause, Occur::Must).unwrap();
        assert!(plan.is_neutral());
        assert!(plan.expansions.is_empty());
    }

    #[test]
    fn test_duplicate_terms_planned_once() {
        let index = MemoryInvertedIndex::new();
        let clause = MatchClause::new("cats Cats CATS", [TextField::Comment]);
        let plan = planner().plan_clause(&index, &clause, Occur::Should).unwrap();
        assert_eq!(plan.query_terms, vec!["cats"]);
        assert_eq!(plan.occur, Occur::Should);
    }
}
