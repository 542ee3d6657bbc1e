//! Executes a [`QueryPlan`] against an [`Index`].
//!
//! Execution order:
//!
//! 1. the `must` clause selects the candidates (every document when neutral);
//! 2. filters drop candidates whose stored fields fail any predicate;
//! 3. `should` clauses add contributions to the surviving candidates only;
//! 4. the scorer turns contributions into a score.

use std::sync::Arc;

use ahash::{AHashMap, AHashSet};

use crate::document::{Document, FieldMap, TextField};
use crate::index::Index;
use crate::index::posting::DocId;
use crate::query::planner::{QueryPlan, TermExpansion};
use crate::query::scorer::{Contribution, Scorer};

/// A document that survived the `must` clause and every filter.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub doc_id: DocId,
    pub document: Arc<Document>,
    /// Matches of the `must` clause; empty when that clause was neutral.
    pub must: Vec<Contribution>,
    /// Matches of the `should` clauses.
    pub should: Vec<Contribution>,
    pub score: f32,
}

impl Candidate {
    /// Distinct matched index terms per field, over every clause.
    pub fn matched_terms(&self) -> FieldMap<AHashSet<String>> {
        let mut terms: FieldMap<AHashSet<String>> = FieldMap::default();
        for contribution in self.must.iter().chain(&self.should) {
            terms
                .get_mut(contribution.field)
                .insert(contribution.term.clone());
        }
        terms
    }
}

/// Runs planned queries over one index generation.
#[derive(Debug)]
pub struct QueryExecutor<'a> {
    index: &'a Index,
    scorer: &'a dyn Scorer,
}

impl<'a> QueryExecutor<'a> {
    pub fn new(index: &'a Index, scorer: &'a dyn Scorer) -> Self {
        QueryExecutor { index, scorer }
    }

    /// Every matching document with its contributions and score, in no
    /// particular order.
    pub fn execute(&self, plan: &QueryPlan) -> Vec<Candidate> {
        let mut must: AHashMap<DocId, Vec<Contribution>> = AHashMap::new();
        if plan.must.is_neutral() {
            must.extend(self.index.store().doc_ids().map(|doc_id| (doc_id, Vec::new())));
        } else {
            for expansion in &plan.must.expansions {
                for (doc_id, contribution) in self.contributions(expansion) {
                    must.entry(doc_id).or_default().push(contribution);
                }
            }
        }

        let mut candidates: AHashMap<DocId, Candidate> = must
            .into_iter()
            .filter_map(|(doc_id, contributions)| {
                let document = self.index.document(doc_id)?;
                plan.filters
                    .iter()
                    .all(|filter| filter.matches(&document))
                    .then_some((
                        doc_id,
                        Candidate {
                            doc_id,
                            document,
                            must: contributions,
                            should: Vec::new(),
                            score: 0.0,
                        },
                    ))
            })
            .collect();

        for clause in &plan.should {
            for expansion in &clause.expansions {
                for (doc_id, contribution) in self.contributions(expansion) {
                    if let Some(candidate) = candidates.get_mut(&doc_id) {
                        candidate.should.push(contribution);
                    }
                }
            }
        }

        candidates
            .into_values()
            .map(|mut candidate| {
                candidate.score = self.scorer.score(&candidate.must, &candidate.should);
                candidate
            })
            .collect()
    }

    fn contributions<'e>(
        &'e self,
        expansion: &'e TermExpansion,
    ) -> impl Iterator<Item = (DocId, Contribution)> + 'e {
        let field: TextField = expansion.field;
        let idf = self.scorer.idf(
            expansion.matched.doc_frequency as u64,
            self.index.doc_count(),
        );

        self.index
            .postings()
            .term_postings(field, &expansion.matched.term)
            .into_iter()
            .flat_map(|list| list.iter())
            .map(move |posting| {
                (
                    posting.doc_id,
                    Contribution {
                        field,
                        term: expansion.matched.term.clone(),
                        term_frequency: posting.frequency,
                        idf,
                        similarity: expansion.matched.similarity,
                    },
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::analyzer::StandardAnalyzer;
    use crate::document::DocumentInput;
    use crate::index::analyze_document;
    use crate::query::boolean::{MatchClause, SearchQuery};
    use crate::query::fuzzy::FuzzyMatcher;
    use crate::query::planner::QueryPlanner;
    use crate::query::range::RangeFilter;
    use crate::query::scorer::TfIdfScorer;

    fn index() -> Index {
        let analyzer = StandardAnalyzer::new();
        let mut index = Index::new("comments");
        for (id, comment, user, likes) in [
            ("a", "great video, loved it", "alice", 5),
            ("b", "bad video", "bob", 50),
            ("c", "nothing here", "great", 1),
        ] {
            let document = DocumentInput::new(id)
                .text(TextField::Comment, comment)
                .text(TextField::UserName, user)
                .date("2023-01-01")
                .likes(likes)
                .validate()
                .unwrap()
                .document;
            index.upsert(analyze_document(&analyzer, document).unwrap());
        }
        index
    }

    fn run(index: &Index, query: &SearchQuery) -> Vec<Candidate> {
        let planner = QueryPlanner::new(Arc::new(StandardAnalyzer::new()), FuzzyMatcher::default());
        let plan = planner.plan(index.postings(), query).unwrap();
        let scorer = TfIdfScorer::default();
        let mut candidates = QueryExecutor::new(index, &scorer).execute(&plan);
        candidates.sort_by(|a, b| a.document.id().cmp(b.document.id()));
        candidates
    }

    fn ids(candidates: &[Candidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.document.id()).collect()
    }

    #[test]
    fn test_must_gates_should() {
        let index = index();
        let query = SearchQuery::new(MatchClause::new("video", TextField::QUERYABLE))
            .should(MatchClause::new("great", [TextField::UserName]));

        let candidates = run(&index, &query);
        assert_eq!(ids(&candidates), vec!["a", "b"]);
        assert!(candidates.iter().all(|c| c.should.is_empty()));
    }

    #[test]
    fn test_should_boosts_survivors() {
        let index = index();
        let query = SearchQuery::new(MatchClause::new("video", TextField::QUERYABLE))
            .should(MatchClause::new("alice", [TextField::UserName]));

        let candidates = run(&index, &query);
        assert_eq!(candidates[0].should.len(), 1);
        assert!(candidates[0].score > candidates[1].score);
    }

    #[test]
    fn test_neutral_must_and_filters() {
        let index = index();
        let query = SearchQuery::new(MatchClause::new("", TextField::QUERYABLE))
            .filter(RangeFilter::likes_at_least(5));

        let candidates = run(&index, &query);
        assert_eq!(ids(&candidates), vec!["a", "b"]);
        assert!(candidates.iter().all(|c| c.score == 1.0));
    }

    #[test]
    fn test_unmatched_must_returns_nothing() {
        let index = index();
        let query = SearchQuery::new(MatchClause::new("zzzzzzzzzz", TextField::QUERYABLE));
        assert!(run(&index, &query).is_empty());
    }

    #[test]
    fn test_matched_terms() {
        let index = index();
        let query = SearchQuery::new(MatchClause::new("graet videos", TextField::QUERYABLE));

        let candidates = run(&index, &query);
        let terms = candidates[0].matched_terms();
        let mut comment: Vec<&String> = terms.get(TextField::Comment).iter().collect();
        comment.sort();
        assert_eq!(comment, vec!["great", "video"]);
    }
}
