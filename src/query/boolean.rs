//! Structured boolean queries: one required match clause, optional boost
//! clauses and hard filters.
//!
//! # Examples
//!
//! ```
//! use glaive::document::TextField;
//! use glaive::query::boolean::{MatchClause, SearchQuery};
//! use glaive::query::range::RangeFilter;
//!
//! let query = SearchQuery::new(MatchClause::new("funny cats", TextField::QUERYABLE))
//!     .should(MatchClause::new("alice", [TextField::UserName]))
//!     .filter(RangeFilter::likes_at_least(10))
//!     .highlight(TextField::ALL);
//!
//! assert_eq!(query.should_clauses().len(), 1);
//! assert_eq!(query.filters().len(), 1);
//! ```

use serde::{Deserialize, Serialize};

use crate::document::TextField;
use crate::query::fuzzy::Fuzziness;
use crate::query::range::RangeFilter;

/// Occurrence type for boolean clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occur {
    /// The clause must match: documents without a matching term are excluded.
    Must,
    /// The clause only adds score.
    Should,
}

/// A fuzzy full-text match of some text against one or more fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchClause {
    /// Raw query text, analyzed at planning time.
    pub text: String,
    /// Fields the text is matched against.
    pub fields: Vec<TextField>,
    /// Edit distance policy for every query term.
    pub fuzziness: Fuzziness,
}

impl MatchClause {
    /// Create a clause with automatic fuzziness.
    pub fn new<S, I>(text: S, fields: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = TextField>,
    {
        MatchClause {
            text: text.into(),
            fields: fields.into_iter().collect(),
            fuzziness: Fuzziness::Auto,
        }
    }

    /// Set the fuzziness of this clause.
    pub fn with_fuzziness(mut self, fuzziness: Fuzziness) -> Self {
        self.fuzziness = fuzziness;
        self
    }
}

/// A query with a `must` clause, `should` clauses and `filter` clauses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    must: MatchClause,
    should: Vec<MatchClause>,
    filters: Vec<RangeFilter>,
    highlight_fields: Vec<TextField>,
}

impl SearchQuery {
    /// Create a query around its required clause.
    pub fn new(must: MatchClause) -> Self {
        SearchQuery {
            must,
            should: Vec::new(),
            filters: Vec::new(),
            highlight_fields: Vec::new(),
        }
    }

    /// Add a score-boosting clause.
    pub fn should(mut self, clause: MatchClause) -> Self {
        self.should.push(clause);
        self
    }

    /// Add a hard filter.
    pub fn filter(mut self, filter: RangeFilter) -> Self {
        self.filters.push(filter);
        self
    }

    /// Request highlighting for the given fields.
    pub fn highlight<I: IntoIterator<Item = TextField>>(mut self, fields: I) -> Self {
        for field in fields {
            if !self.highlight_fields.contains(&field) {
                self.highlight_fields.push(field);
            }
        }
        self
    }

    pub fn must_clause(&self) -> &MatchClause {
        &self.must
    }

    pub fn should_clauses(&self) -> &[MatchClause] {
        &self.should
    }

    pub fn filters(&self) -> &[RangeFilter] {
        &self.filters
    }

    pub fn highlight_fields(&self) -> &[TextField] {
        &self.highlight_fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_fields_are_deduplicated() {
        let query = SearchQuery::new(MatchClause::new("x", TextField::QUERYABLE))
            .highlight(TextField::QUERYABLE)
            .highlight(TextField::ALL);

        assert_eq!(query.highlight_fields().len(), TextField::COUNT);
        assert_eq!(query.must_clause().fuzziness, Fuzziness::Auto);
    }
}
