//! Query system for searching documents.
//!
//! A [`SearchQuery`] is planned into concrete index terms by the
//! [`QueryPlanner`], executed by the [`QueryExecutor`] into scored
//! candidates, then ordered and paginated by [`rank`].

pub mod boolean;
pub mod collector;
pub mod executor;
pub mod fuzzy;
pub mod planner;
pub mod range;
pub mod scorer;

pub use boolean::{MatchClause, Occur, SearchQuery};
pub use collector::{RankedPage, TopDocsCollector, rank, rank_order};
pub use executor::{Candidate, QueryExecutor};
pub use fuzzy::{Fuzziness, FuzzyMatch, FuzzyMatcher};
pub use planner::{ClausePlan, QueryPlan, QueryPlanner, TermExpansion};
pub use range::{Bound, RangeFilter};
pub use scorer::{Contribution, Scorer, TfIdfScorer};
