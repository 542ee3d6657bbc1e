//! The request shape the front end sends.

use serde::{Deserialize, Serialize};

use crate::document::TextField;
use crate::error::Result;
use crate::query::boolean::{MatchClause, SearchQuery};
use crate::query::fuzzy::Fuzziness;
use crate::query::range::RangeFilter;

/// A comment search request.
///
/// # Examples
///
/// ```
/// use glaive::search::SearchRequest;
///
/// let request = SearchRequest::new("funny cats")
///     .with_author("alice")
///     .with_min_date("2023-01-01")
///     .with_min_likes(10)
///     .with_offset(20);
///
/// let query = request.to_query(Default::default()).unwrap();
/// assert_eq!(query.should_clauses().len(), 1);
/// assert_eq!(query.filters().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    /// Free text matched against the video name, channel name and comment.
    pub query_text: String,
    /// Author name boosting matching comments.
    pub author: Option<String>,
    /// Earliest posting date.
    pub min_date: Option<String>,
    /// Minimum number of likes.
    pub min_likes: Option<i64>,
    /// Number of leading results to skip.
    pub offset: usize,
}

impl SearchRequest {
    pub fn new<S: Into<String>>(query_text: S) -> Self {
        SearchRequest {
            query_text: query_text.into(),
            ..Default::default()
        }
    }

    pub fn with_author<S: Into<String>>(mut self, author: S) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_min_date<S: Into<String>>(mut self, min_date: S) -> Self {
        self.min_date = Some(min_date.into());
        self
    }

    pub fn with_min_likes(mut self, min_likes: i64) -> Self {
        self.min_likes = Some(min_likes);
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Build the boolean query for this request.
    ///
    /// The author clause is only added when the author is non-empty. Fails
    /// with a query error when `min_date` does not parse.
    pub fn to_query(&self, fuzziness: Fuzziness) -> Result<SearchQuery> {
        let mut query = SearchQuery::new(
            MatchClause::new(self.query_text.as_str(), TextField::QUERYABLE)
                .with_fuzziness(fuzziness),
        );

        if let Some(author) = self.author.as_deref().filter(|a| !a.trim().is_empty()) {
            query = query.should(
                MatchClause::new(author, [TextField::AUTHOR]).with_fuzziness(fuzziness),
            );
        }
        if let Some(min_date) = &self.min_date {
            query = query.filter(RangeFilter::date_at_least(min_date)?);
        }
        if let Some(min_likes) = self.min_likes {
            query = query.filter(RangeFilter::likes_at_least(min_likes));
        }

        Ok(query.highlight(TextField::QUERYABLE).highlight([TextField::AUTHOR]))
    }
}
