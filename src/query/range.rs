//! Range filters over the date and likes fields.
//!
//! Filters are hard predicates: a document failing one is excluded no matter
//! how well it matches the text clauses. A document without a likes count
//! is compared as having zero likes.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::document::date::parse_date;
use crate::error::{GlaiveError, Result};

/// Bound type for range filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Bound<T> {
    /// Inclusive bound.
    Included(T),
    /// Exclusive bound.
    Excluded(T),
    /// Unbounded (no limit).
    Unbounded,
}

impl<T: PartialOrd> Bound<T> {
    /// Check if a value satisfies this bound as a lower bound.
    pub fn contains_lower(&self, value: &T) -> bool {
        match self {
            Bound::Included(bound) => value >= bound,
            Bound::Excluded(bound) => value > bound,
            Bound::Unbounded => true,
        }
    }

    /// Check if a value satisfies this bound as an upper bound.
    pub fn contains_upper(&self, value: &T) -> bool {
        match self {
            Bound::Included(bound) => value <= bound,
            Bound::Excluded(bound) => value < bound,
            Bound::Unbounded => true,
        }
    }

    fn value(&self) -> Option<&T> {
        match self {
            Bound::Included(value) | Bound::Excluded(value) => Some(value),
            Bound::Unbounded => None,
        }
    }
}

/// A filter clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RangeFilter {
    /// Range over the posting date.
    Date {
        lower: Bound<DateTime<Utc>>,
        upper: Bound<DateTime<Utc>>,
    },
    /// Range over the likes count.
    Likes { lower: Bound<i64>, upper: Bound<i64> },
}

impl RangeFilter {
    /// Date range filter. Fails when the lower bound lies after the upper.
    pub fn date(lower: Bound<DateTime<Utc>>, upper: Bound<DateTime<Utc>>) -> Result<Self> {
        check_order(&lower, &upper)?;
        Ok(RangeFilter::Date { lower, upper })
    }

    /// Likes range filter. Fails when the lower bound lies above the upper.
    pub fn likes(lower: Bound<i64>, upper: Bound<i64>) -> Result<Self> {
        check_order(&lower, &upper)?;
        Ok(RangeFilter::Likes { lower, upper })
    }

    /// `Date >= raw`, with `raw` in any accepted date format.
    pub fn date_at_least(raw: &str) -> Result<Self> {
        let date = parse_date(raw)
            .ok_or_else(|| GlaiveError::query(format!("unparseable date '{raw}'")))?;
        Ok(RangeFilter::Date {
            lower: Bound::Included(date),
            upper: Bound::Unbounded,
        })
    }

    /// `Likes >= min`.
    pub fn likes_at_least(min: i64) -> Self {
        RangeFilter::Likes {
            lower: Bound::Included(min),
            upper: Bound::Unbounded,
        }
    }

    /// Whether the document satisfies this filter.
    pub fn matches(&self, document: &Document) -> bool {
        match self {
            RangeFilter::Date { lower, upper } => {
                let date = document.date();
                lower.contains_lower(&date) && upper.contains_upper(&date)
            }
            RangeFilter::Likes { lower, upper } => {
                let likes = i64::try_from(document.likes_or_zero()).unwrap_or(i64::MAX);
                lower.contains_lower(&likes) && upper.contains_upper(&likes)
            }
        }
    }
}

fn check_order<T: PartialOrd + fmt::Debug>(lower: &Bound<T>, upper: &Bound<T>) -> Result<()> {
    match (lower.value(), upper.value()) {
        (Some(lo), Some(hi)) if lo > hi => Err(GlaiveError::query(format!(
            "empty range: lower bound {lo:?} is above upper bound {hi:?}"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::DocumentInput;

    fn doc(date: &str, likes: Option<&str>) -> Document {
        let mut input = DocumentInput::new("c").date(date);
        if let Some(likes) = likes {
            input = input.likes_raw(likes);
        }
        input.validate().unwrap().document
    }

    #[test]
    fn test_date_at_least() {
        let filter = RangeFilter::date_at_least("2023-03-01").unwrap();
        assert!(filter.matches(&doc("2023-03-01", None)));
        assert!(filter.matches(&doc("2023-06-01T10:00:00Z", None)));
        assert!(!filter.matches(&doc("2023-02-28", None)));
    }

    #[test]
    fn test_unparseable_date_is_query_error() {
        let err = RangeFilter::date_at_least("yesterday").unwrap_err();
        assert!(matches!(err, GlaiveError::Query(_)));
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn test_likes_at_least() {
        let filter = RangeFilter::likes_at_least(5);
        assert!(filter.matches(&doc("2023-01-01", Some("5"))));
        assert!(!filter.matches(&doc("2023-01-01", Some("4"))));
        assert!(!filter.matches(&doc("2023-01-01", None)));
        assert!(!filter.matches(&doc("2023-01-01", Some("n/a"))));
        assert!(RangeFilter::likes_at_least(-1).matches(&doc("2023-01-01", Some("0"))));
    }

    #[test]
    fn test_absent_likes_compare_as_zero() {
        let at_least_zero = RangeFilter::likes_at_least(0);
        assert!(at_least_zero.matches(&doc("2023-01-01", None)));
        assert!(at_least_zero.matches(&doc("2023-01-01", Some("1.2K"))));
        assert!(!RangeFilter::likes_at_least(1).matches(&doc("2023-01-01", Some("1.2K"))));
    }

    #[test]
    fn test_malformed_range() {
        assert!(RangeFilter::likes(Bound::Included(10), Bound::Excluded(2)).is_err());
        let filter = RangeFilter::likes(Bound::Excluded(1), Bound::Included(3)).unwrap();
        assert!(!filter.matches(&doc("2023-01-01", Some("1"))));
        assert!(filter.matches(&doc("2023-01-01", Some("3"))));
    }
}
