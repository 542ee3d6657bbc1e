//! Bounded edit distance used by fuzzy term expansion.
//!
//! Distances are Damerau-Levenshtein in its optimal string alignment form:
//! insertions, deletions, substitutions and transpositions of two adjacent
//! characters each cost one edit. Strings are compared by `char`, not byte.

use std::cmp::min;

/// Pre-split query term for computing bounded distances to many candidates.
///
/// Only three rows of the distance matrix are kept, and evaluation stops as
/// soon as every cell of a row exceeds the threshold.
#[derive(Debug, Clone)]
pub struct BoundedDistance {
    query: Vec<char>,
}

impl BoundedDistance {
    /// Create a matcher for the given query term.
    pub fn new(query: &str) -> Self {
        BoundedDistance {
            query: query.chars().collect(),
        }
    }

    /// Length of the query term in characters.
    pub fn query_len(&self) -> usize {
        self.query.len()
    }

    /// Distance to `candidate`, or `None` when it exceeds `threshold`.
    pub fn within(&self, candidate: &str, threshold: usize) -> Option<usize> {
        let target: Vec<char> = candidate.chars().collect();
        let len1 = self.query.len();
        let len2 = target.len();

        if len1.abs_diff(len2) > threshold {
            return None;
        }
        if len1 == 0 || len2 == 0 {
            let distance = len1.max(len2);
            return (distance <= threshold).then_some(distance);
        }

        let mut before_prev: Vec<usize> = vec![0; len2 + 1];
        let mut prev: Vec<usize> = (0..=len2).collect();
        let mut curr: Vec<usize> = vec![0; len2 + 1];

        for i in 1..=len1 {
            curr[0] = i;
            let mut min_in_row = i;

            for j in 1..=len2 {
                let cost = usize::from(self.query[i - 1] != target[j - 1]);

                let mut cell = min(min(prev[j] + 1, curr[j - 1] + 1), prev[j - 1] + cost);
                if i > 1
                    && j > 1
                    && self.query[i - 1] == target[j - 2]
                    && self.query[i - 2] == target[j - 1]
                {
                    cell = min(cell, before_prev[j - 2] + 1);
                }

                curr[j] = cell;
                min_in_row = min(min_in_row, cell);
            }

            if min_in_row > threshold {
                return None;
            }

            std::mem::swap(&mut before_prev, &mut prev);
            std::mem::swap(&mut prev, &mut curr);
        }

        let distance = prev[len2];
        (distance <= threshold).then_some(distance)
    }
}
