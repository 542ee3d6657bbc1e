//! Ranking and pagination of scored candidates.
//!
//! Results are totally ordered by score (descending), then likes (descending,
//! absent likes counting as zero), then comment id (ascending). Pagination
//! is applied to that global order, so every page is consistent with every
//! other page of the same query.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::query::executor::Candidate;

/// The total result order: `Less` means `a` is ranked before `b`.
pub fn rank_order(a: &Candidate, b: &Candidate) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| {
            b.document
                .likes_or_zero()
                .cmp(&a.document.likes_or_zero())
        })
        .then_with(|| a.document.id().cmp(b.document.id()))
        .then_with(|| a.doc_id.cmp(&b.doc_id))
}

/// Heap entry; the greatest entry is the worst-ranked one.
#[derive(Debug)]
struct Ranked(Candidate);

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        rank_order(&self.0, &other.0)
    }
}

/// A collector that keeps the best `max_docs` candidates.
#[derive(Debug)]
pub struct TopDocsCollector {
    max_docs: usize,
    hits: BinaryHeap<Ranked>,
    total_hits: usize,
}

impl TopDocsCollector {
    /// Create a new top docs collector.
    pub fn new(max_docs: usize) -> Self {
        TopDocsCollector {
            max_docs,
            hits: BinaryHeap::with_capacity(max_docs.min(1024)),
            total_hits: 0,
        }
    }

    /// Offer a candidate.
    pub fn collect(&mut self, candidate: Candidate) {
        self.total_hits += 1;
        if self.max_docs == 0 {
            return;
        }

        if self.hits.len() < self.max_docs {
            self.hits.push(Ranked(candidate));
        } else if let Some(mut worst) = self.hits.peek_mut() {
            if rank_order(&candidate, &worst.0) == Ordering::Less {
                *worst = Ranked(candidate);
            }
        }
    }

    /// Number of candidates offered so far.
    pub fn total_hits(&self) -> usize {
        self.total_hits
    }

    /// The kept candidates, best first.
    pub fn into_sorted_vec(self) -> Vec<Candidate> {
        self.hits
            .into_sorted_vec()
            .into_iter()
            .map(|ranked| ranked.0)
            .collect()
    }
}

/// One page of ranked candidates.
#[derive(Debug)]
pub struct RankedPage {
    pub hits: Vec<Candidate>,
    /// Number of candidates before pagination.
    pub total_hits: usize,
    pub offset: usize,
}

/// Sorts candidates and cuts out the requested page.
///
/// An offset past the end yields an empty page.
pub fn rank(
    candidates: impl IntoIterator<Item = Candidate>,
    offset: usize,
    limit: usize,
) -> RankedPage {
    let mut collector = TopDocsCollector::new(offset.saturating_add(limit));
    for candidate in candidates {
        collector.collect(candidate);
    }

    let total_hits = collector.total_hits();
    let hits = collector.into_sorted_vec().into_iter().skip(offset).collect();

    RankedPage {
        hits,
        total_hits,
        offset,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::document::DocumentInput;

    fn candidate(doc_id: u64, id: &str, score: f32, likes: Option<u64>) -> Candidate {
        let mut input = DocumentInput::new(id).date("2023-01-01");
        if let Some(likes) = likes {
            input = input.likes(likes);
        }
        Candidate {
            doc_id,
            document: Arc::new(input.validate().unwrap().document),
            must: Vec::new(),
            should: Vec::new(),
            score,
        }
    }

    fn ids(page: &RankedPage) -> Vec<&str> {
        page.hits.iter().map(|c| c.document.id()).collect()
    }

    #[test]
    fn test_score_then_likes_then_id() {
        let candidates = vec![
            candidate(0, "d", 1.0, Some(5)),
            candidate(1, "c", 2.0, Some(1)),
            candidate(2, "b", 1.0, Some(50)),
            candidate(3, "a", 1.0, None),
            candidate(4, "e", 1.0, Some(5)),
        ];

        let page = rank(candidates, 0, 10);
        assert_eq!(ids(&page), vec!["c", "b", "d", "e", "a"]);
        assert_eq!(page.total_hits, 5);
    }

    #[test]
    fn test_absent_likes_tie_with_zero() {
        let candidates = vec![
            candidate(0, "b", 1.0, Some(0)),
            candidate(1, "a", 1.0, None),
            candidate(2, "c", 1.0, Some(1)),
        ];

        let page = rank(candidates, 0, 10);
        assert_eq!(ids(&page), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_pagination() {
        let candidates: Vec<Candidate> = (0..15)
            .map(|i| candidate(i, &format!("c{i:02}"), i as f32, Some(0)))
            .collect();

        let all = rank(candidates.clone(), 0, 25);
        let second = rank(candidates.clone(), 10, 10);
        assert_eq!(second.hits.len(), 5);
        assert_eq!(ids(&second), ids(&all)[10..].to_vec());

        let beyond = rank(candidates, 30, 10);
        assert!(beyond.hits.is_empty());
        assert_eq!(beyond.total_hits, 15);
    }

    #[test]
    fn test_zero_limit() {
        let page = rank(vec![candidate(0, "a", 1.0, None)], 0, 0);
        assert!(page.hits.is_empty());
        assert_eq!(page.total_hits, 1);
    }
}
