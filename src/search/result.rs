//! Search hits and pages as handed to the front end.

use std::sync::Arc;

use crate::document::{Document, TextField};
use crate::highlight::Highlights;

/// Number of decimals in a displayed score.
pub const SCORE_DECIMALS: usize = 3;

/// A search hit: the document, its score and its highlighted fields.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub document: Arc<Document>,
    pub score: f32,
    pub highlights: Highlights,
}

impl SearchHit {
    /// The score with three decimals, rounded half-up.
    pub fn display_score(&self) -> String {
        round_half_up(&self.score.to_string(), SCORE_DECIMALS)
    }

    /// The highlighted snippet of a field, or its raw value.
    pub fn display_field(&self, field: TextField) -> &str {
        self.highlights
            .get(field)
            .as_deref()
            .unwrap_or_else(|| self.document.text(field))
    }

    /// The date as ingested.
    pub fn display_date(&self) -> &str {
        self.document.date_text()
    }

    /// The likes count, empty when unknown.
    pub fn display_likes(&self) -> String {
        self.document
            .likes()
            .map(|likes| likes.to_string())
            .unwrap_or_default()
    }
}

/// One page of results.
#[derive(Debug, Clone)]
pub struct Page {
    pub hits: Vec<SearchHit>,
    /// Number of matching documents over all pages.
    pub total_hits: usize,
    pub offset: usize,
}

impl Page {
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Whether more results follow this page.
    pub fn has_more(&self) -> bool {
        self.offset + self.hits.len() < self.total_hits
    }
}

/// Round a plain decimal string to `scale` fraction digits, half-up.
///
/// Inputs that are not plain decimals (`NaN`, `inf`) are returned unchanged.
pub fn round_half_up(decimal: &str, scale: usize) -> String {
    let (negative, magnitude) = match decimal.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, decimal),
    };
    let (int_part, frac_part) = magnitude.split_once('.').unwrap_or((magnitude, ""));
    if int_part.is_empty()
        || !int_part.bytes().all(|b| b.is_ascii_digit())
        || !frac_part.bytes().all(|b| b.is_ascii_digit())
    {
        return decimal.to_string();
    }

    let mut digits: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().chain(std::iter::repeat(b'0')).take(scale))
        .map(|b| b - b'0')
        .collect();

    if frac_part.as_bytes().get(scale).is_some_and(|&b| b >= b'5') {
        let mut carry = true;
        for digit in digits.iter_mut().rev() {
            if *digit == 9 {
                *digit = 0;
            } else {
                *digit += 1;
                carry = false;
                break;
            }
        }
        if carry {
            digits.insert(0, 1);
        }
    }

    let split = digits.len() - scale;
    let int_digits = digits[..split]
        .iter()
        .skip_while(|&&d| d == 0)
        .map(|d| char::from(b'0' + d))
        .collect::<String>();
    let frac_digits: String = digits[split..].iter().map(|d| char::from(b'0' + d)).collect();

    let is_zero = digits.iter().all(|&d| d == 0);
    let mut out = String::new();
    if negative && !is_zero {
        out.push('-');
    }
    out.push_str(if int_digits.is_empty() { "0" } else { &int_digits });
    if scale > 0 {
        out.push('.');
        out.push_str(&frac_digits);
    }
    out
}
