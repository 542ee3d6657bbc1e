//! Marks matched terms in document fields.
//!
//! Highlighting is whole-field: the complete source text of a field is
//! returned with every occurrence of a matched term wrapped in tags. A field
//! without any occurrence gets no snippet, and callers fall back to the raw
//! value.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use ahash::AHashSet;
//! use glaive::analysis::StandardAnalyzer;
//! use glaive::highlight::{HighlightConfig, Highlighter};
//!
//! let highlighter = Highlighter::new(Arc::new(StandardAnalyzer::new()), HighlightConfig::default());
//! let terms: AHashSet<String> = ["great".to_string()].into_iter().collect();
//!
//! let snippet = highlighter.highlight_text("Great video, GREAT fun", &terms).unwrap();
//! assert_eq!(
//!     snippet.as_deref(),
//!     Some("<em>Great</em> video, <em>GREAT</em> fun")
//! );
//! ```

use std::sync::Arc;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::Analyzer;
use crate::document::{Document, FieldMap, TextField};
use crate::error::{GlaiveError, Result};

/// Highlighted snippet per text field, `None` where nothing matched.
pub type Highlights = FieldMap<Option<String>>;

/// Configuration for text highlighting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    /// HTML tag to wrap highlighted terms (e.g., "mark", "em", "strong").
    pub tag: String,
    /// CSS class to add to highlight tags.
    pub css_class: Option<String>,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        HighlightConfig {
            tag: "em".to_string(),
            css_class: None,
        }
    }
}

impl HighlightConfig {
    /// Create a new highlight configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the HTML tag for highlighting.
    pub fn with_tag<S: Into<String>>(mut self, tag: S) -> Self {
        self.tag = tag.into();
        self
    }

    /// Set the CSS class for highlight tags.
    pub fn with_css_class<S: Into<String>>(mut self, css_class: S) -> Self {
        self.css_class = Some(css_class.into());
        self
    }

    /// Build the opening HTML tag.
    pub fn opening_tag(&self) -> String {
        match &self.css_class {
            Some(css_class) => format!("<{} class=\"{}\">", self.tag, css_class),
            None => format!("<{}>", self.tag),
        }
    }

    /// Build the closing HTML tag.
    pub fn closing_tag(&self) -> String {
        format!("</{}>", self.tag)
    }
}

/// Re-analyzes field text to locate matched terms and wraps them in tags.
#[derive(Clone)]
pub struct Highlighter {
    analyzer: Arc<dyn Analyzer>,
    opening_tag: String,
    closing_tag: String,
}

impl Highlighter {
    pub fn new(analyzer: Arc<dyn Analyzer>, config: HighlightConfig) -> Self {
        Highlighter {
            analyzer,
            opening_tag: config.opening_tag(),
            closing_tag: config.closing_tag(),
        }
    }

    /// Highlight the requested fields of a document.
    ///
    /// `matched` holds, per field, the index terms that matched the document.
    pub fn highlight(
        &self,
        document: &Document,
        matched: &FieldMap<AHashSet<String>>,
        fields: &[TextField],
    ) -> Result<Highlights> {
        let mut highlights = Highlights::default();
        for &field in fields {
            let terms = matched.get(field);
            if terms.is_empty() {
                continue;
            }
            highlights.set(field, self.highlight_text(document.text(field), terms)?);
        }
        Ok(highlights)
    }

    /// The whole `text` with occurrences of `terms` marked, or `None` when no
    /// analyzed token of `text` is in `terms`.
    pub fn highlight_text(&self, text: &str, terms: &AHashSet<String>) -> Result<Option<String>> {
        let mut snippet = String::with_capacity(text.len() + 16);
        let mut last = 0;
        let mut found = false;

        for token in self.analyzer.analyze(text)? {
            if !terms.contains(&token.text) {
                continue;
            }
            let (Some(gap), Some(word)) = (
                text.get(last..token.start_offset),
                text.get(token.start_offset..token.end_offset),
            ) else {
                return Err(GlaiveError::analysis(format!(
                    "token '{}' has offsets {}..{} outside the source text",
                    token.text, token.start_offset, token.end_offset
                )));
            };

            snippet.push_str(gap);
            snippet.push_str(&self.opening_tag);
            snippet.push_str(word);
            snippet.push_str(&self.closing_tag);
            last = token.end_offset;
            found = true;
        }

        if !found {
            return Ok(None);
        }
        if let Some(rest) = text.get(last..) {
            snippet.push_str(rest);
        }
        Ok(Some(snippet))
    }
}

impl std::fmt::Debug for Highlighter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Highlighter")
            .field("analyzer", &self.analyzer.name())
            .field("opening_tag", &self.opening_tag)
            .field("closing_tag", &self.closing_tag)
            .finish()
    }
}
