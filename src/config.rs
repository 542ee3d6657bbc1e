//! Engine configuration.
//!
//! Every section falls back to its defaults for keys missing from a
//! configuration file, so a partial JSON document is a valid configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GlaiveError, Result};
use crate::query::fuzzy::Fuzziness;

pub use crate::highlight::HighlightConfig;

/// Configuration for the search engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Name of the index generation.
    pub index_name: String,

    /// Number of results per page.
    pub page_size: usize,

    /// Documents applied per write-lock hold during batch indexing.
    pub batch_chunk_size: usize,

    /// Fuzzy expansion settings.
    pub fuzzy: FuzzyConfig,

    /// Relevance scoring settings.
    pub scoring: ScoringConfig,

    /// Highlight markup.
    pub highlight: HighlightConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            index_name: "yt-comment-index".to_string(),
            page_size: 10,
            batch_chunk_size: 256,
            fuzzy: FuzzyConfig::default(),
            scoring: ScoringConfig::default(),
            highlight: HighlightConfig::default(),
        }
    }
}

/// Fuzzy expansion settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuzzyConfig {
    /// Edit distance policy for query terms.
    pub fuzziness: Fuzziness,

    /// Maximum number of index terms a single query term expands to.
    pub max_expansions: usize,
}

impl Default for FuzzyConfig {
    fn default() -> Self {
        Self {
            fuzziness: Fuzziness::Auto,
            max_expansions: 50,
        }
    }
}

/// Relevance scoring settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Weight applied to `should` contributions, in (0, 1).
    pub should_weight: f32,

    /// Lower bound on inverse document frequency.
    pub idf_floor: f32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            should_weight: 0.5,
            idf_floor: 0.01,
        }
    }
}

impl EngineConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_index_name<S: Into<String>>(mut self, index_name: S) -> Self {
        self.index_name = index_name.into();
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_batch_chunk_size(mut self, batch_chunk_size: usize) -> Self {
        self.batch_chunk_size = batch_chunk_size;
        self
    }

    pub fn with_fuzzy(mut self, fuzzy: FuzzyConfig) -> Self {
        self.fuzzy = fuzzy;
        self
    }

    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn with_highlight(mut self, highlight: HighlightConfig) -> Self {
        self.highlight = highlight;
        self
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serialize this configuration to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<()> {
        if self.index_name.trim().is_empty() {
            return Err(GlaiveError::invalid_config("index_name must not be empty"));
        }
        if self.page_size == 0 {
            return Err(GlaiveError::invalid_config("page_size must be at least 1"));
        }
        if self.batch_chunk_size == 0 {
            return Err(GlaiveError::invalid_config(
                "batch_chunk_size must be at least 1",
            ));
        }
        if self.fuzzy.max_expansions == 0 {
            return Err(GlaiveError::invalid_config(
                "fuzzy.max_expansions must be at least 1",
            ));
        }

        let should_weight = self.scoring.should_weight;
        if !(should_weight > 0.0 && should_weight < 1.0) {
            return Err(GlaiveError::invalid_config(format!(
                "scoring.should_weight must be in (0, 1), got {should_weight}"
            )));
        }
        let idf_floor = self.scoring.idf_floor;
        if !(idf_floor.is_finite() && idf_floor > 0.0) {
            return Err(GlaiveError::invalid_config(format!(
                "scoring.idf_floor must be positive, got {idf_floor}"
            )));
        }
        if self.highlight.tag.trim().is_empty() {
            return Err(GlaiveError::invalid_config("highlight.tag must not be empty"));
        }

        Ok(())
    }
}
