//! Error types for the Glaive library.
//!
//! All errors are represented by the [`GlaiveError`] enum. Every error names
//! the identifier it failed on (index, document id or query input) together
//! with the reason.
//!
//! # Examples
//!
//! ```
//! use glaive::error::{GlaiveError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(GlaiveError::query("unparseable date 'yesterday'"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for Glaive operations.
#[derive(Error, Debug)]
pub enum GlaiveError {
    /// An index or document that the operation requires is absent.
    #[error("Not found: {0}")]
    NotFound(String),

    /// `create` was called on an index that is already live.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// A required document field is missing or malformed.
    #[error("Validation error for document '{id}': {reason}")]
    Validation {
        /// Identifier of the rejected document.
        id: String,
        /// Why the document was rejected.
        reason: String,
    },

    /// Query-related errors (malformed filter ranges and the like).
    #[error("Query error: {0}")]
    Query(String),

    /// Analysis-related errors (tokenization, filtering).
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Invalid engine configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors (reading configuration files).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with GlaiveError.
pub type Result<T> = std::result::Result<T, GlaiveError>;

impl GlaiveError {
    /// Create a new not found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        GlaiveError::NotFound(msg.into())
    }

    /// Create a new already exists error.
    pub fn already_exists<S: Into<String>>(msg: S) -> Self {
        GlaiveError::AlreadyExists(msg.into())
    }

    /// Create a new validation error for the given document id.
    pub fn validation<I: Into<String>, R: Into<String>>(id: I, reason: R) -> Self {
        GlaiveError::Validation {
            id: id.into(),
            reason: reason.into(),
        }
    }

    /// Create a new query error.
    pub fn query<S: Into<String>>(msg: S) -> Self {
        GlaiveError::Query(msg.into())
    }

    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        GlaiveError::Analysis(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        GlaiveError::Config(msg.into())
    }
}
