//! Text analysis module for Glaive.
//!
//! Analysis turns raw field text into normalized terms. The same pipeline is
//! used at index time and at query time, so case and punctuation differences
//! never affect matching:
//!
//! ```text
//! Raw Text → Tokenizer → LowercaseFilter → StopFilter → Terms
//! ```

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

pub use analyzer::{Analyzer, PipelineAnalyzer, StandardAnalyzer};
pub use token::{Token, TokenStream};
pub use token_filter::{Filter, LowercaseFilter, StopFilter};
pub use tokenizer::{Tokenizer, UnicodeWordTokenizer};
