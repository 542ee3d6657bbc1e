//! Document model for the comment index.
//!
//! Documents follow a fixed schema: four analyzed text fields, a date and a
//! likes counter, keyed by the comment id. Ingestion hands over raw
//! [`DocumentInput`] records which are validated into immutable
//! [`Document`]s.

pub mod date;
#[allow(clippy::module_inception)]
pub mod document;
pub mod field;

pub use self::document::{Document, DocumentInput, IngestWarning, Validated};
pub use self::field::{FieldMap, TextField};
