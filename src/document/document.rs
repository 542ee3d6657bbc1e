//! Comment documents and the raw records ingestion produces.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::date::parse_date;
use crate::document::field::{FieldMap, TextField};
use crate::error::{GlaiveError, Result};

/// An indexed comment.
///
/// Documents are immutable once indexed; re-indexing the same id replaces the
/// whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    id: String,
    texts: FieldMap<String>,
    date: DateTime<Utc>,
    date_text: String,
    likes: Option<u64>,
}

impl Document {
    /// The comment id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Raw text of a field (empty when the record did not carry it).
    pub fn text(&self, field: TextField) -> &str {
        self.texts.get(field)
    }

    /// All text fields.
    pub fn texts(&self) -> &FieldMap<String> {
        &self.texts
    }

    /// Posting date as a UTC instant.
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Posting date as ingested.
    pub fn date_text(&self) -> &str {
        &self.date_text
    }

    /// Number of likes, `None` when absent or unparseable at ingestion.
    pub fn likes(&self) -> Option<u64> {
        self.likes
    }

    /// Likes as compared by filters and sorting: absent likes count as zero.
    pub fn likes_or_zero(&self) -> u64 {
        self.likes.unwrap_or_default()
    }
}

/// A raw record handed over by ingestion.
///
/// Text fields are keyed by their wire name and likes are kept as the raw
/// string read upstream; [`DocumentInput::validate`] decides what survives.
///
/// # Examples
///
/// ```
/// use glaive::document::{DocumentInput, TextField};
///
/// let validated = DocumentInput::new("c-1")
///     .text(TextField::Comment, "great video, loved it")
///     .field("UserName", "alice")
///     .date("2023-01-01")
///     .likes_raw("n/a")
///     .validate()
///     .unwrap();
///
/// assert_eq!(validated.document.likes(), None);
/// assert_eq!(validated.warnings.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInput {
    /// Comment id.
    pub id: String,
    /// Text fields keyed by wire name.
    #[serde(default)]
    pub texts: BTreeMap<String, String>,
    /// Raw ISO-8601 date.
    #[serde(default)]
    pub date: Option<String>,
    /// Raw likes count.
    #[serde(default)]
    pub likes: Option<String>,
}

impl DocumentInput {
    /// Start a record for the given comment id.
    pub fn new<S: Into<String>>(id: S) -> Self {
        DocumentInput {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Set a known text field.
    pub fn text<S: Into<String>>(self, field: TextField, value: S) -> Self {
        self.field(field.name(), value)
    }

    /// Set a text field by wire name.
    pub fn field<N: Into<String>, S: Into<String>>(mut self, name: N, value: S) -> Self {
        self.texts.insert(name.into(), value.into());
        self
    }

    /// Set the raw date.
    pub fn date<S: Into<String>>(mut self, date: S) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Set the likes count.
    pub fn likes(mut self, likes: u64) -> Self {
        self.likes = Some(likes.to_string());
        self
    }

    /// Set the likes count as read upstream, possibly malformed.
    pub fn likes_raw<S: Into<String>>(mut self, likes: S) -> Self {
        self.likes = Some(likes.into());
        self
    }

    /// Validate this record into a [`Document`].
    ///
    /// A missing id or a missing/unparseable date rejects the record. A
    /// malformed likes count or an unknown field only degrades it and is
    /// reported in [`Validated::warnings`].
    pub fn validate(self) -> Result<Validated> {
        let id = self.id.trim().to_string();
        if id.is_empty() {
            return Err(GlaiveError::validation("", "missing comment id"));
        }

        let date_text = match self.date {
            Some(date) if !date.trim().is_empty() => date,
            _ => return Err(GlaiveError::validation(&id, "missing required field 'Date'")),
        };
        let date = parse_date(&date_text).ok_or_else(|| {
            GlaiveError::validation(&id, format!("unparseable Date '{date_text}'"))
        })?;

        let mut warnings = Vec::new();

        let mut texts: FieldMap<String> = FieldMap::default();
        for (name, value) in self.texts {
            match TextField::from_name(&name) {
                Some(field) => texts.set(field, value),
                None => warnings.push(IngestWarning::UnknownField {
                    id: id.clone(),
                    field: name,
                }),
            }
        }

        let likes = match self.likes {
            None => None,
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(value) if value >= 0 => Some(value as u64),
                Ok(value) => {
                    warnings.push(IngestWarning::NegativeLikes {
                        id: id.clone(),
                        value,
                    });
                    None
                }
                Err(_) => {
                    warnings.push(IngestWarning::UnparseableLikes {
                        id: id.clone(),
                        raw,
                    });
                    None
                }
            },
        };

        Ok(Validated {
            document: Document {
                id,
                texts,
                date,
                date_text,
                likes,
            },
            warnings,
        })
    }
}

/// A validated document plus the degradations applied to it.
#[derive(Debug, Clone)]
pub struct Validated {
    /// The document to index.
    pub document: Document,
    /// Fields dropped or ignored while validating.
    pub warnings: Vec<IngestWarning>,
}

/// A field that was dropped during ingestion without rejecting the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IngestWarning {
    /// The likes count did not parse as an integer.
    UnparseableLikes { id: String, raw: String },
    /// The likes count was negative.
    NegativeLikes { id: String, value: i64 },
    /// The record carried a text field outside the schema.
    UnknownField { id: String, field: String },
}

impl IngestWarning {
    /// Id of the degraded document.
    pub fn id(&self) -> &str {
        match self {
            IngestWarning::UnparseableLikes { id, .. }
            | IngestWarning::NegativeLikes { id, .. }
            | IngestWarning::UnknownField { id, .. } => id,
        }
    }
}

impl fmt::Display for IngestWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestWarning::UnparseableLikes { id, raw } => {
                write!(f, "document '{id}': failed to parse likes from '{raw}'")
            }
            IngestWarning::NegativeLikes { id, value } => {
                write!(f, "document '{id}': negative likes {value}")
            }
            IngestWarning::UnknownField { id, field } => {
                write!(f, "document '{id}': unknown field '{field}' ignored")
            }
        }
    }
}
