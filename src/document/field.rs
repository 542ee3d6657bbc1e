//! The closed set of analyzed text fields.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GlaiveError, Result};

/// An analyzed, queryable text field of a comment document.
///
/// Wire names match the column names used by ingestion and by the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TextField {
    /// Title of the video the comment was posted on.
    VideoName,
    /// Name of the channel that published the video.
    ChannelName,
    /// Name of the comment author.
    UserName,
    /// The comment text itself.
    Comment,
}

impl TextField {
    /// Number of text fields.
    pub const COUNT: usize = 4;

    /// Every text field, in index order.
    pub const ALL: [TextField; TextField::COUNT] = [
        TextField::VideoName,
        TextField::ChannelName,
        TextField::UserName,
        TextField::Comment,
    ];

    /// Fields searched by the free-text `must` clause.
    pub const QUERYABLE: [TextField; 3] = [
        TextField::VideoName,
        TextField::ChannelName,
        TextField::Comment,
    ];

    /// Field searched by the author `should` clause.
    pub const AUTHOR: TextField = TextField::UserName;

    /// Wire name of this field.
    pub fn name(self) -> &'static str {
        match self {
            TextField::VideoName => "VideoName",
            TextField::ChannelName => "ChannelName",
            TextField::UserName => "UserName",
            TextField::Comment => "Comment",
        }
    }

    /// Look a field up by its wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        TextField::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Dense index of this field, used by [`FieldMap`].
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for TextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TextField {
    type Err = GlaiveError;

    fn from_str(s: &str) -> Result<Self> {
        TextField::from_name(s).ok_or_else(|| GlaiveError::query(format!("unknown field '{s}'")))
    }
}

/// A fixed-size map with one slot per [`TextField`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldMap<T> {
    slots: [T; TextField::COUNT],
}

impl<T> FieldMap<T> {
    /// Build a map by computing each slot from its field.
    pub fn from_fn<F: FnMut(TextField) -> T>(mut f: F) -> Self {
        FieldMap {
            slots: TextField::ALL.map(&mut f),
        }
    }

    /// Get the value for a field.
    pub fn get(&self, field: TextField) -> &T {
        &self.slots[field.index()]
    }

    /// Get a mutable reference to the value for a field.
    pub fn get_mut(&mut self, field: TextField) -> &mut T {
        &mut self.slots[field.index()]
    }

    /// Replace the value for a field.
    pub fn set(&mut self, field: TextField, value: T) {
        self.slots[field.index()] = value;
    }

    /// Iterate over `(field, value)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (TextField, &T)> {
        TextField::ALL.into_iter().zip(self.slots.iter())
    }
}
