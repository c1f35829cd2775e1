//! Defines the [`Tag`] type, a label attached to content, and [`TagLink`],
//! which pairs a tag with the URL of its listing page.

use gtmpl_value::Value;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// A non-empty tag label. The label is kept exactly as written; it is
/// percent-encoded only when it is placed into a URL.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tag(String);

impl Tag {
    /// Validates `name` and wraps it. Fails with [`Error::InvalidTag`] if the
    /// name is empty or only whitespace.
    pub fn new(name: impl Into<String>) -> Result<Tag> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(Error::InvalidTag(name));
        }
        Ok(Tag(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Tag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Tag::new(s)
    }
}

impl<'de> Deserialize<'de> for Tag {
    /// Deserializes a [`Tag`] from a string, applying the same validation as
    /// [`Tag::new`].
    fn deserialize<D>(deserializer: D) -> std::result::Result<Tag, D::Error>
    where
        D: Deserializer<'de>,
    {
        Tag::new(String::deserialize(deserializer)?)
            .map_err(|e| D::Error::custom(e.to_string()))
    }
}

/// A tag together with the URL of its listing page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagLink {
    pub tag: Tag,
    pub url: String,
}

impl From<&TagLink> for Value {
    /// Converts [`TagLink`]s into [`Value`]s for templating. The result is a
    /// [`Value::Object`] with `tag` and `url` fields.
    fn from(link: &TagLink) -> Value {
        let mut m: HashMap<String, Value> = HashMap::new();
        m.insert("tag".to_owned(), Value::String(link.tag.0.clone()));
        m.insert("url".to_owned(), Value::String(link.url.clone()));
        Value::Object(m)
    }
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for tag construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Returned when a tag label is empty or contains only whitespace.
    InvalidTag(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::InvalidTag(name) => {
                write!(f, "Invalid tag {:?}: tags must not be empty", name)
            }
        }
    }
}

impl std::error::Error for Error {}
