//! Defines the [`ContentType`] classifier, which selects the directory that
//! tag listing pages live under.

use std::fmt;
use std::str::FromStr;

const TAG_DIR_PREFIX: &str = "tag_";
const TAG_DIR_SUFFIX: &str = "_dir";

/// The kind of content a tag was attached to. Each content type has its own
/// tag listing directory, configured under the `tag_<type>_dir` key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContentType {
    /// Regular pages. This is the default content type.
    Page,

    /// Blog posts.
    Post,

    /// Any other taxonomy the site defines, e.g. `feed` for `tag_feed_dir`.
    /// Never holds `page` or `post`; parsing maps those to the named
    /// variants.
    Custom(String),
}

impl Default for ContentType {
    fn default() -> Self {
        ContentType::Page
    }
}

impl ContentType {
    /// The name used in configuration keys and on the command line.
    pub fn name(&self) -> &str {
        match self {
            ContentType::Page => "page",
            ContentType::Post => "post",
            ContentType::Custom(name) => name,
        }
    }

    /// The configuration key holding this type's tag directory.
    pub fn config_key(&self) -> String {
        format!("{}{}{}", TAG_DIR_PREFIX, self.name(), TAG_DIR_SUFFIX)
    }

    /// Recognizes a `tag_<type>_dir` configuration key and returns the
    /// content type it configures, or `None` for any other key.
    pub fn from_config_key(key: &str) -> Option<ContentType> {
        key.strip_prefix(TAG_DIR_PREFIX)
            .and_then(|rest| rest.strip_suffix(TAG_DIR_SUFFIX))
            .and_then(|name| name.parse().ok())
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ContentType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Err(ParseError),
            "page" => Ok(ContentType::Page),
            "post" => Ok(ContentType::Post),
            other => Ok(ContentType::Custom(other.to_owned())),
        }
    }
}

/// Returned when parsing an empty content type name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError;

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("content type name must not be empty")
    }
}

impl std::error::Error for ParseError {}
