//! Exposes [`build_tag_url`] to templates as the `tag_url` helper. The host
//! build pipeline registers a [`TagUrlHelper`] under [`TagUrlHelper::NAME`]
//! and calls it explicitly while rendering.

use crate::config::SiteConfig;
use crate::content_type::{self, ContentType};
use crate::tag::{self, Tag, TagLink};
use crate::url::{self, build_tag_url};
use gtmpl_value::Value;
use std::fmt;

/// Builds tag URLs from a borrowed, read-only [`SiteConfig`]. A helper is
/// cheap to construct and can be shared between rendering threads.
#[derive(Clone, Copy, Debug)]
pub struct TagUrlHelper<'a> {
    config: &'a SiteConfig,
}

impl<'a> TagUrlHelper<'a> {
    /// The name templates call the helper by.
    pub const NAME: &'static str = "tag_url";

    pub fn new(config: &'a SiteConfig) -> TagUrlHelper<'a> {
        TagUrlHelper { config }
    }

    pub fn url(&self, tag: &Tag, content_type: &ContentType) -> Result<String> {
        let url = build_tag_url(tag, content_type, self.config)?;
        tracing::trace!(%tag, %content_type, %url, "built tag url");
        Ok(url)
    }

    /// Returns a [`TagLink`] for each of `tags`, in order. This is the list
    /// templates iterate over to render a content item's tags.
    pub fn links(
        &self,
        tags: &[Tag],
        content_type: &ContentType,
    ) -> Result<Vec<TagLink>> {
        tags.iter()
            .map(|tag| {
                Ok(TagLink {
                    tag: tag.clone(),
                    url: self.url(tag, content_type)?,
                })
            })
            .collect()
    }

    /// The template-facing entry point: `tag_url TAG [TYPE]`. `TAG` must be
    /// a string. `TYPE` is a content type name and defaults to `page` when it
    /// is absent or nil.
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        let (tag, content_type) = match args {
            [tag] => (tag, None),
            [tag, content_type] => (tag, Some(content_type)),
            _ => {
                return Err(Error::Argument(format!(
                    "{} takes a tag and an optional content type; got {} arguments",
                    Self::NAME,
                    args.len()
                )))
            }
        };

        let tag: Tag = match tag {
            Value::String(s) => s.parse()?,
            _ => return Err(Error::Argument("tag must be a string".to_owned())),
        };
        let content_type: ContentType = match content_type {
            None | Some(Value::Nil) => ContentType::default(),
            Some(Value::String(s)) => s.parse()?,
            Some(_) => {
                return Err(Error::Argument(
                    "content type must be a string".to_owned(),
                ))
            }
        };

        Ok(Value::String(self.url(&tag, &content_type)?))
    }
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for template helper calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Returned when the helper is called with the wrong number or kind of
    /// arguments.
    Argument(String),

    /// Returned when the tag argument is not a valid [`Tag`].
    Tag(tag::Error),

    /// Returned when the content type argument is not a valid
    /// [`ContentType`].
    ContentType(content_type::ParseError),

    /// Returned when the URL can't be built.
    Url(url::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Argument(msg) => write!(f, "Calling `{}`: {}", TagUrlHelper::NAME, msg),
            Error::Tag(err) => err.fmt(f),
            Error::ContentType(err) => err.fmt(f),
            Error::Url(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Argument(_) => None,
            Error::Tag(err) => Some(err),
            Error::ContentType(err) => Some(err),
            Error::Url(err) => Some(err),
        }
    }
}

impl From<tag::Error> for Error {
    /// Converts [`tag::Error`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: tag::Error) -> Error {
        Error::Tag(err)
    }
}

impl From<content_type::ParseError> for Error {
    /// Converts [`content_type::ParseError`]s into [`Error`]. This allows us
    /// to use the `?` operator.
    fn from(err: content_type::ParseError) -> Error {
        Error::ContentType(err)
    }
}

impl From<url::Error> for Error {
    /// Converts [`url::Error`]s into [`Error`]. This allows us to use the `?`
    /// operator.
    fn from(err: url::Error) -> Error {
        Error::Url(err)
    }
}
