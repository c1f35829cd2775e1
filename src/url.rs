//! Builds the URLs of tag listing pages. See [`build_tag_url`].

use crate::config::{PermalinkStyle, SiteConfig};
use crate::content_type::ContentType;
use crate::tag::Tag;
use std::fmt;
use url::Url;

const HTML_EXTENSION: &str = ".html";

/// Returns the root-relative URL of the listing page for `tag` under
/// `content_type`, e.g. `/blog/topics/c%2B%2B.html`.
///
/// The URL is made of `baseurl`, the content type's tag directory and the
/// percent-encoded tag, joined by single slashes. Pretty permalinks end in
/// `/`; otherwise the URL ends in `.html`. Fails with
/// [`Error::ConfigurationMissing`] rather than emitting an empty directory
/// segment when the content type has no tag directory.
pub fn build_tag_url(
    tag: &Tag,
    content_type: &ContentType,
    config: &SiteConfig,
) -> Result<String> {
    let dir = config
        .tag_dir(content_type)
        .ok_or_else(|| Error::ConfigurationMissing(content_type.clone()))?;

    let encoded = encode_segment(tag.as_str());
    let mut url = join_segments(&[config.baseurl.as_str(), dir, &encoded]);
    match config.effective_tag_style() {
        PermalinkStyle::Pretty => url.push('/'),
        PermalinkStyle::Default => url.push_str(HTML_EXTENSION),
    }
    Ok(url)
}

/// Like [`build_tag_url`], but prefixed with the site's configured `url`
/// origin.
pub fn absolute_tag_url(
    tag: &Tag,
    content_type: &ContentType,
    config: &SiteConfig,
) -> Result<Url> {
    let site_url = config.url.as_ref().ok_or(Error::MissingSiteUrl)?;
    let joined = format!(
        "{}{}",
        site_url.as_str().trim_end_matches('/'),
        build_tag_url(tag, content_type, config)?
    );
    Url::parse(&joined).map_err(|err| Error::InvalidSiteUrl { url: joined, err })
}

// Percent-encodes a tag for use as a path segment. Dots are unreserved, so a
// tag made only of dots is escaped by hand to keep `.` and `..` from becoming
// dot-segments.
fn encode_segment(tag: &str) -> String {
    if tag.chars().all(|c| c == '.') {
        return tag.replace('.', "%2E");
    }
    urlencoding::encode(tag).into_owned()
}

// Joins path fragments into a single root-relative path. Fragments may carry
// their own slashes; empty pieces are dropped so the result never contains
// `//`.
fn join_segments(fragments: &[&str]) -> String {
    let mut path = String::new();
    for segment in fragments
        .iter()
        .flat_map(|fragment| fragment.split('/'))
        .filter(|segment| !segment.is_empty())
    {
        path.push('/');
        path.push_str(segment);
    }
    if path.is_empty() {
        path.push('/');
    }
    path
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for building tag URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Returned when the content type has no `tag_<type>_dir` entry.
    ConfigurationMissing(ContentType),

    /// Returned by [`absolute_tag_url`] when the site has no `url`.
    MissingSiteUrl,

    /// Returned by [`absolute_tag_url`] when the site `url` and the tag path
    /// don't form a valid URL.
    InvalidSiteUrl { url: String, err: url::ParseError },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::ConfigurationMissing(content_type) => write!(
                f,
                "Missing configuration key `{}` for {} tags",
                content_type.config_key(),
                content_type
            ),
            Error::MissingSiteUrl => {
                f.write_str("Absolute tag URLs require the site `url` setting")
            }
            Error::InvalidSiteUrl { url, err } => {
                write!(f, "Invalid tag URL '{}': {}", url, err)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidSiteUrl { url: _, err } => Some(err),
            Error::ConfigurationMissing(_) | Error::MissingSiteUrl => None,
        }
    }
}
