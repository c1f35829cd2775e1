//! The library code for `tagurl`, which builds the URLs of tag listing pages
//! for a static site. A tag's URL depends on three things:
//!
//! 1. The tag itself ([`crate::tag`]), which is percent-encoded into the last
//!    path segment
//! 2. The content type the tag was attached to ([`crate::content_type`]),
//!    which selects the `tag_<type>_dir` directory the listing page lives in
//! 3. The site configuration ([`crate::config`]), which supplies `baseurl`,
//!    the tag directories, and the permalink style
//!
//! [`crate::url::build_tag_url`] combines them. Pretty permalinks end in a
//! trailing slash (`/blog/topics/rust/`) and default permalinks in `.html`
//! (`/blog/topics/rust.html`). Templates reach the same function through the
//! `tag_url` helper in [`crate::helper`].

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod config;
pub mod content_type;
pub mod helper;
pub mod logging;
pub mod tag;
pub mod url;
