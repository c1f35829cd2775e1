//! Defines [`SiteConfig`], the site settings that tag URLs are built from,
//! and the logic for loading it from a Jekyll-style `_config.yml` file.

use crate::content_type::ContentType;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// The name of the site configuration file searched for by
/// [`SiteConfig::from_directory`].
pub const CONFIG_FILE_NAME: &str = "_config.yml";

const PRETTY: &str = "pretty";

/// The URL-formatting convention for generated pages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PermalinkStyle {
    /// Directory URLs with a trailing slash, e.g. `/tags/ruby/`.
    Pretty,

    /// File URLs with an `.html` extension, e.g. `/tags/ruby.html`.
    Default,
}

impl Default for PermalinkStyle {
    fn default() -> Self {
        PermalinkStyle::Default
    }
}

impl PermalinkStyle {
    /// Maps a configured value to a style. Only the exact string `pretty`
    /// selects [`PermalinkStyle::Pretty`]; permalink patterns such as `date`
    /// or `/:categories/:title` are all [`PermalinkStyle::Default`].
    pub fn from_config_value(value: &str) -> PermalinkStyle {
        if value == PRETTY {
            PermalinkStyle::Pretty
        } else {
            PermalinkStyle::Default
        }
    }
}

// The raw shape of `_config.yml`. Tag directories are spread over any number
// of `tag_<type>_dir` keys, so everything else is collected in `rest`.
#[derive(Default, Deserialize)]
struct Project {
    #[serde(default)]
    baseurl: Option<String>,

    #[serde(default)]
    url: Option<String>,

    #[serde(default)]
    permalink: Option<String>,

    #[serde(default)]
    tag_permalink_style: Option<String>,

    #[serde(flatten)]
    rest: HashMap<String, serde_yaml::Value>,
}

/// The read-only site settings used to build tag URLs. Tag directories are
/// resolved into an explicit [`ContentType`] mapping when the configuration
/// is constructed, so no configuration keys are assembled at render time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SiteConfig {
    /// The root path prefix for every URL on the site. May be empty.
    pub baseurl: String,

    /// The absolute site origin, e.g. `https://example.org`. Only needed for
    /// absolute tag URLs.
    pub url: Option<Url>,

    /// The site's global permalink style, from the `permalink` key.
    pub permalink_style: PermalinkStyle,

    /// The tag-specific style override, from the `tag_permalink_style` key.
    pub tag_permalink_style: Option<PermalinkStyle>,

    /// The tag listing directory for each configured content type.
    pub tag_dirs: BTreeMap<ContentType, String>,
}

impl SiteConfig {
    pub fn new(baseurl: impl Into<String>) -> SiteConfig {
        SiteConfig {
            baseurl: baseurl.into(),
            ..SiteConfig::default()
        }
    }

    pub fn with_tag_dir(
        mut self,
        content_type: ContentType,
        dir: impl Into<String>,
    ) -> SiteConfig {
        self.tag_dirs.insert(content_type, dir.into());
        self
    }

    pub fn with_permalink_style(mut self, style: PermalinkStyle) -> SiteConfig {
        self.permalink_style = style;
        self
    }

    pub fn with_tag_permalink_style(
        mut self,
        style: PermalinkStyle,
    ) -> SiteConfig {
        self.tag_permalink_style = Some(style);
        self
    }

    pub fn with_url(mut self, url: Url) -> SiteConfig {
        self.url = Some(url);
        self
    }

    /// Returns the tag listing directory for `content_type`, if configured.
    pub fn tag_dir(&self, content_type: &ContentType) -> Option<&str> {
        self.tag_dirs.get(content_type).map(String::as_str)
    }

    /// The style tag URLs are rendered in: pretty if either the global style
    /// or the tag-specific override is pretty.
    pub fn effective_tag_style(&self) -> PermalinkStyle {
        if self.permalink_style == PermalinkStyle::Pretty
            || self.tag_permalink_style == Some(PermalinkStyle::Pretty)
        {
            PermalinkStyle::Pretty
        } else {
            PermalinkStyle::Default
        }
    }

    /// Checks that every content type in `content_types` has a tag
    /// directory. Hosts call this after loading so that a missing directory
    /// fails the build before any page is rendered.
    pub fn require_tag_dirs(&self, content_types: &[ContentType]) -> Result<()> {
        let missing: Vec<ContentType> = content_types
            .iter()
            .filter(|content_type| !self.tag_dirs.contains_key(content_type))
            .cloned()
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(Error::MissingTagDirs(missing))
        }
    }

    /// Parses a [`SiteConfig`] from YAML text. Empty text is an empty
    /// configuration.
    pub fn from_yaml_str(input: &str) -> Result<SiteConfig> {
        if input.trim().is_empty() {
            return SiteConfig::from_project(Project::default());
        }
        SiteConfig::from_project(serde_yaml::from_str(input)?)
    }

    /// Opens and parses the configuration file at `path`.
    pub fn from_file(path: &Path) -> Result<SiteConfig> {
        let input = fs::read_to_string(path).map_err(|err| Error::Open {
            path: path.to_owned(),
            err,
        })?;
        let config = SiteConfig::from_yaml_str(&input)?;
        tracing::debug!(
            path = %path.display(),
            tag_dirs = config.tag_dirs.len(),
            "loaded site configuration"
        );
        Ok(config)
    }

    /// Looks for [`CONFIG_FILE_NAME`] in `dir` and then in each of its
    /// ancestors, and loads the first one found.
    pub fn from_directory(dir: &Path) -> Result<SiteConfig> {
        fn search(start: &Path, dir: &Path) -> Result<SiteConfig> {
            let path = dir.join(CONFIG_FILE_NAME);
            if path.is_file() {
                return SiteConfig::from_file(&path);
            }
            match dir.parent() {
                Some(parent) => search(start, parent),
                None => Err(Error::NotFound(start.to_owned())),
            }
        }
        search(dir, dir)
    }

    fn from_project(project: Project) -> Result<SiteConfig> {
        let mut tag_dirs = BTreeMap::new();
        for (key, value) in project.rest {
            if let Some(content_type) = ContentType::from_config_key(&key) {
                let dir = match value {
                    serde_yaml::Value::String(dir) => dir,
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    _ => return Err(Error::InvalidTagDir { key }),
                };
                tag_dirs.insert(content_type, dir);
            }
        }

        let url = match project.url {
            Some(value) if !value.trim().is_empty() => {
                Some(Url::parse(&value).map_err(|err| Error::InvalidUrl {
                    value: value.clone(),
                    err,
                })?)
            }
            _ => None,
        };

        Ok(SiteConfig {
            baseurl: project.baseurl.unwrap_or_default(),
            url,
            permalink_style: project
                .permalink
                .as_deref()
                .map(PermalinkStyle::from_config_value)
                .unwrap_or_default(),
            tag_permalink_style: project
                .tag_permalink_style
                .as_deref()
                .map(PermalinkStyle::from_config_value),
            tag_dirs,
        })
    }
}

type Result<T> = std::result::Result<T, Error>;

/// The error type for loading a [`SiteConfig`].
#[derive(Debug)]
pub enum Error {
    /// Returned for I/O problems while opening the configuration file.
    Open { path: PathBuf, err: std::io::Error },

    /// Returned when the configuration is not valid YAML or has the wrong
    /// shape.
    Parse(serde_yaml::Error),

    /// Returned when a `tag_<type>_dir` key holds something other than a
    /// scalar, or is null.
    InvalidTagDir { key: String },

    /// Returned when the `url` key is not an absolute URL.
    InvalidUrl { value: String, err: url::ParseError },

    /// Returned when no configuration file exists in the searched directory
    /// or any of its ancestors.
    NotFound(PathBuf),

    /// Returned by [`SiteConfig::require_tag_dirs`] for the content types
    /// that have no tag directory.
    MissingTagDirs(Vec<ContentType>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Open { path, err } => write!(
                f,
                "Opening configuration file '{}': {}",
                path.display(),
                err
            ),
            Error::Parse(err) => write!(f, "Parsing configuration: {}", err),
            Error::InvalidTagDir { key } => {
                write!(f, "Configuration key `{}` must be a string, number or boolean", key)
            }
            Error::InvalidUrl { value, err } => {
                write!(f, "Invalid site url '{}': {}", value, err)
            }
            Error::NotFound(dir) => write!(
                f,
                "Could not find `{}` in '{}' or any parent directory",
                CONFIG_FILE_NAME,
                dir.display()
            ),
            Error::MissingTagDirs(content_types) => {
                let keys: Vec<String> =
                    content_types.iter().map(ContentType::config_key).collect();
                write!(f, "Missing configuration keys: {}", keys.join(", "))
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Open { path: _, err } => Some(err),
            Error::Parse(err) => Some(err),
            Error::InvalidUrl { value: _, err } => Some(err),
            Error::InvalidTagDir { .. }
            | Error::NotFound(_)
            | Error::MissingTagDirs(_) => None,
        }
    }
}

impl From<serde_yaml::Error> for Error {
    /// Converts [`serde_yaml::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: serde_yaml::Error) -> Error {
        Error::Parse(err)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    #[test]
    fn test_from_yaml_collects_tag_dirs() -> Result<()> {
        let config = SiteConfig::from_yaml_str(
            "baseurl: /blog\n\
             tag_page_dir: tags\n\
             tag_post_dir: topics\n\
             tag_feed_dir: feeds\n\
             title: My Blog\n",
        )?;
        assert_eq!("/blog", config.baseurl);
        assert_eq!(Some("tags"), config.tag_dir(&ContentType::Page));
        assert_eq!(Some("topics"), config.tag_dir(&ContentType::Post));
        assert_eq!(
            Some("feeds"),
            config.tag_dir(&ContentType::Custom("feed".to_owned()))
        );
        assert_eq!(3, config.tag_dirs.len());
        Ok(())
    }

    #[test]
    fn test_from_yaml_defaults() -> Result<()> {
        let config = SiteConfig::from_yaml_str("title: My Blog\n")?;
        assert_eq!("", config.baseurl);
        assert_eq!(None, config.url);
        assert_eq!(PermalinkStyle::Default, config.permalink_style);
        assert_eq!(None, config.tag_permalink_style);
        assert!(config.tag_dirs.is_empty());
        Ok(())
    }

    #[test]
    fn test_from_yaml_null_baseurl() -> Result<()> {
        let config = SiteConfig::from_yaml_str("baseurl:\ntag_page_dir: tags\n")?;
        assert_eq!("", config.baseurl);
        Ok(())
    }

    #[test]
    fn test_from_yaml_permalink_styles() -> Result<()> {
        let config = SiteConfig::from_yaml_str("permalink: pretty\n")?;
        assert_eq!(PermalinkStyle::Pretty, config.permalink_style);

        let config = SiteConfig::from_yaml_str("permalink: /:categories/:title\n")?;
        assert_eq!(PermalinkStyle::Default, config.permalink_style);

        let config = SiteConfig::from_yaml_str("tag_permalink_style: pretty\n")?;
        assert_eq!(Some(PermalinkStyle::Pretty), config.tag_permalink_style);
        Ok(())
    }

    #[test]
    fn test_from_yaml_rejects_non_string_tag_dir() {
        match SiteConfig::from_yaml_str("tag_page_dir: [a, b]\n") {
            Err(Error::InvalidTagDir { key }) => assert_eq!("tag_page_dir", key),
            other => panic!("wanted InvalidTagDir; found {:?}", other),
        }
    }

    #[test]
    fn test_from_yaml_scalar_tag_dirs_become_strings() -> Result<()> {
        let config = SiteConfig::from_yaml_str(
            "tag_page_dir: 2021\n\
             tag_post_dir: true\n\
             baseurl: 2021\n",
        )?;
        assert_eq!(Some("2021"), config.tag_dir(&ContentType::Page));
        assert_eq!(Some("true"), config.tag_dir(&ContentType::Post));
        assert_eq!("2021", config.baseurl);
        Ok(())
    }

    #[test]
    fn test_numeric_tag_dir_builds_url() -> Result<()> {
        use crate::tag::Tag;
        use crate::url::build_tag_url;

        let config = SiteConfig::from_yaml_str("tag_page_dir: 2021\n")?;
        assert_eq!(
            Ok("/2021/ruby.html".to_owned()),
            build_tag_url(&Tag::new("ruby").unwrap(), &ContentType::Page, &config)
        );
        Ok(())
    }

    #[test]
    fn test_from_yaml_empty_input_is_empty_config() -> Result<()> {
        for input in &["", "  \n\t\n"] {
            let config = SiteConfig::from_yaml_str(input)?;
            assert_eq!(SiteConfig::default(), config);
            assert!(matches!(
                config.require_tag_dirs(&[ContentType::Page]),
                Err(Error::MissingTagDirs(_))
            ));
        }
        Ok(())
    }

    #[test]
    fn test_from_file_empty_file() -> Result<()> {
        let root = scratch_dir("from_file_empty_file");
        let path = root.join(CONFIG_FILE_NAME);
        fs::write(&path, "").unwrap();

        assert_eq!(SiteConfig::default(), SiteConfig::from_file(&path)?);

        fs::remove_dir_all(&root).unwrap();
        Ok(())
    }

    #[test]
    fn test_from_yaml_rejects_null_tag_dir() {
        match SiteConfig::from_yaml_str("tag_page_dir:\n") {
            Err(Error::InvalidTagDir { key }) => assert_eq!("tag_page_dir", key),
            other => panic!("wanted InvalidTagDir; found {:?}", other),
        }
    }

    #[test]
    fn test_from_yaml_site_url() -> Result<()> {
        let config = SiteConfig::from_yaml_str("url: https://example.org\n")?;
        assert_eq!(
            Some("https://example.org/"),
            config.url.as_ref().map(Url::as_str)
        );

        let config = SiteConfig::from_yaml_str("url: ''\n")?;
        assert_eq!(None, config.url);
        Ok(())
    }

    #[test]
    fn test_from_yaml_rejects_relative_site_url() {
        match SiteConfig::from_yaml_str("url: example.org\n") {
            Err(Error::InvalidUrl { value, .. }) => assert_eq!("example.org", value),
            other => panic!("wanted InvalidUrl; found {:?}", other),
        }
    }

    #[test]
    fn test_from_yaml_rejects_malformed_yaml() {
        assert!(matches!(
            SiteConfig::from_yaml_str("baseurl: [unclosed\n"),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_effective_tag_style_is_or_of_both_flags() {
        let base = SiteConfig::new("");
        assert_eq!(PermalinkStyle::Default, base.effective_tag_style());
        assert_eq!(
            PermalinkStyle::Pretty,
            base.clone()
                .with_permalink_style(PermalinkStyle::Pretty)
                .effective_tag_style()
        );
        assert_eq!(
            PermalinkStyle::Pretty,
            base.clone()
                .with_tag_permalink_style(PermalinkStyle::Pretty)
                .effective_tag_style()
        );
        assert_eq!(
            PermalinkStyle::Pretty,
            base.clone()
                .with_permalink_style(PermalinkStyle::Pretty)
                .with_tag_permalink_style(PermalinkStyle::Default)
                .effective_tag_style()
        );
    }

    #[test]
    fn test_require_tag_dirs() {
        let config = SiteConfig::new("").with_tag_dir(ContentType::Page, "tags");
        assert!(config.require_tag_dirs(&[ContentType::Page]).is_ok());
        match config.require_tag_dirs(&[ContentType::Page, ContentType::Post]) {
            Err(Error::MissingTagDirs(missing)) => {
                assert_eq!(vec![ContentType::Post], missing)
            }
            other => panic!("wanted MissingTagDirs; found {:?}", other),
        }
    }

    #[test]
    fn test_missing_tag_dirs_message_names_keys() {
        let err = Error::MissingTagDirs(vec![ContentType::Page]);
        assert_eq!("Missing configuration keys: tag_page_dir", err.to_string());
    }

    #[test]
    fn test_from_directory_searches_parents() -> Result<()> {
        let root = scratch_dir("from_directory_searches_parents");
        let nested = root.join("_posts").join("2021");
        fs::create_dir_all(&nested).unwrap();
        fs::write(root.join(CONFIG_FILE_NAME), "tag_page_dir: tags\n").unwrap();

        let config = SiteConfig::from_directory(&nested)?;
        assert_eq!(Some("tags"), config.tag_dir(&ContentType::Page));

        fs::remove_dir_all(&root).unwrap();
        Ok(())
    }

    #[test]
    fn test_from_file_reports_path() {
        let path = scratch_dir("from_file_reports_path").join("missing.yml");
        match SiteConfig::from_file(&path) {
            Err(Error::Open { path: found, .. }) => assert_eq!(path, found),
            other => panic!("wanted Open; found {:?}", other),
        }
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("tagurl-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }
}
