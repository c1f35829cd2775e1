use anyhow::{Context, Result};
use clap::{App, Arg};
use std::path::Path;
use tagurl::config::SiteConfig;
use tagurl::content_type::ContentType;
use tagurl::logging::init_logging;
use tagurl::tag::Tag;
use tagurl::url::{absolute_tag_url, build_tag_url};

fn main() -> Result<()> {
    init_logging();

    let matches = App::new("tagurl")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Prints the URLs of tag listing pages for a static site")
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .help("The site configuration file (default: the nearest `_config.yml`)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("type")
                .short("t")
                .long("type")
                .value_name("TYPE")
                .help("The content type the tags belong to, e.g. `page` or `post`")
                .default_value("page")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("absolute")
                .short("a")
                .long("absolute")
                .help("Prefix URLs with the site's `url` setting"),
        )
        .arg(
            Arg::with_name("tags")
                .value_name("TAG")
                .help("The tags to print URLs for")
                .required(true)
                .multiple(true),
        )
        .get_matches();

    let config = match matches.value_of("config") {
        Some(path) => SiteConfig::from_file(Path::new(path))
            .with_context(|| format!("Loading configuration from '{}'", path))?,
        None => {
            let cwd = std::env::current_dir()
                .context("Getting the current directory")?;
            SiteConfig::from_directory(&cwd).context("Loading configuration")?
        }
    };

    // `type` has a default value, so it's always present.
    let content_type: ContentType = matches
        .value_of("type")
        .unwrap_or("page")
        .parse()
        .context("Parsing --type")?;
    config
        .require_tag_dirs(std::slice::from_ref(&content_type))
        .context("Validating configuration")?;

    let absolute = matches.is_present("absolute");
    for name in matches.values_of("tags").into_iter().flatten() {
        let tag: Tag = name.parse()?;
        let url = if absolute {
            absolute_tag_url(&tag, &content_type, &config)?.to_string()
        } else {
            build_tag_url(&tag, &content_type, &config)?
        };
        println!("{}", url);
    }

    Ok(())
}
