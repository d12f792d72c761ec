use crate::config::SiteConfig;
use crate::url::host::{extract_host, host_matches};
use crate::{UrlError, UrlResult};
use url::Url;

/// Parsed view of the upstream site layout
///
/// Built once from [`SiteConfig`] so the pipeline never re-parses origins.
#[derive(Debug, Clone)]
pub struct SiteLayout {
    base: Url,
    cdn: Url,
    base_host: String,
    cdn_host: String,
    redirect_path: String,
    file_paths: Vec<String>,
}

impl SiteLayout {
    /// Builds the layout from configuration
    pub fn from_config(config: &SiteConfig) -> UrlResult<Self> {
        let base = parse_origin(&config.base_url)?;
        let cdn = parse_origin(&config.cdn_url)?;
        let base_host = extract_host(&base).ok_or(UrlError::MissingHost)?;
        let cdn_host = extract_host(&cdn).ok_or(UrlError::MissingHost)?;

        Ok(Self {
            base,
            cdn,
            base_host,
            cdn_host,
            redirect_path: config.redirect_path.clone(),
            file_paths: config.file_paths.clone(),
        })
    }

    /// Origin of the catalog site
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Origin of the CDN
    pub fn cdn(&self) -> &Url {
        &self.cdn
    }

    /// Returns true if the URL is served by the catalog site
    pub fn is_catalog(&self, url: &Url) -> bool {
        url.host_str()
            .is_some_and(|host| host_matches(&self.base_host, host))
    }

    /// Returns true if the URL is served by the CDN
    pub fn is_cdn(&self, url: &Url) -> bool {
        url.host_str()
            .is_some_and(|host| host_matches(&self.cdn_host, host))
    }

    /// Returns true if the path is the catalog's redirect-into-CDN endpoint
    pub fn is_redirect_path(&self, path: &str) -> bool {
        path.starts_with(&self.redirect_path)
    }

    /// Returns true if the path points at a file on the CDN
    pub fn is_file_path(&self, path: &str) -> bool {
        self.file_paths.iter().any(|prefix| path.starts_with(prefix))
    }

    /// Returns true if the string contains a CDN file path anywhere
    pub fn mentions_file_path(&self, href: &str) -> bool {
        self.file_paths.iter().any(|prefix| href.contains(prefix))
    }

    /// Resolves an href to an absolute http(s) URL
    ///
    /// Relative paths under a CDN file path belong to the CDN; every other
    /// relative path belongs to the catalog site. Returns None for other
    /// schemes and unparseable input.
    pub fn absolutize(&self, href: &str) -> Option<Url> {
        let href = href.trim();
        if href.is_empty() {
            return None;
        }

        let resolved = match Url::parse(href) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                let origin = if self.is_file_path(href) {
                    &self.cdn
                } else {
                    &self.base
                };
                origin.join(href).ok()?
            }
            Err(_) => return None,
        };

        match resolved.scheme() {
            "http" | "https" => Some(resolved),
            _ => None,
        }
    }
}

fn parse_origin(value: &str) -> UrlResult<Url> {
    let url = Url::parse(value).map_err(|e| UrlError::Parse(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(UrlError::InvalidScheme(other.to_string())),
    }
}
