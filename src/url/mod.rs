//! URL handling module for Catalog-Ripple
//!
//! This module provides host matching, the parsed site layout, translation
//! proxy unwrapping, and link classification.

mod host;
mod site;
mod unwrap;

// Re-export main functions
pub use host::{extract_host, host_matches};
pub use site::SiteLayout;
pub use unwrap::{is_magnet, unwrap_proxy_url};

use url::Url;

/// Link classification types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// BitTorrent magnet URI - terminal, never fetched
    Magnet,
    /// Intermediate page that embeds the real download reference
    Landing,
    /// Direct file link - terminal
    File,
    /// Not an http(s) URL or a magnet URI
    Unsupported,
}

impl LinkKind {
    /// Returns true if no further resolution is needed
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Magnet | Self::File)
    }
}

/// Classifies an (already unwrapped) link according to the site layout
///
/// This function checks the link in the following priority order:
/// 1. Magnet scheme
/// 2. Catalog host under the redirect path (redirects into the CDN)
/// 3. CDN host outside the file paths
/// 4. Any other http(s) URL is a file
///
/// # Examples
///
/// ```
/// use catalog_ripple::config::SiteConfig;
/// use catalog_ripple::url::{classify_link, LinkKind, SiteLayout};
///
/// let site = SiteLayout::from_config(&SiteConfig::default()).unwrap();
/// assert_eq!(classify_link("https://pdalife.com/dwn/1/", &site), LinkKind::Landing);
/// assert_eq!(classify_link("https://mobdisc.com/fdl/1/a.apk", &site), LinkKind::File);
/// ```
pub fn classify_link(link: &str, site: &SiteLayout) -> LinkKind {
    if is_magnet(link) {
        return LinkKind::Magnet;
    }

    let url = match Url::parse(link.trim()) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => url,
        _ => return LinkKind::Unsupported,
    };

    if site.is_catalog(&url) && site.is_redirect_path(url.path()) {
        return LinkKind::Landing;
    }

    if site.is_cdn(&url) && !site.is_file_path(url.path()) {
        return LinkKind::Landing;
    }

    LinkKind::File
}
