//! Download link resolver
//!
//! Reduces one raw download reference to a terminal link. The chain, in
//! order: magnet passthrough, translation-proxy unwrap, CDN landing-page
//! traversal. A traversal yields a new reference that re-enters the chain
//! from the top; the number of traversals per link is bounded.

use crate::crawler::fetcher::Fetcher;
use crate::model::ResolvedLink;
use crate::url::{classify_link, host_matches, is_magnet, unwrap_proxy_url, LinkKind, SiteLayout};
use scraper::{Html, Selector};
use url::Url;

/// Hash-route prefix the CDN uses for in-page download buttons
const HASH_DOWNLOAD_PREFIX: &str = "#/download/";

/// Messenger hosts advertised next to the real download buttons
const SOCIAL_HOSTS: &[&str] = &["t.me", "telegram.me"];

/// Resolves raw download references, one at a time
///
/// Holds no state between calls; resolving the same link twice against the
/// same upstream yields the same result.
pub struct LinkResolver<'a> {
    fetcher: &'a Fetcher,
    max_hops: u32,
}

impl<'a> LinkResolver<'a> {
    /// Creates a resolver that follows at most `max_hops` landing pages per link
    pub fn new(fetcher: &'a Fetcher, max_hops: u32) -> Self {
        Self { fetcher, max_hops }
    }

    /// Resolves one raw link
    ///
    /// Never fails: a landing page that cannot be fetched or parsed, or a hop
    /// budget that runs out, yields `Unresolved` with the last URL reached.
    pub async fn resolve(&self, raw_link: &str) -> ResolvedLink {
        let site = self.fetcher.site();
        let mut current = raw_link.trim().to_string();
        let mut hops = 0u32;

        loop {
            if is_magnet(&current) {
                return ResolvedLink::Magnet(current);
            }

            current = unwrap_proxy_url(&current, site);

            match classify_link(&current, site) {
                LinkKind::Magnet => return ResolvedLink::Magnet(current),
                LinkKind::File => {
                    tracing::debug!(url = %current, hops, "resolved file link");
                    return ResolvedLink::FileUrl(current);
                }
                LinkKind::Unsupported => {
                    tracing::warn!(link = %current, "unsupported download link");
                    return ResolvedLink::Unresolved(current);
                }
                LinkKind::Landing => {}
            }

            if hops >= self.max_hops {
                tracing::warn!(url = %current, hops, "hop bound reached, giving up");
                return ResolvedLink::Unresolved(current);
            }
            hops += 1;

            let page = match self.fetcher.fetch(&current).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!(url = %current, hops, "landing page unavailable: {}", e);
                    return ResolvedLink::Unresolved(current);
                }
            };

            match extract_cdn_reference(&page.body, site) {
                Some(next) => {
                    tracing::debug!(from = %current, to = %next, hops, "followed landing page");
                    current = next;
                }
                None => {
                    tracing::warn!(url = %current, hops, "no download button on landing page");
                    return ResolvedLink::Unresolved(current);
                }
            }
        }
    }

    /// Resolves every raw link in order
    pub async fn resolve_all(&self, raw_links: &[String]) -> Vec<ResolvedLink> {
        let mut resolved = Vec::with_capacity(raw_links.len());
        for raw_link in raw_links {
            resolved.push(self.resolve(raw_link).await);
        }
        resolved
    }
}

/// Extracts the download reference embedded in a CDN landing page
///
/// Download buttons are scanned in document order, skipping messenger
/// links. The first button that is a magnet, a CDN hash route, a CDN file
/// path or an absolute CDN URL wins.
pub fn extract_cdn_reference(html: &str, site: &SiteLayout) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("a.b-download__button[href]").ok()?;

    for button in document.select(&selector) {
        let Some(href) = button.value().attr("href").map(str::trim) else {
            continue;
        };
        if href.is_empty() || is_social_link(href) {
            continue;
        }

        if is_magnet(href) {
            return Some(href.to_string());
        }

        // Hash routes contain a file path too, so they are matched first
        if let Some(route) = href.strip_prefix(HASH_DOWNLOAD_PREFIX) {
            if let Ok(url) = site.cdn().join(&format!("/download/{}", route)) {
                return Some(url.to_string());
            }
            continue;
        }

        if site.mentions_file_path(href) {
            return Some(unwrap_proxy_url(href, site));
        }

        if let Ok(url) = Url::parse(href) {
            if matches!(url.scheme(), "http" | "https") && site.is_cdn(&url) {
                return Some(url.to_string());
            }
        }
    }

    None
}

fn is_social_link(href: &str) -> bool {
    Url::parse(href)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .is_some_and(|host| SOCIAL_HOSTS.iter().any(|social| host_matches(social, &host)))
}
