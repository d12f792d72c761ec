//! Shared fixtures

use catalog_ripple::config::Config;
use catalog_ripple::crawler::{Aggregator, Fetcher};
use wiremock::MockServer;

/// Catalog and CDN origins served by one mock server
///
/// The catalog is addressed by IP and the CDN by name so the two resolve to
/// the same socket but still count as different hosts.
pub struct Origins {
    pub catalog: String,
    pub cdn: String,
}

impl Origins {
    pub fn of(server: &MockServer) -> Self {
        let catalog = server.uri();
        let cdn = catalog.replace("127.0.0.1", "localhost");
        Self { catalog, cdn }
    }
}

/// Configuration pointing at the mock server with fast retries
pub fn test_config(origins: &Origins) -> Config {
    let mut config = Config::default();
    config.site.base_url = origins.catalog.clone();
    config.site.cdn_url = origins.cdn.clone();
    config.fetcher.max_attempts = 2;
    config.fetcher.base_delay_ms = 1;
    config.fetcher.max_delay_ms = 5;
    config.fetcher.attempt_timeout_secs = 5;
    config.crawler.max_pages = 5;
    config
}

pub fn aggregator(config: &Config) -> Aggregator {
    let fetcher = Fetcher::new(config).expect("fetcher");
    Aggregator::new(fetcher, config.crawler.clone())
}

/// A listing page with one catalog item per slug
pub fn listing_page(slugs: &[&str], max_page: Option<u32>) -> String {
    let items: String = slugs
        .iter()
        .map(|slug| {
            format!(
                r#"<div class="catalog-item">
                     <div class="catalog-item__poster"><img src="/img/{slug}.webp"></div>
                     <div class="catalog-item__title"><a href="/{slug}-android.html">{slug}</a></div>
                   </div>"#
            )
        })
        .collect();

    let load_more = max_page
        .map(|max| format!(r#"<button class="js-load_more" data-max_page="{}">More</button>"#, max))
        .unwrap_or_default();

    format!(
        r#"<html><body><div class="catalog-list">{}</div>{}</body></html>"#,
        items, load_more
    )
}

/// The catalog's "nothing found" page
pub fn empty_listing_page() -> String {
    r#"<html><body><p>Found 0 responses</p></body></html>"#.to_string()
}

/// A detail page listing the given download hrefs as versions
pub fn detail_page(hrefs: &[&str], size: &str) -> String {
    let items: String = hrefs
        .iter()
        .map(|href| {
            format!(
                r#"<li><a class="game-versions__downloads-button" href="{href}">
                     <span class="game-versions__downloads-size">{size}</span>
                   </a></li>"#
            )
        })
        .collect();

    format!(
        r#"<html><body><ul class="game-versions__downloads-list">{}</ul></body></html>"#,
        items
    )
}

/// A detail page whose only download is a magnet named after `slug`
pub fn magnet_detail_page(slug: &str, size: &str) -> String {
    let magnet = format!("magnet:?xt=urn:btih:{}", slug);
    detail_page(&[magnet.as_str()], size)
}

/// A CDN landing page with the given download buttons
pub fn landing_page(hrefs: &[&str]) -> String {
    let buttons: String = hrefs
        .iter()
        .map(|href| format!(r#"<a class="b-download__button" href="{}">Download</a>"#, href))
        .collect();

    format!(r#"<html><body><div class="b-download">{}</div></body></html>"#, buttons)
}
