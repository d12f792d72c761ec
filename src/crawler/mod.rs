//! Crawler module for the search-and-resolve pipeline
//!
//! This module contains the core pipeline logic, including:
//! - HTTP fetching with retry and backoff
//! - Paginated search-listing crawling
//! - Detail page parsing with fallback strategies
//! - Download link resolution through proxies and CDN landing pages
//! - Overall request orchestration

mod aggregator;
mod detail;
mod fetcher;
mod resolver;
mod retry;
mod search;

pub use aggregator::Aggregator;
pub use detail::{extract_detail, parse_detail, DetailStrategy};
pub use fetcher::{build_http_client, FetchedPage, Fetcher};
pub use resolver::{extract_cdn_reference, LinkResolver};
pub use retry::{parse_retry_after, RetryDecision, RetryPolicy};
pub use search::{listing_url, parse_listing, ListingPage, SearchCrawler};

use crate::config::Config;
use crate::model::SearchResponse;
use crate::ServiceError;

/// Runs a single search with a freshly built pipeline
///
/// Long-running processes should build one [`Aggregator`] and reuse it so the
/// connection pool is shared; this is a convenience for one-off use.
///
/// # Example
///
/// ```no_run
/// use catalog_ripple::config::Config;
/// use catalog_ripple::crawler::search_once;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let response = search_once(&Config::default(), "minecraft", 5).await?;
/// println!("{} results", response.count);
/// # Ok(())
/// # }
/// ```
pub async fn search_once(
    config: &Config,
    query: &str,
    limit: i64,
) -> Result<SearchResponse, ServiceError> {
    let fetcher = Fetcher::new(config)?;
    let aggregator = Aggregator::new(fetcher, config.crawler.clone());
    Ok(aggregator.run(query, limit).await)
}
