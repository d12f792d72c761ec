//! Paginated search-listing crawler
//!
//! Walks `/search/{query}`, `/search/{query}/page-2/`, ... strictly one page
//! at a time and hands out candidates in listing order.

use crate::crawler::fetcher::Fetcher;
use crate::model::Candidate;
use crate::url::{unwrap_proxy_url, SiteLayout};
use scraper::{Html, Selector};
use std::collections::VecDeque;
use url::Url;

/// Page text the catalog shows for an empty search
const NO_RESULTS_MARKER: &str = "Found 0 responses";

/// Candidates and pagination hints extracted from one listing page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    /// Result entries in page order
    pub candidates: Vec<Candidate>,

    /// Last page number advertised by the "load more" control
    pub max_page: Option<u32>,

    /// The page explicitly reported zero results
    pub no_results: bool,
}

/// Position of the crawler in the listing pagination
#[derive(Debug, Clone)]
struct PageCursor {
    page_number: u32,
    query: String,
}

/// Lazy, finite, single-use sequence of search candidates
///
/// Stops when `limit` candidates have been handed out, when a page yields no
/// candidates, when the listing's advertised last page or `max_pages` has
/// been fetched, or when a listing fetch fails. Candidates already handed out
/// are unaffected by an early stop.
///
/// # Example
///
/// ```no_run
/// use catalog_ripple::config::Config;
/// use catalog_ripple::crawler::{Fetcher, SearchCrawler};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let fetcher = Fetcher::new(&Config::default())?;
/// let mut crawler = SearchCrawler::new(&fetcher, "minecraft", 5, 20);
/// while let Some(candidate) = crawler.next_candidate().await {
///     println!("{} -> {}", candidate.name, candidate.detail_link);
/// }
/// # Ok(())
/// # }
/// ```
pub struct SearchCrawler<'a> {
    fetcher: &'a Fetcher,
    cursor: Option<PageCursor>,
    buffered: VecDeque<Candidate>,
    limit: usize,
    max_pages: u32,
    last_page: Option<u32>,
    yielded: usize,
    pages_fetched: u32,
}

impl<'a> SearchCrawler<'a> {
    /// Creates a crawler positioned before page 1
    pub fn new(fetcher: &'a Fetcher, query: &str, limit: usize, max_pages: u32) -> Self {
        let cursor = (limit > 0 && max_pages > 0).then(|| PageCursor {
            page_number: 1,
            query: query.to_string(),
        });

        Self {
            fetcher,
            cursor,
            buffered: VecDeque::new(),
            limit,
            max_pages,
            last_page: None,
            yielded: 0,
            pages_fetched: 0,
        }
    }

    /// Number of listing pages requested so far
    pub fn pages_fetched(&self) -> u32 {
        self.pages_fetched
    }

    /// Returns the next candidate, fetching the next listing page if needed
    pub async fn next_candidate(&mut self) -> Option<Candidate> {
        loop {
            if self.yielded >= self.limit {
                self.finish();
                return None;
            }

            if let Some(candidate) = self.buffered.pop_front() {
                self.yielded += 1;
                return Some(candidate);
            }

            let cursor = self.cursor.take()?;
            self.cursor = self.fetch_page(cursor).await;
        }
    }

    /// Drains the remaining candidates into a vector
    pub async fn collect(mut self) -> Vec<Candidate> {
        let mut candidates = Vec::new();
        while let Some(candidate) = self.next_candidate().await {
            candidates.push(candidate);
        }
        candidates
    }

    fn finish(&mut self) {
        self.cursor = None;
        self.buffered.clear();
    }

    /// Fetches the cursor's page and returns the cursor for the page after it,
    /// or None when pagination is over
    async fn fetch_page(&mut self, mut cursor: PageCursor) -> Option<PageCursor> {
        let fetcher = self.fetcher;
        let site = fetcher.site();
        let Some(url) = listing_url(site.base(), &cursor.query, cursor.page_number) else {
            tracing::warn!(query = %cursor.query, "cannot build listing URL");
            return None;
        };

        tracing::info!(page = cursor.page_number, url = %url, "fetching listing page");
        self.pages_fetched += 1;

        let page = match fetcher.fetch(url.as_str()).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(page = cursor.page_number, "pagination stopped: {}", e);
                return None;
            }
        };

        let listing = parse_listing(&page.body, site);

        if listing.no_results || listing.candidates.is_empty() {
            tracing::info!(page = cursor.page_number, "no more results");
            return None;
        }

        tracing::info!(
            page = cursor.page_number,
            found = listing.candidates.len(),
            total = self.yielded + self.buffered.len() + listing.candidates.len(),
            "collected candidates"
        );

        self.buffered.extend(listing.candidates);
        if let Some(max_page) = listing.max_page {
            self.last_page = Some(max_page);
        }

        let last = self.last_page.unwrap_or(u32::MAX).min(self.max_pages);
        if cursor.page_number >= last {
            tracing::info!(page = cursor.page_number, "reached last page");
            return None;
        }

        cursor.page_number += 1;
        Some(cursor)
    }
}

/// Builds the listing URL for a page
///
/// Page 1 is `{base}/search/{query}`, later pages are
/// `{base}/search/{query}/page-{n}/`. The query is percent-encoded as a
/// single path segment.
pub fn listing_url(base: &Url, query: &str, page_number: u32) -> Option<Url> {
    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    {
        let mut segments = url.path_segments_mut().ok()?;
        segments.pop_if_empty().push("search").push(query);
        if page_number > 1 {
            segments.push(&format!("page-{}", page_number)).push("");
        }
    }
    Some(url)
}

/// Parses a listing page into candidates and pagination hints
pub fn parse_listing(html: &str, site: &SiteLayout) -> ListingPage {
    let document = Html::parse_document(html);

    let no_results = document
        .root_element()
        .text()
        .collect::<String>()
        .contains(NO_RESULTS_MARKER);

    ListingPage {
        candidates: extract_candidates(&document, site),
        max_page: extract_max_page(&document),
        no_results,
    }
}

fn extract_candidates(document: &Html, site: &SiteLayout) -> Vec<Candidate> {
    let (Ok(item_selector), Ok(title_selector), Ok(image_selector)) = (
        Selector::parse(".catalog-item"),
        Selector::parse(".catalog-item__title a[href]"),
        Selector::parse(".catalog-item__poster img"),
    ) else {
        return Vec::new();
    };

    let mut candidates = Vec::new();
    for item in document.select(&item_selector) {
        let Some(title) = item.select(&title_selector).next() else {
            continue;
        };
        let Some(href) = title.value().attr("href") else {
            continue;
        };

        let name = title.text().collect::<String>().trim().to_string();
        let image_url = item
            .select(&image_selector)
            .next()
            .and_then(|img| {
                img.value()
                    .attr("src")
                    .filter(|src| !src.trim().is_empty())
                    .or_else(|| img.value().attr("data-src"))
            })
            .map(|src| unwrap_proxy_url(src, site))
            .unwrap_or_default();

        candidates.push(Candidate {
            name,
            detail_link: unwrap_proxy_url(href, site),
            image_url,
        });
    }

    candidates
}

fn extract_max_page(document: &Html) -> Option<u32> {
    let selector = Selector::parse(".js-load_more[data-max_page]").ok()?;
    document
        .select(&selector)
        .next()?
        .value()
        .attr("data-max_page")?
        .trim()
        .parse()
        .ok()
}
