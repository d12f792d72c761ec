//! Search orchestration
//!
//! Drives the listing crawler, fans candidates out to a bounded pool of
//! detail/resolution tasks, and reassembles the results in discovery order.

use crate::config::CrawlerConfig;
use crate::crawler::detail::parse_detail;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::resolver::LinkResolver;
use crate::crawler::search::SearchCrawler;
use crate::model::{Candidate, Query, ResultEntry, SearchResponse};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tokio_util::sync::CancellationToken;

/// Outcome of one candidate task, tagged with its discovery index
type TaskOutput = (usize, Option<ResultEntry>);

/// Main search coordinator structure
///
/// One instance serves every request; all per-request state (cursor, task
/// set, permits, result buffer) lives inside [`Aggregator::run`].
#[derive(Debug, Clone)]
pub struct Aggregator {
    fetcher: Fetcher,
    config: CrawlerConfig,
}

impl Aggregator {
    /// Creates a new aggregator around the shared fetcher
    pub fn new(fetcher: Fetcher, config: CrawlerConfig) -> Self {
        Self { fetcher, config }
    }

    /// The shared fetcher
    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    /// Runs a complete search
    ///
    /// This method:
    /// 1. Pulls candidates from the listing crawler, page by page
    /// 2. Spawns one task per candidate; at most `max_concurrent_details`
    ///    of them do network work at once
    /// 3. Buffers finished entries by discovery index
    /// 4. Returns at most `limit` entries in discovery order
    ///
    /// Dropping the returned future (client disconnect, request timeout)
    /// cancels every candidate task still running.
    ///
    /// A `limit` of zero or less returns an empty response without touching
    /// the network.
    pub async fn run(&self, query: &str, limit: i64) -> SearchResponse {
        let Some(request) = Query::new(query, limit) else {
            tracing::info!(query = %query, limit, "nothing requested");
            return SearchResponse::empty_request(query, limit);
        };
        let wanted = request.limit;
        let start_time = Instant::now();

        tracing::info!(query = %query, limit, "search started");

        let cancel = CancellationToken::new();
        // Dropping the request future cancels every task it spawned.
        let _cancel_on_drop = cancel.clone().drop_guard();
        let permits = Arc::new(Semaphore::new(self.config.max_concurrent_details));
        let mut tasks: JoinSet<TaskOutput> = JoinSet::new();
        let mut slots: Vec<Option<ResultEntry>> = Vec::new();

        let mut crawler =
            SearchCrawler::new(&self.fetcher, &request.text, wanted, self.config.max_pages);
        while let Some(candidate) = crawler.next_candidate().await {
            let index = slots.len();
            slots.push(None);

            let token = cancel.child_token();
            let fetcher = self.fetcher.clone();
            let permits = Arc::clone(&permits);
            let max_hops = self.config.max_hops;

            tasks.spawn(async move {
                let entry = tokio::select! {
                    _ = token.cancelled() => {
                        tracing::debug!(index, "candidate task cancelled");
                        None
                    }
                    entry = process_candidate(fetcher, candidate, permits, max_hops) => entry,
                };
                (index, entry)
            });

            while let Some(joined) = tasks.try_join_next() {
                record(joined, &mut slots);
            }
        }

        let discovered = slots.len();
        tracing::debug!(
            query = %query,
            discovered,
            pages = crawler.pages_fetched(),
            "crawl finished, waiting for candidate tasks"
        );

        while let Some(joined) = tasks.join_next().await {
            record(joined, &mut slots);
        }

        let results: Vec<ResultEntry> = slots.into_iter().flatten().take(wanted).collect();

        tracing::info!(
            query = %query,
            discovered,
            returned = results.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "search completed"
        );

        SearchResponse::from_results(query, limit, results)
    }
}

/// Stores a finished task's entry in its slot
fn record(joined: Result<TaskOutput, JoinError>, slots: &mut [Option<ResultEntry>]) {
    match joined {
        Ok((index, Some(entry))) => {
            if let Some(slot) = slots.get_mut(index) {
                *slot = Some(entry);
            }
        }
        Ok((_, None)) => {}
        Err(e) if e.is_cancelled() => {}
        Err(e) => tracing::error!("candidate task failed: {}", e),
    }
}

/// Parses one candidate's detail page and resolves all of its links
///
/// Returns None if the candidate has to be dropped.
async fn process_candidate(
    fetcher: Fetcher,
    candidate: Candidate,
    permits: Arc<Semaphore>,
    max_hops: u32,
) -> Option<ResultEntry> {
    let _permit = permits.acquire_owned().await.ok()?;

    let detail = match parse_detail(&fetcher, &candidate.detail_link).await {
        Ok(detail) => detail,
        Err(e) => {
            tracing::warn!(name = %candidate.name, "dropping candidate: {}", e);
            return None;
        }
    };

    let resolved = LinkResolver::new(&fetcher, max_hops)
        .resolve_all(&detail.raw_links)
        .await;

    tracing::info!(
        name = %candidate.name,
        links = resolved.len(),
        unresolved = resolved.iter().filter(|link| !link.is_terminal()).count(),
        "candidate processed"
    );

    Some(ResultEntry::new(candidate, detail, &resolved))
}
