//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests of the pipeline, including:
//! - Building the shared HTTP client with browser-like headers
//! - GET requests with automatic redirect following
//! - Retry with exponential backoff for transient failures
//! - Error classification

use crate::config::{Config, FetcherConfig};
use crate::crawler::retry::{parse_retry_after, RetryDecision, RetryPolicy};
use crate::url::SiteLayout;
use crate::{AttemptFailure, FetchError, ServiceError, UrlError};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, RETRY_AFTER};
use reqwest::{redirect::Policy, Client, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,\
                           image/avif,image/webp,*/*;q=0.8";

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status_code: u16,
    /// Page body content
    pub body: String,
}

/// Outcome of one attempt that did not fail transiently
enum Attempt {
    Page(FetchedPage),
    Rejected(u16),
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use catalog_ripple::config::FetcherConfig;
/// use catalog_ripple::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, ServiceError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
    if !config.referer.is_empty() {
        headers.insert(REFERER, HeaderValue::from_str(&config.referer)?);
    }
    if !config.accept_language.is_empty() {
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language)?,
        );
    }

    let client = Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.attempt_timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .redirect(Policy::limited(config.max_redirects))
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Retrying HTTP fetcher shared by every pipeline stage
///
/// Constructed once per process and handed to each component. Cloning is
/// cheap: the connection pool and site layout are shared.
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | HTTP 2xx/3xx | Return the page |
/// | HTTP 429 | Retry; Retry-After overrides the backoff |
/// | HTTP 5xx | Retry with exponential backoff |
/// | Timeout / connection error | Retry with exponential backoff |
/// | Redirect limit hit | Immediate → `Exhausted` |
/// | Other HTTP 4xx | Immediate → `ClientRejected` |
/// | Attempts exhausted | `Exhausted` with the last cause |
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    policy: RetryPolicy,
    site: Arc<SiteLayout>,
}

impl Fetcher {
    /// Creates a fetcher from the full configuration
    pub fn new(config: &Config) -> Result<Self, ServiceError> {
        let client = build_http_client(&config.fetcher)?;
        let site = SiteLayout::from_config(&config.site)?;
        Ok(Self::with_client(
            client,
            RetryPolicy::from_config(&config.fetcher),
            site,
        ))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client, policy: RetryPolicy, site: SiteLayout) -> Self {
        Self {
            client,
            policy,
            site: Arc::new(site),
        }
    }

    /// The upstream site layout
    pub fn site(&self) -> &SiteLayout {
        &self.site
    }

    /// The retry policy in effect
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetches a URL, retrying transient failures
    ///
    /// Relative targets are resolved against the catalog base URL.
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let target = self.site.absolutize(url).ok_or_else(|| FetchError::InvalidUrl {
            url: url.to_string(),
            source: UrlError::InvalidScheme(format!("not an http(s) URL: {}", url)),
        })?;

        let mut attempt = 1u32;
        loop {
            let failure = match self.attempt(&target).await {
                Ok(Attempt::Page(page)) => {
                    tracing::debug!(url = %target, attempt, status = page.status_code, "fetched");
                    return Ok(page);
                }
                Ok(Attempt::Rejected(status)) => {
                    tracing::warn!(url = %target, status, "request rejected, not retrying");
                    return Err(FetchError::ClientRejected {
                        url: target.to_string(),
                        status,
                    });
                }
                Err(failure) => failure,
            };

            match self.policy.decide(attempt, &failure) {
                RetryDecision::NoRetry => {
                    tracing::warn!(url = %target, attempts = attempt, "giving up: {}", failure);
                    return Err(FetchError::Exhausted {
                        url: target.to_string(),
                        attempts: attempt,
                        last: failure,
                    });
                }
                RetryDecision::RetryAfter(delay) => {
                    tracing::warn!(
                        url = %target,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "{}, retrying",
                        failure
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Performs a single GET and classifies the outcome
    async fn attempt(&self, url: &Url) -> Result<Attempt, AttemptFailure> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(classify_error)?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_retry_after);
            return Err(AttemptFailure::RateLimited { retry_after });
        }

        if status.is_server_error() {
            return Err(AttemptFailure::Server(status.as_u16()));
        }

        if status.is_client_error() {
            return Ok(Attempt::Rejected(status.as_u16()));
        }

        let final_url = response.url().clone();
        let body = response.text().await.map_err(classify_error)?;

        Ok(Attempt::Page(FetchedPage {
            final_url,
            status_code: status.as_u16(),
            body,
        }))
    }
}

/// Maps a client error to a transient attempt failure
fn classify_error(error: reqwest::Error) -> AttemptFailure {
    if error.is_timeout() {
        AttemptFailure::Timeout
    } else if error.is_redirect() {
        AttemptFailure::TooManyRedirects
    } else if error.is_connect() {
        AttemptFailure::Network(format!("connection failed: {}", error))
    } else {
        AttemptFailure::Network(error.to_string())
    }
}
