//! Catalog-Ripple: a download-link resolver for an app catalog site
//!
//! This crate searches the catalog's paginated listings, parses each result's
//! detail page, and follows every advertised download reference through
//! translation-proxy wrappers and CDN landing pages until it reaches a terminal
//! link (a file URL or a magnet URI).

pub mod config;
pub mod crawler;
pub mod model;
pub mod server;
pub mod url;

use std::time::Duration;
use thiserror::Error;

/// Main error type for service-level operations
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid listen address: {0}")]
    Address(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Why a single fetch attempt failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptFailure {
    /// Connection, DNS, TLS or body read failure
    Network(String),

    /// The per-attempt timeout elapsed
    Timeout,

    /// HTTP 429, optionally with a server-directed delay
    RateLimited { retry_after: Option<Duration> },

    /// HTTP 5xx
    Server(u16),

    /// The redirect chain exceeded the configured limit
    TooManyRedirects,
}

impl AttemptFailure {
    /// Returns true if repeating the request may succeed
    pub fn is_transient(&self) -> bool {
        !matches!(self, Self::TooManyRedirects)
    }
}

impl std::fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Network(e) => write!(f, "network error: {}", e),
            Self::Timeout => write!(f, "timed out"),
            Self::RateLimited { .. } => write!(f, "rate limited (HTTP 429)"),
            Self::Server(status) => write!(f, "server error (HTTP {})", status),
            Self::TooManyRedirects => write!(f, "too many redirects"),
        }
    }
}

/// Errors returned by the retrying fetcher
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Gave up on {url} after {attempts} attempts: {last}")]
    Exhausted {
        url: String,
        attempts: u32,
        last: AttemptFailure,
    },

    #[error("Request to {url} rejected with HTTP {status}")]
    ClientRejected { url: String, status: u16 },

    #[error("Cannot fetch {url}: {source}")]
    InvalidUrl { url: String, source: UrlError },
}

/// Errors returned by the detail parser
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Failed to fetch detail page: {0}")]
    Fetch(#[from] FetchError),

    #[error("No download links found on {url}")]
    NoMatch { url: String },
}

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, ServiceError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Aggregator, Fetcher};
pub use model::{Candidate, ParsedDetail, ResolvedLink, ResultEntry, SearchResponse};
pub use url::{classify_link, unwrap_proxy_url, LinkKind};
