use serde::Deserialize;

/// Main configuration structure for Catalog-Ripple
///
/// Every section falls back to its defaults, so an empty file (or no file at
/// all) yields a working configuration for the public catalog site.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub site: SiteConfig,
    pub fetcher: FetcherConfig,
    pub crawler: CrawlerConfig,
}

/// HTTP façade configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Repository link shown on the health payload
    pub github: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 7860,
            github: "https://github.com/SaptaZ".to_string(),
        }
    }
}

/// Upstream site layout
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SiteConfig {
    /// Origin of the catalog site (search listings and detail pages)
    pub base_url: String,

    /// Origin of the intermediate CDN that hosts download landing pages
    pub cdn_url: String,

    /// Path prefix on the catalog host that redirects into the CDN
    pub redirect_path: String,

    /// Path prefixes on the CDN host that point at files rather than landing pages
    pub file_paths: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "https://pdalife.com".to_string(),
            cdn_url: "https://mobdisc.com".to_string(),
            redirect_path: "/dwn/".to_string(),
            file_paths: vec!["/fdl/".to_string(), "/download/".to_string()],
        }
    }
}

/// HTTP client and retry policy configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetcherConfig {
    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Referer header sent with every request
    pub referer: String,

    /// Accept-Language header sent with every request
    pub accept_language: String,

    /// Maximum number of attempts per fetch (including the first)
    pub max_attempts: u32,

    /// Base delay for exponential backoff (milliseconds)
    pub base_delay_ms: u64,

    /// Upper bound on any single backoff delay (milliseconds)
    pub max_delay_ms: u64,

    /// Timeout for one attempt, connect through body (seconds)
    pub attempt_timeout_secs: u64,

    /// Timeout for establishing a connection (seconds)
    pub connect_timeout_secs: u64,

    /// Maximum redirects followed within one attempt
    pub max_redirects: usize,

    /// Accept invalid TLS certificates from the upstream sites
    pub accept_invalid_certs: bool,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            referer: "https://pdalife.com/".to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            max_attempts: 5,
            base_delay_ms: 250,
            max_delay_ms: 10_000,
            attempt_timeout_secs: 30,
            connect_timeout_secs: 10,
            max_redirects: 10,
            accept_invalid_certs: false,
        }
    }
}

/// Search pipeline configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Hard stop for listing pagination
    pub max_pages: u32,

    /// Maximum detail pages processed at the same time
    pub max_concurrent_details: usize,

    /// Maximum CDN landing pages followed for one download link
    pub max_hops: u32,

    /// Result limit used when a search request does not name one
    pub default_limit: i64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 20,
            max_concurrent_details: 5,
            max_hops: 3,
            default_limit: 5,
        }
    }
}
