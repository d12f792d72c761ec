use crate::config::types::{Config, CrawlerConfig, FetcherConfig, SiteConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site_config(&config.site)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_crawler_config(&config.crawler)?;
    Ok(())
}

/// Validates upstream site configuration
fn validate_site_config(config: &SiteConfig) -> Result<(), ConfigError> {
    validate_origin("base_url", &config.base_url)?;
    validate_origin("cdn_url", &config.cdn_url)?;

    validate_path_prefix("redirect_path", &config.redirect_path)?;
    for path in &config.file_paths {
        validate_path_prefix("file_paths", path)?;
    }

    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.max_attempts < 1 || config.max_attempts > 20 {
        return Err(ConfigError::Validation(format!(
            "max_attempts must be between 1 and 20, got {}",
            config.max_attempts
        )));
    }

    if config.base_delay_ms > config.max_delay_ms {
        return Err(ConfigError::Validation(format!(
            "base_delay_ms ({}) cannot exceed max_delay_ms ({})",
            config.base_delay_ms, config.max_delay_ms
        )));
    }

    if config.attempt_timeout_secs < 1 {
        return Err(ConfigError::Validation(
            "attempt_timeout_secs must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates search pipeline configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.max_concurrent_details < 1 || config.max_concurrent_details > 64 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_details must be between 1 and 64, got {}",
            config.max_concurrent_details
        )));
    }

    if config.max_hops < 1 {
        return Err(ConfigError::Validation(format!(
            "max_hops must be >= 1, got {}",
            config.max_hops
        )));
    }

    if config.default_limit < 1 {
        return Err(ConfigError::Validation(format!(
            "default_limit must be >= 1, got {}",
            config.default_limit
        )));
    }

    Ok(())
}

/// Validates that a value is an absolute http(s) URL with a host
fn validate_origin(field: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use http or https",
            field, value
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' has no host",
            field, value
        )));
    }

    Ok(())
}

/// Validates a path prefix such as "/dwn/"
fn validate_path_prefix(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.len() < 2 || !value.starts_with('/') || !value.ends_with('/') {
        return Err(ConfigError::Validation(format!(
            "{} entries must start and end with '/', got '{}'",
            field, value
        )));
    }
    Ok(())
}
