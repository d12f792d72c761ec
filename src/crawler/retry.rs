//! Retry and backoff policy for upstream fetches

use crate::config::FetcherConfig;
use crate::AttemptFailure;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Decision returned by the retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this failure
    NoRetry,
    /// Retry after the given delay
    RetryAfter(Duration),
}

/// Exponential backoff policy with caps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the first)
    pub max_attempts: u32,
    /// Base delay for backoff
    pub base_delay: Duration,
    /// Upper bound on any single delay, server-directed ones included
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&FetcherConfig::default())
    }
}

impl RetryPolicy {
    /// Builds the policy from fetcher configuration
    pub fn from_config(config: &FetcherConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }

    /// Computes the delay before the next attempt
    ///
    /// `attempt` is 1-based (1 = the attempt that just failed). A 429 carrying
    /// a Retry-After directive overrides the computed backoff. Failures that
    /// would repeat identically are never retried.
    pub fn decide(&self, attempt: u32, failure: &AttemptFailure) -> RetryDecision {
        if attempt >= self.max_attempts || !failure.is_transient() {
            return RetryDecision::NoRetry;
        }

        if let AttemptFailure::RateLimited {
            retry_after: Some(directed),
        } = failure
        {
            return RetryDecision::RetryAfter((*directed).min(self.max_delay));
        }

        RetryDecision::RetryAfter(self.backoff(attempt))
    }

    /// base * 2^(attempt-1), capped at max_delay
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exp = 1u32 << attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(exp).min(self.max_delay)
    }
}

/// Parses a Retry-After header value
///
/// Accepts delta-seconds (`"120"`) or an HTTP-date
/// (`"Wed, 21 Oct 2015 07:28:00 GMT"`). Dates in the past yield zero.
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    let value = value.trim();

    if let Ok(secs) = value.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }

    let date = DateTime::parse_from_rfc2822(value).ok()?;
    let delta = date.with_timezone(&Utc) - Utc::now();
    Some(delta.to_std().unwrap_or(Duration::ZERO))
}
