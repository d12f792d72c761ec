//! Shared application state

use crate::config::Config;
use crate::crawler::{Aggregator, Fetcher};
use crate::ServiceError;
use std::sync::Arc;

/// Shared application state
///
/// Cloned into every handler; the aggregator's fetcher owns the single
/// connection pool used for all requests.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Search pipeline
    pub aggregator: Aggregator,
    /// Effective configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Builds the pipeline from configuration
    pub fn new(config: Config) -> Result<Self, ServiceError> {
        let fetcher = Fetcher::new(&config)?;
        let aggregator = Aggregator::new(fetcher, config.crawler.clone());
        Ok(Self::with_aggregator(aggregator, config))
    }

    /// Wraps an already-built aggregator
    pub fn with_aggregator(aggregator: Aggregator, config: Config) -> Self {
        Self {
            aggregator,
            config: Arc::new(config),
        }
    }
}
