use crate::model::entry::ResultEntry;
use serde::Serialize;

/// Payload of `GET /search`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub query: String,
    pub limit: i64,
    pub count: usize,
    pub results: Vec<ResultEntry>,
}

impl SearchResponse {
    /// Builds a response whose `count` always matches `results`
    ///
    /// `success` is false when nothing survived the pipeline.
    pub fn from_results(query: &str, limit: i64, results: Vec<ResultEntry>) -> Self {
        Self {
            success: !results.is_empty(),
            query: query.to_string(),
            limit,
            count: results.len(),
            results,
        }
    }

    /// Response for a request that asked for nothing
    pub fn empty_request(query: &str, limit: i64) -> Self {
        Self {
            success: true,
            query: query.to_string(),
            limit,
            count: 0,
            results: Vec::new(),
        }
    }
}

/// Payload of `GET /`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthPayload {
    pub message: String,
    pub github: String,
    pub example_usage: String,
}
