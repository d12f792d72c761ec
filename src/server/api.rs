//! Route handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use super::state::AppState;
use crate::model::{HealthPayload, SearchResponse};

/// Message shown on the health route
pub const HEALTH_MESSAGE: &str = "Search API for PDALife.com";

/// Sample request shown on the health route
pub const EXAMPLE_USAGE: &str = "/search?query=minecraft&limit=5";

/// Error body for rejected requests
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Query parameters of `GET /search`
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: String,
    pub limit: Option<i64>,
}

/// Static health payload
pub async fn health_check(State(state): State<AppState>) -> Json<HealthPayload> {
    Json(HealthPayload {
        message: HEALTH_MESSAGE.to_string(),
        github: state.config.server.github.clone(),
        example_usage: EXAMPLE_USAGE.to_string(),
    })
}

/// Runs one search
///
/// Upstream failures never surface as HTTP errors; they show up as
/// `success: false` in a 200 response. Only a blank query is rejected here,
/// missing or mistyped parameters are rejected by the extractor.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, (StatusCode, Json<ErrorResponse>)> {
    let query = params.query.trim();
    if query.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "query must not be blank".to_string(),
            }),
        ));
    }

    let limit = params.limit.unwrap_or(state.config.crawler.default_limit);

    Ok(Json(state.aggregator.run(query, limit).await))
}
