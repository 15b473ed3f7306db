//! HTTP routes: health, search and cache statistics.

use std::time::{Duration, Instant};

use axum::{
    Json, Router,
    extract::{Query, State, rejection::QueryRejection},
    routing::get,
};
use msgsearch_core::{Error, Record, search_records};
use serde::{Deserialize, Serialize};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::error::ApiError;
use crate::state::AppState;

/// Creates the web server router.
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/search", get(search))
        .route("/cache/stats", get(cache_stats))
        .with_state(state)
        .layer((TraceLayer::new_for_http(), TimeoutLayer::new(request_timeout)))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub messages_loaded: usize,
    pub dataset_fresh: bool,
    pub refreshed_at: f64,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.store().snapshot();
    Json(HealthResponse {
        ok: true,
        messages_loaded: snapshot.len(),
        dataset_fresh: state.is_fresh(),
        refreshed_at: snapshot.refreshed_at_epoch_secs(),
    })
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    /// Force a refresh from upstream before searching.
    #[serde(default)]
    pub refresh: bool,
}

impl SearchParams {
    /// Checked `(skip, limit)` as indexes.
    fn window(&self) -> Result<(usize, usize), ApiError> {
        if self.query.is_empty() {
            return Err(Error::InvalidInput("query must be at least 1 character".into()).into());
        }
        let skip = usize::try_from(self.skip).map_err(|_| Error::InvalidInput("skip must be >= 0".into()))?;
        let limit = usize::try_from(self.limit)
            .ok()
            .filter(|limit| *limit >= 1)
            .ok_or_else(|| Error::InvalidInput("limit must be >= 1".into()))?;
        Ok((skip, limit))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub skip: usize,
    pub limit: usize,
    pub total: usize,
    pub items: Vec<Record>,
    pub refreshed_at: f64,
    pub response_time_ms: f64,
}

async fn search(
    State(state): State<AppState>, params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Query(params) = params.map_err(|e| Error::InvalidInput(e.body_text()))?;
    let (skip, limit) = params.window()?;
    let start = Instant::now();

    let snapshot = state.refresh(params.refresh).await?;

    let hits = search_records(snapshot.records(), &params.query);
    let total = hits.len();
    let items: Vec<Record> = hits.into_iter().skip(skip).take(limit).cloned().collect();

    let response_time_ms = start.elapsed().as_secs_f64() * 1000.0;
    tracing::info!(query = %params.query, total, elapsed_ms = response_time_ms, "search completed");

    Ok(Json(SearchResponse {
        query: params.query,
        skip,
        limit,
        total,
        items,
        refreshed_at: snapshot.refreshed_at_epoch_secs(),
        response_time_ms,
    }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatasetStats {
    pub messages_count: usize,
    pub is_fresh: bool,
    pub refreshed_at: f64,
    pub fetch_incomplete: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CacheStatsResponse {
    pub dataset: DatasetStats,
}

async fn cache_stats(State(state): State<AppState>) -> Json<CacheStatsResponse> {
    let snapshot = state.store().snapshot();
    Json(CacheStatsResponse {
        dataset: DatasetStats {
            messages_count: snapshot.len(),
            is_fresh: state.is_fresh(),
            refreshed_at: snapshot.refreshed_at_epoch_secs(),
            fetch_incomplete: snapshot.fetch_incomplete(),
        },
    })
}
