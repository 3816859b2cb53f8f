use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::cache::{CacheState, CachedView, FreshnessCache};
use crate::error::AppError;
use crate::export::{to_export_string, ExportFormat};
use crate::filter::{filter_history, MatchFilter};
use crate::loader::HttpSnapshotLoader;
use crate::stats::{compute_stats, SnapshotStats};
use crate::types::{MatchEvent, OddsStatus};

#[derive(Clone)]
pub struct ApiState {
    pub cache: Arc<FreshnessCache<HttpSnapshotLoader>>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(get_index))
        .route("/health", get(get_health))
        .route("/matches", get(get_matches))
        .route("/matches/export.csv", get(export_matches_csv))
        .route("/matches/export.tsv", get(export_matches_tsv))
        .route("/history", get(get_history))
        .route("/history/export.csv", get(export_history_csv))
        .route("/stats/summary", get(get_stats_summary))
        .route("/refresh", post(post_refresh))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Query param structs
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct MatchesQuery {
    pub league: Option<String>,
    /// "open" / "closed" (upstream "AÇIK"/"KAPALI" also accepted).
    pub odds: Option<String>,
    pub goals_only: Option<bool>,
}

impl MatchesQuery {
    fn to_filter(&self) -> MatchFilter {
        MatchFilter {
            league: self.league.clone(),
            odds: self.odds.as_deref().and_then(OddsStatus::parse),
            goals_only: self.goals_only.unwrap_or(false),
        }
    }
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    /// Display date to filter on, e.g. "01.05.2024".
    pub date: Option<String>,
    pub limit: Option<usize>,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct MatchesResponse {
    pub matches: Vec<MatchEvent>,
    pub last_update_ts: i64,
    pub state: CacheState,
    /// Set when the latest reload failed and older data (or none) is shown.
    pub notice: Option<String>,
}

#[derive(Serialize)]
pub struct HistoryResponse {
    pub rows: Vec<MatchEvent>,
    pub total_rows: usize,
    pub state: CacheState,
    pub notice: Option<String>,
}

#[derive(Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: SnapshotStats,
    pub last_update_ts: i64,
    pub state: CacheState,
    pub notice: Option<String>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub cache_state: CacheState,
    pub loaded_at_ts: Option<i64>,
    pub match_count: Option<usize>,
    pub history_rows: Option<usize>,
}

#[derive(Serialize)]
pub struct RefreshResponse {
    pub state: CacheState,
    pub match_count: usize,
    pub notice: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn get_index() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "livescore-viewer",
        "endpoints": [
            "/health",
            "/matches",
            "/matches/export.csv",
            "/matches/export.tsv",
            "/history",
            "/history/export.csv",
            "/stats/summary",
            "/refresh"
        ]
    }))
}

async fn get_health(State(state): State<ApiState>) -> Json<HealthResponse> {
    let view = state.cache.peek().await;
    Json(HealthResponse {
        cache_state: view.state,
        loaded_at_ts: view.data.as_ref().map(|d| d.loaded_at_ts),
        match_count: view.data.as_ref().map(|d| d.latest.len()),
        history_rows: view.data.as_ref().map(|d| d.history.len()),
    })
}

async fn get_matches(
    State(state): State<ApiState>,
    Query(params): Query<MatchesQuery>,
) -> Json<MatchesResponse> {
    let view = state.cache.get_or_load().await;
    let filter = params.to_filter();

    let (matches, last_update_ts) = match &view.data {
        Some(data) => (filter.apply(&data.latest), data.last_update_ts()),
        None => (Vec::new(), 0),
    };

    Json(MatchesResponse { matches, last_update_ts, state: view.state, notice: view.notice })
}

async fn get_history(
    State(state): State<ApiState>,
    Query(params): Query<HistoryQuery>,
) -> Json<HistoryResponse> {
    let view = state.cache.get_or_load().await;
    let limit = params.limit.unwrap_or(usize::MAX);

    let (rows, total_rows) = match &view.data {
        Some(data) => (
            filter_history(&data.history, params.date.as_deref(), limit),
            data.history.len(),
        ),
        None => (Vec::new(), 0),
    };

    Json(HistoryResponse { rows, total_rows, state: view.state, notice: view.notice })
}

async fn get_stats_summary(State(state): State<ApiState>) -> Json<StatsResponse> {
    let view = state.cache.get_or_load().await;

    let (stats, last_update_ts) = match &view.data {
        Some(data) => (compute_stats(&data.latest), data.last_update_ts()),
        None => (compute_stats(&[]), 0),
    };

    Json(StatsResponse { stats, last_update_ts, state: view.state, notice: view.notice })
}

/// Explicit user-triggered refresh: drop freshness and reload now.
async fn post_refresh(State(state): State<ApiState>) -> Json<RefreshResponse> {
    state.cache.invalidate().await;
    let view = state.cache.get_or_load().await;
    Json(RefreshResponse {
        state: view.state,
        match_count: view.data.as_ref().map_or(0, |d| d.latest.len()),
        notice: view.notice,
    })
}

async fn export_matches_csv(
    state: State<ApiState>,
    params: Query<MatchesQuery>,
) -> Result<impl IntoResponse, AppError> {
    export_matches(state, params, ExportFormat::Csv).await
}

async fn export_matches_tsv(
    state: State<ApiState>,
    params: Query<MatchesQuery>,
) -> Result<impl IntoResponse, AppError> {
    export_matches(state, params, ExportFormat::Tsv).await
}

async fn export_matches(
    State(state): State<ApiState>,
    Query(params): Query<MatchesQuery>,
    format: ExportFormat,
) -> Result<impl IntoResponse, AppError> {
    let view = state.cache.get_or_load().await;
    let data = require_data(&view)?;
    let matches = params.to_filter().apply(&data.latest);
    Ok(export_response("canli_futbol", &matches, format))
}

async fn export_history_csv(
    State(state): State<ApiState>,
    Query(params): Query<HistoryQuery>,
) -> Result<impl IntoResponse, AppError> {
    let view = state.cache.get_or_load().await;
    let data = require_data(&view)?;
    let rows = filter_history(
        &data.history,
        params.date.as_deref(),
        params.limit.unwrap_or(usize::MAX),
    );
    Ok(export_response("tum_kayitlar", &rows, ExportFormat::Csv))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Exports have no place to carry a notice, so no-data is a hard error.
fn require_data(view: &CachedView) -> Result<Arc<crate::types::SnapshotData>, AppError> {
    view.data.clone().ok_or(AppError::EmptyResult)
}

fn export_response(
    stem: &str,
    events: &[MatchEvent],
    format: ExportFormat,
) -> impl IntoResponse {
    let body = to_export_string(events, format);
    (
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{stem}.{}\"", format.ext()),
            ),
        ],
        body,
    )
}
