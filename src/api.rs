// src/api.rs
//! Caller-facing HTTP surface for the display layer.
//!
//! One request per fixture: `GET /match-context?home=..&away=..` returns the
//! flat `{keywords, headlines, totalArticles, sources}` structure. Missing
//! input is a 400 with an explicit error body; "no results found" is a
//! well-formed 200 with empty lists — the two are never conflated.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use shuttle_axum::axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tower_http::cors::CorsLayer;

use crate::aggregate::match_context;
use crate::aggregate::types::{Article, SourceAdapter};
use crate::cache::ContextCache;
use crate::entity::Entity;
use crate::rank::{AggregationResult, HeadlinePolicy};
use crate::scoring::{Lexicon, TermStat};

#[derive(Clone)]
pub struct AppState {
    pub adapters: Arc<Vec<Arc<dyn SourceAdapter>>>,
    pub lexicon: Arc<Lexicon>,
    pub cache: Arc<ContextCache>,
    pub recency_window: Duration,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/match-context", get(match_context_handler))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Deserialize)]
struct MatchContextParams {
    home: Option<String>,
    away: Option<String>,
    /// Headline policy: "keyword" (default) or "priority".
    headlines: Option<String>,
}

#[derive(serde::Serialize)]
struct ApiError {
    error: String,
}

#[derive(serde::Serialize)]
struct KeywordOut {
    keyword: String,
    count: u32,
    relevance: f64,
}

#[derive(serde::Serialize)]
struct HeadlineOut {
    title: String,
    url: String,
    source: String,
    date: Option<String>,
}

#[derive(serde::Serialize)]
struct MatchContextResponse {
    keywords: Vec<KeywordOut>,
    headlines: Vec<HeadlineOut>,
    #[serde(rename = "totalArticles")]
    total_articles: usize,
    sources: BTreeMap<String, usize>,
}

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

fn bad_request(msg: impl Into<String>) -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiError { error: msg.into() }),
    )
}

/// Reject blank or all-generic names before the pipeline starts.
fn require_entity(raw: Option<&str>, field: &str) -> ApiResult<Entity> {
    let raw = raw.unwrap_or_default();
    if raw.trim().is_empty() {
        return Err(bad_request(format!("missing required input: {field}")));
    }
    let entity = Entity::new(raw);
    if entity.canonical().is_empty() {
        return Err(bad_request(format!(
            "missing required input: {field} has no searchable name"
        )));
    }
    Ok(entity)
}

async fn match_context_handler(
    State(state): State<AppState>,
    Query(params): Query<MatchContextParams>,
) -> ApiResult<Json<MatchContextResponse>> {
    let home = require_entity(params.home.as_deref(), "home")?;
    let away = require_entity(params.away.as_deref(), "away")?;

    let policy: HeadlinePolicy = match params.headlines.as_deref() {
        None => HeadlinePolicy::default(),
        Some(raw) => raw.parse().map_err(bad_request)?,
    };
    let policy_key = match policy {
        HeadlinePolicy::KeywordCorrelated => "keyword",
        HeadlinePolicy::PrioritySorted => "priority",
    };

    if let Some(cached) = state
        .cache
        .get(home.canonical(), away.canonical(), policy_key)
    {
        tracing::debug!(home = home.canonical(), away = away.canonical(), "cache hit");
        return Ok(Json(render(&cached)));
    }

    let result = match_context(
        &home,
        &away,
        &state.adapters,
        &state.lexicon,
        state.recency_window,
        policy,
    )
    .await;

    let result = Arc::new(result);
    state.cache.insert(
        home.canonical(),
        away.canonical(),
        policy_key,
        Arc::clone(&result),
    );

    Ok(Json(render(&result)))
}

fn render(result: &AggregationResult) -> MatchContextResponse {
    MatchContextResponse {
        keywords: result.keywords.iter().map(keyword_out).collect(),
        headlines: result.headlines.iter().map(headline_out).collect(),
        total_articles: result.total_articles,
        sources: result.per_source_counts.clone(),
    }
}

fn keyword_out(stat: &TermStat) -> KeywordOut {
    KeywordOut {
        keyword: stat.term.clone(),
        count: stat.term_frequency,
        relevance: stat.score,
    }
}

fn headline_out(article: &Article) -> HeadlineOut {
    HeadlineOut {
        title: article.title.clone(),
        url: article.url.clone(),
        source: article.source.clone(),
        date: article.published_at.and_then(format_unix_rfc3339),
    }
}

fn format_unix_rfc3339(ts: i64) -> Option<String> {
    OffsetDateTime::from_unix_timestamp(ts)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
}
