// src/aggregate/mod.rs
pub mod providers;
pub mod types;

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge};
use once_cell::sync::OnceCell;

use crate::aggregate::types::{Article, SourceAdapter};
use crate::entity::Entity;
use crate::query::QueryPlan;
use crate::rank::{rank, AggregationResult, HeadlinePolicy};
use crate::scoring::{excluded_terms, score, Lexicon};

/// Trailing window inside which an article counts as current.
pub const DEFAULT_RECENCY_WINDOW: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Keyword / headline caps for the ranked result.
pub const DEFAULT_TOP_KEYWORDS: usize = 6;
pub const DEFAULT_TOP_HEADLINES: usize = 10;

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(
            "aggregate_articles_total",
            "Articles parsed from provider responses."
        );
        describe_counter!(
            "aggregate_dedup_total",
            "Articles dropped as duplicate URLs."
        );
        describe_counter!(
            "aggregate_stale_total",
            "Articles dropped by the recency window."
        );
        describe_counter!(
            "aggregate_provider_errors_total",
            "Provider fetch/parse errors (absorbed at the adapter boundary)."
        );
        describe_histogram!("aggregate_parse_ms", "Provider parse time in milliseconds.");
        describe_gauge!(
            "aggregate_last_run_ts",
            "Unix ts when an aggregation last ran."
        );
    });
}

/// Raw fan-in product: merged articles in provider-registration order plus
/// per-provider result counts (zero for failed/empty providers).
#[derive(Debug, Clone)]
pub struct Corpus {
    pub articles: Vec<Article>,
    pub per_source_counts: BTreeMap<String, usize>,
}

/// Fan out to every adapter concurrently and join in registration order.
///
/// Each adapter self-bounds its own requests, so there is no outer deadline
/// here; the join simply waits for the slowest adapter. Merging in
/// registration order (not arrival order) keeps the output deterministic
/// under concurrent completion.
pub async fn aggregate(
    home: &Entity,
    away: &Entity,
    adapters: &[Arc<dyn SourceAdapter>],
    window: Duration,
) -> Corpus {
    ensure_metrics_described();

    let plan = Arc::new(QueryPlan::for_pair(home, away));

    let mut handles = Vec::with_capacity(adapters.len());
    for adapter in adapters {
        let adapter = Arc::clone(adapter);
        let plan = Arc::clone(&plan);
        handles.push(tokio::spawn(async move {
            adapter.fetch(&plan, window).await
        }));
    }

    let mut articles = Vec::new();
    let mut per_source_counts = BTreeMap::new();
    for (adapter, handle) in adapters.iter().zip(handles) {
        let fetched = match handle.await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!(error = ?e, provider = adapter.name(), "adapter task failed");
                Vec::new()
            }
        };
        per_source_counts.insert(adapter.name().to_string(), fetched.len());
        articles.extend(fetched);
    }

    gauge!("aggregate_last_run_ts").set(chrono::Utc::now().timestamp().max(0) as f64);

    Corpus {
        articles,
        per_source_counts,
    }
}

/// Keep the first occurrence of each URL, drop the rest. Idempotent and
/// deterministic given a fixed input order.
pub fn dedupe(articles: Vec<Article>) -> Vec<Article> {
    let mut seen: HashSet<String> = HashSet::with_capacity(articles.len());
    let mut kept = Vec::with_capacity(articles.len());
    let mut dropped = 0usize;
    for a in articles {
        if seen.insert(a.url.clone()) {
            kept.push(a);
        } else {
            dropped += 1;
        }
    }
    if dropped > 0 {
        counter!("aggregate_dedup_total").increment(dropped as u64);
    }
    kept
}

/// Keep articles published inside the trailing window. Undated articles are
/// retained (fail-open): an unparseable date is not evidence of staleness.
pub fn recency_filter(articles: Vec<Article>, window: Duration, now: i64) -> Vec<Article> {
    let window = window.as_secs() as i64;
    let mut dropped = 0usize;
    let kept: Vec<Article> = articles
        .into_iter()
        .filter(|a| {
            let keep = match a.published_at {
                None => true,
                Some(ts) => now.saturating_sub(ts) <= window,
            };
            if !keep {
                dropped += 1;
            }
            keep
        })
        .collect();
    if dropped > 0 {
        counter!("aggregate_stale_total").increment(dropped as u64);
    }
    kept
}

/// Full pipeline for one fixture: fan-out → dedupe → recency filter →
/// TF-IDF scoring → ranking. One fresh run per call; nothing persists.
pub async fn match_context(
    home: &Entity,
    away: &Entity,
    adapters: &[Arc<dyn SourceAdapter>],
    lexicon: &Lexicon,
    window: Duration,
    policy: HeadlinePolicy,
) -> AggregationResult {
    let corpus = aggregate(home, away, adapters, window).await;
    let now = chrono::Utc::now().timestamp();

    let articles = recency_filter(dedupe(corpus.articles), window, now);

    let excluded = excluded_terms(home, away, lexicon);
    let stats = score(&articles, &excluded, lexicon);

    rank(
        stats,
        &articles,
        corpus.per_source_counts,
        DEFAULT_TOP_KEYWORDS,
        DEFAULT_TOP_HEADLINES,
        policy,
    )
}
