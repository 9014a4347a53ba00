// tests/aggregate_orchestrator.rs
//
// Fan-out/fan-in behavior of the orchestrator: partial-failure isolation,
// deterministic merge order under concurrent completion, per-source counts.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use matchfeed::aggregate::aggregate;
use matchfeed::aggregate::types::{Article, SourceAdapter};
use matchfeed::entity::Entity;
use matchfeed::query::QueryPlan;

fn article(url: &str, source: &str) -> Article {
    Article {
        title: format!("A headline long enough for {source}"),
        url: url.into(),
        source: source.into(),
        published_at: None,
        description: None,
        native: false,
    }
}

/// Returns a fixed article list after an optional delay.
struct FixedAdapter {
    name: &'static str,
    articles: Vec<Article>,
    delay: Duration,
}

#[async_trait]
impl SourceAdapter for FixedAdapter {
    async fn fetch(&self, _plan: &QueryPlan, _window: Duration) -> Vec<Article> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.articles.clone()
    }

    fn name(&self) -> &'static str {
        self.name
    }
}

/// Simulates a provider whose network calls always fail: every failure is
/// absorbed at the adapter boundary, so the contract output is empty.
struct BrokenAdapter;

#[async_trait]
impl SourceAdapter for BrokenAdapter {
    async fn fetch(&self, _plan: &QueryPlan, _window: Duration) -> Vec<Article> {
        Vec::new()
    }

    fn name(&self) -> &'static str {
        "broken"
    }
}

#[tokio::test]
async fn partial_failure_keeps_remaining_sources_and_reports_zero() {
    let adapters: Vec<Arc<dyn SourceAdapter>> = vec![
        Arc::new(BrokenAdapter),
        Arc::new(FixedAdapter {
            name: "healthy",
            articles: vec![article("https://h/1", "healthy"), article("https://h/2", "healthy")],
            delay: Duration::ZERO,
        }),
    ];

    let corpus = aggregate(
        &Entity::new("Seoul"),
        &Entity::new("Ulsan"),
        &adapters,
        Duration::from_secs(600),
    )
    .await;

    assert_eq!(corpus.articles.len(), 2);
    assert_eq!(corpus.per_source_counts.get("broken"), Some(&0));
    assert_eq!(corpus.per_source_counts.get("healthy"), Some(&2));
}

#[tokio::test]
async fn merge_order_is_registration_order_not_arrival_order() {
    // The first adapter finishes last; its articles must still come first.
    let adapters: Vec<Arc<dyn SourceAdapter>> = vec![
        Arc::new(FixedAdapter {
            name: "slow",
            articles: vec![article("https://s/1", "slow")],
            delay: Duration::from_millis(80),
        }),
        Arc::new(FixedAdapter {
            name: "fast",
            articles: vec![article("https://f/1", "fast")],
            delay: Duration::ZERO,
        }),
    ];

    let corpus = aggregate(
        &Entity::new("Seoul"),
        &Entity::new("Ulsan"),
        &adapters,
        Duration::from_secs(600),
    )
    .await;

    let urls: Vec<&str> = corpus.articles.iter().map(|a| a.url.as_str()).collect();
    assert_eq!(urls, vec!["https://s/1", "https://f/1"]);
}

#[tokio::test]
async fn no_adapters_is_an_empty_run_not_an_error() {
    let adapters: Vec<Arc<dyn SourceAdapter>> = Vec::new();
    let corpus = aggregate(
        &Entity::new("Seoul"),
        &Entity::new("Ulsan"),
        &adapters,
        Duration::from_secs(600),
    )
    .await;
    assert!(corpus.articles.is_empty());
    assert!(corpus.per_source_counts.is_empty());
}
