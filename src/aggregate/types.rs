// src/aggregate/types.rs
use std::time::Duration;

use crate::query::QueryPlan;

/// One normalized news article. Identity is the URL; never mutated after the
/// adapter that parsed it returns it.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub url: String,
    /// Publisher name when the provider exposes one, otherwise the provider.
    pub source: String,
    /// Unix seconds; None when the provider's date was unparseable.
    /// None is treated as "recent" downstream (fail-open).
    pub published_at: Option<i64>,
    pub description: Option<String>,
    /// Set by adapters serving the fixture's native-language press corpus.
    pub native: bool,
}

/// Minimum trimmed title length; anything shorter is boilerplate or a
/// truncation artifact and is discarded at ingestion.
pub const MIN_TITLE_CHARS: usize = 10;

impl Article {
    /// Ingestion invariant: trimmed title length ≥ 10 chars.
    pub fn has_usable_title(&self) -> bool {
        self.title.trim().chars().count() >= MIN_TITLE_CHARS
    }
}

/// One provider behind the uniform fetch contract. Implementations own
/// their parsing and their query-fallback loop; a failure never crosses
/// this boundary — total failure is an empty list.
#[async_trait::async_trait]
pub trait SourceAdapter: Send + Sync {
    async fn fetch(&self, plan: &QueryPlan, window: Duration) -> Vec<Article>;
    fn name(&self) -> &'static str;
}
