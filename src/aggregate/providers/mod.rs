// src/aggregate/providers/mod.rs
pub mod google_news;
pub mod naver_news;
pub mod newsdata;

use std::future::Future;

use anyhow::Result;
use metrics::counter;

use crate::aggregate::types::Article;
use crate::query::QueryPlan;

/// Per-request deadline shared by all providers.
pub const REQUEST_TIMEOUT_SECS: u64 = 5;

/// Ordered query fallback, shared by every adapter.
///
/// Walks the plan most-specific-first, issuing one request per query via
/// `query_once`. The first non-empty parse wins and short-circuits the rest.
/// Request failures and empty results both fall through to the next query;
/// exhaustion returns an empty list. Nothing propagates past this function.
pub(crate) async fn fallback_fetch<F, Fut>(
    provider: &'static str,
    plan: &QueryPlan,
    mut query_once: F,
) -> Vec<Article>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<Vec<Article>>>,
{
    for q in plan.queries() {
        match query_once(q.clone()).await {
            Ok(items) if !items.is_empty() => {
                tracing::debug!(provider, query = %q, count = items.len(), "query hit");
                return items;
            }
            Ok(_) => {
                tracing::debug!(provider, query = %q, "query empty, falling back");
            }
            Err(e) => {
                tracing::warn!(error = ?e, provider, query = %q, "provider query error");
                counter!("aggregate_provider_errors_total").increment(1);
            }
        }
    }
    Vec::new()
}

/// Best-effort publish-date parse: RFC 2822 first (RSS, Naver — including
/// the alphabetic "GMT" zone Google News emits), then RFC 3339. None when
/// neither matches — the recency filter fails open.
pub(crate) fn parse_published_at(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    chrono::DateTime::parse_from_rfc2822(raw)
        .or_else(|_| chrono::DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|dt| dt.timestamp())
}

/// Decode HTML entities and collapse whitespace in a provider title or
/// description snippet.
pub(crate) fn clean_text(raw: &str) -> String {
    let decoded = html_escape::decode_html_entities(raw);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip an inline-markup-bearing snippet (Naver wraps query hits in <b>).
pub(crate) fn strip_tags(raw: &str) -> String {
    static RE_TAGS: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let re = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").expect("tag regex"));
    re.replace_all(raw, "").to_string()
}

/// Split a `"Title - Publisher"` headline into (title, Some(publisher)).
/// Google News appends the publisher this way; other providers do not.
pub(crate) fn split_publisher_suffix(title: &str) -> (String, Option<String>) {
    if let Some(pos) = title.rfind(" - ") {
        let head = title[..pos].trim();
        let tail = title[pos + 3..].trim();
        if !head.is_empty() && !tail.is_empty() {
            return (head.to_string(), Some(tail.to_string()));
        }
    }
    (title.trim().to_string(), None)
}
