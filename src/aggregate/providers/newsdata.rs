// src/aggregate/providers/newsdata.rs
//! NewsData.io adapter — JSON search API keyed by a single API credential.
//!
//! Publish dates arrive as `"YYYY-MM-DD HH:MM:SS"` in UTC, which neither
//! RFC 2822 nor RFC 3339 covers, so this adapter parses them explicitly
//! before falling back to the shared best-effort parser.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::counter;
use serde::Deserialize;

use crate::aggregate::providers::{
    clean_text, fallback_fetch, parse_published_at, REQUEST_TIMEOUT_SECS,
};
use crate::aggregate::types::{Article, SourceAdapter};
use crate::query::QueryPlan;

const SEARCH_URL: &str = "https://newsdata.io/api/1/news";

#[derive(Debug, Deserialize)]
struct NewsDataResponse {
    #[serde(default)]
    results: Vec<NewsDataItem>,
}

#[derive(Debug, Deserialize)]
struct NewsDataItem {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    source_id: Option<String>,
}

pub struct NewsDataAdapter {
    client: reqwest::Client,
    search_url: String,
    api_key: String,
}

impl NewsDataAdapter {
    pub fn new(api_key: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            search_url: SEARCH_URL.to_string(),
            api_key,
        }
    }

    #[allow(dead_code)]
    pub fn with_search_url(mut self, url: &str) -> Self {
        self.search_url = url.to_string();
        self
    }

    async fn query_once(&self, query: String) -> Result<Vec<Article>> {
        let resp = self
            .client
            .get(&self.search_url)
            .query(&[
                ("apikey", self.api_key.as_str()),
                ("q", query.as_str()),
                ("language", "en"),
            ])
            .send()
            .await
            .context("newsdata get()")?;
        if !resp.status().is_success() {
            anyhow::bail!("newsdata status {}", resp.status());
        }
        let body = resp.text().await.context("newsdata .text()")?;
        parse_response(&body)
    }
}

fn parse_newsdata_date(raw: &str) -> Option<i64> {
    chrono::NaiveDateTime::parse_from_str(raw.trim(), "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|dt| dt.and_utc().timestamp())
        .or_else(|| parse_published_at(raw))
}

/// Parse one NewsData search response into articles.
pub fn parse_response(body: &str) -> Result<Vec<Article>> {
    let parsed: NewsDataResponse = serde_json::from_str(body).context("parsing newsdata json")?;

    let mut out = Vec::with_capacity(parsed.results.len());
    for it in parsed.results {
        let title = clean_text(it.title.as_deref().unwrap_or_default());

        let url = match it.link {
            Some(l) if !l.trim().is_empty() => l.trim().to_string(),
            _ => continue,
        };

        let description = it
            .description
            .as_deref()
            .map(clean_text)
            .filter(|d| !d.is_empty());

        let article = Article {
            title,
            url,
            source: it
                .source_id
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| "NewsData".to_string()),
            published_at: it.pub_date.as_deref().and_then(parse_newsdata_date),
            description,
            native: false,
        };
        if !article.has_usable_title() {
            continue;
        }
        out.push(article);
    }

    counter!("aggregate_articles_total").increment(out.len() as u64);
    Ok(out)
}

#[async_trait]
impl SourceAdapter for NewsDataAdapter {
    async fn fetch(&self, plan: &QueryPlan, _window: Duration) -> Vec<Article> {
        fallback_fetch(self.name(), plan, |q| self.query_once(q)).await
    }

    fn name(&self) -> &'static str {
        "newsdata"
    }
}
