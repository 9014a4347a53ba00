// src/aggregate/providers/naver_news.rs
//! Naver News Open API adapter — the native-language (Korean) press corpus.
//!
//! JSON search endpoint authenticated by a client id/secret header pair.
//! Naver wraps query hits in `<b>` tags inside titles and descriptions;
//! both are stripped before the article is built.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::counter;
use serde::Deserialize;

use crate::aggregate::providers::{
    clean_text, fallback_fetch, parse_published_at, strip_tags, REQUEST_TIMEOUT_SECS,
};
use crate::aggregate::types::{Article, SourceAdapter};
use crate::query::QueryPlan;

const SEARCH_URL: &str = "https://openapi.naver.com/v1/search/news.json";
const PAGE_SIZE: u32 = 30;

#[derive(Debug, Deserialize)]
struct NaverResponse {
    #[serde(default)]
    items: Vec<NaverItem>,
}

#[derive(Debug, Deserialize)]
struct NaverItem {
    title: Option<String>,
    /// Link to the original publisher page; preferred over the Naver mirror.
    originallink: Option<String>,
    link: Option<String>,
    description: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
}

pub struct NaverNewsAdapter {
    client: reqwest::Client,
    search_url: String,
    client_id: String,
    client_secret: String,
}

impl NaverNewsAdapter {
    pub fn new(client_id: String, client_secret: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            search_url: SEARCH_URL.to_string(),
            client_id,
            client_secret,
        }
    }

    #[allow(dead_code)]
    pub fn with_search_url(mut self, url: &str) -> Self {
        self.search_url = url.to_string();
        self
    }

    async fn query_once(&self, query: String) -> Result<Vec<Article>> {
        let display = PAGE_SIZE.to_string();
        let resp = self
            .client
            .get(&self.search_url)
            .query(&[
                ("query", query.as_str()),
                ("display", display.as_str()),
                ("sort", "date"),
            ])
            .header("X-Naver-Client-Id", &self.client_id)
            .header("X-Naver-Client-Secret", &self.client_secret)
            .send()
            .await
            .context("naver news get()")?;
        if !resp.status().is_success() {
            anyhow::bail!("naver news status {}", resp.status());
        }
        let body = resp.text().await.context("naver news .text()")?;
        parse_response(&body)
    }
}

/// Parse one Naver search response into articles.
pub fn parse_response(body: &str) -> Result<Vec<Article>> {
    let parsed: NaverResponse = serde_json::from_str(body).context("parsing naver news json")?;

    let mut out = Vec::with_capacity(parsed.items.len());
    for it in parsed.items {
        let title = clean_text(&strip_tags(it.title.as_deref().unwrap_or_default()));

        // Prefer the original publisher URL; the Naver mirror is a fallback.
        let url = [it.originallink.as_deref(), it.link.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|l| !l.is_empty());
        let url = match url {
            Some(u) => u.to_string(),
            None => continue,
        };

        let description = it
            .description
            .as_deref()
            .map(|d| clean_text(&strip_tags(d)))
            .filter(|d| !d.is_empty());

        let article = Article {
            title,
            url,
            source: "Naver News".to_string(),
            published_at: it.pub_date.as_deref().and_then(parse_published_at),
            description,
            native: true,
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
impl SourceAdapter for NaverNewsAdapter {
    async fn fetch(&self, plan: &QueryPlan, _window: Duration) -> Vec<Article> {
        fallback_fetch(self.name(), plan, |q| self.query_once(q)).await
    }

    fn name(&self) -> &'static str {
        "naver_news"
    }
}
