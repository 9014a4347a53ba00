// src/aggregate/providers/google_news.rs
//! Google News RSS search adapter.
//!
//! Queries the public RSS search feed and parses RSS 2.0 via quick-xml.
//! Google News appends the publisher as a `" - Publisher"` title suffix;
//! we strip it into `Article::source`.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;

use crate::aggregate::providers::{
    clean_text, fallback_fetch, parse_published_at, split_publisher_suffix, strip_tags,
    REQUEST_TIMEOUT_SECS,
};
use crate::aggregate::types::{Article, SourceAdapter};
use crate::query::QueryPlan;

const FEED_URL: &str = "https://news.google.com/rss/search";

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}
#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}
#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
}

pub struct GoogleNewsAdapter {
    client: reqwest::Client,
    feed_url: String,
}

impl GoogleNewsAdapter {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent("matchfeed/0.1")
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            feed_url: FEED_URL.to_string(),
        }
    }

    /// Point the adapter at a different feed endpoint (tests).
    #[allow(dead_code)]
    pub fn with_feed_url(mut self, url: &str) -> Self {
        self.feed_url = url.to_string();
        self
    }

    async fn query_once(&self, query: String) -> Result<Vec<Article>> {
        let resp = self
            .client
            .get(&self.feed_url)
            .query(&[
                ("q", query.as_str()),
                ("hl", "en-US"),
                ("gl", "US"),
                ("ceid", "US:en"),
            ])
            .send()
            .await
            .context("google news rss get()")?;
        if !resp.status().is_success() {
            anyhow::bail!("google news rss status {}", resp.status());
        }
        let body = resp.text().await.context("google news rss .text()")?;
        parse_rss(&body)
    }
}

impl Default for GoogleNewsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse one RSS search response into articles.
pub fn parse_rss(body: &str) -> Result<Vec<Article>> {
    let t0 = std::time::Instant::now();
    let xml_clean = scrub_html_entities_for_xml(body);
    let rss: Rss = from_str(&xml_clean).context("parsing google news rss xml")?;

    let mut out = Vec::with_capacity(rss.channel.item.len());
    for it in rss.channel.item {
        let raw_title = clean_text(it.title.as_deref().unwrap_or_default());
        let (title, publisher) = split_publisher_suffix(&raw_title);

        let url = match it.link {
            Some(l) if !l.trim().is_empty() => l.trim().to_string(),
            _ => continue,
        };

        let description = it
            .description
            .as_deref()
            .map(|d| clean_text(&strip_tags(d)))
            .filter(|d| !d.is_empty());

        let article = Article {
            title,
            url,
            source: publisher.unwrap_or_else(|| "Google News".to_string()),
            published_at: it.pub_date.as_deref().and_then(parse_published_at),
            description,
            native: false,
        };
        if !article.has_usable_title() {
            continue;
        }
        out.push(article);
    }

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("aggregate_parse_ms").record(ms);
    counter!("aggregate_articles_total").increment(out.len() as u64);
    Ok(out)
}

#[async_trait]
impl SourceAdapter for GoogleNewsAdapter {
    async fn fetch(&self, plan: &QueryPlan, _window: Duration) -> Vec<Article> {
        fallback_fetch(self.name(), plan, |q| self.query_once(q)).await
    }

    fn name(&self) -> &'static str {
        "google_news"
    }
}

/// quick-xml rejects bare HTML entities inside element text; replace the
/// usual offenders before deserializing.
fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}
