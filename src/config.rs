// src/config.rs
//! Process configuration: provider credentials and tuning knobs from env.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::aggregate::providers::google_news::GoogleNewsAdapter;
use crate::aggregate::providers::naver_news::NaverNewsAdapter;
use crate::aggregate::providers::newsdata::NewsDataAdapter;
use crate::aggregate::types::SourceAdapter;
use crate::aggregate::DEFAULT_RECENCY_WINDOW;
use crate::cache::DEFAULT_CACHE_TTL_SECS;

pub const ENV_NAVER_CLIENT_ID: &str = "NAVER_CLIENT_ID";
pub const ENV_NAVER_CLIENT_SECRET: &str = "NAVER_CLIENT_SECRET";
pub const ENV_NEWSDATA_API_KEY: &str = "NEWSDATA_API_KEY";
pub const ENV_RECENCY_WINDOW_DAYS: &str = "RECENCY_WINDOW_DAYS";
pub const ENV_CACHE_TTL_SECS: &str = "MATCH_CONTEXT_CACHE_TTL_SECS";

#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub naver_client_id: Option<String>,
    pub naver_client_secret: Option<String>,
    pub newsdata_api_key: Option<String>,
    pub recency_window: Option<Duration>,
    pub cache_ttl: Option<Duration>,
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            naver_client_id: non_empty_env(ENV_NAVER_CLIENT_ID),
            naver_client_secret: non_empty_env(ENV_NAVER_CLIENT_SECRET),
            newsdata_api_key: non_empty_env(ENV_NEWSDATA_API_KEY),
            recency_window: non_empty_env(ENV_RECENCY_WINDOW_DAYS)
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|d| *d > 0)
                .map(|d| Duration::from_secs(d * 24 * 60 * 60)),
            cache_ttl: non_empty_env(ENV_CACHE_TTL_SECS)
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs),
        }
    }

    pub fn recency_window(&self) -> Duration {
        self.recency_window.unwrap_or(DEFAULT_RECENCY_WINDOW)
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl
            .unwrap_or(Duration::from_secs(DEFAULT_CACHE_TTL_SECS))
    }

    /// Build the provider registry. Google News needs no credentials and is
    /// always on; credentialed providers join only when fully configured.
    /// Registration order is fixed — it is also the merge order.
    pub fn build_adapters(&self) -> Vec<Arc<dyn SourceAdapter>> {
        let mut adapters: Vec<Arc<dyn SourceAdapter>> = vec![Arc::new(GoogleNewsAdapter::new())];

        match (&self.naver_client_id, &self.naver_client_secret) {
            (Some(id), Some(secret)) => {
                adapters.push(Arc::new(NaverNewsAdapter::new(id.clone(), secret.clone())));
            }
            _ => info!("naver news disabled (missing client id/secret pair)"),
        }

        match &self.newsdata_api_key {
            Some(key) => adapters.push(Arc::new(NewsDataAdapter::new(key.clone()))),
            None => info!("newsdata disabled (missing api key)"),
        }

        adapters
    }
}
