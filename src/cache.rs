// src/cache.rs
//! Explicit, externally-owned TTL cache for aggregation results.
//!
//! The pipeline itself is stateless; short-lived caching is the caller's
//! concern, so this cache is injected into the HTTP layer as a collaborator
//! and keyed by the canonical entity pair plus headline policy. Absolute
//! TTL, no sliding refresh.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use crate::rank::AggregationResult;

pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

type Key = (String, String, &'static str);

pub struct ContextCache {
    ttl: Duration,
    inner: RwLock<HashMap<Key, (Instant, Arc<AggregationResult>)>>,
}

impl ContextCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            inner: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, home: &str, away: &str, policy: &'static str) -> Option<Arc<AggregationResult>> {
        let key = (home.to_string(), away.to_string(), policy);
        let guard = self.inner.read().ok()?;
        match guard.get(&key) {
            Some((at, result)) if at.elapsed() <= self.ttl => Some(Arc::clone(result)),
            _ => None,
        }
    }

    /// Insert one result; expired entries are purged on the same write lock.
    pub fn insert(&self, home: &str, away: &str, policy: &'static str, result: Arc<AggregationResult>) {
        let key = (home.to_string(), away.to_string(), policy);
        if let Ok(mut guard) = self.inner.write() {
            guard.retain(|_, (at, _)| at.elapsed() <= self.ttl);
            guard.insert(key, (Instant::now(), result));
        }
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.inner.read().map(|g| g.len()).unwrap_or(0)
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
