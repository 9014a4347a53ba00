// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod aggregate;
pub mod api;
pub mod cache;
pub mod config;
pub mod entity;
pub mod metrics;
pub mod query;
pub mod rank;
pub mod scoring;

// ---- Re-exports for stable public API ----
pub use crate::aggregate::types::{Article, SourceAdapter};
pub use crate::aggregate::{aggregate, dedupe, match_context, recency_filter};
pub use crate::api::{create_router, AppState};
pub use crate::cache::ContextCache;
pub use crate::entity::Entity;
pub use crate::query::QueryPlan;
pub use crate::rank::{rank, AggregationResult, HeadlinePolicy};
pub use crate::scoring::{excluded_terms, score, Lexicon, TermStat};
