// src/query.rs
//! Candidate query strings for one entity pair, most specific first.
//!
//! Adapters walk this list in order and stop at the first query that yields
//! results, so specificity ordering directly controls request volume.

use crate::entity::Entity;

/// Ordered, deduplicated query list. Immutable once generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    queries: Vec<String>,
}

impl QueryPlan {
    /// Fixed priority order: combined, "A vs B", A-only, B-only.
    pub fn for_pair(home: &Entity, away: &Entity) -> Self {
        let h = home.canonical();
        let a = away.canonical();

        let candidates = [
            format!("{h} {a}"),
            format!("{h} vs {a}"),
            h.to_string(),
            a.to_string(),
        ];

        let mut queries = Vec::with_capacity(candidates.len());
        for c in candidates {
            let c = c.trim().to_string();
            if !c.is_empty() && !queries.contains(&c) {
                queries.push(c);
            }
        }
        Self { queries }
    }

    pub fn queries(&self) -> &[String] {
        &self.queries
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pair_produces_four_queries_most_specific_first() {
        let plan = QueryPlan::for_pair(&Entity::new("FC Seoul"), &Entity::new("Ulsan HD FC"));
        assert_eq!(
            plan.queries(),
            &[
                "seoul ulsan hd".to_string(),
                "seoul vs ulsan hd".to_string(),
                "seoul".to_string(),
                "ulsan hd".to_string(),
            ]
        );
    }

    #[test]
    fn identical_entities_deduplicate() {
        let plan = QueryPlan::for_pair(&Entity::new("Seoul"), &Entity::new("Seoul"));
        assert_eq!(
            plan.queries(),
            &[
                "seoul seoul".to_string(),
                "seoul vs seoul".to_string(),
                "seoul".to_string(),
            ]
        );
    }

    #[test]
    fn empty_entities_produce_no_queries() {
        let plan = QueryPlan::for_pair(&Entity::new(""), &Entity::new(""));
        assert!(plan.is_empty());
    }

    #[test]
    fn one_empty_entity_falls_back_to_the_other() {
        let plan = QueryPlan::for_pair(&Entity::new("Seoul"), &Entity::new(""));
        assert_eq!(
            plan.queries(),
            &["seoul".to_string(), "seoul vs".to_string()]
        );
    }
}
