// src/rank.rs
//! Final selection: top-K keywords and top-M headlines.

use std::collections::BTreeMap;

use crate::aggregate::types::Article;
use crate::scoring::TermStat;

/// How the headline list is chosen. Both policies are deterministic for
/// identical input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadlinePolicy {
    /// Articles whose title contains any of the top-3 keywords, in original
    /// corpus order.
    #[default]
    KeywordCorrelated,
    /// Native-language articles first, then newest first.
    PrioritySorted,
}

impl std::str::FromStr for HeadlinePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keyword" => Ok(Self::KeywordCorrelated),
            "priority" => Ok(Self::PrioritySorted),
            other => Err(format!("unknown headline policy `{other}`")),
        }
    }
}

/// The only externally visible artifact of one aggregation run.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct AggregationResult {
    pub keywords: Vec<TermStat>,
    pub headlines: Vec<Article>,
    pub total_articles: usize,
    pub per_source_counts: BTreeMap<String, usize>,
}

impl AggregationResult {
    pub fn empty(per_source_counts: BTreeMap<String, usize>) -> Self {
        Self {
            keywords: Vec::new(),
            headlines: Vec::new(),
            total_articles: 0,
            per_source_counts,
        }
    }
}

/// Keywords: score desc, then term frequency desc, then term asc. Headlines
/// per the selected policy, capped at `m`.
pub fn rank(
    mut stats: Vec<TermStat>,
    articles: &[Article],
    per_source_counts: BTreeMap<String, usize>,
    k: usize,
    m: usize,
    policy: HeadlinePolicy,
) -> AggregationResult {
    stats.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| b.term_frequency.cmp(&a.term_frequency))
            .then_with(|| a.term.cmp(&b.term))
    });
    stats.truncate(k);

    let headlines = match policy {
        HeadlinePolicy::KeywordCorrelated => keyword_correlated(&stats, articles, m),
        HeadlinePolicy::PrioritySorted => priority_sorted(articles, m),
    };

    AggregationResult {
        total_articles: articles.len(),
        keywords: stats,
        headlines,
        per_source_counts,
    }
}

fn keyword_correlated(stats: &[TermStat], articles: &[Article], m: usize) -> Vec<Article> {
    let top: Vec<&str> = stats.iter().take(3).map(|s| s.term.as_str()).collect();
    if top.is_empty() {
        return Vec::new();
    }
    articles
        .iter()
        .filter(|a| {
            let title = a.title.to_lowercase();
            top.iter().any(|kw| title.contains(kw))
        })
        .take(m)
        .cloned()
        .collect()
}

fn priority_sorted(articles: &[Article], m: usize) -> Vec<Article> {
    let mut out: Vec<Article> = articles.to_vec();
    // Stable sort: ties keep original corpus order.
    out.sort_by(|a, b| {
        b.native
            .cmp(&a.native)
            .then_with(|| b.published_at.unwrap_or(i64::MIN).cmp(&a.published_at.unwrap_or(i64::MIN)))
    });
    out.truncate(m);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(term: &str, tf: u32, score: f64) -> TermStat {
        TermStat {
            term: term.into(),
            term_frequency: tf,
            document_frequency: 1,
            score,
        }
    }

    fn article(title: &str, url: &str, published_at: Option<i64>, native: bool) -> Article {
        Article {
            title: title.into(),
            url: url.into(),
            source: "test".into(),
            published_at,
            description: None,
            native,
        }
    }

    #[test]
    fn keyword_order_breaks_ties_by_frequency_then_term() {
        let stats = vec![
            stat("bravo", 2, 1.0),
            stat("alpha", 2, 1.0),
            stat("zulu", 5, 1.0),
            stat("top", 1, 9.0),
        ];
        let res = rank(stats, &[], BTreeMap::new(), 10, 10, HeadlinePolicy::KeywordCorrelated);
        let terms: Vec<&str> = res.keywords.iter().map(|s| s.term.as_str()).collect();
        assert_eq!(terms, vec!["top", "zulu", "alpha", "bravo"]);
    }

    #[test]
    fn keyword_list_is_capped_at_k() {
        let stats: Vec<TermStat> = (0..10).map(|i| stat(&format!("t{i}"), 1, i as f64)).collect();
        let res = rank(stats, &[], BTreeMap::new(), 3, 10, HeadlinePolicy::KeywordCorrelated);
        assert_eq!(res.keywords.len(), 3);
    }

    #[test]
    fn keyword_correlated_keeps_corpus_order_and_matches_top3_only() {
        let stats = vec![
            stat("injury", 3, 5.0),
            stat("derby", 2, 4.0),
            stat("transfer", 2, 3.0),
            stat("fourth", 9, 1.0),
        ];
        let corpus = vec![
            article("Fourth-place battle heats up", "https://x/0", None, false),
            article("Derby injury concerns mount", "https://x/1", None, false),
            article("Unrelated governance story", "https://x/2", None, false),
            article("Transfer window closes early", "https://x/3", None, false),
        ];
        let res = rank(stats, &corpus, BTreeMap::new(), 10, 10, HeadlinePolicy::KeywordCorrelated);
        let urls: Vec<&str> = res.headlines.iter().map(|a| a.url.as_str()).collect();
        // "fourth" ranks below the top-3 cut, so article 0 does not qualify.
        assert_eq!(urls, vec!["https://x/1", "https://x/3"]);
    }

    #[test]
    fn priority_policy_puts_native_first_then_newest() {
        let corpus = vec![
            article("Foreign wrap of the weekend round", "https://x/1", Some(100), false),
            article("Native preview of the big derby", "https://x/2", Some(50), true),
            article("Native recap with quotes galore", "https://x/3", Some(80), true),
            article("Foreign undated feature piece", "https://x/4", None, false),
        ];
        let res = rank(Vec::new(), &corpus, BTreeMap::new(), 5, 10, HeadlinePolicy::PrioritySorted);
        let urls: Vec<&str> = res.headlines.iter().map(|a| a.url.as_str()).collect();
        assert_eq!(urls, vec!["https://x/3", "https://x/2", "https://x/1", "https://x/4"]);
    }

    #[test]
    fn headline_list_is_capped_at_m() {
        let corpus: Vec<Article> = (0..8)
            .map(|i| article("Native article number padding", &format!("https://x/{i}"), Some(i), true))
            .collect();
        let res = rank(Vec::new(), &corpus, BTreeMap::new(), 5, 3, HeadlinePolicy::PrioritySorted);
        assert_eq!(res.headlines.len(), 3);
    }

    #[test]
    fn empty_stats_mean_no_correlated_headlines() {
        let corpus = vec![article("Some headline long enough", "https://x/1", None, false)];
        let res = rank(Vec::new(), &corpus, BTreeMap::new(), 5, 5, HeadlinePolicy::KeywordCorrelated);
        assert!(res.keywords.is_empty());
        assert!(res.headlines.is_empty());
        assert_eq!(res.total_articles, 1);
    }

    #[test]
    fn policy_parses_from_query_values() {
        use std::str::FromStr as _;
        assert_eq!(HeadlinePolicy::from_str("keyword").unwrap(), HeadlinePolicy::KeywordCorrelated);
        assert_eq!(HeadlinePolicy::from_str("Priority").unwrap(), HeadlinePolicy::PrioritySorted);
        assert!(HeadlinePolicy::from_str("random").is_err());
    }
}
