// src/scoring.rs
//! TF-IDF relevance scoring over the aggregated corpus.
//!
//! Two token alphabets are extracted from the same text: Latin word runs and
//! Hangul syllable runs. Stopwords (both scripts) and excluded terms (entity
//! names, their parts, generic sport nouns) never reach the ranking, so the
//! trivially-always-present fixture names cannot dominate it.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use once_cell::sync::OnceCell;
use regex::Regex;
use serde::Deserialize;
use tracing::{info, warn};

use crate::aggregate::types::Article;
use crate::entity::Entity;

pub const DEFAULT_LEXICON_CONFIG_PATH: &str = "config/lexicon.toml";
pub const ENV_LEXICON_CONFIG_PATH: &str = "LEXICON_CONFIG_PATH";

/// Built-in lexicon, used when no config file is present. Kept in sync with
/// `config/lexicon.toml`.
const DEFAULT_LEXICON_TOML: &str = r#"
# Function words excluded from keyword extraction, both scripts.
stopwords = [
    # English
    "the", "a", "an", "and", "or", "but", "of", "in", "on", "at", "to",
    "for", "with", "by", "from", "as", "is", "are", "was", "were", "be",
    "been", "after", "before", "over", "under", "into", "out", "up", "down",
    "vs", "his", "her", "their", "this", "that", "it", "he", "she", "they",
    "will", "would", "could", "should", "has", "have", "had", "not", "no",
    "new", "says", "said", "against", "during", "between",
    # Korean
    "이번", "지난", "오늘", "내일", "대한", "대해", "위해", "통해", "함께",
    "있다", "없다", "했다", "한다", "된다", "것으로", "그리고", "하지만",
    "밝혔다", "말했다", "전했다",
]

# Generic sport-domain nouns present in nearly every fixture headline;
# they differentiate nothing and are excluded like entity names.
domain_terms = [
    "match", "team", "player", "game", "league", "season", "club",
    "football", "soccer", "sport", "sports",
    "경기", "팀", "선수", "축구", "리그", "시즌", "스포츠",
]
"#;

/// Stopword + domain-noun lists backing keyword exclusion.
#[derive(Debug, Clone)]
pub struct Lexicon {
    stopwords: HashSet<String>,
    domain_terms: HashSet<String>,
}

#[derive(Debug, Deserialize)]
struct LexiconFile {
    #[serde(default)]
    stopwords: Vec<String>,
    #[serde(default)]
    domain_terms: Vec<String>,
}

impl Lexicon {
    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let file: LexiconFile = toml::from_str(toml_str)?;
        Ok(Self {
            stopwords: file.stopwords.into_iter().map(|s| s.to_lowercase()).collect(),
            domain_terms: file
                .domain_terms
                .into_iter()
                .map(|s| s.to_lowercase())
                .collect(),
        })
    }

    /// Built-in default lists.
    pub fn builtin() -> Self {
        Self::from_toml_str(DEFAULT_LEXICON_TOML).expect("built-in lexicon parses")
    }

    /// Load from $LEXICON_CONFIG_PATH, then `config/lexicon.toml`, then the
    /// built-in default. A present-but-broken file falls back with a warning
    /// rather than aborting startup.
    pub fn load() -> Self {
        let path = std::env::var(ENV_LEXICON_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_LEXICON_CONFIG_PATH));

        match std::fs::read_to_string(&path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(lex) => {
                    info!(path = %path.display(), "lexicon loaded");
                    lex
                }
                Err(e) => {
                    warn!(error = ?e, path = %path.display(), "lexicon parse failed, using built-in");
                    Self::builtin()
                }
            },
            Err(_) => Self::builtin(),
        }
    }

    pub fn is_stopword(&self, term: &str) -> bool {
        self.stopwords.contains(term)
    }

    pub fn domain_terms(&self) -> &HashSet<String> {
        &self.domain_terms
    }
}

/// Frequency statistics for one term, recomputed from scratch every run.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct TermStat {
    pub term: String,
    pub term_frequency: u32,
    pub document_frequency: u32,
    pub score: f64,
}

/// Terms that must never surface as keywords for this pair: the two
/// canonical entity names, their individual parts, and the generic
/// sport-domain nouns from the lexicon.
pub fn excluded_terms(home: &Entity, away: &Entity, lexicon: &Lexicon) -> HashSet<String> {
    let mut out: HashSet<String> = lexicon.domain_terms().iter().cloned().collect();
    for e in [home, away] {
        if !e.canonical().is_empty() {
            out.insert(e.canonical().to_string());
        }
        for tok in e.canonical_tokens() {
            out.insert(tok.to_string());
        }
    }
    out
}

/// Extract both token alphabets from already-lower-cased text: Latin word
/// runs and Hangul syllable runs. Tokens under 2 chars are dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    static RE_LATIN: OnceCell<Regex> = OnceCell::new();
    static RE_HANGUL: OnceCell<Regex> = OnceCell::new();
    let latin = RE_LATIN.get_or_init(|| Regex::new(r"[a-z]+").expect("latin token regex"));
    let hangul =
        RE_HANGUL.get_or_init(|| Regex::new(r"[\x{AC00}-\x{D7A3}]+").expect("hangul token regex"));

    let mut out = Vec::new();
    for re in [latin, hangul] {
        for m in re.find_iter(text) {
            let tok = m.as_str();
            if tok.chars().count() >= 2 {
                out.push(tok.to_string());
            }
        }
    }
    out
}

/// Term frequency × inverse document frequency over the corpus:
/// `score = tf * ln(N / (df + 1))`. Terms present in every document score
/// at or below zero and are deprioritized as non-discriminating.
///
/// Output is sorted by term for determinism; the ranker applies the
/// score ordering.
pub fn score(articles: &[Article], excluded: &HashSet<String>, lexicon: &Lexicon) -> Vec<TermStat> {
    let n = articles.len();
    if n == 0 {
        return Vec::new();
    }

    let mut tf: HashMap<String, u32> = HashMap::new();
    let mut df: HashMap<String, u32> = HashMap::new();

    for article in articles {
        let mut text = article.title.clone();
        if let Some(desc) = &article.description {
            text.push(' ');
            text.push_str(desc);
        }
        let text = text.to_lowercase();

        let mut seen_here: HashSet<String> = HashSet::new();
        for tok in tokenize(&text) {
            if lexicon.is_stopword(&tok) || excluded.contains(&tok) {
                continue;
            }
            *tf.entry(tok.clone()).or_insert(0) += 1;
            if seen_here.insert(tok.clone()) {
                *df.entry(tok).or_insert(0) += 1;
            }
        }
    }

    let total = n as f64;
    let mut stats: Vec<TermStat> = tf
        .into_iter()
        .map(|(term, term_frequency)| {
            let document_frequency = df.get(&term).copied().unwrap_or(0);
            let idf = (total / (document_frequency as f64 + 1.0)).ln();
            TermStat {
                score: term_frequency as f64 * idf,
                term,
                term_frequency,
                document_frequency,
            }
        })
        .collect();

    stats.sort_by(|a, b| a.term.cmp(&b.term));
    stats
}
