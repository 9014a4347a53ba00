// src/entity.rs
//! Entity normalization: display names → canonical search terms.
//!
//! The canonical form is what the query generator and the relevance scorer
//! work with; the display form is preserved untouched for the UI layer.

/// Generic organizational tokens that carry no search value for a club name.
/// "fc seoul" and "seoul" hit the same coverage; the suffix only hurts
/// provider recall.
const GENERIC_TOKENS: &[&str] = &[
    "fc", "cf", "afc", "cfc", "sc", "ac", "fk", "sk", "club", "united", "utd", "city", "town",
    "rovers", "wanderers",
];

/// One participant of a fixture. Immutable for the lifetime of an
/// aggregation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    display: String,
    canonical: String,
}

impl Entity {
    /// Build an entity from its display name. An empty or all-generic name
    /// yields an empty canonical form; rejecting that is the caller's job.
    pub fn new(display: &str) -> Self {
        Self {
            display: display.trim().to_string(),
            canonical: canonicalize(display),
        }
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Individual canonical name parts, used for keyword exclusion.
    pub fn canonical_tokens(&self) -> impl Iterator<Item = &str> {
        self.canonical.split_whitespace()
    }
}

/// Lower-case, strip generic suffix tokens, collapse whitespace.
fn canonicalize(display: &str) -> String {
    let lowered = display.to_lowercase();
    let kept: Vec<&str> = lowered
        .split_whitespace()
        .filter(|tok| {
            let bare = tok.trim_matches(|c: char| !c.is_alphanumeric());
            !bare.is_empty() && !GENERIC_TOKENS.contains(&bare)
        })
        .collect();
    kept.join(" ")
}
