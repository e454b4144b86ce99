// Website resolver - maps a spoken site name to a known website URL
//
// Exact alias hits short-circuit; otherwise every alias and related term is
// scored with edit-distance similarity and the best entry above the threshold wins.

use crate::voice_commands::similarity::similarity;
use serde::{Deserialize, Serialize};
use url::Url;

/// Default acceptance threshold; a match must score strictly above it
pub const DEFAULT_RESOLVE_THRESHOLD: f64 = 0.6;

/// Default weight applied to related-term similarity
pub const DEFAULT_RELATED_TERM_WEIGHT: f64 = 0.5;

/// A known website and the spoken forms that refer to it
#[derive(Debug, Clone, PartialEq)]
pub struct WebsiteEntry {
    /// Canonical name (e.g., "youtube")
    pub name: String,
    /// Absolute URL opened for this site
    pub canonical_url: String,
    /// Alternate spoken forms, scored at full weight
    pub aliases: Vec<String>,
    /// Topic cues, scored at `related_term_weight`
    pub related_terms: Vec<String>,
}

impl WebsiteEntry {
    pub fn new(name: &str, canonical_url: &str, aliases: &[&str], related_terms: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            canonical_url: canonical_url.to_string(),
            aliases: aliases.iter().map(|s| s.to_string()).collect(),
            related_terms: related_terms.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// A resolved website with its match score
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebsiteMatch {
    pub name: String,
    pub url: String,
    pub score: f64,
}

/// Tuning for fuzzy resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResolverConfig {
    /// Minimum score (exclusive) for a fuzzy match to be accepted
    pub threshold: f64,
    /// Multiplier applied to related-term similarity
    pub related_term_weight: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_RESOLVE_THRESHOLD,
            related_term_weight: DEFAULT_RELATED_TERM_WEIGHT,
        }
    }
}

/// Errors raised when building a website catalog
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error("Website '{name}' has invalid URL '{url}'")]
    InvalidUrl { name: String, url: String },
    #[error("Website '{0}' has no aliases")]
    NoAliases(String),
    #[error("Website '{0}' is registered more than once")]
    DuplicateName(String),
}

/// Built-in website table, in registration order
pub fn default_websites() -> Vec<WebsiteEntry> {
    vec![
        WebsiteEntry::new(
            "youtube",
            "https://www.youtube.com",
            &["yt", "youtube.com", "youtube", "you tube", "you-tube"],
            &["video", "videos", "watch", "streaming"],
        ),
        WebsiteEntry::new(
            "netflix",
            "https://www.netflix.com",
            &["netflix.com", "net flix", "net-flix"],
            &["movies", "shows", "streaming", "watch"],
        ),
        WebsiteEntry::new(
            "google",
            "https://www.google.com",
            &["google.com", "goog", "goo gle"],
            &["search", "find", "look up"],
        ),
        WebsiteEntry::new(
            "github",
            "https://github.com",
            &["github.com", "git hub", "git-hub"],
            &["code", "repository", "developer"],
        ),
        WebsiteEntry::new(
            "chatgpt",
            "https://chat.openai.com",
            &["chat.openai.com", "openai", "chat gpt", "chat-gpt"],
            &["ai", "chatbot", "assistant"],
        ),
    ]
}

/// Resolves free-text phrases against a fixed website catalog
///
/// Entries are kept in registration order; under equal scores the earliest
/// registered entry wins, so results are deterministic.
#[derive(Debug, Clone)]
pub struct WebsiteResolver {
    entries: Vec<WebsiteEntry>,
    config: ResolverConfig,
}

impl Default for WebsiteResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl WebsiteResolver {
    /// Create a resolver over the built-in catalog with default tuning
    pub fn new() -> Self {
        Self::with_config(ResolverConfig::default())
    }

    /// Create a resolver over the built-in catalog with custom tuning
    pub fn with_config(config: ResolverConfig) -> Self {
        Self {
            entries: default_websites(),
            config,
        }
    }

    /// Create a resolver over a custom catalog
    ///
    /// Every entry needs an absolute URL and at least one alias.
    pub fn with_entries(
        entries: Vec<WebsiteEntry>,
        config: ResolverConfig,
    ) -> Result<Self, CatalogError> {
        for (i, entry) in entries.iter().enumerate() {
            Self::validate(entry)?;
            if entries[..i].iter().any(|e| e.name == entry.name) {
                return Err(CatalogError::DuplicateName(entry.name.clone()));
            }
        }
        Ok(Self { entries, config })
    }

    fn validate(entry: &WebsiteEntry) -> Result<(), CatalogError> {
        let valid = Url::parse(&entry.canonical_url)
            .map(|url| url.has_host())
            .unwrap_or(false);
        if !valid {
            return Err(CatalogError::InvalidUrl {
                name: entry.name.clone(),
                url: entry.canonical_url.clone(),
            });
        }
        if entry.aliases.is_empty() {
            return Err(CatalogError::NoAliases(entry.name.clone()));
        }
        Ok(())
    }

    /// Registered entries, in registration order
    pub fn entries(&self) -> &[WebsiteEntry] {
        &self.entries
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve a phrase to a known website
    ///
    /// Returns `None` when nothing scores above the threshold; the caller is
    /// expected to fall back to a literal search.
    pub fn resolve(&self, phrase: &str) -> Option<WebsiteMatch> {
        let phrase = phrase.trim().to_lowercase();

        if let Some(entry) = self
            .entries
            .iter()
            .find(|e| e.aliases.iter().any(|alias| *alias == phrase))
        {
            return Some(WebsiteMatch {
                name: entry.name.clone(),
                url: entry.canonical_url.clone(),
                score: 1.0,
            });
        }

        let mut best: Option<(&WebsiteEntry, f64)> = None;
        for entry in &self.entries {
            let alias_scores = entry.aliases.iter().map(|alias| similarity(&phrase, alias));
            let related_scores = entry
                .related_terms
                .iter()
                .map(|term| similarity(&phrase, term) * self.config.related_term_weight);
            let score = alias_scores
                .chain(related_scores)
                .fold(f64::NEG_INFINITY, f64::max);

            if best.map_or(true, |(_, top)| score > top) {
                best = Some((entry, score));
            }
        }

        let (entry, score) = best?;
        if score > self.config.threshold {
            crate::debug!(
                "Resolved '{}' to {} (score {:.3})",
                phrase,
                entry.name,
                score
            );
            Some(WebsiteMatch {
                name: entry.name.clone(),
                url: entry.canonical_url.clone(),
                score,
            })
        } else {
            crate::debug!(
                "No website for '{}' (best {} at {:.3})",
                phrase,
                entry.name,
                score
            );
            None
        }
    }
}

#[cfg(test)]
#[path = "websites_test.rs"]
mod tests;
