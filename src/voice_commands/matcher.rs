// Intent matcher - classifies a command against ranked regex patterns per intent

use crate::voice_commands::types::BrowserActionKind;
use regex::{Regex, RegexBuilder};
use serde::Serialize;

/// Broad intent a command can express
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum IntentCategory {
    /// Navigate to a named website
    OpenWebsite,
    /// Run a web search
    Search,
    /// Fixed tab-level browser action
    BrowserAction,
}

/// Errors raised when building a pattern table
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PatternError {
    /// Regular expression failed to compile
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidRegex { pattern: String, message: String },
    /// Confidence outside (0, 1]
    #[error("Confidence {confidence} for pattern '{pattern}' must be in (0, 1]")]
    InvalidConfidence { pattern: String, confidence: f64 },
}

/// Compile a case-insensitive pattern, reporting failures as `PatternError`
pub(crate) fn compile_pattern(pattern: &str) -> Result<Regex, PatternError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| PatternError::InvalidRegex {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}

/// A single weighted pattern
///
/// Patterns are unanchored: a match anywhere in the command counts.
#[derive(Debug, Clone)]
pub struct IntentPattern {
    regex: Regex,
    confidence: f64,
    fixed_action: Option<BrowserActionKind>,
}

impl IntentPattern {
    /// Pattern whose capture group 1 carries the argument (site name, query)
    pub fn capturing(pattern: &str, confidence: f64) -> Result<Self, PatternError> {
        Self::build(pattern, confidence, None)
    }

    /// Pattern that maps straight to a fixed browser action
    pub fn fixed(
        pattern: &str,
        confidence: f64,
        action: BrowserActionKind,
    ) -> Result<Self, PatternError> {
        Self::build(pattern, confidence, Some(action))
    }

    fn build(
        pattern: &str,
        confidence: f64,
        fixed_action: Option<BrowserActionKind>,
    ) -> Result<Self, PatternError> {
        if !(confidence > 0.0 && confidence <= 1.0) {
            return Err(PatternError::InvalidConfidence {
                pattern: pattern.to_string(),
                confidence,
            });
        }
        Ok(Self {
            regex: compile_pattern(pattern)?,
            confidence,
            fixed_action,
        })
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }
}

/// Ordered patterns for one intent category
#[derive(Debug, Clone)]
pub struct IntentTable {
    pub category: IntentCategory,
    pub patterns: Vec<IntentPattern>,
}

/// Result of classifying a command
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MatchResult {
    pub category: IntentCategory,
    pub confidence: f64,
    /// Capture group 1, trimmed; `None` for fixed-action patterns
    pub captured_text: Option<String>,
    pub fixed_action: Option<BrowserActionKind>,
}

/// Built-in intent tables, in declaration order
pub fn default_intent_tables() -> Result<Vec<IntentTable>, PatternError> {
    use BrowserActionKind::*;

    Ok(vec![
        IntentTable {
            category: IntentCategory::OpenWebsite,
            patterns: vec![
                IntentPattern::capturing(r"open\s+(.+)", 0.9)?,
                IntentPattern::capturing(r"go\s+to\s+(.+)", 0.8)?,
                IntentPattern::capturing(r"navigate\s+to\s+(.+)", 0.7)?,
                IntentPattern::capturing(r"visit\s+(.+)", 0.7)?,
            ],
        },
        IntentTable {
            category: IntentCategory::Search,
            patterns: vec![
                IntentPattern::capturing(r"search\s+for\s+(.+)", 0.9)?,
                IntentPattern::capturing(r"look\s+up\s+(.+)", 0.8)?,
                IntentPattern::capturing(r"find\s+(.+)", 0.7)?,
            ],
        },
        IntentTable {
            category: IntentCategory::BrowserAction,
            patterns: vec![
                IntentPattern::fixed(r"new\s+tab", 0.9, NewTab)?,
                IntentPattern::fixed(r"close\s+tab", 0.9, CloseTab)?,
                IntentPattern::fixed(r"refresh|reload", 0.9, Refresh)?,
                IntentPattern::fixed(r"next\s+tab", 0.9, NextTab)?,
                IntentPattern::fixed(r"previous\s+tab", 0.9, PreviousTab)?,
            ],
        },
    ])
}

/// Classifies commands by picking the highest-confidence matching pattern
///
/// Tables and patterns are tried in declaration order; a later match only
/// replaces the current best if its confidence is strictly greater, so
/// declaration order breaks ties.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    tables: Vec<IntentTable>,
}

impl IntentClassifier {
    /// Create a classifier over the built-in tables
    pub fn new() -> Result<Self, PatternError> {
        Ok(Self::with_tables(default_intent_tables()?))
    }

    /// Create a classifier over custom tables
    pub fn with_tables(tables: Vec<IntentTable>) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &[IntentTable] {
        &self.tables
    }

    /// Classify a command, returning `None` if no pattern matches
    pub fn classify(&self, command: &str) -> Option<MatchResult> {
        let mut best: Option<MatchResult> = None;

        for table in &self.tables {
            for pattern in &table.patterns {
                let Some(caps) = pattern.regex.captures(command) else {
                    continue;
                };
                if best
                    .as_ref()
                    .is_some_and(|b| pattern.confidence <= b.confidence)
                {
                    continue;
                }

                let captured_text = if pattern.fixed_action.is_some() {
                    None
                } else {
                    caps.get(1)
                        .map(|m| m.as_str().trim().to_string())
                        .filter(|s| !s.is_empty())
                };

                crate::trace!(
                    "Pattern '{}' matched as {:?} ({})",
                    pattern.as_str(),
                    table.category,
                    pattern.confidence
                );
                best = Some(MatchResult {
                    category: table.category,
                    confidence: pattern.confidence,
                    captured_text,
                    fixed_action: pattern.fixed_action,
                });
            }
        }

        best
    }
}

#[cfg(test)]
#[path = "matcher_test.rs"]
mod tests;
