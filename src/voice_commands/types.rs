// Browser action types produced by command interpretation

use serde::{Deserialize, Serialize};

/// Tab-level actions that need no argument
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum BrowserActionKind {
    NewTab,
    CloseTab,
    Refresh,
    NextTab,
    PreviousTab,
}

impl BrowserActionKind {
    /// Spoken-style label, as used in logs and event payloads
    pub fn label(&self) -> &'static str {
        match self {
            BrowserActionKind::NewTab => "new tab",
            BrowserActionKind::CloseTab => "close tab",
            BrowserActionKind::Refresh => "refresh",
            BrowserActionKind::NextTab => "next tab",
            BrowserActionKind::PreviousTab => "previous tab",
        }
    }
}

impl std::fmt::Display for BrowserActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A resolved browser action
///
/// Produced once per command and handed straight to the executor; never stored.
/// Serializes with an `action` tag so a browser host can consume it as JSON,
/// e.g. `{"action":"openWebsite","url":"https://www.youtube.com"}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum BrowserAction {
    OpenWebsite { url: String },
    Search { query: String },
    NewTab,
    CloseTab,
    Refresh,
    NextTab,
    PreviousTab,
}

impl BrowserAction {
    /// Short name of the variant, matching its serde tag
    pub fn name(&self) -> &'static str {
        match self {
            BrowserAction::OpenWebsite { .. } => "openWebsite",
            BrowserAction::Search { .. } => "search",
            BrowserAction::NewTab => "newTab",
            BrowserAction::CloseTab => "closeTab",
            BrowserAction::Refresh => "refresh",
            BrowserAction::NextTab => "nextTab",
            BrowserAction::PreviousTab => "previousTab",
        }
    }
}

impl From<BrowserActionKind> for BrowserAction {
    fn from(kind: BrowserActionKind) -> Self {
        match kind {
            BrowserActionKind::NewTab => BrowserAction::NewTab,
            BrowserActionKind::CloseTab => BrowserAction::CloseTab,
            BrowserActionKind::Refresh => BrowserAction::Refresh,
            BrowserActionKind::NextTab => BrowserAction::NextTab,
            BrowserActionKind::PreviousTab => BrowserAction::PreviousTab,
        }
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
