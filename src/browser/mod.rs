// Browser host abstraction - the tab and page operations the core relies on
//
// The real implementation lives in the extension; the core only sees this trait.

mod console;

pub use console::{ConsoleEventEmitter, ConsoleHost, ConsoleNotifier};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

/// Identifier of a browser tab
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct TabId(pub i64);

impl std::fmt::Display for TabId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot of a tab
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabInfo {
    pub id: TabId,
    pub url: String,
}

/// How a navigation ended
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationOutcome {
    /// The tab finished loading; `final_url` is where it ended up
    Loaded { final_url: String },
    /// The destination could not be reached
    Failed { reason: String },
}

/// URL prefix browsers use for their own network error pages
pub const ERROR_PAGE_PREFIX: &str = "chrome-error://";

impl NavigationOutcome {
    /// Whether the navigation should be treated as unreachable
    pub fn is_failure(&self) -> bool {
        match self {
            NavigationOutcome::Loaded { final_url } => final_url.starts_with(ERROR_PAGE_PREFIX),
            NavigationOutcome::Failed { .. } => true,
        }
    }
}

/// Kind of DOM interaction
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    /// Focus the element, replace its value, fire input and change events
    Type,
    /// Click the element
    Click,
}

/// A DOM interaction targeted at one element of the active page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PageInteraction {
    pub selector: String,
    pub kind: InteractionKind,
}

impl PageInteraction {
    pub fn type_into(selector: &str) -> Self {
        Self {
            selector: selector.to_string(),
            kind: InteractionKind::Type,
        }
    }

    pub fn click(selector: &str) -> Self {
        Self {
            selector: selector.to_string(),
            kind: InteractionKind::Click,
        }
    }
}

/// Failures reported by the browser host
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostError {
    #[error("No active tab")]
    NoActiveTab,
    #[error("Tab {0} not found")]
    TabNotFound(TabId),
    #[error("Active tab has no host in URL '{0}'")]
    NoDomain(String),
    #[error("Browser operation failed: {0}")]
    Operation(String),
}

/// Browser operations the core delegates to the host
///
/// Each call resolves once its effect is observable. Callers await them one at
/// a time; nothing here is expected to run concurrently.
#[async_trait]
pub trait TabHost: Send + Sync {
    /// The focused tab of the current window
    async fn active_tab(&self) -> Result<TabInfo, HostError>;

    /// Open a new tab, optionally at `url`, and focus it
    async fn create_tab(&self, url: Option<&str>) -> Result<TabId, HostError>;

    /// Wait until the tab has finished loading
    async fn wait_for_load(&self, tab: TabId) -> Result<NavigationOutcome, HostError>;

    /// Point an existing tab at a new URL
    async fn update_tab(&self, tab: TabId, url: &str) -> Result<(), HostError>;

    async fn close_active_tab(&self) -> Result<(), HostError>;

    async fn reload_active_tab(&self) -> Result<(), HostError>;

    /// Focus the tab `offset` positions away from the active one, wrapping around
    async fn activate_relative_tab(&self, offset: i32) -> Result<(), HostError>;

    /// Run a DOM interaction in the active page
    async fn run_page_interaction(
        &self,
        interaction: &PageInteraction,
        text: Option<&str>,
    ) -> Result<(), HostError>;

    /// Hostname of the active tab
    async fn active_tab_domain(&self) -> Result<String, HostError> {
        let tab = self.active_tab().await?;
        domain_of(&tab.url).ok_or(HostError::NoDomain(tab.url))
    }
}

/// Extract the hostname of a URL
pub fn domain_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
}

#[cfg(test)]
#[path = "mod_test.rs"]
pub(crate) mod tests;
