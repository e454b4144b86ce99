// Action executor - performs browser actions through the tab host

use crate::browser::{HostError, TabHost};
use crate::voice_commands::types::BrowserAction;
use serde::Serialize;
use std::sync::Arc;
use url::Url;

/// Default search endpoint; the query is appended as `q`
pub const DEFAULT_SEARCH_ENGINE_URL: &str = "https://www.google.com/search";

/// Result of an action execution
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ActionResult {
    /// Description of what was done
    pub message: String,
    /// Optional additional data
    pub data: Option<serde_json::Value>,
}

/// Typed error codes for action execution failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionErrorCode {
    /// Search action without a query
    EmptyQuery,
    /// Open action whose URL is missing or not absolute
    InvalidUrl,
    /// The browser host rejected the operation
    HostFailure,
}

impl std::fmt::Display for ActionErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ActionErrorCode::EmptyQuery => "EMPTY_QUERY",
            ActionErrorCode::InvalidUrl => "INVALID_URL",
            ActionErrorCode::HostFailure => "HOST_FAILURE",
        };
        write!(f, "{}", s)
    }
}

/// Error during action execution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionError {
    /// Typed error code for categorization
    pub code: ActionErrorCode,
    /// Human-readable error message
    pub message: String,
}

impl std::fmt::Display for ActionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ActionError {}

impl From<HostError> for ActionError {
    fn from(e: HostError) -> Self {
        ActionError {
            code: ActionErrorCode::HostFailure,
            message: e.to_string(),
        }
    }
}

/// Executes browser actions against a `TabHost`
pub struct ActionExecutor {
    host: Arc<dyn TabHost>,
    search_engine: Url,
}

impl ActionExecutor {
    /// Create an executor that searches via `search_engine_url`
    ///
    /// The query is appended as a `q` parameter, e.g. [`DEFAULT_SEARCH_ENGINE_URL`].
    pub fn new(host: Arc<dyn TabHost>, search_engine_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self {
            host,
            search_engine: Url::parse(search_engine_url)?,
        })
    }

    /// Build the search URL for a query
    pub fn search_url(&self, query: &str) -> String {
        let mut url = self.search_engine.clone();
        url.query_pairs_mut().append_pair("q", query);
        url.to_string()
    }

    /// Validate and perform an action
    ///
    /// Host calls are awaited strictly in order; nothing is fanned out.
    pub async fn execute(&self, action: &BrowserAction) -> Result<ActionResult, ActionError> {
        crate::debug!("Executing {:?}", action);

        match action {
            BrowserAction::OpenWebsite { url } => self.open_website(url).await,
            BrowserAction::Search { query } => self.search(query).await,
            BrowserAction::NewTab => {
                let tab = self.host.create_tab(None).await?;
                Ok(Self::done(format!("Opened new tab {}", tab)))
            }
            BrowserAction::CloseTab => {
                self.host.close_active_tab().await?;
                Ok(Self::done("Closed tab".to_string()))
            }
            BrowserAction::Refresh => {
                self.host.reload_active_tab().await?;
                Ok(Self::done("Reloaded tab".to_string()))
            }
            BrowserAction::NextTab => {
                self.host.activate_relative_tab(1).await?;
                Ok(Self::done("Switched to next tab".to_string()))
            }
            BrowserAction::PreviousTab => {
                self.host.activate_relative_tab(-1).await?;
                Ok(Self::done("Switched to previous tab".to_string()))
            }
        }
    }

    /// Open a URL in a new tab, then substitute a search if it never loads
    ///
    /// Order: create tab, wait for the load, inspect the outcome, and only then
    /// redirect the same tab to a search for the destination's name.
    async fn open_website(&self, url: &str) -> Result<ActionResult, ActionError> {
        let parsed = Url::parse(url.trim())
            .ok()
            .filter(|u| u.has_host())
            .ok_or_else(|| ActionError {
                code: ActionErrorCode::InvalidUrl,
                message: format!("Cannot open '{}'", url),
            })?;

        let tab = self.host.create_tab(Some(url.trim())).await?;
        let outcome = self.host.wait_for_load(tab).await?;

        if !outcome.is_failure() {
            return Ok(ActionResult {
                message: format!("Opened {}", url),
                data: Some(serde_json::json!({ "tabId": tab.0, "url": url })),
            });
        }

        let destination = parsed
            .host_str()
            .map(|h| h.trim_start_matches("www."))
            .unwrap_or(url);
        let fallback = self.search_url(destination);
        crate::warn!(
            "Navigation to {} failed ({:?}), searching for {} instead",
            url,
            outcome,
            destination
        );
        self.host.update_tab(tab, &fallback).await?;

        Ok(ActionResult {
            message: format!("Could not reach {}, searched for {} instead", url, destination),
            data: Some(serde_json::json!({
                "tabId": tab.0,
                "url": fallback,
                "substituted": true,
            })),
        })
    }

    async fn search(&self, query: &str) -> Result<ActionResult, ActionError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ActionError {
                code: ActionErrorCode::EmptyQuery,
                message: "Search action has no query".to_string(),
            });
        }

        let url = self.search_url(query);
        let tab = self.host.create_tab(Some(&url)).await?;
        Ok(ActionResult {
            message: format!("Searched for {}", query),
            data: Some(serde_json::json!({ "tabId": tab.0, "url": url })),
        })
    }

    fn done(message: String) -> ActionResult {
        ActionResult { message, data: None }
    }
}

#[cfg(test)]
#[path = "executor_test.rs"]
mod tests;
