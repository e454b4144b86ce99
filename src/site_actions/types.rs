// Site action types for domain-scoped page commands

use crate::browser::PageInteraction;
use crate::voice_commands::matcher::{compile_pattern, PatternError};
use regex::Regex;
use serde::Serialize;

/// A command pattern bound to a DOM interaction
#[derive(Debug, Clone)]
pub struct SiteAction {
    pub name: String,
    pub pattern: Regex,
    pub interaction: PageInteraction,
}

impl SiteAction {
    /// Build an action from a case-insensitive pattern
    ///
    /// Capture group 1, if present, is the text passed to the interaction.
    pub fn new(
        name: &str,
        pattern: &str,
        interaction: PageInteraction,
    ) -> Result<Self, PatternError> {
        Ok(Self {
            name: name.to_string(),
            pattern: compile_pattern(pattern)?,
            interaction,
        })
    }
}

/// Ordered actions for one exact hostname
#[derive(Debug, Clone)]
pub struct SiteActionConfig {
    pub domain: String,
    pub actions: Vec<SiteAction>,
}

/// A site action selected for a command
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SiteMatch {
    pub domain: String,
    pub action_name: String,
    pub interaction: PageInteraction,
    /// Capture group 1, or empty when the pattern has none
    pub captured_text: String,
}
