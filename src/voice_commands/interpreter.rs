// Command interpreter - turns a command string into exactly one browser action
//
// Classification and website resolution are combined here, and this is the
// boundary where every failure degrades to a literal web search.

use crate::voice_commands::matcher::{IntentCategory, IntentClassifier, MatchResult, PatternError};
use crate::voice_commands::types::BrowserAction;
use crate::voice_commands::websites::WebsiteResolver;

/// Suffix appended to unrecognized site names before searching for them
pub const OFFICIAL_WEBSITE_SUFFIX: &str = "official website";

/// Internal interpretation failures, caught by `interpret`
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InterpretError {
    /// A capturing intent matched without any usable text
    #[error("{0:?} match carried no captured text")]
    MissingCapture(IntentCategory),
    /// A browser-action intent matched without a fixed action
    #[error("Browser action match carried no action")]
    MissingAction,
}

/// Interprets commands via the intent classifier and website resolver
#[derive(Debug, Clone)]
pub struct CommandInterpreter {
    classifier: IntentClassifier,
    resolver: WebsiteResolver,
}

impl CommandInterpreter {
    /// Create an interpreter with the built-in intent tables and website catalog
    pub fn new() -> Result<Self, PatternError> {
        Ok(Self::with_parts(IntentClassifier::new()?, WebsiteResolver::new()))
    }

    pub fn with_parts(classifier: IntentClassifier, resolver: WebsiteResolver) -> Self {
        Self { classifier, resolver }
    }

    /// Interpret a command, always producing an action
    ///
    /// Unmatched commands and internal failures fall back to searching for the
    /// command text itself.
    pub fn interpret(&self, command: &str) -> BrowserAction {
        match self.try_interpret(command) {
            Ok(action) => action,
            Err(e) => {
                crate::warn!("Failed to interpret '{}': {}, falling back to search", command, e);
                Self::literal_search(command)
            }
        }
    }

    /// Interpret a command, surfacing internal failures
    pub fn try_interpret(&self, command: &str) -> Result<BrowserAction, InterpretError> {
        let Some(intent) = self.classifier.classify(command) else {
            crate::debug!("No intent for '{}', defaulting to search", command);
            return Ok(Self::literal_search(command));
        };

        crate::debug!(
            "Intent {:?} ({}) for '{}'",
            intent.category,
            intent.confidence,
            command
        );

        match intent.category {
            IntentCategory::OpenWebsite => {
                let site = Self::captured(&intent)?;
                match self.resolver.resolve(site) {
                    Some(website) => Ok(BrowserAction::OpenWebsite { url: website.url }),
                    None => Ok(BrowserAction::Search {
                        query: format!("{} {}", site, OFFICIAL_WEBSITE_SUFFIX),
                    }),
                }
            }
            IntentCategory::Search => Ok(BrowserAction::Search {
                query: Self::captured(&intent)?.to_string(),
            }),
            IntentCategory::BrowserAction => intent
                .fixed_action
                .map(BrowserAction::from)
                .ok_or(InterpretError::MissingAction),
        }
    }

    fn captured(intent: &MatchResult) -> Result<&str, InterpretError> {
        intent
            .captured_text
            .as_deref()
            .ok_or(InterpretError::MissingCapture(intent.category))
    }

    fn literal_search(command: &str) -> BrowserAction {
        BrowserAction::Search {
            query: command.trim().to_string(),
        }
    }
}

#[cfg(test)]
#[path = "interpreter_test.rs"]
mod tests;
