// Site action registry - per-domain command tables checked before general interpretation

use super::types::{SiteAction, SiteActionConfig, SiteMatch};
use crate::browser::{HostError, InteractionKind, PageInteraction, TabHost};
use crate::voice_commands::matcher::PatternError;

/// Built-in per-domain tables
pub fn default_site_configs() -> Result<Vec<SiteActionConfig>, PatternError> {
    Ok(vec![
        SiteActionConfig {
            domain: "youtube.com".to_string(),
            actions: vec![
                SiteAction::new(
                    "type in search bar",
                    r"type in search bar of youtube (.*)",
                    PageInteraction::type_into("input#search"),
                )?,
                SiteAction::new(
                    "search",
                    r"now search",
                    PageInteraction::click("button#search-icon-legacy"),
                )?,
            ],
        },
        SiteActionConfig {
            domain: "chat.openai.com".to_string(),
            actions: vec![
                SiteAction::new(
                    "type in prompt box",
                    r"type in the prompt box of chatgpt (.*)",
                    PageInteraction::type_into(r#"textarea[data-id="root"]"#),
                )?,
                SiteAction::new(
                    "search",
                    r"search about it",
                    PageInteraction::click(r#"button[data-testid="send-button"]"#),
                )?,
            ],
        },
        SiteActionConfig {
            domain: "google.com".to_string(),
            actions: vec![
                SiteAction::new(
                    "type in search bar",
                    r"type in search bar (.*)",
                    PageInteraction::type_into(r#"input[name="q"]"#),
                )?,
                SiteAction::new(
                    "search",
                    r"now search",
                    PageInteraction::click(r#"input[name="btnK"]"#),
                )?,
            ],
        },
    ])
}

/// Registry of per-domain site actions
///
/// Domains are matched by exact hostname only; `www.youtube.com` does not
/// pick up the `youtube.com` table.
#[derive(Debug, Clone)]
pub struct SiteActionRegistry {
    configs: Vec<SiteActionConfig>,
}

impl SiteActionRegistry {
    /// Create a registry with the built-in tables
    pub fn new() -> Result<Self, PatternError> {
        Ok(Self::with_configs(default_site_configs()?))
    }

    /// Create a registry from custom tables, kept in the order given
    ///
    /// A later config for the same domain replaces the earlier one in place.
    pub fn with_configs(configs: Vec<SiteActionConfig>) -> Self {
        let mut registry = Self {
            configs: Vec::with_capacity(configs.len()),
        };
        for config in configs {
            match registry.configs.iter_mut().find(|c| c.domain == config.domain) {
                Some(existing) => {
                    crate::debug!("Replacing site actions for {}", config.domain);
                    *existing = config;
                }
                None => registry.configs.push(config),
            }
        }
        registry
    }

    /// Registered domains, in registration order
    pub fn domains(&self) -> Vec<&str> {
        self.configs.iter().map(|c| c.domain.as_str()).collect()
    }

    /// Find the first action on `domain` whose pattern matches `command`
    pub fn find_match(&self, command: &str, domain: &str) -> Option<SiteMatch> {
        let config = self.configs.iter().find(|c| c.domain == domain)?;

        config.actions.iter().find_map(|action| {
            let caps = action.pattern.captures(command)?;
            Some(SiteMatch {
                domain: config.domain.clone(),
                action_name: action.name.clone(),
                interaction: action.interaction.clone(),
                captured_text: caps
                    .get(1)
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_default(),
            })
        })
    }

    /// Run the matching site action, if any
    ///
    /// Side-effect-only entry point for callers that do not report which
    /// action ran; the command service matches with `find_match` and then
    /// calls `perform` so it can emit events around the interaction.
    ///
    /// Returns `Ok(true)` once the interaction has run, `Ok(false)` when the
    /// domain is unknown or no pattern matches.
    pub async fn try_handle(
        &self,
        command: &str,
        domain: &str,
        host: &dyn TabHost,
    ) -> Result<bool, HostError> {
        let Some(site_match) = self.find_match(command, domain) else {
            return Ok(false);
        };
        Self::perform(&site_match, host).await?;
        Ok(true)
    }

    /// Run an already-matched site action against the active page
    ///
    /// Type interactions receive the captured text; clicks receive none.
    pub async fn perform(site_match: &SiteMatch, host: &dyn TabHost) -> Result<(), HostError> {
        crate::info!(
            "Site action '{}' on {}",
            site_match.action_name,
            site_match.domain
        );

        let text = match site_match.interaction.kind {
            InteractionKind::Type => Some(site_match.captured_text.as_str()),
            InteractionKind::Click => None,
        };
        host.run_page_interaction(&site_match.interaction, text).await
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
