// CommandService - unified command flow
// Handles: site actions for the active tab → interpretation → execution
//
// One completed command string goes in, exactly one outcome comes out. Every
// failure is reported to the user once and never escapes.

use crate::browser::TabHost;
use crate::events::{
    CommandEventEmitter, CommandExecutedPayload, CommandFailedPayload, CommandMatchedPayload,
    Notifier,
};
use crate::settings::Settings;
use crate::site_actions::SiteActionRegistry;
use crate::voice_commands::executor::{ActionError, ActionExecutor, ActionResult};
use crate::voice_commands::interpreter::CommandInterpreter;
use crate::voice_commands::matcher::{IntentClassifier, PatternError};
use crate::voice_commands::types::BrowserAction;
use crate::voice_commands::websites::WebsiteResolver;
use std::sync::Arc;
use uuid::Uuid;

/// Title used for user notifications
pub const NOTIFICATION_TITLE: &str = "Kutty";

/// Message shown whenever a command fails
pub const ERROR_NOTIFICATION: &str = "Sorry, I encountered an error";

/// Event source labels
const SOURCE_SITE: &str = "site";
const SOURCE_INTERPRETER: &str = "interpreter";

/// Errors building the service from settings
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Invalid intent pattern: {0}")]
    Pattern(#[from] PatternError),
    #[error("Invalid search engine URL: {0}")]
    SearchEngine(#[from] url::ParseError),
}

/// What happened to one command
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// Empty command, nothing done
    Ignored,
    /// A site-specific action for the active tab handled it
    SiteHandled { domain: String, action: String },
    /// The interpreter produced an action and it ran
    Executed {
        action: BrowserAction,
        result: ActionResult,
    },
    /// Something went wrong; the user has been notified
    Failed { error: ActionError },
}

/// Service for processing completed voice commands
pub struct CommandService<E>
where
    E: CommandEventEmitter + 'static,
{
    host: Arc<dyn TabHost>,
    site_actions: SiteActionRegistry,
    interpreter: CommandInterpreter,
    executor: ActionExecutor,
    notifier: Arc<dyn Notifier>,
    emitter: Arc<E>,
}

impl<E> CommandService<E>
where
    E: CommandEventEmitter + 'static,
{
    /// Build the service with built-in tables, tuned by `settings`
    pub fn new(
        host: Arc<dyn TabHost>,
        settings: &Settings,
        notifier: Arc<dyn Notifier>,
        emitter: Arc<E>,
    ) -> Result<Self, ServiceError> {
        let interpreter = CommandInterpreter::with_parts(
            IntentClassifier::new()?,
            WebsiteResolver::with_config(settings.resolver.clone()),
        );
        let executor = ActionExecutor::new(host.clone(), &settings.search_engine_url)?;
        Ok(Self::with_parts(
            host,
            SiteActionRegistry::new()?,
            interpreter,
            executor,
            notifier,
            emitter,
        ))
    }

    /// Build the service from already-constructed parts
    pub fn with_parts(
        host: Arc<dyn TabHost>,
        site_actions: SiteActionRegistry,
        interpreter: CommandInterpreter,
        executor: ActionExecutor,
        notifier: Arc<dyn Notifier>,
        emitter: Arc<E>,
    ) -> Self {
        Self {
            host,
            site_actions,
            interpreter,
            executor,
            notifier,
            emitter,
        }
    }

    /// Process one completed command
    pub async fn process(&self, command: &str) -> CommandOutcome {
        let command = command.trim();
        if command.is_empty() {
            crate::debug!("Ignoring empty command");
            return CommandOutcome::Ignored;
        }

        let command_id = Uuid::new_v4().to_string();
        crate::info!("Processing command {}: '{}'", command_id, command);

        match self.run(&command_id, command).await {
            Ok(outcome) => outcome,
            Err(error) => {
                crate::error!("Command '{}' failed: {}", command, error);
                self.notifier.notify_user(NOTIFICATION_TITLE, ERROR_NOTIFICATION);
                self.emitter.emit_command_failed(CommandFailedPayload {
                    command_id,
                    transcription: command.to_string(),
                    error_code: error.code.to_string(),
                    error_message: error.message.clone(),
                });
                CommandOutcome::Failed { error }
            }
        }
    }

    async fn run(&self, command_id: &str, command: &str) -> Result<CommandOutcome, ActionError> {
        if let Some(domain) = self.active_domain().await {
            if let Some(site_match) = self.site_actions.find_match(command, &domain) {
                self.emitter.emit_command_matched(CommandMatchedPayload {
                    command_id: command_id.to_string(),
                    transcription: command.to_string(),
                    source: SOURCE_SITE.to_string(),
                    action: site_match.action_name.clone(),
                });
                SiteActionRegistry::perform(&site_match, self.host.as_ref()).await?;
                self.emitter.emit_command_executed(CommandExecutedPayload {
                    command_id: command_id.to_string(),
                    transcription: command.to_string(),
                    message: format!("Ran '{}' on {}", site_match.action_name, domain),
                });
                return Ok(CommandOutcome::SiteHandled {
                    domain,
                    action: site_match.action_name,
                });
            }
        }

        let action = self.interpreter.interpret(command);
        self.emitter.emit_command_matched(CommandMatchedPayload {
            command_id: command_id.to_string(),
            transcription: command.to_string(),
            source: SOURCE_INTERPRETER.to_string(),
            action: action.name().to_string(),
        });

        let result = self.executor.execute(&action).await?;
        crate::info!("Command {} done: {}", command_id, result.message);
        self.emitter.emit_command_executed(CommandExecutedPayload {
            command_id: command_id.to_string(),
            transcription: command.to_string(),
            message: result.message.clone(),
        });
        Ok(CommandOutcome::Executed { action, result })
    }

    /// Hostname of the active tab; lookup failures mean "no site actions"
    async fn active_domain(&self) -> Option<String> {
        match self.host.active_tab_domain().await {
            Ok(domain) => Some(domain),
            Err(e) => {
                crate::warn!("Could not determine active tab domain: {}", e);
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "service_test.rs"]
mod tests;
