//! Console host for the command pipeline.
//!
//! Each stdin line is one input. A plain line is a final transcript chunk and a
//! line starting with `~` is an interim chunk. `:start` and `:stop` toggle
//! listening, and `:goto <url>` points the active tab somewhere else, so
//! site-specific commands can be tried.

use crate::browser::{ConsoleEventEmitter, ConsoleHost, ConsoleNotifier};
use crate::listening::{ListeningInput, ListeningPipeline, PipelineError};
use crate::processing::{CommandService, ServiceError};
use crate::settings::{default_settings_path, Settings, SettingsError};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Debug, Parser)]
#[command(name = "kutty")]
#[command(about = "Voice command interpreter for browser control")]
#[command(version)]
pub struct Cli {
    /// Path to settings.json (defaults to <config dir>/kutty/settings.json)
    #[arg(short, long)]
    pub settings: Option<PathBuf>,

    /// URL of the tab that is active at startup
    #[arg(long)]
    pub active_url: Option<String>,

    /// Override the command window length in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Wait for `:start` instead of listening immediately
    #[arg(long)]
    pub no_start: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Errors that end the console host
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("Failed to build command service: {0}")]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// One parsed stdin line
#[derive(Debug, Clone, PartialEq)]
pub enum Line {
    Input(ListeningInput),
    Goto(String),
    Unknown(String),
    Skip,
}

pub fn parse_line(line: &str) -> Line {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Line::Skip;
    }

    if let Some(directive) = line.strip_prefix(':') {
        let (name, arg) = directive
            .split_once(char::is_whitespace)
            .map(|(n, a)| (n, a.trim()))
            .unwrap_or((directive, ""));
        return match (name, arg) {
            ("start", "") => Line::Input(ListeningInput::Start),
            ("stop", "") => Line::Input(ListeningInput::Stop),
            ("goto", url) if !url.is_empty() => Line::Goto(url.to_string()),
            _ => Line::Unknown(line.to_string()),
        };
    }

    match line.strip_prefix('~') {
        Some(interim) => Line::Input(ListeningInput::Transcript {
            text: interim.trim().to_string(),
            is_final: false,
        }),
        None => Line::Input(ListeningInput::Transcript {
            text: line.to_string(),
            is_final: true,
        }),
    }
}

/// Resolve the settings file and apply command-line overrides
pub fn load_settings(cli: &Cli) -> Result<Settings, CliError> {
    let path = match &cli.settings {
        Some(path) => path.clone(),
        None => default_settings_path()?,
    };
    let mut settings = Settings::load(&path)?;
    if let Some(timeout_ms) = cli.timeout_ms {
        settings.listening.command_timeout_ms = timeout_ms;
        settings.validate()?;
    }
    Ok(settings)
}

/// Drive the pipeline from stdin until EOF
#[cfg_attr(coverage_nightly, coverage(off))]
pub async fn run_cli(cli: Cli) -> Result<(), CliError> {
    let settings = load_settings(&cli)?;

    let host = Arc::new(match &cli.active_url {
        Some(url) => ConsoleHost::with_active_url(url),
        None => ConsoleHost::new(),
    });
    let notifier = Arc::new(ConsoleNotifier);
    let emitter = Arc::new(ConsoleEventEmitter);

    let service = CommandService::new(host.clone(), &settings, notifier.clone(), emitter.clone())?;
    let (pipeline, handle) =
        ListeningPipeline::new(settings.listening.clone(), service, notifier, emitter);
    let task = tokio::spawn(pipeline.run());

    if !cli.no_start {
        handle.start().await?;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Line::Input(ListeningInput::Start) => handle.start().await?,
            Line::Input(ListeningInput::Stop) => handle.stop().await?,
            Line::Input(ListeningInput::Transcript { text, is_final }) => {
                handle.push_transcript(&text, is_final).await?
            }
            Line::Goto(url) => {
                if let Err(e) = host.navigate_active(&url) {
                    crate::warn!("Could not navigate: {}", e);
                }
            }
            Line::Unknown(directive) => crate::warn!("Unknown directive '{}'", directive),
            Line::Skip => {}
        }
    }

    crate::debug!("Input closed, shutting down");
    drop(handle);
    if let Err(e) = task.await {
        crate::error!("Listening pipeline task failed: {}", e);
    }
    Ok(())
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
