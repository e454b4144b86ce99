// Listening pipeline - owns the wake word session and feeds completed commands
// to the command service
//
// Inputs arrive over a channel; the command window deadline is raced against
// the next input in the same loop, so timer and buffer never race each other.

use super::session::{ListeningConfig, SessionEvent, WakeWordSession};
use crate::events::{
    current_timestamp, listening_events, CommandEventEmitter, ListeningEventEmitter, Notifier,
};
use crate::processing::{CommandService, NOTIFICATION_TITLE};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};

/// Buffered inputs before `ListeningHandle` calls start waiting
pub const INPUT_CHANNEL_CAPACITY: usize = 64;

pub const LISTENING_NOTIFICATION: &str = "Listening for 'Hey Kutty'...";
pub const WAKE_NOTIFICATION: &str = "Hey Kutty detected! What can I do for you?";

/// Inputs accepted by the pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum ListeningInput {
    /// Begin listening with a fresh session
    Start,
    /// Stop listening; any partial command is dropped
    Stop,
    /// One transcript chunk from the speech recognizer
    Transcript { text: String, is_final: bool },
}

/// Errors that can occur talking to the pipeline
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    /// The pipeline task has exited
    #[error("Listening pipeline is closed")]
    Closed,
}

/// Cloneable sender side of the pipeline
#[derive(Debug, Clone)]
pub struct ListeningHandle {
    tx: mpsc::Sender<ListeningInput>,
}

impl ListeningHandle {
    pub async fn start(&self) -> Result<(), PipelineError> {
        self.send(ListeningInput::Start).await
    }

    pub async fn stop(&self) -> Result<(), PipelineError> {
        self.send(ListeningInput::Stop).await
    }

    pub async fn push_transcript(&self, text: &str, is_final: bool) -> Result<(), PipelineError> {
        self.send(ListeningInput::Transcript {
            text: text.to_string(),
            is_final,
        })
        .await
    }

    async fn send(&self, input: ListeningInput) -> Result<(), PipelineError> {
        self.tx.send(input).await.map_err(|_| PipelineError::Closed)
    }
}

/// What woke the loop up
enum Next {
    Input(Option<ListeningInput>),
    Deadline,
}

/// Listening pipeline
///
/// Processes inputs strictly one at a time: a captured command is fully
/// handled by the command service before the next input is read.
pub struct ListeningPipeline<E>
where
    E: ListeningEventEmitter + CommandEventEmitter + 'static,
{
    config: ListeningConfig,
    service: CommandService<E>,
    notifier: Arc<dyn Notifier>,
    emitter: Arc<E>,
    rx: mpsc::Receiver<ListeningInput>,
    /// Present only while listening
    session: Option<WakeWordSession>,
}

impl<E> ListeningPipeline<E>
where
    E: ListeningEventEmitter + CommandEventEmitter + 'static,
{
    pub fn new(
        config: ListeningConfig,
        service: CommandService<E>,
        notifier: Arc<dyn Notifier>,
        emitter: Arc<E>,
    ) -> (Self, ListeningHandle) {
        let (tx, rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
        let pipeline = Self {
            config,
            service,
            notifier,
            emitter,
            rx,
            session: None,
        };
        (pipeline, ListeningHandle { tx })
    }

    pub fn is_listening(&self) -> bool {
        self.session.is_some()
    }

    /// Run until every `ListeningHandle` has been dropped
    pub async fn run(mut self) {
        crate::debug!("Listening pipeline running");

        loop {
            let deadline = self.session.as_ref().and_then(|s| s.deadline());
            let next = tokio::select! {
                biased;
                _ = wait_for(deadline) => Next::Deadline,
                input = self.rx.recv() => Next::Input(input),
            };

            match next {
                Next::Input(Some(input)) => self.handle(input).await,
                Next::Input(None) => break,
                Next::Deadline => self.on_deadline(),
            }
        }

        crate::debug!("Listening pipeline input closed, exiting");
    }

    async fn handle(&mut self, input: ListeningInput) {
        match input {
            ListeningInput::Start => self.start(),
            ListeningInput::Stop => self.stop(),
            ListeningInput::Transcript { text, is_final } => {
                self.on_transcript(&text, is_final).await
            }
        }
    }

    fn start(&mut self) {
        if self.session.is_some() {
            crate::debug!("Already listening, ignoring start");
            return;
        }

        crate::info!("Listening for '{}'", self.config.wake_phrase);
        self.session = Some(WakeWordSession::new(&self.config));
        self.notifier.notify_user(NOTIFICATION_TITLE, LISTENING_NOTIFICATION);
        self.emitter
            .emit_listening_started(listening_events::ListeningStartedPayload {
                wake_phrase: self.config.wake_phrase.clone(),
                timestamp: current_timestamp(),
            });
    }

    fn stop(&mut self) {
        let Some(session) = self.session.take() else {
            crate::debug!("Not listening, ignoring stop");
            return;
        };

        let discarded = Some(session.buffer().to_string()).filter(|b| !b.is_empty());
        if let Some(partial) = &discarded {
            crate::info!("Listening stopped, dropping partial command '{}'", partial);
        } else {
            crate::info!("Listening stopped");
        }
        self.emitter
            .emit_listening_stopped(listening_events::ListeningStoppedPayload {
                discarded,
                timestamp: current_timestamp(),
            });
    }

    async fn on_transcript(&mut self, text: &str, is_final: bool) {
        let Some(session) = self.session.as_mut() else {
            crate::trace!("Not listening, ignoring transcript '{}'", text);
            return;
        };

        let partial = session.buffer().to_string();
        for event in session.on_transcript(text, is_final, Instant::now()) {
            match event {
                SessionEvent::WakeDetected => {
                    self.notifier.notify_user(NOTIFICATION_TITLE, WAKE_NOTIFICATION);
                    self.emitter
                        .emit_wake_word_detected(listening_events::WakeWordDetectedPayload {
                            transcription: text.to_string(),
                            timestamp: current_timestamp(),
                        });
                }
                SessionEvent::Interim(interim) => {
                    self.emitter
                        .emit_transcript_interim(listening_events::TranscriptInterimPayload {
                            text: interim,
                        });
                }
                SessionEvent::Command(command) => {
                    self.emitter
                        .emit_command_captured(listening_events::CommandCapturedPayload {
                            command: command.clone(),
                            timestamp: current_timestamp(),
                        });
                    let outcome = self.service.process(&command).await;
                    crate::debug!("Command outcome: {:?}", outcome);
                }
                SessionEvent::Discarded => {
                    crate::debug!("Terminator heard with no command, nothing to do");
                }
                SessionEvent::TimedOut => self.emit_timeout(partial.clone()),
            }
        }
    }

    fn on_deadline(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let partial = session.buffer().to_string();
        if let Some(SessionEvent::TimedOut) = session.expire(Instant::now()) {
            self.emit_timeout(partial);
        }
    }

    fn emit_timeout(&self, partial: String) {
        crate::info!("No command within {}ms", self.config.command_timeout_ms);
        self.emitter
            .emit_command_timeout(listening_events::CommandTimeoutPayload {
                partial,
                timeout_ms: self.config.command_timeout_ms,
                timestamp: current_timestamp(),
            });
    }
}

/// Sleep until `deadline`, or forever when there is none
async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
