// Command and listening events for UI notification
// Defines event payloads and emission traits for testability

use serde::Serialize;

/// Command-related event names
pub mod command_events {
    pub const COMMAND_MATCHED: &str = "command_matched";
    pub const COMMAND_EXECUTED: &str = "command_executed";
    pub const COMMAND_FAILED: &str = "command_failed";
}

/// Listening-related event names and payloads
pub mod listening_events {
    use serde::Serialize;

    pub const LISTENING_STARTED: &str = "listening_started";
    pub const LISTENING_STOPPED: &str = "listening_stopped";
    pub const WAKE_WORD_DETECTED: &str = "wake_word_detected";
    pub const TRANSCRIPT_INTERIM: &str = "transcript_interim";
    pub const COMMAND_CAPTURED: &str = "command_captured";
    pub const COMMAND_TIMEOUT: &str = "command_timeout";

    /// Payload for listening_started event
    #[derive(Debug, Clone, Serialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    pub struct ListeningStartedPayload {
        /// Phrase the session waits for
        pub wake_phrase: String,
        /// ISO 8601 timestamp when listening started
        pub timestamp: String,
    }

    /// Payload for listening_stopped event
    #[derive(Debug, Clone, Serialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    pub struct ListeningStoppedPayload {
        /// Command text dropped because listening stopped mid-collection
        pub discarded: Option<String>,
        pub timestamp: String,
    }

    /// Payload for wake_word_detected event
    #[derive(Debug, Clone, Serialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    pub struct WakeWordDetectedPayload {
        /// The final transcript chunk that contained the wake phrase
        pub transcription: String,
        /// ISO 8601 timestamp when the wake phrase was heard
        pub timestamp: String,
    }

    /// Payload for transcript_interim event
    #[derive(Debug, Clone, Serialize, PartialEq)]
    pub struct TranscriptInterimPayload {
        pub text: String,
    }

    /// Payload for command_captured event
    #[derive(Debug, Clone, Serialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    pub struct CommandCapturedPayload {
        /// Full command text between wake phrase and terminator
        pub command: String,
        pub timestamp: String,
    }

    /// Payload for command_timeout event
    #[derive(Debug, Clone, Serialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    pub struct CommandTimeoutPayload {
        /// Partial command discarded by the timeout
        pub partial: String,
        /// Window length that elapsed, in milliseconds
        pub timeout_ms: u64,
        pub timestamp: String,
    }
}

/// Payload for command_matched event
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CommandMatchedPayload {
    /// ID assigned to this command run
    pub command_id: String,
    /// The command text that was matched
    pub transcription: String,
    /// Which stage handled it: "site" or "interpreter"
    pub source: String,
    /// Action name (e.g. "openWebsite", "type in search bar")
    pub action: String,
}

/// Payload for command_executed event
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CommandExecutedPayload {
    /// ID of the executed command
    pub command_id: String,
    /// The command text
    pub transcription: String,
    /// Result message
    pub message: String,
}

/// Payload for command_failed event
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CommandFailedPayload {
    /// ID of the command that failed
    pub command_id: String,
    /// The command text
    pub transcription: String,
    /// Error code
    pub error_code: String,
    /// Error message
    pub error_message: String,
}

/// Trait for emitting command events
/// Allows mocking in tests while the CLI logs them to the console
pub trait CommandEventEmitter: Send + Sync {
    /// Emit command_matched event
    fn emit_command_matched(&self, payload: CommandMatchedPayload);

    /// Emit command_executed event
    fn emit_command_executed(&self, payload: CommandExecutedPayload);

    /// Emit command_failed event
    fn emit_command_failed(&self, payload: CommandFailedPayload);
}

/// Trait for emitting listening events
pub trait ListeningEventEmitter: Send + Sync {
    fn emit_listening_started(&self, payload: listening_events::ListeningStartedPayload);

    fn emit_listening_stopped(&self, payload: listening_events::ListeningStoppedPayload);

    fn emit_wake_word_detected(&self, payload: listening_events::WakeWordDetectedPayload);

    fn emit_transcript_interim(&self, payload: listening_events::TranscriptInterimPayload);

    fn emit_command_captured(&self, payload: listening_events::CommandCapturedPayload);

    fn emit_command_timeout(&self, payload: listening_events::CommandTimeoutPayload);
}

/// User-facing notifications (toasts, system notifications)
///
/// Fire-and-forget: implementations log their own failures.
pub trait Notifier: Send + Sync {
    fn notify_user(&self, title: &str, message: &str);
}

/// Get the current timestamp in ISO 8601 format
pub fn current_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

#[cfg(test)]
#[path = "events_test.rs"]
pub(crate) mod tests;
