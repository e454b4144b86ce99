// Wake word session - gates transcripts into one command per wake phrase
//
// Idle until a final chunk contains the wake phrase, then collects final chunks
// until the terminator word closes the command or the deadline passes.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::Instant;

pub const DEFAULT_WAKE_PHRASE: &str = "hey kutty";
pub const DEFAULT_TERMINATOR: &str = "done";

/// Command window after the wake phrase (background listening)
pub const DEFAULT_COMMAND_TIMEOUT_MS: u64 = 10_000;

/// Shorter command window used by the popup listening surface
pub const POPUP_COMMAND_TIMEOUT_MS: u64 = 5_000;

/// Configuration for wake word sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListeningConfig {
    /// Phrase that opens a command window (case-insensitive)
    pub wake_phrase: String,
    /// Word that closes the command window (case-insensitive, whole word)
    pub terminator: String,
    /// How long a command window stays open, in milliseconds
    pub command_timeout_ms: u64,
}

impl Default for ListeningConfig {
    fn default() -> Self {
        Self {
            wake_phrase: DEFAULT_WAKE_PHRASE.to_string(),
            terminator: DEFAULT_TERMINATOR.to_string(),
            command_timeout_ms: DEFAULT_COMMAND_TIMEOUT_MS,
        }
    }
}

impl ListeningConfig {
    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    /// Waiting for the wake phrase
    Idle,
    /// Wake phrase heard, buffering the command
    Collecting,
}

/// Something the session wants the outside world to know about
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Wake phrase heard; a command window is open
    WakeDetected,
    /// Interim transcript, for UI feedback only
    Interim(String),
    /// Terminator heard with a nonempty buffer
    Command(String),
    /// Terminator heard but nothing was said
    Discarded,
    /// Deadline passed before the terminator
    TimedOut,
}

/// Wake phrase / terminator state machine
///
/// Owns no timer itself: callers pass the current instant in and poll
/// [`WakeWordSession::expire`] once the [`deadline`](WakeWordSession::deadline) passes.
#[derive(Debug)]
pub struct WakeWordSession {
    wake_phrase: String,
    terminator: Vec<String>,
    timeout: Duration,
    state: SessionState,
    buffer: String,
    deadline: Option<Instant>,
}

impl WakeWordSession {
    pub fn new(config: &ListeningConfig) -> Self {
        Self {
            wake_phrase: normalize(&config.wake_phrase.to_lowercase()),
            terminator: config
                .terminator
                .to_lowercase()
                .split_whitespace()
                .map(|w| bare_word(w).to_string())
                .filter(|w| !w.is_empty())
                .collect(),
            timeout: config.command_timeout(),
            state: SessionState::Idle,
            buffer: String::new(),
            deadline: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_collecting(&self) -> bool {
        self.state == SessionState::Collecting
    }

    /// Command text collected so far
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// When the open command window expires, if one is open
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Feed one transcript chunk
    ///
    /// Interim chunks never touch the buffer. Final chunks may open a window,
    /// extend the buffer, or close the window and yield the command. A final
    /// chunk at or past the deadline yields `TimedOut` and is dropped.
    pub fn on_transcript(&mut self, text: &str, is_final: bool, now: Instant) -> Vec<SessionEvent> {
        let text = normalize(&text.to_lowercase());

        if !is_final {
            return vec![SessionEvent::Interim(text)];
        }

        // A chunk arriving after the deadline closes the window instead of feeding it
        if let Some(timed_out) = self.expire(now) {
            return vec![timed_out];
        }

        let mut events = Vec::new();
        let chunk = match self.state {
            SessionState::Idle => {
                let Some((_, after)) = text.split_once(self.wake_phrase.as_str()) else {
                    crate::trace!("No wake phrase in '{}'", text);
                    return events;
                };
                self.state = SessionState::Collecting;
                self.buffer.clear();
                self.deadline = Some(now + self.timeout);
                crate::debug!("Wake phrase detected, collecting command");
                events.push(SessionEvent::WakeDetected);
                after.trim_start_matches(|c: char| c.is_ascii_punctuation()).to_string()
            }
            // A repeated wake phrase is dropped and does not re-arm the deadline
            SessionState::Collecting => text.replace(self.wake_phrase.as_str(), " "),
        };

        let (remainder, terminated) = strip_phrase(&chunk, &self.terminator);
        self.append(&remainder);

        if terminated {
            let command = std::mem::take(&mut self.buffer);
            self.reset();
            if command.is_empty() {
                crate::debug!("Command window closed with nothing said");
                events.push(SessionEvent::Discarded);
            } else {
                crate::debug!("Command complete: '{}'", command);
                events.push(SessionEvent::Command(command));
            }
        }

        events
    }

    /// Close the command window if its deadline has passed
    ///
    /// Returns `Some(TimedOut)` when the buffer was discarded.
    pub fn expire(&mut self, now: Instant) -> Option<SessionEvent> {
        match self.deadline {
            Some(deadline) if self.is_collecting() && now >= deadline => {
                crate::debug!("Command window timed out, discarding '{}'", self.buffer);
                self.reset();
                Some(SessionEvent::TimedOut)
            }
            _ => None,
        }
    }

    /// Return to idle without emitting anything
    pub fn reset(&mut self) {
        self.state = SessionState::Idle;
        self.buffer.clear();
        self.deadline = None;
    }

    fn append(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if !self.buffer.is_empty() {
            self.buffer.push(' ');
        }
        self.buffer.push_str(text);
    }
}

/// Collapse runs of whitespace and trim
fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove every whole-word occurrence of `phrase` from `text`
///
/// Punctuation around a word is ignored when comparing, so `done.` and
/// `done!` match `done`. Returns the normalized remainder and whether the
/// phrase occurred at all.
fn strip_phrase(text: &str, phrase: &[String]) -> (String, bool) {
    let words: Vec<&str> = text.split_whitespace().collect();
    if phrase.is_empty() {
        return (words.join(" "), false);
    }

    let mut kept = Vec::with_capacity(words.len());
    let mut found = false;
    let mut i = 0;
    while i < words.len() {
        let end = i + phrase.len();
        if end <= words.len()
            && words[i..end]
                .iter()
                .zip(phrase)
                .all(|(w, p)| bare_word(w) == p.as_str())
        {
            found = true;
            i = end;
        } else {
            kept.push(words[i]);
            i += 1;
        }
    }
    (kept.join(" "), found)
}

fn bare_word(word: &str) -> &str {
    word.trim_matches(|c: char| !c.is_alphanumeric())
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
