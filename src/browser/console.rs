//! Console stand-ins for the browser collaborators.
//!
//! ConsoleHost keeps an in-memory tab strip and logs every operation; every
//! navigation loads. ConsoleNotifier and ConsoleEventEmitter log what a real
//! UI would display.

use super::{HostError, NavigationOutcome, PageInteraction, TabHost, TabId, TabInfo};
use crate::events::{
    command_events, listening_events, CommandEventEmitter, CommandExecutedPayload,
    CommandFailedPayload, CommandMatchedPayload, ListeningEventEmitter, Notifier,
};
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

/// URL of a tab opened without a destination
pub const BLANK_PAGE: &str = "about:blank";

/// Log an event as JSON, warning if serialization fails
macro_rules! log_event {
    ($event:expr, $payload:expr) => {
        match serde_json::to_string(&$payload) {
            Ok(json) => crate::info!("[event] {} {}", $event, json),
            Err(e) => crate::warn!("Failed to serialize event '{}': {}", $event, e),
        }
    };
}

#[derive(Debug, Default)]
struct TabStrip {
    tabs: Vec<TabInfo>,
    active: Option<usize>,
    next_id: i64,
}

impl TabStrip {
    fn active_index(&self) -> Result<usize, HostError> {
        self.active
            .filter(|&i| i < self.tabs.len())
            .ok_or(HostError::NoActiveTab)
    }

    fn find(&mut self, id: TabId) -> Result<&mut TabInfo, HostError> {
        self.tabs
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(HostError::TabNotFound(id))
    }
}

/// In-memory browser that logs instead of driving a real one
#[derive(Debug, Default)]
pub struct ConsoleHost {
    strip: Mutex<TabStrip>,
}

impl ConsoleHost {
    /// Host with no tabs open
    pub fn new() -> Self {
        Self::default()
    }

    /// Host with a single active tab at `url`
    pub fn with_active_url(url: &str) -> Self {
        let host = Self::new();
        if let Ok(mut strip) = host.strip.lock() {
            strip.tabs.push(TabInfo {
                id: TabId(1),
                url: url.to_string(),
            });
            strip.active = Some(0);
            strip.next_id = 1;
        }
        host
    }

    /// Point the active tab at `url`, opening a tab if there is none
    pub fn navigate_active(&self, url: &str) -> Result<TabId, HostError> {
        let mut strip = self.strip()?;
        let tab = match strip.active_index() {
            Ok(i) => {
                strip.tabs[i].url = url.to_string();
                strip.tabs[i].id
            }
            Err(_) => push_tab(&mut strip, url),
        };
        crate::info!("Tab {} now at {}", tab, url);
        Ok(tab)
    }

    /// Snapshot of all open tabs, in strip order
    pub fn tabs(&self) -> Vec<TabInfo> {
        self.strip.lock().map(|s| s.tabs.clone()).unwrap_or_default()
    }

    fn strip(&self) -> Result<MutexGuard<'_, TabStrip>, HostError> {
        self.strip
            .lock()
            .map_err(|_| HostError::Operation("tab state lock poisoned".to_string()))
    }
}

fn push_tab(strip: &mut TabStrip, url: &str) -> TabId {
    strip.next_id += 1;
    let id = TabId(strip.next_id);
    strip.tabs.push(TabInfo {
        id,
        url: url.to_string(),
    });
    strip.active = Some(strip.tabs.len() - 1);
    id
}

#[async_trait]
impl TabHost for ConsoleHost {
    async fn active_tab(&self) -> Result<TabInfo, HostError> {
        let strip = self.strip()?;
        let i = strip.active_index()?;
        Ok(strip.tabs[i].clone())
    }

    async fn create_tab(&self, url: Option<&str>) -> Result<TabId, HostError> {
        let url = url.unwrap_or(BLANK_PAGE);
        let id = push_tab(&mut *self.strip()?, url);
        crate::info!("Opened tab {} at {}", id, url);
        Ok(id)
    }

    async fn wait_for_load(&self, tab: TabId) -> Result<NavigationOutcome, HostError> {
        let mut strip = self.strip()?;
        let info = strip.find(tab)?;
        Ok(NavigationOutcome::Loaded {
            final_url: info.url.clone(),
        })
    }

    async fn update_tab(&self, tab: TabId, url: &str) -> Result<(), HostError> {
        let mut strip = self.strip()?;
        strip.find(tab)?.url = url.to_string();
        crate::info!("Tab {} redirected to {}", tab, url);
        Ok(())
    }

    async fn close_active_tab(&self) -> Result<(), HostError> {
        let mut strip = self.strip()?;
        let i = strip.active_index()?;
        let closed = strip.tabs.remove(i);
        strip.active = match strip.tabs.len() {
            0 => None,
            len => Some(i.min(len - 1)),
        };
        crate::info!("Closed tab {} ({})", closed.id, closed.url);
        Ok(())
    }

    async fn reload_active_tab(&self) -> Result<(), HostError> {
        let strip = self.strip()?;
        let tab = &strip.tabs[strip.active_index()?];
        crate::info!("Reloaded tab {} ({})", tab.id, tab.url);
        Ok(())
    }

    async fn activate_relative_tab(&self, offset: i32) -> Result<(), HostError> {
        let mut strip = self.strip()?;
        let current = strip.active_index()? as i64;
        let len = strip.tabs.len() as i64;
        let next = (current + offset as i64).rem_euclid(len) as usize;
        strip.active = Some(next);
        crate::info!("Switched to tab {} ({})", strip.tabs[next].id, strip.tabs[next].url);
        Ok(())
    }

    async fn run_page_interaction(
        &self,
        interaction: &PageInteraction,
        text: Option<&str>,
    ) -> Result<(), HostError> {
        let strip = self.strip()?;
        let tab = &strip.tabs[strip.active_index()?];
        crate::info!(
            "{:?} '{}' on {} with {:?}",
            interaction.kind,
            interaction.selector,
            tab.url,
            text
        );
        Ok(())
    }
}

/// Notifier that writes notifications to the log
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify_user(&self, title: &str, message: &str) {
        crate::info!("[{}] {}", title, message);
    }
}

/// Event emitter that logs every payload as JSON
#[derive(Debug, Default)]
pub struct ConsoleEventEmitter;

impl CommandEventEmitter for ConsoleEventEmitter {
    fn emit_command_matched(&self, payload: CommandMatchedPayload) {
        log_event!(command_events::COMMAND_MATCHED, payload);
    }

    fn emit_command_executed(&self, payload: CommandExecutedPayload) {
        log_event!(command_events::COMMAND_EXECUTED, payload);
    }

    fn emit_command_failed(&self, payload: CommandFailedPayload) {
        log_event!(command_events::COMMAND_FAILED, payload);
    }
}

impl ListeningEventEmitter for ConsoleEventEmitter {
    fn emit_listening_started(&self, payload: listening_events::ListeningStartedPayload) {
        log_event!(listening_events::LISTENING_STARTED, payload);
    }

    fn emit_listening_stopped(&self, payload: listening_events::ListeningStoppedPayload) {
        log_event!(listening_events::LISTENING_STOPPED, payload);
    }

    fn emit_wake_word_detected(&self, payload: listening_events::WakeWordDetectedPayload) {
        log_event!(listening_events::WAKE_WORD_DETECTED, payload);
    }

    fn emit_transcript_interim(&self, payload: listening_events::TranscriptInterimPayload) {
        log_event!(listening_events::TRANSCRIPT_INTERIM, payload);
    }

    fn emit_command_captured(&self, payload: listening_events::CommandCapturedPayload) {
        log_event!(listening_events::COMMAND_CAPTURED, payload);
    }

    fn emit_command_timeout(&self, payload: listening_events::CommandTimeoutPayload) {
        log_event!(listening_events::COMMAND_TIMEOUT, payload);
    }
}

#[cfg(test)]
#[path = "console_test.rs"]
mod tests;
