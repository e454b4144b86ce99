// Tests for ListeningPipeline
// Runs on paused tokio time so command window timeouts are deterministic

use super::*;
use crate::browser::tests::{HostCall, MockTabHost};
use crate::browser::TabId;
use crate::events::tests::{MockEventEmitter, MockNotifier};
use crate::settings::Settings;
use std::time::Duration;
use tokio::task::JoinHandle;

struct Harness {
    host: Arc<MockTabHost>,
    notifier: Arc<MockNotifier>,
    emitter: Arc<MockEventEmitter>,
    handle: ListeningHandle,
    task: JoinHandle<()>,
}

fn spawn_pipeline() -> Harness {
    let host = Arc::new(MockTabHost::new("https://example.com"));
    let notifier = Arc::new(MockNotifier::new());
    let emitter = Arc::new(MockEventEmitter::new());
    let service = CommandService::new(
        host.clone(),
        &Settings::default(),
        notifier.clone(),
        emitter.clone(),
    )
    .unwrap();
    let (pipeline, handle) = ListeningPipeline::new(
        ListeningConfig::default(),
        service,
        notifier.clone(),
        emitter.clone(),
    );
    let task = tokio::spawn(pipeline.run());
    Harness {
        host,
        notifier,
        emitter,
        handle,
        task,
    }
}

/// Let the pipeline task drain its queue
async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

#[tokio::test(start_paused = true)]
async fn test_wake_command_terminator_opens_site() {
    let h = spawn_pipeline();

    h.handle.start().await.unwrap();
    h.handle.push_transcript("hey kutty", true).await.unwrap();
    h.handle.push_transcript("open youtube done", true).await.unwrap();
    settle().await;

    assert_eq!(
        h.notifier.messages(),
        vec![LISTENING_NOTIFICATION, WAKE_NOTIFICATION]
    );
    assert_eq!(h.emitter.wake_word_events.lock().unwrap().len(), 1);
    let captured = h.emitter.captured_events.lock().unwrap();
    assert_eq!(captured.len(), 1);
    assert_eq!(captured[0].command, "open youtube");
    assert_eq!(
        h.host.calls(),
        vec![
            HostCall::ActiveTab,
            HostCall::CreateTab(Some("https://www.youtube.com".to_string())),
            HostCall::WaitForLoad(TabId(42)),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_transcripts_ignored_until_started() {
    let h = spawn_pipeline();

    h.handle.push_transcript("hey kutty new tab done", true).await.unwrap();
    settle().await;

    assert!(h.emitter.wake_word_events.lock().unwrap().is_empty());
    assert!(h.host.calls().is_empty());
    assert!(h.notifier.messages().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_timeout_returns_to_idle() {
    let h = spawn_pipeline();

    h.handle.start().await.unwrap();
    h.handle.push_transcript("hey kutty open", true).await.unwrap();
    tokio::time::sleep(Duration::from_millis(10_001)).await;

    let timeouts = h.emitter.timeout_events.lock().unwrap().clone();
    assert_eq!(timeouts.len(), 1);
    assert_eq!(timeouts[0].partial, "open");
    assert_eq!(timeouts[0].timeout_ms, 10_000);

    // The window is closed, so finishing the sentence does nothing
    h.handle.push_transcript("youtube done", true).await.unwrap();
    settle().await;
    assert!(h.emitter.captured_events.lock().unwrap().is_empty());
    assert!(h.host.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_later_chunks_do_not_extend_window() {
    let h = spawn_pipeline();

    h.handle.start().await.unwrap();
    h.handle.push_transcript("hey kutty", true).await.unwrap();
    tokio::time::sleep(Duration::from_secs(6)).await;
    h.handle.push_transcript("search for", true).await.unwrap();
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert_eq!(h.emitter.timeout_events.lock().unwrap().len(), 1);
    assert!(h.emitter.captured_events.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_command_queued_past_deadline_is_not_processed() {
    let h = spawn_pipeline();

    h.handle.start().await.unwrap();
    h.handle.push_transcript("hey kutty", true).await.unwrap();
    settle().await;

    // Queue the finished command, then move the clock past the deadline
    // before the pipeline gets to run again
    h.handle.push_transcript("open youtube done", true).await.unwrap();
    tokio::time::advance(Duration::from_millis(10_001)).await;
    settle().await;

    assert_eq!(h.emitter.timeout_events.lock().unwrap().len(), 1);
    assert!(h.emitter.captured_events.lock().unwrap().is_empty());
    assert!(h.host.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_command_before_deadline_is_processed() {
    let h = spawn_pipeline();

    h.handle.start().await.unwrap();
    h.handle.push_transcript("hey kutty", true).await.unwrap();
    tokio::time::sleep(Duration::from_secs(9)).await;
    h.handle.push_transcript("refresh done", true).await.unwrap();
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert!(h.emitter.timeout_events.lock().unwrap().is_empty());
    assert_eq!(
        h.host.calls(),
        vec![HostCall::ActiveTab, HostCall::ReloadActiveTab]
    );
}

#[tokio::test(start_paused = true)]
async fn test_stop_discards_partial_command() {
    let h = spawn_pipeline();

    h.handle.start().await.unwrap();
    h.handle.push_transcript("hey kutty open youtube", true).await.unwrap();
    h.handle.stop().await.unwrap();
    settle().await;

    let stopped = h.emitter.listening_stopped_events.lock().unwrap().clone();
    assert_eq!(stopped.len(), 1);
    assert_eq!(stopped[0].discarded.as_deref(), Some("open youtube"));

    // A fresh session starts idle; the old buffer is gone
    h.handle.start().await.unwrap();
    h.handle.push_transcript("done", true).await.unwrap();
    settle().await;
    assert!(h.emitter.captured_events.lock().unwrap().is_empty());
    assert!(h.host.calls().is_empty());

    // No timeout fires for the dropped window
    tokio::time::sleep(Duration::from_secs(20)).await;
    assert!(h.emitter.timeout_events.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_interim_chunks_are_reported_only() {
    let h = spawn_pipeline();

    h.handle.start().await.unwrap();
    h.handle.push_transcript("hey kutty", true).await.unwrap();
    h.handle.push_transcript("new tab done", false).await.unwrap();
    settle().await;

    let interim = h.emitter.interim_events.lock().unwrap().clone();
    assert_eq!(interim.len(), 1);
    assert_eq!(interim[0].text, "new tab done");
    assert!(h.emitter.captured_events.lock().unwrap().is_empty());
    assert!(h.host.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_double_start_keeps_session() {
    let h = spawn_pipeline();

    h.handle.start().await.unwrap();
    h.handle.push_transcript("hey kutty close", true).await.unwrap();
    h.handle.start().await.unwrap();
    h.handle.push_transcript("tab done", true).await.unwrap();
    settle().await;

    assert_eq!(h.emitter.listening_started_events.lock().unwrap().len(), 1);
    assert!(h.host.calls().contains(&HostCall::CloseActiveTab));
}

#[tokio::test(start_paused = true)]
async fn test_failed_command_notifies_and_keeps_listening() {
    let h = spawn_pipeline();
    h.host.fail_on("close_active_tab");

    h.handle.start().await.unwrap();
    h.handle.push_transcript("hey kutty close tab done", true).await.unwrap();
    h.handle.push_transcript("hey kutty new tab done", true).await.unwrap();
    settle().await;

    assert_eq!(
        h.notifier.messages(),
        vec![
            LISTENING_NOTIFICATION,
            WAKE_NOTIFICATION,
            crate::processing::ERROR_NOTIFICATION,
            WAKE_NOTIFICATION,
        ]
    );
    assert!(h.host.calls().contains(&HostCall::CreateTab(None)));
}

#[tokio::test(start_paused = true)]
async fn test_run_exits_when_handles_dropped() {
    let h = spawn_pipeline();
    drop(h.handle);
    h.task.await.unwrap();
}

#[tokio::test]
async fn test_handle_reports_closed_pipeline() {
    let host = Arc::new(MockTabHost::new("https://example.com"));
    let emitter = Arc::new(MockEventEmitter::new());
    let notifier = Arc::new(MockNotifier::new());
    let service =
        CommandService::new(host, &Settings::default(), notifier.clone(), emitter.clone()).unwrap();
    let (pipeline, handle) =
        ListeningPipeline::new(ListeningConfig::default(), service, notifier, emitter);
    assert!(!pipeline.is_listening());

    drop(pipeline);
    assert_eq!(handle.start().await, Err(PipelineError::Closed));
    assert_eq!(
        handle.push_transcript("hey kutty", true).await,
        Err(PipelineError::Closed)
    );
}
