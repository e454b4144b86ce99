// Tests for CommandService
// Test cases:
// - Site actions for the active domain take priority over interpretation
// - Unhandled commands are interpreted and executed
// - Failures notify the user once and emit command_failed

use super::*;
use crate::browser::tests::{HostCall, MockTabHost};
use crate::browser::{NavigationOutcome, PageInteraction, TabId};
use crate::events::tests::{MockEventEmitter, MockNotifier};
use crate::voice_commands::executor::ActionErrorCode;

struct Fixture {
    host: Arc<MockTabHost>,
    notifier: Arc<MockNotifier>,
    emitter: Arc<MockEventEmitter>,
    service: CommandService<MockEventEmitter>,
}

fn fixture(host: MockTabHost) -> Fixture {
    let host = Arc::new(host);
    let notifier = Arc::new(MockNotifier::new());
    let emitter = Arc::new(MockEventEmitter::new());
    let service = CommandService::new(
        host.clone(),
        &Settings::default(),
        notifier.clone(),
        emitter.clone(),
    )
    .unwrap();
    Fixture {
        host,
        notifier,
        emitter,
        service,
    }
}

#[tokio::test]
async fn test_empty_command_is_ignored() {
    let f = fixture(MockTabHost::new("https://youtube.com"));

    assert_eq!(f.service.process("   ").await, CommandOutcome::Ignored);
    assert!(f.host.calls().is_empty());
    assert!(f.emitter.command_matched_events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_site_action_handles_command_on_matching_domain() {
    let f = fixture(MockTabHost::new("https://youtube.com/feed"));

    let outcome = f.service.process("type in search bar of youtube cats").await;

    assert_eq!(
        outcome,
        CommandOutcome::SiteHandled {
            domain: "youtube.com".to_string(),
            action: "type in search bar".to_string(),
        }
    );
    assert_eq!(
        f.host.calls(),
        vec![
            HostCall::ActiveTab,
            HostCall::PageInteraction(
                PageInteraction::type_into("input#search"),
                Some("cats".to_string())
            ),
        ]
    );
    let matched = f.emitter.command_matched_events.lock().unwrap();
    assert_eq!(matched.len(), 1);
    assert_eq!(matched[0].source, "site");
    assert_eq!(f.emitter.command_executed_events.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_open_command_is_interpreted_and_executed() {
    let f = fixture(MockTabHost::new("https://example.com"));

    let outcome = f.service.process("open youtube").await;

    match outcome {
        CommandOutcome::Executed { action, .. } => assert_eq!(
            action,
            BrowserAction::OpenWebsite {
                url: "https://www.youtube.com".to_string()
            }
        ),
        other => panic!("expected execution, got {:?}", other),
    }
    assert_eq!(
        f.host.calls(),
        vec![
            HostCall::ActiveTab,
            HostCall::CreateTab(Some("https://www.youtube.com".to_string())),
            HostCall::WaitForLoad(TabId(42)),
        ]
    );

    let matched = f.emitter.command_matched_events.lock().unwrap();
    assert_eq!(matched[0].source, "interpreter");
    assert_eq!(matched[0].action, "openWebsite");
    assert!(f.notifier.messages().is_empty());
}

#[tokio::test]
async fn test_site_table_for_other_domain_is_not_consulted() {
    // "now search" is a site action on google.com and youtube.com only
    let f = fixture(MockTabHost::new("https://example.com"));

    let outcome = f.service.process("now search").await;

    match outcome {
        CommandOutcome::Executed { action, .. } => assert_eq!(
            action,
            BrowserAction::Search {
                query: "now search".to_string()
            }
        ),
        other => panic!("expected search fallback, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_active_tab_falls_through_to_interpreter() {
    let f = fixture(MockTabHost::without_tabs());

    let outcome = f.service.process("new tab").await;

    assert!(matches!(
        outcome,
        CommandOutcome::Executed {
            action: BrowserAction::NewTab,
            ..
        }
    ));
    assert_eq!(
        f.host.calls(),
        vec![HostCall::ActiveTab, HostCall::CreateTab(None)]
    );
}

#[tokio::test]
async fn test_unreachable_site_still_executes_with_substitution() {
    let f = fixture(MockTabHost::new("https://example.com"));
    f.host.set_outcome(NavigationOutcome::Failed {
        reason: "ERR_NAME_NOT_RESOLVED".to_string(),
    });

    let outcome = f.service.process("go to github").await;

    assert!(matches!(outcome, CommandOutcome::Executed { .. }));
    assert!(f.host.calls().contains(&HostCall::UpdateTab(
        TabId(42),
        "https://www.google.com/search?q=github.com".to_string()
    )));
    assert!(f.notifier.messages().is_empty());
}

#[tokio::test]
async fn test_host_failure_notifies_user_once() {
    let f = fixture(MockTabHost::new("https://example.com"));
    f.host.fail_on("create_tab");

    let outcome = f.service.process("open youtube").await;

    match outcome {
        CommandOutcome::Failed { error } => assert_eq!(error.code, ActionErrorCode::HostFailure),
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(f.notifier.messages(), vec![ERROR_NOTIFICATION]);
    assert_eq!(f.notifier.notifications.lock().unwrap()[0].0, NOTIFICATION_TITLE);

    let failed = f.emitter.command_failed_events.lock().unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].error_code, "HOST_FAILURE");
    assert_eq!(failed[0].transcription, "open youtube");
    assert!(f.emitter.command_executed_events.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_site_action_failure_is_reported() {
    let f = fixture(MockTabHost::new("https://chat.openai.com"));
    f.host.fail_on("run_page_interaction");

    let outcome = f.service.process("search about it").await;

    assert!(matches!(outcome, CommandOutcome::Failed { .. }));
    assert_eq!(f.notifier.messages(), vec![ERROR_NOTIFICATION]);
    assert_eq!(f.emitter.command_failed_events.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unrecognized_command_searches_literally() {
    let f = fixture(MockTabHost::new("https://example.com"));

    let outcome = f.service.process("what is the weather").await;

    match outcome {
        CommandOutcome::Executed { action, result } => {
            assert_eq!(
                action,
                BrowserAction::Search {
                    query: "what is the weather".to_string()
                }
            );
            assert_eq!(result.message, "Searched for what is the weather");
        }
        other => panic!("expected search, got {:?}", other),
    }
}

#[test]
fn test_invalid_search_engine_setting_fails_construction() {
    let mut settings = Settings::default();
    settings.search_engine_url = "not a url".to_string();

    let result = CommandService::new(
        Arc::new(MockTabHost::new("https://example.com")),
        &settings,
        Arc::new(MockNotifier::new()),
        Arc::new(MockEventEmitter::new()),
    );
    assert!(matches!(result, Err(ServiceError::SearchEngine(_))));
}
