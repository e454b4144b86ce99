use super::*;
use std::sync::Mutex;

/// A recorded call on `MockTabHost`
#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    ActiveTab,
    CreateTab(Option<String>),
    WaitForLoad(TabId),
    UpdateTab(TabId, String),
    CloseActiveTab,
    ReloadActiveTab,
    ActivateRelativeTab(i32),
    PageInteraction(PageInteraction, Option<String>),
}

/// Mock host that records every call in order
pub struct MockTabHost {
    calls: Mutex<Vec<HostCall>>,
    active_url: Mutex<Option<String>>,
    outcome: Mutex<NavigationOutcome>,
    failing: Mutex<Option<&'static str>>,
}

impl MockTabHost {
    pub fn new(active_url: &str) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            active_url: Mutex::new(Some(active_url.to_string())),
            outcome: Mutex::new(NavigationOutcome::Loaded {
                final_url: "https://loaded.example".to_string(),
            }),
            failing: Mutex::new(None),
        }
    }

    /// Host with no tabs at all
    pub fn without_tabs() -> Self {
        let host = Self::new("about:blank");
        *host.active_url.lock().unwrap() = None;
        host
    }

    pub fn set_outcome(&self, outcome: NavigationOutcome) {
        *self.outcome.lock().unwrap() = outcome;
    }

    /// Make the named operation (e.g. "create_tab") fail
    pub fn fail_on(&self, operation: &'static str) {
        *self.failing.lock().unwrap() = Some(operation);
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, operation: &'static str, call: HostCall) -> Result<(), HostError> {
        self.calls.lock().unwrap().push(call);
        if *self.failing.lock().unwrap() == Some(operation) {
            return Err(HostError::Operation(format!("{} failed", operation)));
        }
        Ok(())
    }
}

#[async_trait]
impl TabHost for MockTabHost {
    async fn active_tab(&self) -> Result<TabInfo, HostError> {
        self.record("active_tab", HostCall::ActiveTab)?;
        let url = self.active_url.lock().unwrap().clone();
        url.map(|url| TabInfo { id: TabId(1), url })
            .ok_or(HostError::NoActiveTab)
    }

    async fn create_tab(&self, url: Option<&str>) -> Result<TabId, HostError> {
        self.record("create_tab", HostCall::CreateTab(url.map(String::from)))?;
        Ok(TabId(42))
    }

    async fn wait_for_load(&self, tab: TabId) -> Result<NavigationOutcome, HostError> {
        self.record("wait_for_load", HostCall::WaitForLoad(tab))?;
        Ok(self.outcome.lock().unwrap().clone())
    }

    async fn update_tab(&self, tab: TabId, url: &str) -> Result<(), HostError> {
        self.record("update_tab", HostCall::UpdateTab(tab, url.to_string()))
    }

    async fn close_active_tab(&self) -> Result<(), HostError> {
        self.record("close_active_tab", HostCall::CloseActiveTab)
    }

    async fn reload_active_tab(&self) -> Result<(), HostError> {
        self.record("reload_active_tab", HostCall::ReloadActiveTab)
    }

    async fn activate_relative_tab(&self, offset: i32) -> Result<(), HostError> {
        self.record("activate_relative_tab", HostCall::ActivateRelativeTab(offset))
    }

    async fn run_page_interaction(
        &self,
        interaction: &PageInteraction,
        text: Option<&str>,
    ) -> Result<(), HostError> {
        self.record(
            "run_page_interaction",
            HostCall::PageInteraction(interaction.clone(), text.map(String::from)),
        )
    }
}

#[test]
fn test_domain_of_extracts_host() {
    assert_eq!(
        domain_of("https://www.youtube.com/watch?v=abc").as_deref(),
        Some("www.youtube.com")
    );
    assert_eq!(domain_of("https://youtube.com").as_deref(), Some("youtube.com"));
    assert_eq!(domain_of("about:blank"), None);
    assert_eq!(domain_of("not a url"), None);
}

#[test]
fn test_navigation_failure_detection() {
    assert!(!NavigationOutcome::Loaded {
        final_url: "https://www.youtube.com/".to_string()
    }
    .is_failure());
    assert!(NavigationOutcome::Loaded {
        final_url: "chrome-error://chromewebdata/".to_string()
    }
    .is_failure());
    assert!(NavigationOutcome::Failed {
        reason: "ERR_NAME_NOT_RESOLVED".to_string()
    }
    .is_failure());
}

#[test]
fn test_page_interaction_serializes_kind() {
    let json = serde_json::to_value(PageInteraction::type_into("input#search")).unwrap();
    assert_eq!(json, serde_json::json!({"selector": "input#search", "kind": "type"}));
}

#[tokio::test]
async fn test_active_tab_domain_from_url() {
    let host = MockTabHost::new("https://youtube.com/results?search_query=cats");
    assert_eq!(host.active_tab_domain().await.unwrap(), "youtube.com");
}

#[tokio::test]
async fn test_active_tab_domain_without_host() {
    let host = MockTabHost::new("about:blank");
    assert_eq!(
        host.active_tab_domain().await,
        Err(HostError::NoDomain("about:blank".to_string()))
    );
}

#[tokio::test]
async fn test_active_tab_domain_without_tabs() {
    let host = MockTabHost::without_tabs();
    assert_eq!(host.active_tab_domain().await, Err(HostError::NoActiveTab));
}
