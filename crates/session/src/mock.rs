//! Scripted in-memory session for engine tests.
//!
//! A `MockSession` is a tiny DOM stand-in: elements are registered under
//! `strategy=value` keys, every query and interaction is recorded, and the
//! snapshot surfaces (screenshot / page source / console) can be told to
//! fail so capture independence can be exercised.

use crate::{BrowserSession, ElementHandle, LocatorStrategy, SessionError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

/// Key under which elements are registered and queries recorded.
pub fn locator_key(strategy: LocatorStrategy, value: &str) -> String {
    format!("{}={}", strategy.name(), value)
}

/// One scripted element.
#[derive(Debug, Clone)]
pub struct MockElement {
    pub id: String,
    pub displayed: bool,
    pub enabled: bool,
    pub text: String,
    pub value: Option<String>,
    pub value_readable: bool,
    pub attributes: HashMap<String, String>,
    /// Click attempts that fail with a stale-element error before one succeeds.
    pub failing_clicks: u32,
    /// Swallow keystrokes: `send_keys` is recorded but the value never changes.
    pub ignores_keys: bool,
}

impl MockElement {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            displayed: true,
            enabled: true,
            text: String::new(),
            value: Some(String::new()),
            value_readable: true,
            attributes: HashMap::new(),
            failing_clicks: 0,
            ignores_keys: false,
        }
    }

    pub fn hidden(mut self) -> Self {
        self.displayed = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Model a control whose value property is not observable.
    pub fn value_unreadable(mut self) -> Self {
        self.value_readable = false;
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn failing_clicks(mut self, failures: u32) -> Self {
        self.failing_clicks = failures;
        self
    }

    pub fn ignoring_keys(mut self) -> Self {
        self.ignores_keys = true;
        self
    }
}

#[derive(Default)]
struct MockState {
    elements: Vec<(String, MockElement)>,
    queries: Vec<String>,
    clicks: HashMap<String, u32>,
    typed: Vec<(String, String)>,
    cleared: Vec<String>,
    navigations: Vec<String>,
    current_url: String,
    title: String,
    page_source: String,
    console: Vec<String>,
    screenshot_png: Vec<u8>,
    screenshot_requests: u32,
    fail_screenshot: bool,
    fail_page_source: bool,
    fail_console: bool,
}

/// Scripted [`BrowserSession`] with call recording.
#[derive(Default)]
pub struct MockSession {
    state: Mutex<MockState>,
}

impl MockSession {
    pub fn new() -> Self {
        let session = Self::default();
        {
            let mut state = session.state.lock();
            state.current_url = "about:blank".to_string();
            state.page_source = "<html><body></body></html>".to_string();
            state.screenshot_png = vec![0x89, b'P', b'N', b'G'];
        }
        session
    }

    /// Register an element under a locator; the same locator may hold several.
    pub fn register(&self, strategy: LocatorStrategy, value: &str, element: MockElement) {
        self.state
            .lock()
            .elements
            .push((locator_key(strategy, value), element));
    }

    pub fn set_url(&self, url: impl Into<String>) {
        self.state.lock().current_url = url.into();
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.state.lock().title = title.into();
    }

    pub fn set_page_source(&self, source: impl Into<String>) {
        self.state.lock().page_source = source.into();
    }

    pub fn push_console(&self, line: impl Into<String>) {
        self.state.lock().console.push(line.into());
    }

    pub fn fail_screenshot(&self, fail: bool) {
        self.state.lock().fail_screenshot = fail;
    }

    pub fn fail_page_source(&self, fail: bool) {
        self.state.lock().fail_page_source = fail;
    }

    pub fn fail_console(&self, fail: bool) {
        self.state.lock().fail_console = fail;
    }

    /// Flip an element's visibility, e.g. to reveal the password step.
    pub fn set_displayed(&self, element_id: &str, displayed: bool) {
        let mut state = self.state.lock();
        for (_, element) in state.elements.iter_mut() {
            if element.id == element_id {
                element.displayed = displayed;
            }
        }
    }

    // Recorded-interaction probes used by tests.

    pub fn queries(&self) -> Vec<String> {
        self.state.lock().queries.clone()
    }

    pub fn was_queried(&self, strategy: LocatorStrategy, value: &str) -> bool {
        let key = locator_key(strategy, value);
        self.state.lock().queries.iter().any(|q| q == &key)
    }

    pub fn clicks_on(&self, element_id: &str) -> u32 {
        self.state
            .lock()
            .clicks
            .get(element_id)
            .copied()
            .unwrap_or(0)
    }

    pub fn typed_into(&self, element_id: &str) -> Vec<String> {
        self.state
            .lock()
            .typed
            .iter()
            .filter(|(id, _)| id == element_id)
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub fn cleared(&self, element_id: &str) -> bool {
        self.state.lock().cleared.iter().any(|id| id == element_id)
    }

    pub fn navigations(&self) -> Vec<String> {
        self.state.lock().navigations.clone()
    }

    pub fn screenshot_requests(&self) -> u32 {
        self.state.lock().screenshot_requests
    }

    fn with_element<T>(
        &self,
        handle: &ElementHandle,
        f: impl FnOnce(&mut MockElement) -> T,
    ) -> Result<T, SessionError> {
        let mut state = self.state.lock();
        state
            .elements
            .iter_mut()
            .find(|(_, element)| element.id == handle.0)
            .map(|(_, element)| f(element))
            .ok_or_else(|| SessionError::StaleElement(handle.0.clone()))
    }
}

#[async_trait]
impl BrowserSession for MockSession {
    async fn navigate(&self, url: &str) -> Result<(), SessionError> {
        let mut state = self.state.lock();
        state.navigations.push(url.to_string());
        state.current_url = url.to_string();
        Ok(())
    }

    async fn current_url(&self) -> Result<String, SessionError> {
        Ok(self.state.lock().current_url.clone())
    }

    async fn title(&self) -> Result<String, SessionError> {
        Ok(self.state.lock().title.clone())
    }

    async fn find(
        &self,
        strategy: LocatorStrategy,
        value: &str,
    ) -> Result<Vec<ElementHandle>, SessionError> {
        let key = locator_key(strategy, value);
        let mut state = self.state.lock();
        state.queries.push(key.clone());
        Ok(state
            .elements
            .iter()
            .filter(|(k, _)| k == &key)
            .map(|(_, element)| ElementHandle::new(element.id.clone()))
            .collect())
    }

    async fn is_displayed(&self, element: &ElementHandle) -> Result<bool, SessionError> {
        self.with_element(element, |e| e.displayed)
    }

    async fn is_enabled(&self, element: &ElementHandle) -> Result<bool, SessionError> {
        self.with_element(element, |e| e.enabled)
    }

    async fn click(&self, element: &ElementHandle) -> Result<(), SessionError> {
        let outcome = self.with_element(element, |e| {
            if e.failing_clicks > 0 {
                e.failing_clicks -= 1;
                Err(SessionError::StaleElement(e.id.clone()))
            } else {
                Ok(())
            }
        })?;
        let mut state = self.state.lock();
        *state.clicks.entry(element.0.clone()).or_insert(0) += 1;
        outcome
    }

    async fn clear(&self, element: &ElementHandle) -> Result<(), SessionError> {
        let id = element.0.clone();
        self.with_element(element, |e| e.value = Some(String::new()))?;
        self.state.lock().cleared.push(id);
        Ok(())
    }

    async fn send_keys(&self, element: &ElementHandle, text: &str) -> Result<(), SessionError> {
        self.with_element(element, |e| {
            if !e.ignores_keys {
                let current = e.value.take().unwrap_or_default();
                e.value = Some(format!("{current}{text}"));
            }
        })?;
        self.state
            .lock()
            .typed
            .push((element.0.clone(), text.to_string()));
        Ok(())
    }

    async fn text_of(&self, element: &ElementHandle) -> Result<String, SessionError> {
        self.with_element(element, |e| e.text.clone())
    }

    async fn attribute(
        &self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, SessionError> {
        self.with_element(element, |e| e.attributes.get(name).cloned())
    }

    async fn value_of(&self, element: &ElementHandle) -> Result<Option<String>, SessionError> {
        self.with_element(element, |e| {
            if e.value_readable {
                e.value.clone()
            } else {
                None
            }
        })
    }

    async fn screenshot(&self) -> Result<Vec<u8>, SessionError> {
        let mut state = self.state.lock();
        state.screenshot_requests += 1;
        if state.fail_screenshot {
            return Err(SessionError::Webdriver("screenshot unavailable".into()));
        }
        Ok(state.screenshot_png.clone())
    }

    async fn page_source(&self) -> Result<String, SessionError> {
        let state = self.state.lock();
        if state.fail_page_source {
            return Err(SessionError::Webdriver("page source unavailable".into()));
        }
        Ok(state.page_source.clone())
    }

    async fn console_logs(&self) -> Result<Vec<String>, SessionError> {
        let mut state = self.state.lock();
        if state.fail_console {
            return Err(SessionError::Script("console hook missing".into()));
        }
        Ok(std::mem::take(&mut state.console))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn find_records_queries_in_order() {
        let session = MockSession::new();
        session.register(
            LocatorStrategy::Name,
            "username",
            MockElement::new("email-input"),
        );

        let missing = session.find(LocatorStrategy::Id, "username").await.unwrap();
        assert!(missing.is_empty());

        let found = session
            .find(LocatorStrategy::Name, "username")
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(
            session.queries(),
            vec!["id=username".to_string(), "name=username".to_string()]
        );
    }

    #[tokio::test]
    async fn click_scripting_counts_every_attempt() {
        let session = MockSession::new();
        session.register(
            LocatorStrategy::Css,
            "button[type='submit']",
            MockElement::new("submit").failing_clicks(2),
        );
        let handle = ElementHandle::new("submit");

        assert!(session.click(&handle).await.is_err());
        assert!(session.click(&handle).await.is_err());
        assert!(session.click(&handle).await.is_ok());
        assert_eq!(session.clicks_on("submit"), 3);
    }

    #[tokio::test]
    async fn unknown_handle_is_stale() {
        let session = MockSession::new();
        let err = session
            .click(&ElementHandle::new("gone"))
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::StaleElement(_)));
    }

    #[tokio::test]
    async fn send_keys_appends_and_clear_resets() {
        let session = MockSession::new();
        session.register(
            LocatorStrategy::Name,
            "password",
            MockElement::new("pw").with_value("old"),
        );
        let handle = ElementHandle::new("pw");

        session.send_keys(&handle, "123").await.unwrap();
        assert_eq!(session.value_of(&handle).await.unwrap().unwrap(), "old123");

        session.clear(&handle).await.unwrap();
        session.send_keys(&handle, "secret").await.unwrap();
        assert_eq!(session.value_of(&handle).await.unwrap().unwrap(), "secret");
    }
}
