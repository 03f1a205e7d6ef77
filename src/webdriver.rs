//! WebDriver-backed browser session
//!
//! fantoccini client behind the `BrowserSession` capability. Lifecycle
//! (connect, per-family capabilities, quit) lives here, outside the engine.
//! Console capture works through an injected page hook because the W3C
//! protocol has no log endpoint: the hook buffers console calls and page
//! errors into a window-scoped array that `console_logs` drains.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::{Client, ClientBuilder, Locator};
use parking_lot::Mutex;
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use suite_session::{BrowserSession, ElementHandle, LocatorStrategy, SessionError};

use crate::config::{BrowserFamily, SuiteConfig};

const CONSOLE_HOOK: &str = r#"
    if (!window.__suiteConsole) {
        window.__suiteConsole = [];
        const push = (level, args) => {
            try {
                const line = args.map(a => {
                    try { return typeof a === 'string' ? a : JSON.stringify(a); }
                    catch (_) { return String(a); }
                }).join(' ');
                window.__suiteConsole.push(level + ': ' + line);
                if (window.__suiteConsole.length > 1000) {
                    window.__suiteConsole.shift();
                }
            } catch (_) {}
        };
        for (const level of ['log', 'info', 'warn', 'error']) {
            const original = console[level];
            console[level] = function(...args) {
                push(level, args);
                original.apply(console, args);
            };
        }
        window.addEventListener('error', e => push('error', [e.message]));
        window.addEventListener('unhandledrejection', e => push('error', [String(e.reason)]));
    }
"#;

const CONSOLE_DRAIN: &str = r#"
    const lines = window.__suiteConsole || [];
    window.__suiteConsole = [];
    return lines;
"#;

#[derive(Default)]
struct HandleTable {
    next: u64,
    elements: HashMap<String, Element>,
}

/// One live browser session over a W3C WebDriver endpoint.
///
/// Handles map to fantoccini elements through a table that is cleared on
/// every `find`: operations re-resolve rather than reuse, so handles from a
/// previous resolution are stale by contract and answered with
/// `SessionError::StaleElement`.
pub struct WebDriverSession {
    client: Client,
    handles: Mutex<HandleTable>,
    page_load: Duration,
}

impl WebDriverSession {
    /// Connect to the configured endpoint with capabilities for the
    /// configured browser family, and size the window.
    pub async fn connect(config: &SuiteConfig) -> Result<Self, SessionError> {
        let caps = build_capabilities(config);
        debug!(url = %config.browser.webdriver_url, browser = %config.browser.name, "connecting to webdriver");

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(&config.browser.webdriver_url)
            .await
            .map_err(|err| SessionError::Webdriver(err.to_string()))?;

        let window = config.browser.window;
        if let Err(err) = client.set_window_size(window.width, window.height).await {
            warn!(error = %err, "could not size window, continuing");
        }

        Ok(Self {
            client,
            handles: Mutex::new(HandleTable::default()),
            page_load: config.timeouts.page_load,
        })
    }

    pub async fn quit(&self) -> Result<(), SessionError> {
        self.client
            .clone()
            .close()
            .await
            .map_err(|err| SessionError::Webdriver(err.to_string()))
    }

    fn element_for(&self, handle: &ElementHandle) -> Result<Element, SessionError> {
        self.handles
            .lock()
            .elements
            .get(&handle.0)
            .cloned()
            .ok_or_else(|| SessionError::StaleElement(handle.0.clone()))
    }

    fn store(&self, elements: Vec<Element>) -> Vec<ElementHandle> {
        let mut table = self.handles.lock();
        table.elements.clear();
        elements
            .into_iter()
            .map(|element| {
                table.next += 1;
                let id = format!("wd-{}", table.next);
                table.elements.insert(id.clone(), element);
                ElementHandle::new(id)
            })
            .collect()
    }

    async fn wait_for_ready_state(&self) {
        let deadline = tokio::time::Instant::now() + self.page_load;
        loop {
            match self
                .client
                .execute("return document.readyState === 'complete';", vec![])
                .await
            {
                Ok(value) if value.as_bool().unwrap_or(false) => return,
                Ok(_) => {}
                Err(err) => {
                    debug!(error = %err, "readyState probe failed");
                }
            }
            if tokio::time::Instant::now() >= deadline {
                warn!("page did not reach readyState=complete within budget");
                return;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }
}

fn map_err(err: fantoccini::error::CmdError) -> SessionError {
    let text = err.to_string();
    if text.contains("stale") {
        SessionError::StaleElement(text)
    } else {
        SessionError::Webdriver(text)
    }
}

/// The selenium-equivalent strategy mapping; NAME has no W3C strategy and is
/// expressed as an attribute selector.
fn to_locator(strategy: LocatorStrategy, value: &str) -> (Option<String>, LocatorStrategy) {
    match strategy {
        LocatorStrategy::Name => (Some(format!("[name=\"{value}\"]")), strategy),
        _ => (None, strategy),
    }
}

fn build_capabilities(config: &SuiteConfig) -> Map<String, Value> {
    let mut caps = Map::new();
    let headless = config.effective_headless();
    let window = config.browser.window;

    match config.browser.name {
        BrowserFamily::Chrome | BrowserFamily::Edge => {
            let mut args = vec![
                "--no-sandbox".to_string(),
                "--disable-dev-shm-usage".to_string(),
                "--disable-gpu".to_string(),
                format!("--window-size={},{}", window.width, window.height),
            ];
            if headless {
                args.push("--headless=new".to_string());
            }
            let options = json!({ "args": args });
            if config.browser.name == BrowserFamily::Chrome {
                caps.insert("browserName".to_string(), json!("chrome"));
                caps.insert("goog:chromeOptions".to_string(), options);
            } else {
                caps.insert("browserName".to_string(), json!("MicrosoftEdge"));
                caps.insert("ms:edgeOptions".to_string(), options);
            }
        }
        BrowserFamily::Firefox => {
            let mut args: Vec<String> = Vec::new();
            if headless {
                args.push("-headless".to_string());
            }
            caps.insert("browserName".to_string(), json!("firefox"));
            caps.insert("moz:firefoxOptions".to_string(), json!({ "args": args }));
        }
        BrowserFamily::Safari => {
            caps.insert("browserName".to_string(), json!("safari"));
        }
    }
    caps
}

/// Opens one fresh WebDriver session per scenario and quits it afterwards.
pub struct WebDriverSessionFactory {
    config: SuiteConfig,
}

impl WebDriverSessionFactory {
    pub fn new(config: SuiteConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl crate::runner::SessionFactory for WebDriverSessionFactory {
    async fn open(&self) -> anyhow::Result<crate::runner::ScenarioSession> {
        let session = Arc::new(WebDriverSession::connect(&self.config).await?);
        let closer = session.clone();
        Ok(crate::runner::ScenarioSession::with_shutdown(
            session,
            Box::new(move || {
                Box::pin(async move {
                    if let Err(err) = closer.quit().await {
                        warn!(error = %err, "session did not quit cleanly");
                    }
                })
            }),
        ))
    }
}

#[async_trait]
impl BrowserSession for WebDriverSession {
    async fn navigate(&self, url: &str) -> Result<(), SessionError> {
        self.client.goto(url).await.map_err(map_err)?;
        self.wait_for_ready_state().await;
        if let Err(err) = self.client.execute(CONSOLE_HOOK, vec![]).await {
            debug!(error = %err, "console hook injection failed");
        }
        Ok(())
    }

    async fn current_url(&self) -> Result<String, SessionError> {
        Ok(self.client.current_url().await.map_err(map_err)?.to_string())
    }

    async fn title(&self) -> Result<String, SessionError> {
        self.client.title().await.map_err(map_err)
    }

    async fn find(
        &self,
        strategy: LocatorStrategy,
        value: &str,
    ) -> Result<Vec<ElementHandle>, SessionError> {
        let (owned, strategy) = to_locator(strategy, value);
        let selector = owned.as_deref().unwrap_or(value);
        let locator = match strategy {
            LocatorStrategy::Id => Locator::Id(selector),
            LocatorStrategy::Name | LocatorStrategy::Css => Locator::Css(selector),
            LocatorStrategy::XPath => Locator::XPath(selector),
            LocatorStrategy::LinkText => Locator::LinkText(selector),
        };
        let elements = self.client.find_all(locator).await.map_err(map_err)?;
        Ok(self.store(elements))
    }

    async fn is_displayed(&self, element: &ElementHandle) -> Result<bool, SessionError> {
        self.element_for(element)?
            .is_displayed()
            .await
            .map_err(map_err)
    }

    async fn is_enabled(&self, element: &ElementHandle) -> Result<bool, SessionError> {
        self.element_for(element)?
            .is_enabled()
            .await
            .map_err(map_err)
    }

    async fn click(&self, element: &ElementHandle) -> Result<(), SessionError> {
        self.element_for(element)?.click().await.map_err(map_err)
    }

    async fn clear(&self, element: &ElementHandle) -> Result<(), SessionError> {
        self.element_for(element)?.clear().await.map_err(map_err)
    }

    async fn send_keys(&self, element: &ElementHandle, text: &str) -> Result<(), SessionError> {
        self.element_for(element)?
            .send_keys(text)
            .await
            .map_err(map_err)
    }

    async fn text_of(&self, element: &ElementHandle) -> Result<String, SessionError> {
        self.element_for(element)?.text().await.map_err(map_err)
    }

    async fn attribute(
        &self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, SessionError> {
        self.element_for(element)?.attr(name).await.map_err(map_err)
    }

    async fn value_of(&self, element: &ElementHandle) -> Result<Option<String>, SessionError> {
        self.element_for(element)?
            .prop("value")
            .await
            .map_err(map_err)
    }

    async fn screenshot(&self) -> Result<Vec<u8>, SessionError> {
        self.client.screenshot().await.map_err(map_err)
    }

    async fn page_source(&self) -> Result<String, SessionError> {
        self.client.source().await.map_err(map_err)
    }

    async fn console_logs(&self) -> Result<Vec<String>, SessionError> {
        let value = self
            .client
            .execute(CONSOLE_DRAIN, vec![])
            .await
            .map_err(|err| SessionError::Script(err.to_string()))?;
        let lines: Vec<String> = serde_json::from_value(value)
            .map_err(|err| SessionError::Script(err.to_string()))?;
        Ok(lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SuiteConfig;

    fn caps_for(name: &str, headless: bool) -> Map<String, Value> {
        let mut config = SuiteConfig::default();
        config.browser.name = name.parse().unwrap();
        config.browser.headless = headless;
        build_capabilities(&config)
    }

    #[test]
    fn chrome_headless_gets_new_headless_flag() {
        let caps = caps_for("chrome", true);
        assert_eq!(caps["browserName"], json!("chrome"));
        let args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(args.contains(&json!("--headless=new")));
        assert!(args.contains(&json!("--no-sandbox")));
    }

    #[test]
    fn firefox_headed_has_no_headless_arg() {
        let caps = caps_for("firefox", false);
        assert_eq!(caps["browserName"], json!("firefox"));
        let args = caps["moz:firefoxOptions"]["args"].as_array().unwrap();
        assert!(args.is_empty());
    }

    #[test]
    fn safari_never_goes_headless() {
        let caps = caps_for("safari", true);
        assert_eq!(caps["browserName"], json!("safari"));
        assert!(!caps.contains_key("goog:chromeOptions"));
    }

    #[test]
    fn name_strategy_becomes_attribute_selector() {
        let (owned, strategy) = to_locator(LocatorStrategy::Name, "username");
        assert_eq!(owned.as_deref(), Some("[name=\"username\"]"));
        assert_eq!(strategy, LocatorStrategy::Name);

        let (owned, _) = to_locator(LocatorStrategy::Css, "#username");
        assert!(owned.is_none());
    }
}
