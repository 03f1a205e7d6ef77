//! Browser session capability
//!
//! The one externally-owned resource the interaction engine touches. A
//! [`BrowserSession`] is passed in as a capability; the engine never launches
//! or tears down the browser, and never reads configuration itself. The
//! WebDriver-backed implementation lives in the suite root; [`mock`] provides
//! a scripted stand-in for engine tests.

pub mod mock;
mod types;

pub use types::{ElementHandle, LocatorStrategy, SessionError};

use async_trait::async_trait;

/// Capability surface of one live browser session.
///
/// Element handles returned by [`find`](Self::find) stay valid until the next
/// `find` call on the same session. Implementations must be safe to share
/// behind an `Arc` within one scenario; cross-scenario sharing is not
/// supported (one session per scenario, by design).
#[async_trait]
pub trait BrowserSession: Send + Sync {
    async fn navigate(&self, url: &str) -> Result<(), SessionError>;

    async fn current_url(&self) -> Result<String, SessionError>;

    async fn title(&self) -> Result<String, SessionError>;

    /// Evaluate one locator against the current DOM, returning every match.
    async fn find(
        &self,
        strategy: LocatorStrategy,
        value: &str,
    ) -> Result<Vec<ElementHandle>, SessionError>;

    async fn is_displayed(&self, element: &ElementHandle) -> Result<bool, SessionError>;

    async fn is_enabled(&self, element: &ElementHandle) -> Result<bool, SessionError>;

    async fn click(&self, element: &ElementHandle) -> Result<(), SessionError>;

    async fn clear(&self, element: &ElementHandle) -> Result<(), SessionError>;

    async fn send_keys(&self, element: &ElementHandle, text: &str) -> Result<(), SessionError>;

    async fn text_of(&self, element: &ElementHandle) -> Result<String, SessionError>;

    /// Read an attribute; `None` when the attribute is absent.
    async fn attribute(
        &self,
        element: &ElementHandle,
        name: &str,
    ) -> Result<Option<String>, SessionError>;

    /// Read the live `value` property of a form control; `None` when the
    /// element has no observable value.
    async fn value_of(&self, element: &ElementHandle) -> Result<Option<String>, SessionError>;

    /// PNG screenshot of the current viewport.
    async fn screenshot(&self) -> Result<Vec<u8>, SessionError>;

    async fn page_source(&self) -> Result<String, SessionError>;

    /// Console log lines buffered since the last call; draining.
    async fn console_logs(&self) -> Result<Vec<String>, SessionError>;
}
