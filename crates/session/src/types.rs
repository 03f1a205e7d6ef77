//! Core types for the browser session capability

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Locator strategy enumeration
///
/// The query languages a session knows how to evaluate against the DOM:
/// - Id: element `id` attribute
/// - Name: element `name` attribute
/// - Css: CSS selector
/// - XPath: XPath expression
/// - LinkText: exact anchor text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LocatorStrategy {
    /// `id` attribute lookup
    Id,

    /// `name` attribute lookup
    Name,

    /// CSS selector
    Css,

    /// XPath expression
    XPath,

    /// Exact link text
    LinkText,
}

impl LocatorStrategy {
    /// Get strategy name as string
    pub fn name(&self) -> &'static str {
        match self {
            LocatorStrategy::Id => "id",
            LocatorStrategy::Name => "name",
            LocatorStrategy::Css => "css",
            LocatorStrategy::XPath => "xpath",
            LocatorStrategy::LinkText => "link-text",
        }
    }
}

impl fmt::Display for LocatorStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Opaque reference to an element resolved by a session.
///
/// Valid until the session's next `find` call; the engine re-resolves per
/// operation instead of holding handles across operations, so a stale handle
/// surfaces as [`SessionError::StaleElement`] rather than silent misbehavior.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle(pub String);

impl ElementHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors surfaced by a browser session.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error("webdriver error: {0}")]
    Webdriver(String),
    #[error("stale element: {0}")]
    StaleElement(String),
    #[error("script evaluation failed: {0}")]
    Script(String),
}
