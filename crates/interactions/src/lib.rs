//! Resilient interaction operations
//!
//! Every page object in the suite talks to the browser through an
//! [`Interactor`]: resolution over fallback chains, operation-specific retry,
//! and structured failure capture live here once, so fixes to fallback or
//! retry behavior reach every page uniformly. Pages own no resilience logic
//! of their own.
//!
//! Error policy: `find_visible` / `click_reliably` / `type_text` surface a
//! failure once the whole chain (and, where applicable, the retry budget) is
//! exhausted, and each terminal failure triggers exactly one capture.
//! [`Interactor::is_visible`] alone collapses exhaustion into `false`,
//! because UI assertions routinely need to assert non-presence.

mod click;
mod errors;
mod model;
mod policy;
mod read;
mod type_text;
mod visibility;

pub use errors::{InputFailure, InteractError};
pub use model::InteractionOutcome;
pub use policy::RetryPolicy;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error};

use suite_capture::Reporter;
use suite_locator::{LocatorChain, LocatorError, Resolution};
use suite_session::BrowserSession;

/// Default resolution window for find/click/type operations.
const DEFAULT_RESOLVE_TIMEOUT: Duration = Duration::from_secs(20);

/// Interaction capability handed to page objects.
///
/// Holds the externally-owned session and reporter as capabilities; never
/// constructs, caches, or tears down either. Each operation re-resolves its
/// chain instead of reusing element handles across operations, which is what
/// keeps stale-element failures out of the page layer.
#[derive(Clone)]
pub struct Interactor {
    session: Arc<dyn BrowserSession>,
    reporter: Arc<dyn Reporter>,
    resolve_timeout: Duration,
    retry: RetryPolicy,
}

impl Interactor {
    pub fn new(session: Arc<dyn BrowserSession>, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            session,
            reporter,
            resolve_timeout: DEFAULT_RESOLVE_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_resolve_timeout(mut self, timeout: Duration) -> Self {
        self.resolve_timeout = timeout;
        self
    }

    /// Default retry budget for operations that take no explicit policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn resolve_timeout(&self) -> Duration {
        self.resolve_timeout
    }

    pub(crate) fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    pub(crate) fn session(&self) -> &dyn BrowserSession {
        self.session.as_ref()
    }

    /// Resolution without capture; operations capture at their own boundary
    /// so a terminal failure produces exactly one artifact.
    pub(crate) async fn resolve_visible(
        &self,
        chain: &LocatorChain,
    ) -> Result<Resolution, LocatorError> {
        suite_locator::resolve(self.session.as_ref(), chain, true, self.resolve_timeout).await
    }

    /// Best-effort re-resolution between retry attempts; stale handles are
    /// the expected reason an attempt failed, so a fresh handle is preferred
    /// but a failed refresh keeps the old one.
    pub(crate) async fn refresh(&self, chain: &LocatorChain, current: Resolution) -> Resolution {
        match self.resolve_visible(chain).await {
            Ok(fresh) => fresh,
            Err(err) => {
                debug!(error = %err, "re-resolution failed, keeping previous handle");
                current
            }
        }
    }

    pub(crate) async fn capture_failure(&self, context: &str) {
        error!(context, "interaction terminally failed, capturing artifacts");
        suite_capture::capture(self.session.as_ref(), self.reporter.as_ref(), context).await;
    }
}
