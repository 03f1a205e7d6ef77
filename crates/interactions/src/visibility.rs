//! Presence and visibility operations

use std::time::Duration;

use tracing::{debug, instrument};

use crate::{InteractError, Interactor};
use suite_locator::{LocatorChain, Resolution};

impl Interactor {
    /// Thin resolution with visibility required. Terminal failure captures
    /// once and surfaces `NotFound`.
    #[instrument(skip_all, fields(chain = %chain))]
    pub async fn find_visible(&self, chain: &LocatorChain) -> Result<Resolution, InteractError> {
        match self.resolve_visible(chain).await {
            Ok(resolution) => Ok(resolution),
            Err(err) => {
                self.capture_failure(&format!("find {}", chain.primary())).await;
                Err(InteractError::NotFound(err))
            }
        }
    }

    /// Never fails: any resolution error collapses to `false`. The one
    /// operation where exhaustion is a normal negative result, because
    /// assertions routinely need to check non-presence. No capture either —
    /// absence is not a failure.
    pub async fn is_visible(&self, chain: &LocatorChain, timeout: Duration) -> bool {
        match suite_locator::resolve(self.session(), chain, true, timeout).await {
            Ok(resolution) => {
                debug!(used = %resolution.used, "element visible");
                true
            }
            Err(err) => {
                debug!(error = %err, "treating resolution failure as not-visible");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use crate::Interactor;
    use suite_capture::NullReporter;
    use suite_locator::{Locator, LocatorChain};
    use suite_session::mock::{MockElement, MockSession};
    use suite_session::LocatorStrategy;

    fn interactor(session: &Arc<MockSession>) -> Interactor {
        Interactor::new(session.clone(), Arc::new(NullReporter))
            .with_resolve_timeout(Duration::ZERO)
    }

    #[tokio::test]
    async fn is_visible_returns_false_for_dead_chain_without_error_or_capture() {
        let session = Arc::new(MockSession::new());
        let ops = interactor(&session);
        let chain = LocatorChain::new(Locator::css(".ulp-input-error-message"))
            .or(Locator::id("error-element-username"));

        assert!(!ops.is_visible(&chain, Duration::ZERO).await);
        assert_eq!(session.screenshot_requests(), 0);
    }

    #[tokio::test]
    async fn is_visible_sees_registered_element() {
        let session = Arc::new(MockSession::new());
        session.register(
            LocatorStrategy::Id,
            "error-element-username",
            MockElement::new("email-error").with_text("Incorrect username or password."),
        );
        let ops = interactor(&session);
        let chain = LocatorChain::new(Locator::css(".ulp-input-error-message"))
            .or(Locator::id("error-element-username"));

        assert!(ops.is_visible(&chain, Duration::ZERO).await);
    }

    #[tokio::test]
    async fn find_visible_failure_captures_once() {
        let session = Arc::new(MockSession::new());
        let ops = interactor(&session);
        let chain = LocatorChain::new(Locator::css("#missing"));

        assert!(ops.find_visible(&chain).await.is_err());
        assert_eq!(session.screenshot_requests(), 1);
    }
}
