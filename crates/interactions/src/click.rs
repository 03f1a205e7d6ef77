//! Reliable click
//!
//! An element can go stale or become momentarily obscured between resolution
//! and the click itself, so the click is attempted under a retry budget with
//! a clickability re-check before each attempt. Retries are silent; the
//! final exhausted failure is loud and attributed.

use tracing::{debug, instrument};

use crate::{InteractError, InteractionOutcome, Interactor, RetryPolicy};
use suite_locator::LocatorChain;
use suite_session::{ElementHandle, SessionError};

impl Interactor {
    /// Resolve the chain once, then click with up to `policy.max_attempts`
    /// attempts. Each attempt re-checks that the element is displayed and
    /// enabled; a failed attempt backs off and re-resolves the chain to
    /// recover from stale handles. Exhaustion captures one artifact and
    /// re-raises the last underlying error.
    #[instrument(skip_all, fields(chain = %chain))]
    pub async fn click_reliably(
        &self,
        chain: &LocatorChain,
        policy: &RetryPolicy,
    ) -> Result<InteractionOutcome, InteractError> {
        let context = format!("click {}", chain.primary());

        let mut resolution = match self.resolve_visible(chain).await {
            Ok(resolution) => resolution,
            Err(err) => {
                self.capture_failure(&context).await;
                return Err(InteractError::NotFound(err));
            }
        };

        let mut attempts = 0;
        loop {
            attempts += 1;
            match self.try_click(&resolution.element).await {
                Ok(()) => {
                    return Ok(InteractionOutcome {
                        used: resolution.used,
                        locators_tried: resolution.locators_tried,
                        action_attempts: attempts,
                    });
                }
                Err(source) if attempts >= policy.max_attempts => {
                    self.capture_failure(&context).await;
                    return Err(InteractError::Click {
                        context,
                        attempts,
                        source,
                    });
                }
                Err(source) => {
                    debug!(attempt = attempts, error = %source, "click attempt failed, retrying");
                    tokio::time::sleep(policy.backoff).await;
                    resolution = self.refresh(chain, resolution).await;
                }
            }
        }
    }

    /// Convenience form using the interactor's default retry budget.
    pub async fn click(&self, chain: &LocatorChain) -> Result<InteractionOutcome, InteractError> {
        let policy = self.retry().clone();
        self.click_reliably(chain, &policy).await
    }

    async fn try_click(&self, element: &ElementHandle) -> Result<(), SessionError> {
        if !self.session().is_displayed(element).await? {
            return Err(SessionError::Webdriver("element is not displayed".into()));
        }
        if !self.session().is_enabled(element).await? {
            return Err(SessionError::Webdriver("element is not enabled".into()));
        }
        self.session().click(element).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use crate::{InteractError, Interactor, RetryPolicy};
    use suite_capture::NullReporter;
    use suite_locator::{Locator, LocatorChain};
    use suite_session::mock::{MockElement, MockSession};
    use suite_session::LocatorStrategy;

    fn interactor(session: &Arc<MockSession>) -> Interactor {
        Interactor::new(session.clone(), Arc::new(NullReporter))
            .with_resolve_timeout(Duration::ZERO)
            .with_retry(RetryPolicy::new(3, Duration::ZERO))
    }

    fn submit_chain() -> LocatorChain {
        LocatorChain::new(Locator::css("button[type='submit']")).or(Locator::name("action"))
    }

    #[tokio::test]
    async fn click_succeeds_on_third_attempt_with_three_recorded_clicks() {
        let session = Arc::new(MockSession::new());
        session.register(
            LocatorStrategy::Css,
            "button[type='submit']",
            MockElement::new("submit").failing_clicks(2),
        );
        let ops = interactor(&session);

        let outcome = ops
            .click_reliably(&submit_chain(), &RetryPolicy::new(3, Duration::ZERO))
            .await
            .unwrap();

        assert_eq!(outcome.action_attempts, 3);
        assert_eq!(session.clicks_on("submit"), 3);
        // Silent retries: no artifact for a recovered click.
        assert_eq!(session.screenshot_requests(), 0);
    }

    #[tokio::test]
    async fn exhausted_click_captures_exactly_one_artifact() {
        let session = Arc::new(MockSession::new());
        session.register(
            LocatorStrategy::Css,
            "button[type='submit']",
            MockElement::new("submit").failing_clicks(10),
        );
        let ops = interactor(&session);

        let err = ops
            .click_reliably(&submit_chain(), &RetryPolicy::new(3, Duration::ZERO))
            .await
            .unwrap_err();

        match err {
            InteractError::Click { attempts, .. } => assert_eq!(attempts, 3),
            other => panic!("expected Click error, got {other}"),
        }
        assert_eq!(session.clicks_on("submit"), 3);
        assert_eq!(session.screenshot_requests(), 1);
    }

    #[tokio::test]
    async fn unresolvable_chain_surfaces_not_found_with_one_artifact() {
        let session = Arc::new(MockSession::new());
        let ops = interactor(&session);

        let err = ops.click(&submit_chain()).await.unwrap_err();

        match err {
            InteractError::NotFound(inner) => {
                assert_eq!(inner.chain(), &submit_chain());
            }
            other => panic!("expected NotFound error, got {other}"),
        }
        assert_eq!(session.screenshot_requests(), 1);
    }

    #[tokio::test]
    async fn click_lands_via_fallback_locator() {
        let session = Arc::new(MockSession::new());
        session.register(LocatorStrategy::Name, "action", MockElement::new("alt-submit"));
        let ops = interactor(&session);

        let outcome = ops.click(&submit_chain()).await.unwrap();

        assert_eq!(outcome.used, Locator::name("action"));
        assert_eq!(outcome.locators_tried, 2);
        assert_eq!(session.clicks_on("alt-submit"), 1);
    }
}
