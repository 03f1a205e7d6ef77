//! Element resolution over a fallback chain
//!
//! A single pass over the chain in precedence order. Each locator gets a
//! bounded polling window; the first one yielding a qualifying element wins
//! and later locators are never queried. Fallback is an explicit loop with
//! two terminal states (found / exhausted) rather than error-driven control
//! flow, so a dead primary selector degrades into a slower lookup instead of
//! a failure.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, trace};

use crate::{errors::LocatorError, types::*};
use suite_session::{BrowserSession, ElementHandle, SessionError};

/// Delay between DOM probes while waiting for a locator to qualify.
pub const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Outcome of a successful resolution.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Handle of the winning element, valid until the session's next find.
    pub element: ElementHandle,

    /// The locator that produced it.
    pub used: Locator,

    /// How many locators were tried, winner included.
    pub locators_tried: u32,
}

/// Resolve a chain against a live session.
///
/// Each locator is polled for up to `timeout` for an element that exists
/// and, when `visibility_required`, is also displayed. Exhaustion fails with
/// [`LocatorError::NotFound`] carrying the whole chain; per-attempt session
/// errors are logged and folded into the final error as `last_error` only.
pub async fn resolve(
    session: &dyn BrowserSession,
    chain: &LocatorChain,
    visibility_required: bool,
    timeout: Duration,
) -> Result<Resolution, LocatorError> {
    let mut last_error: Option<SessionError> = None;

    for (index, locator) in chain.locators().iter().enumerate() {
        debug!(%locator, "trying locator");
        let deadline = Instant::now() + timeout;

        loop {
            match probe(session, locator, visibility_required).await {
                Ok(Some(element)) => {
                    debug!(%locator, element = %element, "locator qualified");
                    return Ok(Resolution {
                        element,
                        used: locator.clone(),
                        locators_tried: index as u32 + 1,
                    });
                }
                Ok(None) => {
                    trace!(%locator, "no qualifying element yet");
                }
                Err(err) => {
                    debug!(%locator, error = %err, "probe failed");
                    last_error = Some(err);
                }
            }

            if Instant::now() >= deadline {
                break;
            }
            tokio::time::sleep(POLL_INTERVAL.min(timeout)).await;
        }

        debug!(%locator, ?timeout, "locator did not qualify, moving to fallback");
    }

    Err(LocatorError::NotFound {
        chain: chain.clone(),
        timeout,
        last_error,
    })
}

/// One probe: query the locator and pick the first qualifying match.
async fn probe(
    session: &dyn BrowserSession,
    locator: &Locator,
    visibility_required: bool,
) -> Result<Option<ElementHandle>, SessionError> {
    let handles = session.find(locator.strategy, &locator.value).await?;

    if !visibility_required {
        return Ok(handles.into_iter().next());
    }

    for handle in handles {
        if session.is_displayed(&handle).await? {
            return Ok(Some(handle));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use suite_session::mock::{MockElement, MockSession};
    use suite_session::LocatorStrategy;

    fn email_chain() -> LocatorChain {
        LocatorChain::new(Locator::css("#email"))
            .or(Locator::name("email"))
            .or(Locator::xpath("//input[@placeholder='Email']"))
    }

    #[tokio::test]
    async fn first_qualifying_fallback_wins_and_rest_are_not_queried() {
        let session = MockSession::new();
        session.register(LocatorStrategy::Name, "email", MockElement::new("email-2"));

        let resolution = resolve(&session, &email_chain(), true, Duration::ZERO)
            .await
            .unwrap();

        assert_eq!(resolution.element, suite_session::ElementHandle::new("email-2"));
        assert_eq!(resolution.used, Locator::name("email"));
        assert_eq!(resolution.locators_tried, 2);
        assert!(session.was_queried(LocatorStrategy::Css, "#email"));
        assert!(!session.was_queried(
            LocatorStrategy::XPath,
            "//input[@placeholder='Email']"
        ));
    }

    #[tokio::test]
    async fn primary_wins_without_touching_fallbacks() {
        let session = MockSession::new();
        session.register(LocatorStrategy::Css, "#email", MockElement::new("email-1"));
        session.register(LocatorStrategy::Name, "email", MockElement::new("email-2"));

        let resolution = resolve(&session, &email_chain(), true, Duration::ZERO)
            .await
            .unwrap();

        assert_eq!(resolution.used, Locator::css("#email"));
        assert_eq!(resolution.locators_tried, 1);
        assert!(!session.was_queried(LocatorStrategy::Name, "email"));
    }

    #[tokio::test]
    async fn exhaustion_reports_full_chain_in_original_order() {
        let session = MockSession::new();
        let chain = email_chain();

        let err = resolve(&session, &chain, true, Duration::ZERO)
            .await
            .unwrap_err();

        let LocatorError::NotFound {
            chain: reported, ..
        } = err;
        assert_eq!(reported, chain);
    }

    #[tokio::test]
    async fn hidden_element_does_not_qualify_when_visibility_required() {
        let session = MockSession::new();
        session.register(
            LocatorStrategy::Css,
            "#email",
            MockElement::new("email-1").hidden(),
        );
        session.register(LocatorStrategy::Name, "email", MockElement::new("email-2"));

        let resolution = resolve(&session, &email_chain(), true, Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(resolution.used, Locator::name("email"));
    }

    #[tokio::test]
    async fn hidden_element_qualifies_for_presence_only_resolution() {
        let session = MockSession::new();
        session.register(
            LocatorStrategy::Css,
            "#email",
            MockElement::new("email-1").hidden(),
        );

        let resolution = resolve(&session, &email_chain(), false, Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(resolution.used, Locator::css("#email"));
    }

    #[tokio::test]
    async fn later_visible_match_beats_earlier_hidden_match_under_same_locator() {
        let session = MockSession::new();
        session.register(
            LocatorStrategy::Css,
            "#email",
            MockElement::new("decoy").hidden(),
        );
        session.register(LocatorStrategy::Css, "#email", MockElement::new("real"));

        let resolution = resolve(&session, &email_chain(), true, Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(resolution.element, suite_session::ElementHandle::new("real"));
    }
}
