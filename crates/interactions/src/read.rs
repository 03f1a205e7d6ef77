//! Read-side operations: element text, attributes, and URL waits

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::{InteractError, Interactor};
use suite_locator::{LocatorChain, POLL_INTERVAL};

impl Interactor {
    /// Visible-element text under the default resolution window.
    pub async fn text_of(&self, chain: &LocatorChain) -> Result<String, InteractError> {
        self.text_within(chain, self.resolve_timeout()).await
    }

    /// Visible-element text under an explicit window; error probes use short
    /// windows so "no error shown" does not cost the full resolve timeout.
    #[instrument(skip_all, fields(chain = %chain))]
    pub async fn text_within(
        &self,
        chain: &LocatorChain,
        timeout: Duration,
    ) -> Result<String, InteractError> {
        let resolution = match suite_locator::resolve(self.session(), chain, true, timeout).await {
            Ok(resolution) => resolution,
            Err(err) => {
                self.capture_failure(&format!("read text of {}", chain.primary()))
                    .await;
                return Err(InteractError::NotFound(err));
            }
        };
        let text = self.session().text_of(&resolution.element).await?;
        Ok(text.trim().to_string())
    }

    /// Attribute of the first present (not necessarily visible) element.
    /// `None` when the element qualifies but lacks the attribute.
    pub async fn attribute(
        &self,
        chain: &LocatorChain,
        name: &str,
    ) -> Result<Option<String>, InteractError> {
        let resolution =
            match suite_locator::resolve(self.session(), chain, false, self.resolve_timeout())
                .await
            {
                Ok(resolution) => resolution,
                Err(err) => {
                    self.capture_failure(&format!("read {} of {}", name, chain.primary()))
                        .await;
                    return Err(InteractError::NotFound(err));
                }
            };
        Ok(self.session().attribute(&resolution.element, name).await?)
    }

    /// Non-capturing text probe with `is_visible` semantics: `None` when the
    /// chain does not resolve or the text cannot be read. For assertion
    /// probes (error banners, display names) where absence is an expected,
    /// valid outcome rather than an interaction failure.
    pub async fn try_text(&self, chain: &LocatorChain, timeout: Duration) -> Option<String> {
        let resolution = match suite_locator::resolve(self.session(), chain, true, timeout).await {
            Ok(resolution) => resolution,
            Err(err) => {
                debug!(error = %err, "text probe found nothing");
                return None;
            }
        };
        match self.session().text_of(&resolution.element).await {
            Ok(text) => Some(text.trim().to_string()),
            Err(err) => {
                debug!(error = %err, "text probe could not read element");
                None
            }
        }
    }

    pub async fn navigate(&self, url: &str) -> Result<(), InteractError> {
        debug!(url, "navigating");
        Ok(self.session().navigate(url).await?)
    }

    pub async fn current_url(&self) -> Result<String, InteractError> {
        Ok(self.session().current_url().await?)
    }

    /// Poll the current URL until it contains `fragment` or the window
    /// closes. Boolean-collapse semantics like `is_visible`: a session error
    /// during polling reads as "not there yet".
    pub async fn wait_for_url_contains(&self, fragment: &str, timeout: Duration) -> bool {
        let fragment = fragment.to_lowercase();
        let deadline = Instant::now() + timeout;
        loop {
            match self.session().current_url().await {
                Ok(url) if url.to_lowercase().contains(&fragment) => return true,
                Ok(url) => debug!(%url, fragment, "url does not contain fragment yet"),
                Err(err) => debug!(error = %err, "url probe failed"),
            }
            if Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(POLL_INTERVAL.min(timeout)).await;
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
    async fn text_is_trimmed_and_resolved_via_chain() {
        let session = Arc::new(MockSession::new());
        session.register(
            LocatorStrategy::Id,
            "error-element-password",
            MockElement::new("pw-error").with_text("  Incorrect username or password.  "),
        );
        let ops = interactor(&session);
        let chain = LocatorChain::new(Locator::css(".ulp-error-message"))
            .or(Locator::id("error-element-password"));

        let text = ops.text_within(&chain, Duration::ZERO).await.unwrap();
        assert_eq!(text, "Incorrect username or password.");
    }

    #[tokio::test]
    async fn attribute_reads_hidden_elements_too() {
        let session = Arc::new(MockSession::new());
        session.register(
            LocatorStrategy::Name,
            "password",
            MockElement::new("pw")
                .hidden()
                .with_attribute("type", "password"),
        );
        let ops = interactor(&session);
        let chain = LocatorChain::new(Locator::name("password"));

        let value = ops.attribute(&chain, "type").await.unwrap();
        assert_eq!(value.as_deref(), Some("password"));

        let missing = ops.attribute(&chain, "maxlength").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn url_wait_matches_case_insensitively_and_times_out() {
        let session = Arc::new(MockSession::new());
        session.set_url("https://www.hudl.com/HOME");
        let ops = interactor(&session);

        assert!(ops.wait_for_url_contains("/home", Duration::ZERO).await);
        assert!(!ops.wait_for_url_contains("/login", Duration::ZERO).await);
    }
}
