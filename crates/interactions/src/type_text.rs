//! Text entry with best-effort verification

use tracing::{debug, instrument};

use crate::{InputFailure, InteractError, InteractionOutcome, Interactor};
use suite_locator::LocatorChain;
use suite_session::ElementHandle;

impl Interactor {
    /// Resolve a visible element, optionally clear it, send `text`, then
    /// verify the resulting field value when the session can read it back
    /// (not every control exposes a value, so verification is best-effort).
    /// The clear/type/verify pass is retried under the default budget;
    /// exhaustion captures one artifact and surfaces `Input`.
    #[instrument(skip_all, fields(chain = %chain, clear_first))]
    pub async fn type_text(
        &self,
        chain: &LocatorChain,
        text: &str,
        clear_first: bool,
    ) -> Result<InteractionOutcome, InteractError> {
        let context = format!("type into {}", chain.primary());
        let policy = self.retry().clone();

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
            match self.try_type(&resolution.element, text, clear_first).await {
                Ok(()) => {
                    return Ok(InteractionOutcome {
                        used: resolution.used,
                        locators_tried: resolution.locators_tried,
                        action_attempts: attempts,
                    });
                }
                Err(reason) if attempts >= policy.max_attempts => {
                    self.capture_failure(&context).await;
                    return Err(InteractError::Input {
                        context,
                        attempts,
                        reason,
                    });
                }
                Err(reason) => {
                    debug!(attempt = attempts, error = %reason, "input attempt failed, retrying");
                    tokio::time::sleep(policy.backoff).await;
                    resolution = self.refresh(chain, resolution).await;
                }
            }
        }
    }

    async fn try_type(
        &self,
        element: &ElementHandle,
        text: &str,
        clear_first: bool,
    ) -> Result<(), InputFailure> {
        if clear_first {
            self.session().clear(element).await?;
        }
        self.session().send_keys(element, text).await?;

        match self.session().value_of(element).await? {
            Some(observed) => {
                let verified = if clear_first {
                    observed == text
                } else {
                    observed.ends_with(text)
                };
                if verified {
                    Ok(())
                } else {
                    Err(InputFailure::VerifyMismatch {
                        expected_len: text.len(),
                        observed_len: observed.len(),
                    })
                }
            }
            // Value not observable; trust the send.
            None => Ok(()),
        }
    }
}
