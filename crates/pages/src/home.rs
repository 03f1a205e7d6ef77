//! Marketing home page: the entry point that leads into the login flow.

use std::time::Duration;

use tracing::info;

use suite_interactions::{InteractError, InteractionOutcome, Interactor};
use suite_locator::{Locator, LocatorChain};

pub struct HomePage {
    ops: Interactor,
    base_url: String,
}

fn login_button_chain() -> LocatorChain {
    LocatorChain::new(Locator::css("[data-qa-id='login-select']"))
}

impl HomePage {
    pub fn new(ops: Interactor, base_url: impl Into<String>) -> Self {
        Self {
            ops,
            base_url: base_url.into(),
        }
    }

    pub async fn navigate(&self) -> Result<(), InteractError> {
        info!(url = %self.base_url, "navigating to home page");
        self.ops.navigate(&self.base_url).await
    }

    pub async fn click_login_button(&self) -> Result<InteractionOutcome, InteractError> {
        self.ops.click(&login_button_chain()).await
    }

    pub async fn is_login_button_visible(&self) -> bool {
        self.ops
            .is_visible(&login_button_chain(), Duration::from_secs(5))
            .await
    }

    pub async fn login_button_text(&self) -> Result<String, InteractError> {
        self.ops.text_of(&login_button_chain()).await
    }

    /// Navigate home and continue into the login flow.
    pub async fn go_to_login(&self) -> Result<(), InteractError> {
        self.navigate().await?;
        self.click_login_button().await?;
        Ok(())
    }
}
