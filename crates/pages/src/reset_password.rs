//! Password reset page, reached via the forgot-password link.

use std::time::Duration;

use suite_interactions::{InteractError, InteractionOutcome, Interactor};
use suite_locator::{Locator, LocatorChain};

/// URL fragments that identify the reset flow across provider variants.
const RESET_URL_PATTERNS: [&str; 4] = [
    "/u/login/password-reset-start",
    "/password-reset",
    "/reset-password",
    "/forgot-password",
];

const MESSAGE_PROBE: Duration = Duration::from_secs(3);

pub struct ResetPasswordPage {
    ops: Interactor,
}

fn email_chain() -> LocatorChain {
    LocatorChain::new(Locator::name("email"))
        .or(Locator::id("email"))
        .or(Locator::css("input[type='email']"))
        .or(Locator::css("input[name*='email' i]"))
        .or(Locator::css("input[placeholder*='email' i]"))
}

fn submit_chain() -> LocatorChain {
    LocatorChain::new(Locator::css("button[type='submit']"))
        .or(Locator::css("input[type='submit']"))
        .or(Locator::xpath(
            "//button[contains(text(), 'Reset') or contains(text(), 'Send')]",
        ))
}

fn success_chain() -> LocatorChain {
    LocatorChain::new(Locator::css(".success, .alert-success, [class*='success']"))
}

fn error_chain() -> LocatorChain {
    LocatorChain::new(Locator::css(
        ".error, .alert-error, .alert-danger, [class*='error']",
    ))
}

fn back_to_login_chain() -> LocatorChain {
    LocatorChain::new(Locator::css("a[href*='login']"))
}

impl ResetPasswordPage {
    pub fn new(ops: Interactor) -> Self {
        Self { ops }
    }

    pub async fn is_loaded(&self) -> Result<bool, InteractError> {
        let url = self.ops.current_url().await?.to_lowercase();
        Ok(RESET_URL_PATTERNS.iter().any(|p| url.contains(p)))
    }

    pub async fn enter_email(&self, email: &str) -> Result<InteractionOutcome, InteractError> {
        self.ops.type_text(&email_chain(), email, true).await
    }

    pub async fn submit(&self) -> Result<InteractionOutcome, InteractError> {
        self.ops.click(&submit_chain()).await
    }

    pub async fn success_message(&self) -> Option<String> {
        self.ops.try_text(&success_chain(), MESSAGE_PROBE).await
    }

    pub async fn error_message(&self) -> Option<String> {
        self.ops.try_text(&error_chain(), MESSAGE_PROBE).await
    }

    pub async fn back_to_login(&self) -> Result<InteractionOutcome, InteractError> {
        self.ops.click(&back_to_login_chain()).await
    }

    /// Whether the page actually offers the reset form, not just the URL.
    pub async fn has_reset_form(&self) -> bool {
        self.ops.is_visible(&email_chain(), MESSAGE_PROBE).await
            && self.ops.is_visible(&submit_chain(), MESSAGE_PROBE).await
    }
}
