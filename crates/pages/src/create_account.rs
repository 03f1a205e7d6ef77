//! Account creation page, reached via the sign-up link.

use std::time::Duration;

use tracing::info;

use suite_interactions::{InteractError, InteractionOutcome, Interactor};
use suite_locator::{Locator, LocatorChain};

use crate::join_url;

const REGISTRATION_PATH: &str = "/register";
const SIGNUP_URL_PATTERNS: [&str; 2] = ["/register", "/signup"];

const FIELD_PROBE: Duration = Duration::from_secs(5);

pub struct CreateAccountPage {
    ops: Interactor,
    base_url: String,
}

fn first_name_chain() -> LocatorChain {
    LocatorChain::new(Locator::name("ulp-first-name"))
        .or(Locator::id("first-name"))
        .or(Locator::css("input[name*='first' i]"))
}

fn last_name_chain() -> LocatorChain {
    LocatorChain::new(Locator::name("ulp-last-name"))
        .or(Locator::id("last-name"))
        .or(Locator::css("input[name*='last' i]"))
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
}

fn login_link_chain() -> LocatorChain {
    LocatorChain::new(Locator::css("a[href*='/login']"))
}

impl CreateAccountPage {
    pub fn new(ops: Interactor, base_url: impl Into<String>) -> Self {
        Self {
            ops,
            base_url: base_url.into(),
        }
    }

    pub async fn navigate(&self) -> Result<(), InteractError> {
        let url = join_url(&self.base_url, REGISTRATION_PATH);
        info!(%url, "navigating to registration page");
        self.ops.navigate(&url).await
    }

    pub async fn is_loaded(&self) -> Result<bool, InteractError> {
        let url = self.ops.current_url().await?.to_lowercase();
        Ok(SIGNUP_URL_PATTERNS.iter().any(|p| url.contains(p)))
    }

    pub async fn enter_first_name(&self, name: &str) -> Result<InteractionOutcome, InteractError> {
        self.ops.type_text(&first_name_chain(), name, true).await
    }

    pub async fn enter_last_name(&self, name: &str) -> Result<InteractionOutcome, InteractError> {
        self.ops.type_text(&last_name_chain(), name, true).await
    }

    pub async fn enter_email(&self, email: &str) -> Result<InteractionOutcome, InteractError> {
        self.ops.type_text(&email_chain(), email, true).await
    }

    pub async fn click_create_account(&self) -> Result<InteractionOutcome, InteractError> {
        self.ops.click(&submit_chain()).await
    }

    pub async fn click_login_link(&self) -> Result<InteractionOutcome, InteractError> {
        self.ops.click(&login_link_chain()).await
    }

    /// Whether the registration form's required fields are all present.
    pub async fn required_fields_present(&self) -> bool {
        for chain in [first_name_chain(), last_name_chain(), email_chain()] {
            if !self.ops.is_visible(&chain, FIELD_PROBE).await {
                return false;
            }
        }
        true
    }
}
