//! Login page
//!
//! The identity flow is a two-step form (email, then password) served by an
//! auth provider whose markup shifts between experiments, which is why every
//! field carries a deep fallback chain: stable attribute names first, then
//! type- and pattern-based selectors.

use std::time::Duration;

use tracing::info;
use url::Url;

use suite_interactions::{InteractError, InteractionOutcome, Interactor};
use suite_locator::{Locator, LocatorChain};

use crate::join_url;

const LOGIN_PATH: &str = "/login";

/// Probe window for error banners; short so "no error shown" stays cheap.
const ERROR_PROBE: Duration = Duration::from_secs(3);

/// Probe window for social login buttons.
const SOCIAL_PROBE: Duration = Duration::from_secs(2);

/// Probe window for the post-login display name.
const DISPLAY_NAME_PROBE: Duration = Duration::from_secs(10);

/// Form fields with their own error slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Password,
}

/// Third-party identity providers offered on the login form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SocialProvider {
    Google,
    Facebook,
    Apple,
}

impl SocialProvider {
    fn selector(&self) -> &'static str {
        match self {
            SocialProvider::Google => "button[data-provider='google']",
            SocialProvider::Facebook => "button[data-provider='facebook']",
            SocialProvider::Apple => "button[data-provider='apple']",
        }
    }
}

pub struct LoginPage {
    ops: Interactor,
    base_url: String,
}

fn email_chain() -> LocatorChain {
    LocatorChain::new(Locator::name("username"))
        .or(Locator::id("username"))
        .or(Locator::css("input[type='email']"))
        .or(Locator::css("input[name*='email' i]"))
        .or(Locator::css("input[placeholder*='email' i]"))
}

fn password_chain() -> LocatorChain {
    LocatorChain::new(Locator::name("password"))
        .or(Locator::id("password"))
        .or(Locator::css("input[type='password']"))
        .or(Locator::css("input[name*='password' i]"))
        .or(Locator::css("input[placeholder*='password' i]"))
}

fn continue_chain() -> LocatorChain {
    LocatorChain::new(Locator::css("button[type='submit']")).or(Locator::name("action"))
}

fn toggle_password_chain() -> LocatorChain {
    LocatorChain::new(Locator::css("button[data-action='toggle']"))
}

fn forgot_password_chain() -> LocatorChain {
    LocatorChain::new(Locator::css("a[href*='/u/login/password-reset-start']"))
}

fn sign_up_chain() -> LocatorChain {
    LocatorChain::new(Locator::css(".ulp-alternate-action a"))
}

fn field_error_chain(field: LoginField) -> LocatorChain {
    match field {
        LoginField::Email => LocatorChain::new(Locator::id("error-element-username")),
        LoginField::Password => LocatorChain::new(Locator::id("error-element-password")),
    }
}

fn generic_error_chain() -> LocatorChain {
    LocatorChain::new(Locator::css(".ulp-input-error-message"))
        .or(Locator::css("[data-qa-id='login-error']"))
        .or(Locator::css(".ulp-error-message"))
}

fn display_name_chain() -> LocatorChain {
    LocatorChain::new(Locator::css(".hui-globaluseritem__display-name span"))
}

impl LoginPage {
    pub fn new(ops: Interactor, base_url: impl Into<String>) -> Self {
        Self {
            ops,
            base_url: base_url.into(),
        }
    }

    pub fn login_url(&self) -> String {
        join_url(&self.base_url, LOGIN_PATH)
    }

    pub async fn navigate(&self) -> Result<(), InteractError> {
        let url = self.login_url();
        info!(%url, "navigating to login page");
        self.ops.navigate(&url).await
    }

    pub async fn enter_email(&self, email: &str) -> Result<InteractionOutcome, InteractError> {
        self.ops.type_text(&email_chain(), email, true).await
    }

    pub async fn enter_password(
        &self,
        password: &str,
    ) -> Result<InteractionOutcome, InteractError> {
        self.ops.type_text(&password_chain(), password, true).await
    }

    pub async fn click_continue(&self) -> Result<InteractionOutcome, InteractError> {
        self.ops.click(&continue_chain()).await
    }

    /// The full two-step flow: email, continue, password, continue.
    pub async fn submit_login(&self, email: &str, password: &str) -> Result<(), InteractError> {
        self.enter_email(email).await?;
        self.click_continue().await?;
        self.enter_password(password).await?;
        self.click_continue().await?;
        Ok(())
    }

    pub async fn click_forgot_password(&self) -> Result<InteractionOutcome, InteractError> {
        self.ops.click(&forgot_password_chain()).await
    }

    pub async fn click_sign_up(&self) -> Result<InteractionOutcome, InteractError> {
        self.ops.click(&sign_up_chain()).await
    }

    pub async fn click_show_hide_password(&self) -> Result<InteractionOutcome, InteractError> {
        self.ops.click(&toggle_password_chain()).await
    }

    pub async fn click_provider(
        &self,
        provider: SocialProvider,
    ) -> Result<InteractionOutcome, InteractError> {
        self.ops
            .click(&LocatorChain::new(Locator::css(provider.selector())))
            .await
    }

    /// First visible error text, field-specific slots before generic ones.
    /// `None` means no error is shown, which many scenarios assert on.
    pub async fn error_message(&self) -> Option<String> {
        for chain in [
            generic_error_chain(),
            field_error_chain(LoginField::Email),
            field_error_chain(LoginField::Password),
        ] {
            if let Some(text) = self.ops.try_text(&chain, ERROR_PROBE).await {
                if !text.is_empty() {
                    return Some(text);
                }
            }
        }
        None
    }

    pub async fn field_error(&self, field: LoginField) -> Option<String> {
        self.ops.try_text(&field_error_chain(field), ERROR_PROBE).await
    }

    /// Invalid credentials surface on the password field's error slot.
    pub async fn invalid_credentials_error(&self) -> Option<String> {
        self.field_error(LoginField::Password).await
    }

    pub async fn has_error(&self) -> bool {
        self.error_message().await.is_some()
    }

    /// HTML5 constraint-validation message on a field, empty when the field
    /// is valid.
    pub async fn validation_message(&self, field: LoginField) -> Result<String, InteractError> {
        let chain = match field {
            LoginField::Email => email_chain(),
            LoginField::Password => password_chain(),
        };
        Ok(self
            .ops
            .attribute(&chain, "validationMessage")
            .await?
            .unwrap_or_default())
    }

    /// Masked means `type="password"`; the show/hide toggle flips it to text.
    pub async fn is_password_masked(&self) -> Result<bool, InteractError> {
        let field_type = self.ops.attribute(&password_chain(), "type").await?;
        Ok(field_type.as_deref() != Some("text"))
    }

    pub async fn has_social_login_options(&self) -> bool {
        for provider in [SocialProvider::Google, SocialProvider::Facebook] {
            let chain = LocatorChain::new(Locator::css(provider.selector()));
            if self.ops.is_visible(&chain, SOCIAL_PROBE).await {
                return true;
            }
        }
        false
    }

    /// Post-login display name; visible only once authentication succeeded.
    pub async fn display_name(&self) -> Option<String> {
        self.ops
            .try_text(&display_name_chain(), DISPLAY_NAME_PROBE)
            .await
    }

    pub async fn is_display_name_visible(&self) -> bool {
        self.ops
            .is_visible(&display_name_chain(), Duration::from_secs(5))
            .await
    }

    pub async fn is_loaded(&self) -> Result<bool, InteractError> {
        let url = self.ops.current_url().await?;
        Ok(url.to_lowercase().contains("login"))
    }

    /// Whether the current URL's path contains `fragment` (case-insensitive);
    /// used to verify in-application redirects like the password-reset flow.
    pub async fn path_contains(&self, fragment: &str) -> Result<bool, InteractError> {
        let current = self.ops.current_url().await?;
        let path = Url::parse(&current)
            .map(|u| u.path().to_lowercase())
            .unwrap_or_else(|_| current.to_lowercase());
        Ok(path.contains(&fragment.to_lowercase()))
    }

    /// Whether the current host matches the expected provider URL's host;
    /// used to verify redirects out to OAuth providers.
    pub async fn redirected_to_provider(&self, expected_url: &str) -> Result<bool, InteractError> {
        let current = self.ops.current_url().await?;
        let current_host = Url::parse(&current)
            .ok()
            .and_then(|u| u.host_str().map(str::to_lowercase));
        let expected_host = Url::parse(expected_url.trim_matches(|c| c == '"' || c == '\''))
            .ok()
            .and_then(|u| u.host_str().map(str::to_lowercase));
        match (current_host, expected_host) {
            (Some(current), Some(expected)) => {
                Ok(current == expected || current.contains(&expected))
            }
            _ => Ok(false),
        }
    }
}
