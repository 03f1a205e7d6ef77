//! Authenticated dashboard: where a successful login lands.

use std::time::Duration;

use tracing::info;

use suite_interactions::{InteractError, InteractionOutcome, Interactor};
use suite_locator::{Locator, LocatorChain};

const HOME_PATH: &str = "/home";
const DASHBOARD_PATH: &str = "/dashboard";

const MENU_PROBE: Duration = Duration::from_secs(2);

pub struct DashboardPage {
    ops: Interactor,
}

fn user_menu_chain() -> LocatorChain {
    LocatorChain::new(Locator::css(".hui-globalusermenu")).or(Locator::css(".user-dropdown"))
}

fn display_name_chain() -> LocatorChain {
    LocatorChain::new(Locator::css(".hui-globaluseritem__display-name"))
        .or(Locator::css(".user-display-name"))
}

fn logout_chain() -> LocatorChain {
    LocatorChain::new(Locator::css("[data-qa-id='webnav-usermenu-logout']")).or(Locator::xpath(
        "//a[contains(text(), 'Log Out') or contains(text(), 'Sign Out')]",
    ))
}

fn welcome_chain() -> LocatorChain {
    LocatorChain::new(Locator::css("[data-qa-id='welcome-message']"))
}

impl DashboardPage {
    pub fn new(ops: Interactor) -> Self {
        Self { ops }
    }

    pub async fn is_on_dashboard(&self) -> Result<bool, InteractError> {
        let url = self.ops.current_url().await?.to_lowercase();
        Ok(url.contains(HOME_PATH) || url.contains(DASHBOARD_PATH))
    }

    pub async fn display_name(&self) -> Option<String> {
        self.ops
            .try_text(&display_name_chain(), Duration::from_secs(10))
            .await
    }

    pub async fn is_user_logged_in(&self) -> bool {
        self.ops.is_visible(&user_menu_chain(), MENU_PROBE).await
            || self.ops.is_visible(&display_name_chain(), MENU_PROBE).await
    }

    pub async fn welcome_message(&self) -> Option<String> {
        self.ops.try_text(&welcome_chain(), MENU_PROBE).await
    }

    pub async fn open_user_menu(&self) -> Result<InteractionOutcome, InteractError> {
        self.ops.click(&user_menu_chain()).await
    }

    /// Log out, opening the user menu first when the logout control is
    /// tucked inside the dropdown. Returns once the login page is back.
    pub async fn logout(&self) -> Result<bool, InteractError> {
        if !self.ops.is_visible(&logout_chain(), MENU_PROBE).await {
            self.open_user_menu().await?;
        }
        self.ops.click(&logout_chain()).await?;
        info!("logout clicked, waiting for login page");
        Ok(self
            .ops
            .wait_for_url_contains("login", Duration::from_secs(10))
            .await)
    }
}
