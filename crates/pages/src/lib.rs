//! Page objects for the Hudl login surfaces
//!
//! Each page is a pure composition: named locator chains plus actions
//! expressed entirely as calls into the interaction engine. No page owns
//! retry, fallback, or capture logic — resilience lives once in
//! `suite-interactions`, so every page benefits from fixes to it uniformly.
//! Pages receive the engine and the base URL at construction; nothing here
//! reads configuration or holds global state.

mod create_account;
mod dashboard;
mod home;
mod login;
mod reset_password;

pub use create_account::CreateAccountPage;
pub use dashboard::DashboardPage;
pub use home::HomePage;
pub use login::{LoginField, LoginPage, SocialProvider};
pub use reset_password::ResetPasswordPage;

/// Join a base URL and an absolute path without doubling slashes.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_url_handles_trailing_slash() {
        assert_eq!(
            join_url("https://www.hudl.com/", "/login"),
            "https://www.hudl.com/login"
        );
        assert_eq!(
            join_url("https://www.hudl.com", "/login"),
            "https://www.hudl.com/login"
        );
    }
}
