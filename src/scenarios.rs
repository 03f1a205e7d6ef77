//! The login scenarios
//!
//! Each scenario is an async function over a [`ScenarioContext`]: it drives
//! page objects, asserts on resulting page state, and returns an error on
//! the first mismatch. Tags mirror how the suite has always been sliced:
//! `smoke`, `positive`, `negative`, `ui`, `security`.

use anyhow::{ensure, Result};
use std::future::Future;
use std::pin::Pin;

use suite_pages::{LoginField, SocialProvider};

use crate::runner::ScenarioContext;

pub type ScenarioFuture<'a> = Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
pub type ScenarioFn = for<'a> fn(&'a ScenarioContext) -> ScenarioFuture<'a>;

pub struct Scenario {
    pub name: &'static str,
    pub description: &'static str,
    pub tags: &'static [&'static str],
    pub run: ScenarioFn,
}

/// Every registered scenario, in execution order.
pub fn all_scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            name: "valid-login",
            description: "Login with valid credentials lands on the dashboard",
            tags: &["smoke", "positive"],
            run: valid_login,
        },
        Scenario {
            name: "wrong-password",
            description: "A wrong password keeps the user on the login page with an error",
            tags: &["smoke", "negative"],
            run: wrong_password,
        },
        Scenario {
            name: "unknown-email",
            description: "An unregistered email is rejected at the email step",
            tags: &["negative"],
            run: unknown_email,
        },
        Scenario {
            name: "empty-email",
            description: "Submitting an empty email is rejected without leaving the page",
            tags: &["negative"],
            run: empty_email,
        },
        Scenario {
            name: "malformed-email",
            description: "A malformed email address is rejected by field validation",
            tags: &["negative", "security"],
            run: malformed_email,
        },
        Scenario {
            name: "password-masking",
            description: "The password field is masked and the show/hide toggle flips it",
            tags: &["ui", "security"],
            run: password_masking,
        },
        Scenario {
            name: "social-login-options",
            description: "Social identity providers are offered on the login form",
            tags: &["ui"],
            run: social_login_options,
        },
        Scenario {
            name: "google-login-redirect",
            description: "The Google button redirects to the Google account chooser",
            tags: &["ui"],
            run: google_login_redirect,
        },
        Scenario {
            name: "forgot-password",
            description: "The forgot-password link leads to a working reset form",
            tags: &["ui", "positive"],
            run: forgot_password,
        },
        Scenario {
            name: "sign-up-link",
            description: "The sign-up link leads to the account creation form",
            tags: &["ui"],
            run: sign_up_link,
        },
        Scenario {
            name: "logout",
            description: "Logging out from the dashboard returns to the login page",
            tags: &["positive"],
            run: logout,
        },
        Scenario {
            name: "home-entry",
            description: "The home page login button leads into the login flow",
            tags: &["smoke", "ui"],
            run: home_entry,
        },
    ]
}

/// Keep scenarios whose name contains `name` (case-insensitive) and, when
/// `tags` is non-empty, that carry at least one of the requested tags.
pub fn filter(scenarios: Vec<Scenario>, name: Option<&str>, tags: &[String]) -> Vec<Scenario> {
    let name = name.map(str::to_lowercase);
    scenarios
        .into_iter()
        .filter(|scenario| {
            if let Some(name) = &name {
                if !scenario.name.to_lowercase().contains(name) {
                    return false;
                }
            }
            tags.is_empty()
                || tags
                    .iter()
                    .any(|tag| scenario.tags.contains(&tag.to_lowercase().as_str()))
        })
        .collect()
}

fn valid_login(ctx: &ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let login = ctx.login_page();
        let creds = ctx.data().valid().clone();

        login.navigate().await?;
        login.submit_login(&creds.email, &creds.password).await?;

        let landed = ctx
            .ops()
            .wait_for_url_contains("home", ctx.config().timeouts.page_load)
            .await;
        ensure!(landed, "login did not redirect to the dashboard");

        let dashboard = ctx.dashboard_page();
        ensure!(
            dashboard.is_user_logged_in().await,
            "no user menu or display name after login"
        );
        Ok(())
    })
}

fn wrong_password(ctx: &ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let login = ctx.login_page();
        let creds = ctx.data().wrong_password();

        login.navigate().await?;
        login.submit_login(&creds.email, &creds.password).await?;

        ensure!(
            login.is_loaded().await?,
            "left the login page despite wrong password"
        );
        let error = login.invalid_credentials_error().await;
        ensure!(
            error.is_some() || login.has_error().await,
            "no error message shown for wrong password"
        );
        Ok(())
    })
}

fn unknown_email(ctx: &ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let login = ctx.login_page();

        login.navigate().await?;
        login.enter_email("nonexistent@example.com").await?;
        login.click_continue().await?;

        ensure!(
            login.is_loaded().await?,
            "left the login page on an unknown email"
        );
        ensure!(
            login.has_error().await || login.field_error(LoginField::Email).await.is_some(),
            "no rejection shown for an unknown email"
        );
        Ok(())
    })
}

fn empty_email(ctx: &ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let login = ctx.login_page();

        login.navigate().await?;
        login.enter_email("").await?;
        login.click_continue().await?;

        ensure!(
            login.is_loaded().await?,
            "left the login page despite an empty email"
        );
        let validation = login.validation_message(LoginField::Email).await?;
        ensure!(
            !validation.is_empty() || login.has_error().await,
            "empty email was accepted without complaint"
        );
        Ok(())
    })
}

fn malformed_email(ctx: &ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let login = ctx.login_page();
        let creds = ctx.data().malformed_email();

        login.navigate().await?;
        login.enter_email(&creds.email).await?;
        login.click_continue().await?;

        let validation = login.validation_message(LoginField::Email).await?;
        ensure!(
            !validation.is_empty() || login.has_error().await,
            "malformed email {:?} was accepted",
            creds.email
        );
        Ok(())
    })
}

fn password_masking(ctx: &ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let login = ctx.login_page();
        let creds = ctx.data().valid().clone();

        login.navigate().await?;
        login.enter_email(&creds.email).await?;
        login.click_continue().await?;
        login.enter_password(&creds.password).await?;

        ensure!(
            login.is_password_masked().await?,
            "password field is not masked by default"
        );

        login.click_show_hide_password().await?;
        ensure!(
            !login.is_password_masked().await?,
            "password stayed masked after the show toggle"
        );

        login.click_show_hide_password().await?;
        ensure!(
            login.is_password_masked().await?,
            "password stayed visible after the hide toggle"
        );
        Ok(())
    })
}

fn social_login_options(ctx: &ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let login = ctx.login_page();
        login.navigate().await?;
        ensure!(
            login.has_social_login_options().await,
            "no social identity providers offered"
        );
        Ok(())
    })
}

fn google_login_redirect(ctx: &ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let login = ctx.login_page();

        login.navigate().await?;
        login.click_provider(SocialProvider::Google).await?;

        let redirected = ctx
            .ops()
            .wait_for_url_contains("google.com", ctx.config().timeouts.page_load)
            .await;
        ensure!(redirected, "google button did not leave for google.com");
        ensure!(
            login
                .redirected_to_provider("https://accounts.google.com")
                .await?,
            "redirect landed on an unexpected host"
        );
        Ok(())
    })
}

fn forgot_password(ctx: &ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let login = ctx.login_page();

        login.navigate().await?;
        login.click_forgot_password().await?;

        let reset = ctx.reset_password_page();
        ensure!(
            reset.is_loaded().await? || login.path_contains("password-reset").await?,
            "forgot-password link did not reach the reset flow"
        );
        ensure!(
            reset.has_reset_form().await,
            "reset page is missing its email form"
        );
        Ok(())
    })
}

fn sign_up_link(ctx: &ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let login = ctx.login_page();

        login.navigate().await?;
        login.click_sign_up().await?;

        let signup = ctx.create_account_page();
        ensure!(
            signup.is_loaded().await?,
            "sign-up link did not reach the registration page"
        );
        ensure!(
            signup.required_fields_present().await,
            "registration form is missing required fields"
        );
        Ok(())
    })
}

fn logout(ctx: &ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let login = ctx.login_page();
        let creds = ctx.data().valid().clone();

        login.navigate().await?;
        login.submit_login(&creds.email, &creds.password).await?;

        let dashboard = ctx.dashboard_page();
        ensure!(
            dashboard.is_on_dashboard().await?,
            "login did not land on the dashboard"
        );

        let back_on_login = dashboard.logout().await?;
        ensure!(back_on_login, "logout did not return to the login page");
        Ok(())
    })
}

fn home_entry(ctx: &ScenarioContext) -> ScenarioFuture<'_> {
    Box::pin(async move {
        let home = ctx.home_page();

        home.navigate().await?;
        ensure!(
            home.is_login_button_visible().await,
            "home page shows no login button"
        );

        home.click_login_button().await?;
        let login = ctx.login_page();
        ensure!(
            login.is_loaded().await?,
            "login button did not lead to the login page"
        );
        Ok(())
    })
}
