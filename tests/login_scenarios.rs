//! Registry scenarios driven end-to-end against a scripted mock session.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;

use hudl_login_suite::config::SuiteConfig;
use hudl_login_suite::runner::{ScenarioSession, SessionFactory, SuiteRunner};
use hudl_login_suite::scenarios;
use hudl_login_suite::test_data::TestData;
use suite_capture::{FsReporter, NullReporter, Reporter};
use suite_session::mock::{MockElement, MockSession};
use suite_session::LocatorStrategy;

struct MockFactory {
    session: Arc<MockSession>,
}

#[async_trait]
impl SessionFactory for MockFactory {
    async fn open(&self) -> Result<ScenarioSession> {
        Ok(ScenarioSession::new(self.session.clone()))
    }
}

fn quick_config() -> SuiteConfig {
    let mut config = SuiteConfig::default();
    config.timeouts.explicit_wait = Duration::ZERO;
    config.timeouts.page_load = Duration::ZERO;
    config
}

/// A login form the way the scenarios expect to find it: email and password
/// inputs under their stable names, one submit button.
fn script_login_form(session: &MockSession) {
    session.register(
        LocatorStrategy::Name,
        "username",
        MockElement::new("email-input"),
    );
    session.register(
        LocatorStrategy::Name,
        "password",
        MockElement::new("password-input").with_attribute("type", "password"),
    );
    session.register(
        LocatorStrategy::Css,
        "button[type='submit']",
        MockElement::new("continue-button"),
    );
}

fn runner_over(session: &Arc<MockSession>, reporter: Arc<dyn Reporter>) -> SuiteRunner {
    SuiteRunner::new(
        quick_config(),
        TestData::default(),
        Arc::new(MockFactory {
            session: session.clone(),
        }),
        reporter,
    )
}

fn pick(names: &[&str]) -> Vec<hudl_login_suite::Scenario> {
    scenarios::all_scenarios()
        .into_iter()
        .filter(|s| names.contains(&s.name))
        .collect()
}

#[tokio::test]
async fn wrong_password_scenario_passes_when_the_error_banner_shows() {
    let session = Arc::new(MockSession::new());
    script_login_form(&session);
    session.register(
        LocatorStrategy::Id,
        "error-element-password",
        MockElement::new("pw-error").with_text("Incorrect username or password."),
    );

    let summary = runner_over(&session, Arc::new(NullReporter))
        .run(&pick(&["wrong-password"]))
        .await;

    assert_eq!(summary.total(), 1);
    assert!(summary.all_passed(), "summary: {summary}");

    // The full two-step flow went through the form.
    assert!(!session.typed_into("email-input").is_empty());
    assert!(!session.typed_into("password-input").is_empty());
    assert_eq!(session.clicks_on("continue-button"), 2);
    // A passing scenario leaves no artifacts behind.
    assert_eq!(session.screenshot_requests(), 0);
}

#[tokio::test]
async fn social_login_scenario_sees_the_provider_buttons() {
    let session = Arc::new(MockSession::new());
    session.register(
        LocatorStrategy::Css,
        "button[data-provider='google']",
        MockElement::new("google-button"),
    );

    let summary = runner_over(&session, Arc::new(NullReporter))
        .run(&pick(&["social-login-options"]))
        .await;

    assert!(summary.all_passed(), "summary: {summary}");
}

#[tokio::test]
async fn failed_login_scenario_writes_artifacts_into_the_reports_dir() {
    let session = Arc::new(MockSession::new());
    script_login_form(&session);
    session.set_page_source("<html><body><form id='login'></form></body></html>");
    session.push_console("error: auth endpoint returned 500");

    let reports = tempfile::tempdir().unwrap();
    let reporter = Arc::new(FsReporter::new(reports.path().join("reports")));

    // The mock never leaves the login URL, so the dashboard redirect
    // assertion fails and the runner captures once.
    let summary = runner_over(&session, reporter)
        .run(&pick(&["valid-login"]))
        .await;

    assert_eq!(summary.failed(), 1);
    assert_eq!(session.screenshot_requests(), 1);

    let written: Vec<String> = std::fs::read_dir(reports.path().join("reports"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert!(written.iter().any(|name| name.ends_with(".png")));
    assert!(written.iter().any(|name| name.ends_with(".html")));
    assert!(written.iter().any(|name| name.ends_with(".txt")));
}

#[tokio::test]
async fn a_mixed_run_reports_both_outcomes_and_a_summary_file() {
    let session = Arc::new(MockSession::new());
    script_login_form(&session);
    session.register(
        LocatorStrategy::Id,
        "error-element-password",
        MockElement::new("pw-error").with_text("Incorrect username or password."),
    );

    let runner = runner_over(&session, Arc::new(NullReporter));
    let summary = runner
        .run(&pick(&["wrong-password", "valid-login"]))
        .await;

    assert_eq!(summary.total(), 2);
    assert_eq!(summary.passed(), 1);
    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.pass_rate(), 50.0);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reports/test_summary.txt");
    summary.write_to(&path).unwrap();
    let rendered = std::fs::read_to_string(&path).unwrap();
    assert!(rendered.contains("Total Tests: 2"));
    assert!(rendered.contains("FAIL valid-login"));
    assert!(rendered.contains("PASS wrong-password"));
}
