//! Scenario runner
//!
//! One browser session per scenario, opened before and torn down after,
//! pass/fail bookkeeping, and a text summary written into the reports
//! directory. Interaction failures arrive already captured by the engine;
//! the runner adds a capture only for assertion-level failures so every
//! reported failure still carries diagnostic artifacts without ever
//! producing two for the same event.

use std::fmt;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{error, info, warn};

use suite_capture::Reporter;
use suite_interactions::{InteractError, Interactor, RetryPolicy};
use suite_pages::{CreateAccountPage, DashboardPage, HomePage, LoginPage, ResetPasswordPage};
use suite_session::BrowserSession;

use crate::config::SuiteConfig;
use crate::scenarios::Scenario;
use crate::test_data::TestData;

type ShutdownFn = Box<dyn FnOnce() -> Pin<Box<dyn Future<Output = ()> + Send>> + Send>;

/// A session opened for exactly one scenario, with its teardown attached.
pub struct ScenarioSession {
    session: Arc<dyn BrowserSession>,
    shutdown: Option<ShutdownFn>,
}

impl ScenarioSession {
    /// A session with no teardown of its own (mocks, externally-managed
    /// browsers).
    pub fn new(session: Arc<dyn BrowserSession>) -> Self {
        Self {
            session,
            shutdown: None,
        }
    }

    pub fn with_shutdown(session: Arc<dyn BrowserSession>, shutdown: ShutdownFn) -> Self {
        Self {
            session,
            shutdown: Some(shutdown),
        }
    }

    pub fn session(&self) -> Arc<dyn BrowserSession> {
        self.session.clone()
    }

    async fn shutdown(self) {
        if let Some(shutdown) = self.shutdown {
            shutdown().await;
        }
    }
}

/// Opens a fresh session for each scenario. The WebDriver-backed factory
/// lives in the binary; tests plug in a mock-backed one.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open(&self) -> Result<ScenarioSession>;
}

/// Everything a scenario body gets to work with. Page objects are built on
/// demand over the scenario's interactor; nothing here outlives the
/// scenario.
pub struct ScenarioContext {
    ops: Interactor,
    config: SuiteConfig,
    data: TestData,
}

impl ScenarioContext {
    pub fn new(ops: Interactor, config: SuiteConfig, data: TestData) -> Self {
        Self { ops, config, data }
    }

    pub fn ops(&self) -> &Interactor {
        &self.ops
    }

    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    pub fn data(&self) -> &TestData {
        &self.data
    }

    pub fn home_page(&self) -> HomePage {
        HomePage::new(self.ops.clone(), self.config.urls.base_url.clone())
    }

    pub fn login_page(&self) -> LoginPage {
        LoginPage::new(self.ops.clone(), self.config.urls.base_url.clone())
    }

    pub fn dashboard_page(&self) -> DashboardPage {
        DashboardPage::new(self.ops.clone())
    }

    pub fn reset_password_page(&self) -> ResetPasswordPage {
        ResetPasswordPage::new(self.ops.clone())
    }

    pub fn create_account_page(&self) -> CreateAccountPage {
        CreateAccountPage::new(self.ops.clone(), self.config.urls.base_url.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioStatus {
    Passed,
    Failed(String),
    /// The session could not be opened; the scenario body never ran.
    Skipped(String),
}

#[derive(Debug, Clone)]
pub struct ScenarioResult {
    pub name: String,
    pub status: ScenarioStatus,
    pub duration: Duration,
}

impl ScenarioResult {
    pub fn passed(&self) -> bool {
        self.status == ScenarioStatus::Passed
    }
}

/// Outcome of one full run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
    pub browser: String,
    pub base_url: String,
    pub results: Vec<ScenarioResult>,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.status, ScenarioStatus::Failed(_)))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.status, ScenarioStatus::Skipped(_)))
            .count()
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0 && self.skipped() == 0
    }

    pub fn pass_rate(&self) -> f64 {
        if self.results.is_empty() {
            return 100.0;
        }
        self.passed() as f64 * 100.0 / self.total() as f64
    }

    /// Plain-text summary file alongside the failure artifacts.
    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_string())
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Test Execution Summary")?;
        writeln!(f, "======================")?;
        writeln!(f, "Execution Date: {}", self.started_at.to_rfc3339())?;
        writeln!(f, "Duration: {:.1}s", self.duration.as_secs_f64())?;
        writeln!(f, "Browser: {}", self.browser)?;
        writeln!(f, "Base URL: {}", self.base_url)?;
        writeln!(f, "Total Tests: {}", self.total())?;
        writeln!(f, "Passed: {}", self.passed())?;
        writeln!(f, "Failed: {}", self.failed())?;
        writeln!(f, "Skipped: {}", self.skipped())?;
        writeln!(f, "Pass Rate: {:.2}%", self.pass_rate())?;
        for result in &self.results {
            match &result.status {
                ScenarioStatus::Passed => {
                    writeln!(f, "  PASS {} ({:.1}s)", result.name, result.duration.as_secs_f64())?
                }
                ScenarioStatus::Failed(reason) => writeln!(
                    f,
                    "  FAIL {} ({:.1}s): {reason}",
                    result.name,
                    result.duration.as_secs_f64()
                )?,
                ScenarioStatus::Skipped(reason) => {
                    writeln!(f, "  SKIP {}: {reason}", result.name)?
                }
            }
        }
        Ok(())
    }
}

pub struct SuiteRunner {
    config: SuiteConfig,
    data: TestData,
    factory: Arc<dyn SessionFactory>,
    reporter: Arc<dyn Reporter>,
}

impl SuiteRunner {
    pub fn new(
        config: SuiteConfig,
        data: TestData,
        factory: Arc<dyn SessionFactory>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            config,
            data,
            factory,
            reporter,
        }
    }

    /// Run the given scenarios sequentially, one fresh session each.
    pub async fn run(&self, scenarios: &[Scenario]) -> RunSummary {
        let started_at = Utc::now();
        let run_start = Instant::now();
        let mut results = Vec::with_capacity(scenarios.len());

        for scenario in scenarios {
            results.push(self.run_one(scenario).await);
        }

        RunSummary {
            started_at,
            duration: run_start.elapsed(),
            browser: self.config.browser.name.to_string(),
            base_url: self.config.urls.base_url.clone(),
            results,
        }
    }

    async fn run_one(&self, scenario: &Scenario) -> ScenarioResult {
        info!(scenario = scenario.name, "starting scenario");
        let start = Instant::now();

        let lease = match self.factory.open().await {
            Ok(lease) => lease,
            Err(err) => {
                error!(scenario = scenario.name, error = %err, "could not open session");
                return ScenarioResult {
                    name: scenario.name.to_string(),
                    status: ScenarioStatus::Skipped(format!("session unavailable: {err}")),
                    duration: start.elapsed(),
                };
            }
        };

        let session = lease.session();
        let ops = Interactor::new(session.clone(), self.reporter.clone())
            .with_resolve_timeout(self.config.timeouts.explicit_wait)
            .with_retry(RetryPolicy::default());
        let context = ScenarioContext::new(ops, self.config.clone(), self.data.clone());

        let status = match (scenario.run)(&context).await {
            Ok(()) => {
                info!(scenario = scenario.name, "scenario passed");
                ScenarioStatus::Passed
            }
            Err(err) => {
                warn!(scenario = scenario.name, error = %err, "scenario failed");
                // Interaction failures were captured at the point of failure;
                // only assertion-level failures still need artifacts.
                if err.downcast_ref::<InteractError>().is_none() {
                    suite_capture::capture(
                        session.as_ref(),
                        self.reporter.as_ref(),
                        &format!("scenario '{}' failed: {err}", scenario.name),
                    )
                    .await;
                }
                ScenarioStatus::Failed(format!("{err:#}"))
            }
        };

        lease.shutdown().await;

        ScenarioResult {
            name: scenario.name.to_string(),
            status,
            duration: start.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenarios::{Scenario, ScenarioFuture};
    use anyhow::bail;
    use suite_capture::NullReporter;
    use suite_locator::{Locator, LocatorChain};
    use suite_session::mock::MockSession;

    struct MockFactory {
        session: Arc<MockSession>,
    }

    #[async_trait]
    impl SessionFactory for MockFactory {
        async fn open(&self) -> Result<ScenarioSession> {
            Ok(ScenarioSession::new(self.session.clone()))
        }
    }

    struct DeadFactory;

    #[async_trait]
    impl SessionFactory for DeadFactory {
        async fn open(&self) -> Result<ScenarioSession> {
            bail!("webdriver endpoint refused connection")
        }
    }

    fn quick_config() -> SuiteConfig {
        let mut config = SuiteConfig::default();
        config.timeouts.explicit_wait = Duration::ZERO;
        config
    }

    fn passing(_ctx: &ScenarioContext) -> ScenarioFuture<'_> {
        Box::pin(async { Ok(()) })
    }

    fn assertion_failure(_ctx: &ScenarioContext) -> ScenarioFuture<'_> {
        Box::pin(async { bail!("expected dashboard, still on login page") })
    }

    fn interaction_failure(ctx: &ScenarioContext) -> ScenarioFuture<'_> {
        Box::pin(async move {
            let chain = LocatorChain::new(Locator::css("#does-not-exist"));
            ctx.ops().find_visible(&chain).await?;
            Ok(())
        })
    }

    fn runner(session: &Arc<MockSession>) -> SuiteRunner {
        SuiteRunner::new(
            quick_config(),
            TestData::default(),
            Arc::new(MockFactory {
                session: session.clone(),
            }),
            Arc::new(NullReporter),
        )
    }

    #[tokio::test]
    async fn summary_counts_pass_and_fail() {
        let session = Arc::new(MockSession::new());
        let scenarios = vec![
            Scenario {
                name: "passes",
                description: "",
                tags: &[],
                run: passing,
            },
            Scenario {
                name: "fails",
                description: "",
                tags: &[],
                run: assertion_failure,
            },
        ];

        let summary = runner(&session).run(&scenarios).await;

        assert_eq!(summary.total(), 2);
        assert_eq!(summary.passed(), 1);
        assert_eq!(summary.failed(), 1);
        assert!(!summary.all_passed());
        assert_eq!(summary.pass_rate(), 50.0);
    }

    #[tokio::test]
    async fn assertion_failure_gets_a_scenario_level_capture() {
        let session = Arc::new(MockSession::new());
        let scenarios = vec![Scenario {
            name: "asserts",
            description: "",
            tags: &[],
            run: assertion_failure,
        }];

        runner(&session).run(&scenarios).await;

        assert_eq!(session.screenshot_requests(), 1);
    }

    #[tokio::test]
    async fn interaction_failure_is_not_captured_twice() {
        let session = Arc::new(MockSession::new());
        let scenarios = vec![Scenario {
            name: "interacts",
            description: "",
            tags: &[],
            run: interaction_failure,
        }];

        let summary = runner(&session).run(&scenarios).await;

        assert_eq!(summary.failed(), 1);
        // One capture from the engine, none from the runner.
        assert_eq!(session.screenshot_requests(), 1);
    }

    #[tokio::test]
    async fn unreachable_session_skips_instead_of_failing() {
        let runner = SuiteRunner::new(
            quick_config(),
            TestData::default(),
            Arc::new(DeadFactory),
            Arc::new(NullReporter),
        );
        let scenarios = vec![Scenario {
            name: "never-runs",
            description: "",
            tags: &[],
            run: passing,
        }];

        let summary = runner.run(&scenarios).await;

        assert_eq!(summary.skipped(), 1);
        assert!(!summary.all_passed());
    }

    #[test]
    fn summary_renders_the_report_shape() {
        let summary = RunSummary {
            started_at: Utc::now(),
            duration: Duration::from_secs(12),
            browser: "chrome".to_string(),
            base_url: "https://www.hudl.com".to_string(),
            results: vec![ScenarioResult {
                name: "valid-login".to_string(),
                status: ScenarioStatus::Passed,
                duration: Duration::from_secs(3),
            }],
        };

        let rendered = summary.to_string();
        assert!(rendered.contains("Total Tests: 1"));
        assert!(rendered.contains("Pass Rate: 100.00%"));
        assert!(rendered.contains("PASS valid-login"));
    }
}
