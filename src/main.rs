use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hudl_login_suite::config::SuiteConfig;
use hudl_login_suite::runner::SuiteRunner;
use hudl_login_suite::scenarios;
use hudl_login_suite::test_data::TestData;
use hudl_login_suite::webdriver::WebDriverSessionFactory;
use hudl_login_suite::BrowserFamily;
use suite_capture::{FsReporter, NullReporter, Reporter};

/// Hudl login suite - browser-driven end-to-end tests for the login workflow
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run login scenarios against a live browser
    Run(RunArgs),

    /// List registered scenarios without running anything
    List(ListArgs),

    /// Show version, build, and effective configuration
    Info,
}

#[derive(Args)]
struct RunArgs {
    /// Only run scenarios whose name contains this substring
    #[arg(short, long)]
    filter: Option<String>,

    /// Only run scenarios carrying at least one of these tags
    #[arg(short, long)]
    tags: Vec<String>,

    /// Browser family to drive
    #[arg(short, long, value_enum)]
    browser: Option<BrowserFamily>,

    /// Run the browser headless
    #[arg(long)]
    headless: bool,

    /// Base URL of the site under test
    #[arg(long)]
    base_url: Option<String>,

    /// W3C WebDriver endpoint
    #[arg(long)]
    webdriver_url: Option<String>,

    /// Directory for failure artifacts and the run summary
    #[arg(long)]
    reports_dir: Option<PathBuf>,

    /// Test data file (credential sets)
    #[arg(long, value_name = "FILE")]
    data: Option<PathBuf>,
}

#[derive(Args)]
struct ListArgs {
    /// Only list scenarios carrying at least one of these tags
    #[arg(short, long)]
    tags: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level, cli.verbose)?;

    let config = SuiteConfig::load(cli.config.as_deref())?;

    let result = match cli.command {
        Commands::Run(args) => cmd_run(args, config).await,
        Commands::List(args) => cmd_list(args),
        Commands::Info => cmd_info(&config),
    };

    match result {
        Ok(()) => Ok(()),
        Err(err) => {
            error!("{err:#}");
            std::process::exit(1);
        }
    }
}

fn init_logging(level: &str, verbose: bool) -> Result<()> {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        level.parse().context("invalid log level")?
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    Ok(())
}

async fn cmd_run(args: RunArgs, mut config: SuiteConfig) -> Result<()> {
    if let Some(browser) = args.browser {
        config.browser.name = browser;
    }
    if args.headless {
        config.browser.headless = true;
    }
    if let Some(base_url) = args.base_url {
        config.urls.base_url = base_url;
    }
    if let Some(webdriver_url) = args.webdriver_url {
        config.browser.webdriver_url = webdriver_url;
    }
    if let Some(reports_dir) = args.reports_dir {
        config.reporting.reports_dir = reports_dir;
    }

    let data = TestData::load(args.data.as_deref())?;

    let selected = scenarios::filter(scenarios::all_scenarios(), args.filter.as_deref(), &args.tags);
    if selected.is_empty() {
        warn!("no scenarios match the given filter/tags");
        return Ok(());
    }

    info!(
        browser = %config.browser.name,
        base_url = %config.urls.base_url,
        scenarios = selected.len(),
        "starting run"
    );

    let reporter: Arc<dyn Reporter> = if config.reporting.screenshot_on_failure {
        Arc::new(FsReporter::new(config.reporting.reports_dir.clone()))
    } else {
        Arc::new(NullReporter)
    };
    let factory = Arc::new(WebDriverSessionFactory::new(config.clone()));

    let runner = SuiteRunner::new(config.clone(), data, factory, reporter);
    let summary = runner.run(&selected).await;

    println!("{summary}");

    let summary_path = config.reporting.reports_dir.join("test_summary.txt");
    if let Err(err) = summary.write_to(&summary_path) {
        warn!(path = %summary_path.display(), error = %err, "could not write summary file");
    }

    anyhow::ensure!(
        summary.all_passed(),
        "{} of {} scenarios did not pass",
        summary.failed() + summary.skipped(),
        summary.total()
    );
    Ok(())
}

fn cmd_list(args: ListArgs) -> Result<()> {
    let selected = scenarios::filter(scenarios::all_scenarios(), None, &args.tags);
    for scenario in &selected {
        println!(
            "{:<24} [{}]  {}",
            scenario.name,
            scenario.tags.join(", "),
            scenario.description
        );
    }
    println!("{} scenarios", selected.len());
    Ok(())
}

fn cmd_info(config: &SuiteConfig) -> Result<()> {
    println!("Hudl Login Suite");
    println!("================");
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
    println!("Build Date: {}", env!("BUILD_DATE", "unknown"));
    println!("Git Commit: {}", env!("GIT_HASH", "unknown"));
    println!();
    println!("Configuration:");
    println!("- Browser: {}", config.browser.name);
    println!("- Headless: {}", config.browser.headless);
    println!("- WebDriver: {}", config.browser.webdriver_url);
    println!("- Base URL: {}", config.urls.base_url);
    println!("- Login URL: {}", config.login_url());
    println!("- Explicit Wait: {:?}", config.timeouts.explicit_wait);
    println!("- Reports Dir: {}", config.reporting.reports_dir.display());
    Ok(())
}
