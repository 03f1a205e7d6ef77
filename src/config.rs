//! Suite configuration
//!
//! Layered the way the suite has always been driven: YAML file first,
//! `SUITE_*` environment variables over it, CLI flags over both. The engine
//! crates never see this struct — they receive plain values (durations,
//! URLs, counts) at construction.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config/suite.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("unsupported browser family: {0}")]
    UnknownBrowser(String),
}

/// Browser families the suite can drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BrowserFamily {
    Chrome,
    Firefox,
    Edge,
    Safari,
}

impl BrowserFamily {
    pub fn name(&self) -> &'static str {
        match self {
            BrowserFamily::Chrome => "chrome",
            BrowserFamily::Firefox => "firefox",
            BrowserFamily::Edge => "edge",
            BrowserFamily::Safari => "safari",
        }
    }
}

impl fmt::Display for BrowserFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BrowserFamily {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chrome" | "chromium" => Ok(BrowserFamily::Chrome),
            "firefox" => Ok(BrowserFamily::Firefox),
            "edge" => Ok(BrowserFamily::Edge),
            "safari" => Ok(BrowserFamily::Safari),
            other => Err(ConfigError::UnknownBrowser(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub name: BrowserFamily,
    pub headless: bool,
    pub window: WindowSize,
    /// W3C WebDriver endpoint (chromedriver, geckodriver, a Selenium grid).
    pub webdriver_url: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            name: BrowserFamily::Chrome,
            headless: false,
            window: WindowSize::default(),
            webdriver_url: "http://localhost:9515".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlConfig {
    pub base_url: String,
    pub login_path: String,
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.hudl.com".to_string(),
            login_path: "/login".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Resolution window for find/click/type operations.
    #[serde(with = "duration_str")]
    pub explicit_wait: Duration,

    /// Budget for page-load readiness after navigation.
    #[serde(with = "duration_str")]
    pub page_load: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            explicit_wait: Duration::from_secs(20),
            page_load: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportingConfig {
    pub reports_dir: PathBuf,
    pub screenshot_on_failure: bool,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            reports_dir: PathBuf::from("reports"),
            screenshot_on_failure: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    pub browser: BrowserConfig,
    pub urls: UrlConfig,
    pub timeouts: TimeoutConfig,
    pub reporting: ReportingConfig,
}

impl SuiteConfig {
    /// Load from an explicit path (must exist), or from the default path
    /// when present, falling back to built-in defaults. Environment
    /// overrides are applied in all cases.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Self::from_file(default)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env_overrides()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// `SUITE_BROWSER`, `SUITE_HEADLESS`, `SUITE_BASE_URL`,
    /// `SUITE_WEBDRIVER_URL`, `SUITE_REPORTS_DIR` override the file.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(browser) = std::env::var("SUITE_BROWSER") {
            self.browser.name = browser.parse()?;
        }
        if let Ok(headless) = std::env::var("SUITE_HEADLESS") {
            self.browser.headless =
                matches!(headless.to_lowercase().as_str(), "1" | "true" | "yes");
        }
        if let Ok(base_url) = std::env::var("SUITE_BASE_URL") {
            self.urls.base_url = base_url;
        }
        if let Ok(webdriver_url) = std::env::var("SUITE_WEBDRIVER_URL") {
            self.browser.webdriver_url = webdriver_url;
        }
        if let Ok(dir) = std::env::var("SUITE_REPORTS_DIR") {
            self.reporting.reports_dir = PathBuf::from(dir);
        }
        Ok(())
    }

    pub fn login_url(&self) -> String {
        format!(
            "{}{}",
            self.urls.base_url.trim_end_matches('/'),
            self.urls.login_path
        )
    }

    /// Safari has no headless mode; warn rather than fail.
    pub fn effective_headless(&self) -> bool {
        if self.browser.headless && self.browser.name == BrowserFamily::Safari {
            warn!("safari does not support headless mode, running headed");
            return false;
        }
        self.browser.headless
    }
}

/// Durations as humantime strings ("20s", "500ms") in YAML.
mod duration_str {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&humantime::format_duration(*value).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}
