//! Hudl login suite library
//!
//! Exposes the operational shell (config, test data, WebDriver adapter,
//! scenario runner) for integration tests; the interaction engine itself
//! lives in the `suite-*` crates.

pub mod config;
pub mod runner;
pub mod scenarios;
pub mod test_data;
pub mod webdriver;

pub use config::{BrowserFamily, SuiteConfig};
pub use runner::{ScenarioContext, ScenarioSession, SessionFactory, SuiteRunner};
pub use scenarios::{all_scenarios, Scenario};
pub use test_data::{Credentials, TestData};
pub use webdriver::WebDriverSession;
