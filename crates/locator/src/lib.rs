//! Fallback locator chains and element resolution
//!
//! Live page markup is unstable under experimentation: attributes get
//! renamed, structure churns. A prioritized chain of locators turns a hard
//! lookup failure into a degraded-but-working one, trading a little latency
//! for resilience. This crate owns the locator value model and the
//! resolution pass; interaction semantics live in `suite-interactions`.

mod errors;
mod resolver;
mod types;

pub use errors::LocatorError;
pub use resolver::{resolve, Resolution, POLL_INTERVAL};
pub use types::{Locator, LocatorChain};

// Strategy enum is defined with the session capability; re-exported here so
// page objects only need this crate for locator work.
pub use suite_session::LocatorStrategy;
