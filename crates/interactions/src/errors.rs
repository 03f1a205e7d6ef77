use thiserror::Error;

use suite_locator::LocatorError;
use suite_session::SessionError;

/// Why one clear/type/verify pass failed.
///
/// Verification mismatches report lengths rather than content so credentials
/// never land in logs or error chains.
#[derive(Debug, Clone, Error)]
pub enum InputFailure {
    #[error("{0}")]
    Session(#[from] SessionError),
    #[error("field value mismatch after typing (expected {expected_len} chars, observed {observed_len})")]
    VerifyMismatch {
        expected_len: usize,
        observed_len: usize,
    },
}

/// Terminal interaction failures.
///
/// `is_visible` is the one operation that never surfaces these; every other
/// operation escalates here once its chain or retry budget is exhausted.
/// Assertion-level mismatches (wrong page state) are the scenario layer's
/// concern and never appear in this enum.
#[derive(Debug, Error)]
pub enum InteractError {
    /// Every locator in the chain exhausted; carries the full chain tried.
    #[error("element not found: {0}")]
    NotFound(#[from] LocatorError),

    /// Element found but not actionably clickable within the retry budget.
    #[error("{context}: click failed after {attempts} attempts: {source}")]
    Click {
        context: String,
        attempts: u32,
        source: SessionError,
    },

    /// Element found but text injection or verification failed.
    #[error("{context}: input failed after {attempts} attempts: {reason}")]
    Input {
        context: String,
        attempts: u32,
        reason: InputFailure,
    },

    /// Session-level failure outside any element interaction.
    #[error("session failure: {0}")]
    Session(#[from] SessionError),
}
