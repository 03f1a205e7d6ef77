use std::time::Duration;

use thiserror::Error;

use crate::types::LocatorChain;
use suite_session::SessionError;

#[derive(Debug, Clone, Error)]
pub enum LocatorError {
    /// Every locator in the chain was exhausted without a qualifying element.
    /// Carries the full chain in original order so reports can show every
    /// strategy attempted, plus the last underlying session error if any
    /// attempt failed outright rather than merely finding nothing.
    #[error("no locator qualified within {timeout:?}: [{chain}]")]
    NotFound {
        chain: LocatorChain,
        timeout: Duration,
        last_error: Option<SessionError>,
    },
}

impl LocatorError {
    pub fn chain(&self) -> &LocatorChain {
        match self {
            LocatorError::NotFound { chain, .. } => chain,
        }
    }

    pub fn last_error(&self) -> Option<&SessionError> {
        match self {
            LocatorError::NotFound { last_error, .. } => last_error.as_ref(),
        }
    }
}
