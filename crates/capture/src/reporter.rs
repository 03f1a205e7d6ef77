//! Reporter port
//!
//! The suite hands failure artifacts to a reporter as individual
//! attachments; what the reporter does with them (files, a test-report
//! format, a dashboard) is its own concern.

use async_trait::async_trait;
use thiserror::Error;

/// What an attachment payload is, so reporters can pick extension/rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Image,
    Html,
    Text,
}

impl AttachmentKind {
    pub fn extension(&self) -> &'static str {
        match self {
            AttachmentKind::Image => "png",
            AttachmentKind::Html => "html",
            AttachmentKind::Text => "txt",
        }
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to persist attachment: {0}")]
    Io(#[from] std::io::Error),
}

/// Sink for failure attachments.
#[async_trait]
pub trait Reporter: Send + Sync {
    async fn attach(
        &self,
        name: &str,
        kind: AttachmentKind,
        payload: &[u8],
    ) -> Result<(), ReportError>;
}

/// Discards every attachment. Handy in tests and dry runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

#[async_trait]
impl Reporter for NullReporter {
    async fn attach(
        &self,
        _name: &str,
        _kind: AttachmentKind,
        _payload: &[u8],
    ) -> Result<(), ReportError> {
        Ok(())
    }
}
