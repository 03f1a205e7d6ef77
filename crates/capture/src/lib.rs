//! Failure artifacts and the reporter port
//!
//! Every terminal interaction failure in the suite is accompanied by exactly
//! one capture: screenshot, page markup, and console log gathered
//! independently, stamped, and handed to a [`Reporter`]. A failure with no
//! diagnostic artifact is treated as a framework defect, so capture itself
//! is built never to fail: empty slots, yes; propagated errors, no.

mod capture;
mod fs;
mod model;
mod reporter;

pub use capture::capture;
pub use fs::FsReporter;
pub use model::FailureArtifact;
pub use reporter::{AttachmentKind, NullReporter, ReportError, Reporter};
