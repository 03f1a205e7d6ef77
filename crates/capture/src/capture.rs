//! Failure capture
//!
//! Diagnosing a browser-automation failure after the fact, without a live
//! session, needs a snapshot of state at the moment of failure. `capture`
//! gathers the three signals best-effort and independently: one failing
//! sub-capture must not suppress the others.

use chrono::Utc;
use tracing::warn;
use uuid::Uuid;

use crate::model::FailureArtifact;
use crate::reporter::{AttachmentKind, Reporter};
use suite_session::BrowserSession;

/// Take a diagnostic snapshot and hand it to the reporter.
///
/// Called from inside a failing interaction operation (or by the runner for
/// scenario-level assertion failures), never by page objects. Each call
/// produces one independent artifact; there is no deduplication across
/// repeated failures of the same chain. Reporter errors are logged, not
/// propagated, so capture can never turn a diagnosed failure into a
/// different one.
pub async fn capture(
    session: &dyn BrowserSession,
    reporter: &dyn Reporter,
    context: &str,
) -> FailureArtifact {
    let screenshot = match session.screenshot().await {
        Ok(bytes) => Some(bytes),
        Err(err) => {
            warn!(error = %err, "screenshot capture failed");
            None
        }
    };

    let page_source = match session.page_source().await {
        Ok(source) => Some(source),
        Err(err) => {
            warn!(error = %err, "page source capture failed");
            None
        }
    };

    let console = match session.console_logs().await {
        Ok(lines) => lines,
        Err(err) => {
            warn!(error = %err, "console log capture failed");
            Vec::new()
        }
    };

    let page_url = session.current_url().await.ok();
    let page_title = session.title().await.ok();

    let artifact = FailureArtifact {
        id: Uuid::new_v4(),
        captured_at: Utc::now(),
        context: context.to_string(),
        screenshot,
        page_source,
        console,
        page_url,
        page_title,
    };

    publish(reporter, &artifact).await;
    artifact
}

async fn publish(reporter: &dyn Reporter, artifact: &FailureArtifact) {
    let stem = artifact.name_stem();

    if let Some(bytes) = &artifact.screenshot {
        attach(reporter, &format!("{stem}-screenshot"), AttachmentKind::Image, bytes).await;
    }
    if let Some(source) = &artifact.page_source {
        attach(
            reporter,
            &format!("{stem}-page"),
            AttachmentKind::Html,
            source.as_bytes(),
        )
        .await;
    }
    if !artifact.console.is_empty() {
        let joined = artifact.console.join("\n");
        attach(
            reporter,
            &format!("{stem}-console"),
            AttachmentKind::Text,
            joined.as_bytes(),
        )
        .await;
    }

    let details = format!(
        "context: {}\ncaptured_at: {}\nurl: {}\ntitle: {}\n",
        artifact.context,
        artifact.captured_at.to_rfc3339(),
        artifact.page_url.as_deref().unwrap_or("<unavailable>"),
        artifact.page_title.as_deref().unwrap_or("<unavailable>"),
    );
    attach(
        reporter,
        &format!("{stem}-details"),
        AttachmentKind::Text,
        details.as_bytes(),
    )
    .await;
}

async fn attach(reporter: &dyn Reporter, name: &str, kind: AttachmentKind, payload: &[u8]) {
    if let Err(err) = reporter.attach(name, kind, payload).await {
        warn!(name, error = %err, "reporter rejected attachment");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::NullReporter;
    use suite_session::mock::MockSession;

    #[tokio::test]
    async fn failing_screenshot_does_not_suppress_markup_or_console() {
        let session = MockSession::new();
        session.fail_screenshot(true);
        session.set_page_source("<html><body>login</body></html>");
        session.push_console("TypeError: x is undefined");

        let artifact = capture(&session, &NullReporter, "click continue").await;

        assert!(artifact.screenshot.is_none());
        assert_eq!(
            artifact.page_source.as_deref(),
            Some("<html><body>login</body></html>")
        );
        assert_eq!(artifact.console, vec!["TypeError: x is undefined"]);
        assert_eq!(artifact.context, "click continue");
    }

    #[tokio::test]
    async fn all_sub_captures_failing_still_yields_an_artifact() {
        let session = MockSession::new();
        session.fail_screenshot(true);
        session.fail_page_source(true);
        session.fail_console(true);

        let artifact = capture(&session, &NullReporter, "type email").await;

        assert!(artifact.screenshot.is_none());
        assert!(artifact.page_source.is_none());
        assert!(artifact.console.is_empty());
    }

    #[tokio::test]
    async fn capture_requests_exactly_one_screenshot() {
        let session = MockSession::new();
        capture(&session, &NullReporter, "anything").await;
        assert_eq!(session.screenshot_requests(), 1);
    }
}
