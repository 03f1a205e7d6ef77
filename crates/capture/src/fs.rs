//! Filesystem reporter

use std::path::PathBuf;

use async_trait::async_trait;

use crate::reporter::{AttachmentKind, ReportError, Reporter};

/// Writes each attachment as `<dir>/<name>.<ext>`.
///
/// The directory is created lazily on first write, so constructing the
/// reporter for a run that never fails leaves no empty reports directory.
#[derive(Debug, Clone)]
pub struct FsReporter {
    dir: PathBuf,
}

impl FsReporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }
}

#[async_trait]
impl Reporter for FsReporter {
    async fn attach(
        &self,
        name: &str,
        kind: AttachmentKind,
        payload: &[u8],
    ) -> Result<(), ReportError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(format!("{name}.{}", kind.extension()));
        tokio::fs::write(&path, payload).await?;
        tracing::debug!(path = %path.display(), "attachment written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_attachment_with_kind_extension() {
        let dir = tempfile::tempdir().unwrap();
        let reporter = FsReporter::new(dir.path().join("reports"));

        reporter
            .attach("failure-screenshot", AttachmentKind::Image, b"\x89PNG")
            .await
            .unwrap();
        reporter
            .attach("failure-page", AttachmentKind::Html, b"<html></html>")
            .await
            .unwrap();

        let png = dir.path().join("reports/failure-screenshot.png");
        let html = dir.path().join("reports/failure-page.html");
        assert_eq!(std::fs::read(png).unwrap(), b"\x89PNG");
        assert_eq!(std::fs::read(html).unwrap(), b"<html></html>");
    }
}
