//! Failure artifact model

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Diagnostic snapshot taken at the moment an interaction terminally failed.
///
/// Three independent signals cover the common root causes: the screenshot
/// (layout issues), the page markup (selector mismatches), and the console
/// log (client-side script errors). Any slot may be empty if its sub-capture
/// failed; the others are still populated. Created once per terminal
/// failure, then handed to the reporter; the engine keeps no reference.
#[derive(Debug, Clone)]
pub struct FailureArtifact {
    pub id: Uuid,

    pub captured_at: DateTime<Utc>,

    /// Human-readable description of what was being attempted.
    pub context: String,

    /// PNG bytes, if the screenshot sub-capture succeeded.
    pub screenshot: Option<Vec<u8>>,

    /// Full page markup, if readable.
    pub page_source: Option<String>,

    /// Buffered browser console lines, oldest first.
    pub console: Vec<String>,

    /// URL and title at failure time, when the session could report them.
    pub page_url: Option<String>,
    pub page_title: Option<String>,
}

impl FailureArtifact {
    /// Filesystem-friendly stem for attachments derived from this artifact:
    /// UTC timestamp plus a slug of the context message.
    pub fn name_stem(&self) -> String {
        let slug: String = self
            .context
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '-'
                }
            })
            .collect();
        let slug = slug.trim_matches('-').to_string();
        let slug: String = slug.chars().take(60).collect();
        format!("{}-{}", self.captured_at.format("%Y%m%dT%H%M%S%3f"), slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_stem_slugs_context_and_keeps_timestamp_sortable() {
        let artifact = FailureArtifact {
            id: Uuid::new_v4(),
            captured_at: "2025-03-01T12:30:45.123Z".parse().unwrap(),
            context: "Click continue button on login page".to_string(),
            screenshot: None,
            page_source: None,
            console: vec![],
            page_url: None,
            page_title: None,
        };

        let stem = artifact.name_stem();
        assert!(stem.starts_with("20250301T123045123-"));
        assert!(stem.ends_with("click-continue-button-on-login-page"));
    }
}
