//! Transcript and error-record artifacts.

use std::fmt::Write as _;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{ExtractionMethod, Page};

use super::ReconstructionStats;

/// A reconstructed document ready to be written out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    /// Source file name
    pub source: String,

    /// Backend that produced the page text
    pub method: ExtractionMethod,

    /// When processing finished
    pub processed_at: DateTime<Utc>,

    /// Reconstructed pages in ascending order
    pub pages: Vec<Page>,

    /// Statistics over every reconstructed page
    #[serde(default)]
    pub stats: ReconstructionStats,
}

impl Transcript {
    /// Create a transcript stamped with the current time.
    pub fn new(source: impl Into<String>, method: ExtractionMethod, pages: Vec<Page>) -> Self {
        Self {
            source: source.into(),
            method,
            processed_at: Utc::now(),
            pages,
            stats: ReconstructionStats::default(),
        }
    }

    /// Override the processing timestamp.
    pub fn with_timestamp(mut self, at: DateTime<Utc>) -> Self {
        self.processed_at = at;
        self
    }

    /// Attach reconstruction statistics.
    pub fn with_stats(mut self, stats: ReconstructionStats) -> Self {
        self.stats = stats;
        self
    }

    /// Number of pages kept.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Page bodies joined by blank lines, without the manifest.
    pub fn body(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Render the manifest header followed by one section per page.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Source: {}", self.source);
        let _ = writeln!(out, "Method: {}", self.method);
        let _ = writeln!(out, "Processed: {}", timestamp(&self.processed_at));
        let _ = writeln!(out, "Pages: {}", self.pages.len());

        for page in &self.pages {
            let _ = write!(out, "\n--- Page {} ---\n{}\n", page.number, page.text);
        }

        out
    }
}

/// Render the error record written in place of a transcript.
///
/// The `Caused by:` section walks [`std::error::Error::source`] and is omitted
/// when the error has no source.
pub fn render_error_record(
    source: &str,
    error: &(dyn std::error::Error + 'static),
    at: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Source: {}", source);
    let _ = writeln!(out, "Failed: {}", timestamp(&at));
    let _ = writeln!(out, "Error: {}", error);

    let mut cause = error.source();
    if cause.is_some() {
        out.push_str("\nCaused by:\n");
    }
    let mut depth = 0;
    while let Some(err) = cause {
        let _ = writeln!(out, "    {}: {}", depth, err);
        depth += 1;
        cause = err.source();
    }

    out
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_render_transcript() {
        let transcript = Transcript::new(
            "report.pdf",
            ExtractionMethod::Ocr,
            vec![Page::new(1, "# TITLE #\n\nBody."), Page::new(3, "More body.")],
        )
        .with_timestamp(fixed_time());

        assert_eq!(
            transcript.render(),
            "Source: report.pdf\n\
             Method: ocr\n\
             Processed: 2024-05-17T09:30:00Z\n\
             Pages: 2\n\
             \n--- Page 1 ---\n# TITLE #\n\nBody.\n\
             \n--- Page 3 ---\nMore body.\n"
        );
    }

    #[test]
    fn test_render_empty_transcript() {
        let transcript = Transcript::new("empty.pdf", ExtractionMethod::Local, Vec::new())
            .with_timestamp(fixed_time());
        let rendered = transcript.render();
        assert!(rendered.ends_with("Pages: 0\n"));
        assert!(!rendered.contains("--- Page"));
    }

    #[test]
    fn test_body() {
        let transcript = Transcript::new(
            "a.pdf",
            ExtractionMethod::Local,
            vec![Page::new(1, "one"), Page::new(2, "two")],
        );
        assert_eq!(transcript.body(), "one\n\ntwo");
    }

    #[derive(Debug)]
    struct Outer(std::io::Error);

    impl std::fmt::Display for Outer {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "could not read document")
        }
    }

    impl std::error::Error for Outer {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_error_record_with_cause_chain() {
        let err = Outer(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "access denied",
        ));
        let record = render_error_record("locked.pdf", &err, fixed_time());

        assert_eq!(
            record,
            "Source: locked.pdf\n\
             Failed: 2024-05-17T09:30:00Z\n\
             Error: could not read document\n\
             \nCaused by:\n    0: access denied\n"
        );
    }

    #[test]
    fn test_error_record_without_cause() {
        let err = crate::Error::RemoteService("status failed".into());
        let record = render_error_record("scan.pdf", &err, fixed_time());
        assert!(record.contains("Error: Remote OCR failure: status failed"));
        assert!(!record.contains("Caused by"));
    }
}
