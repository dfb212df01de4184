//! Per-document reports and the batch summary.

use std::path::PathBuf;
use std::time::Duration;

use crate::model::ExtractionMethod;

/// What a batch run produced for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingOutcome {
    /// A transcript was written
    Transcribed {
        /// Path of the transcript artifact
        artifact: PathBuf,
        /// Backend that produced the text
        method: ExtractionMethod,
        /// Pages kept in the transcript
        pages: usize,
    },
    /// The document failed; an error record was written when possible
    Failed {
        /// Path of the error artifact, if it could be written
        artifact: Option<PathBuf>,
        /// Top-level error message
        error: String,
    },
}

impl ProcessingOutcome {
    /// Whether a transcript was written.
    pub fn is_success(&self) -> bool {
        matches!(self, ProcessingOutcome::Transcribed { .. })
    }

    /// Whether the document failed.
    pub fn is_failure(&self) -> bool {
        matches!(self, ProcessingOutcome::Failed { .. })
    }

    /// Artifact written for this document, if any.
    pub fn artifact(&self) -> Option<&PathBuf> {
        match self {
            ProcessingOutcome::Transcribed { artifact, .. } => Some(artifact),
            ProcessingOutcome::Failed { artifact, .. } => artifact.as_ref(),
        }
    }
}

/// Outcome of one input document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentReport {
    /// Input document path
    pub source: PathBuf,

    /// What was produced
    pub outcome: ProcessingOutcome,

    /// Wall time spent on the document
    pub elapsed: Duration,
}

impl DocumentReport {
    /// Source file name for display.
    pub fn name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }
}

/// Totals of a batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// One report per input document, sorted by source path
    pub reports: Vec<DocumentReport>,

    /// Wall time of the whole run
    pub elapsed: Duration,
}

impl BatchSummary {
    /// Number of documents seen.
    pub fn total(&self) -> usize {
        self.reports.len()
    }

    /// Number of transcripts written.
    pub fn succeeded(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| r.outcome.is_success())
            .count()
    }

    /// Number of failed documents.
    pub fn failed(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| r.outcome.is_failure())
            .count()
    }

    /// Reports of failed documents.
    pub fn failures(&self) -> impl Iterator<Item = &DocumentReport> {
        self.reports.iter().filter(|r| r.outcome.is_failure())
    }

    /// Whether every document was transcribed.
    pub fn all_succeeded(&self) -> bool {
        self.succeeded() == self.total()
    }
}
