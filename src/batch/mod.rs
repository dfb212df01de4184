//! Batch processing of a directory of documents.

mod artifact;
mod options;
mod report;
mod runner;

pub use artifact::{
    collect_documents, error_path, transcript_path, write_error, write_transcript, ERROR_SUFFIX,
    TRANSCRIPT_EXTENSION,
};
pub use options::{default_workers, BatchOptions};
pub use report::{BatchSummary, DocumentReport, ProcessingOutcome};
pub use runner::BatchRunner;
