//! Bounded worker pool over a directory of documents.

use std::any::Any;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Instant;

use crossbeam_channel::unbounded;

use crate::error::{Error, Result};
use crate::Transcriber;

use super::artifact::{collect_documents, write_error, write_transcript};
use super::{BatchOptions, BatchSummary, DocumentReport, ProcessingOutcome};

/// Runs the per-document pipeline over many documents.
///
/// Workers pull paths from a shared channel and process each document fully
/// before taking the next. A failing or panicking document produces an error
/// record and never stops the batch.
#[derive(Debug)]
pub struct BatchRunner {
    transcriber: Transcriber,
    options: BatchOptions,
}

impl BatchRunner {
    /// Create a runner.
    pub fn new(transcriber: Transcriber, options: BatchOptions) -> Self {
        Self {
            transcriber,
            options,
        }
    }

    /// Active options.
    pub fn options(&self) -> &BatchOptions {
        &self.options
    }

    /// Process every PDF in `input_dir`, writing artifacts to `output_dir`.
    ///
    /// Errors only when the batch cannot start (unreadable input directory,
    /// output directory not creatable).
    pub fn run<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        input_dir: P,
        output_dir: Q,
    ) -> Result<BatchSummary> {
        self.run_with_progress(input_dir, output_dir, |_| {})
    }

    /// Like [`BatchRunner::run`], calling `progress` once per finished
    /// document on the calling thread.
    pub fn run_with_progress<P, Q, F>(
        &self,
        input_dir: P,
        output_dir: Q,
        progress: F,
    ) -> Result<BatchSummary>
    where
        P: AsRef<Path>,
        Q: AsRef<Path>,
        F: FnMut(&DocumentReport),
    {
        let input_dir = input_dir.as_ref();
        if !input_dir.is_dir() {
            return Err(Error::Config(format!(
                "input directory does not exist: {}",
                input_dir.display()
            )));
        }
        let documents = collect_documents(input_dir)?;
        self.process_documents(&documents, output_dir.as_ref(), progress)
    }

    /// Process an explicit list of documents.
    pub fn process_documents<F>(
        &self,
        documents: &[PathBuf],
        output_dir: &Path,
        mut progress: F,
    ) -> Result<BatchSummary>
    where
        F: FnMut(&DocumentReport),
    {
        fs::create_dir_all(output_dir)?;

        let started = Instant::now();
        let workers = self.options.workers.clamp(1, documents.len().max(1));
        log::info!(
            "Processing {} documents with {} workers",
            documents.len(),
            workers
        );

        let (job_tx, job_rx) = unbounded::<&Path>();
        for document in documents {
            // The receiver lives until the end of this function.
            let _ = job_tx.send(document.as_path());
        }
        drop(job_tx);

        let (report_tx, report_rx) = unbounded::<DocumentReport>();
        let mut reports = Vec::with_capacity(documents.len());

        thread::scope(|scope| {
            for _ in 0..workers {
                let job_rx = job_rx.clone();
                let report_tx = report_tx.clone();
                scope.spawn(move || {
                    for path in job_rx.iter() {
                        let report = self.process_document(path, output_dir);
                        if report_tx.send(report).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(report_tx);

            for report in report_rx.iter() {
                progress(&report);
                reports.push(report);
            }
        });

        reports.sort_by(|a, b| a.source.cmp(&b.source));
        let summary = BatchSummary {
            reports,
            elapsed: started.elapsed(),
        };
        log::info!(
            "Batch finished in {:.2?}: {} succeeded, {} failed",
            summary.elapsed,
            summary.succeeded(),
            summary.failed()
        );
        Ok(summary)
    }

    /// Process one document and write its artifact.
    pub fn process_document(&self, source: &Path, output_dir: &Path) -> DocumentReport {
        let started = Instant::now();

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            self.transcriber.transcribe_file(source)
        }))
        .unwrap_or_else(|payload| Err(Error::Panicked(panic_message(payload.as_ref()))));

        let outcome = match result.and_then(|transcript| {
            write_transcript(output_dir, source, &transcript).map(|artifact| (artifact, transcript))
        }) {
            Ok((artifact, transcript)) => ProcessingOutcome::Transcribed {
                artifact,
                method: transcript.method,
                pages: transcript.page_count(),
            },
            Err(err) => self.record_failure(source, output_dir, &err),
        };

        DocumentReport {
            source: source.to_path_buf(),
            outcome,
            elapsed: started.elapsed(),
        }
    }

    fn record_failure(&self, source: &Path, output_dir: &Path, err: &Error) -> ProcessingOutcome {
        log::warn!("{}: {}", source.display(), err);
        let artifact = match write_error(output_dir, source, err) {
            Ok(path) => Some(path),
            Err(write_err) => {
                log::error!(
                    "{}: could not write error record: {}",
                    source.display(),
                    write_err
                );
                None
            }
        };
        ProcessingOutcome::Failed {
            artifact,
            error: err.to_string(),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
