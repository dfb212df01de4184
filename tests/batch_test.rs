//! Integration tests for batch processing with a scripted OCR service.

use std::fs;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use pdftranscript::extract::{OperationHandle, OperationStatus};
use pdftranscript::{
    BatchOptions, BatchRunner, Error, ExtractionOptions, OcrBackend, Page, PageExtractor,
    PollPolicy, ProcessingOutcome, Result, TranscribeOptions, Transcriber,
};
use tempfile::TempDir;

const FIRST_PAGE: &str = "The committee reviewed the annual figures and found that\nspending stayed within the approved budget for the year.";
const SECOND_PAGE: &str = "Further work is planned for the next financial period to\nreplace the old equipment in the northern warehouse.";

/// Local parser that only ever finds a page number.
struct ScannedExtractor;

impl PageExtractor for ScannedExtractor {
    fn extract_pages(&self, _data: &[u8]) -> Result<Vec<Page>> {
        Ok(vec![Page::new(1, "1"), Page::new(2, "2")])
    }
}

/// OCR service that fails any document whose bytes read `broken`.
struct KeyedOcr {
    polls: AtomicU32,
}

impl KeyedOcr {
    fn new() -> Self {
        Self {
            polls: AtomicU32::new(0),
        }
    }
}

impl OcrBackend for KeyedOcr {
    fn submit(&self, data: &[u8]) -> Result<OperationHandle> {
        Ok(OperationHandle::new(String::from_utf8_lossy(data)))
    }

    fn poll(&self, handle: &OperationHandle) -> Result<OperationStatus> {
        // Every operation reports running once before finishing
        if self.polls.fetch_add(1, Ordering::SeqCst) % 2 == 0 {
            return Ok(OperationStatus::Running);
        }
        if handle.as_str() == "broken" {
            return Ok(OperationStatus::Failed(
                "InternalServerError: analysis failed".to_string(),
            ));
        }
        Ok(OperationStatus::Succeeded(vec![
            Page::new(2, SECOND_PAGE),
            Page::new(1, FIRST_PAGE),
        ]))
    }
}

fn runner(workers: usize) -> BatchRunner {
    let extraction = ExtractionOptions::new().with_poll_policy(PollPolicy::new(Duration::ZERO, 4));
    let transcriber = Transcriber::new(TranscribeOptions::new().with_extraction(extraction))
        .with_extractor(ScannedExtractor)
        .with_ocr(KeyedOcr::new());
    BatchRunner::new(transcriber, BatchOptions::new().with_workers(workers))
}

#[test]
fn test_failed_ocr_document_is_isolated() {
    let input = TempDir::new().unwrap();
    fs::write(input.path().join("doc1.pdf"), "first").unwrap();
    fs::write(input.path().join("doc2.pdf"), "broken").unwrap();
    fs::write(input.path().join("doc3.pdf"), "third").unwrap();
    let output = TempDir::new().unwrap();

    // One worker keeps the running/finished alternation per document
    let summary = runner(1).run(input.path(), output.path()).unwrap();

    assert_eq!(summary.total(), 3);
    assert_eq!(summary.succeeded(), 2);
    assert_eq!(summary.failed(), 1);

    for name in ["doc1", "doc3"] {
        let transcript = fs::read_to_string(output.path().join(format!("{}.txt", name))).unwrap();
        assert!(transcript.starts_with(&format!("Source: {}.pdf\nMethod: ocr\n", name)));
        assert!(transcript.contains("Pages: 2\n"));
        let first = transcript.find("--- Page 1 ---").unwrap();
        let second = transcript.find("--- Page 2 ---").unwrap();
        assert!(first < second);
        assert!(!output.path().join(format!("{}.error.txt", name)).exists());
    }

    assert!(!output.path().join("doc2.txt").exists());
    let record = fs::read_to_string(output.path().join("doc2.error.txt")).unwrap();
    assert!(record.starts_with("Source: doc2.pdf\nFailed: "));
    assert!(record.contains("OCR operation failed: InternalServerError: analysis failed"));

    let failure = summary.failures().next().unwrap();
    assert_eq!(failure.name(), "doc2.pdf");
    assert!(matches!(
        failure.outcome,
        ProcessingOutcome::Failed {
            artifact: Some(_),
            ..
        }
    ));
}

#[test]
fn test_poll_timeout_is_recorded() {
    struct NeverDone;

    impl OcrBackend for NeverDone {
        fn submit(&self, _data: &[u8]) -> Result<OperationHandle> {
            Ok(OperationHandle::new("op"))
        }

        fn poll(&self, _handle: &OperationHandle) -> Result<OperationStatus> {
            Ok(OperationStatus::Running)
        }
    }

    let extraction = ExtractionOptions::new().with_poll_policy(PollPolicy::new(Duration::ZERO, 3));
    let transcriber = Transcriber::new(TranscribeOptions::new().with_extraction(extraction))
        .with_extractor(ScannedExtractor)
        .with_ocr(NeverDone);

    let result = transcriber.transcribe_bytes("slow.pdf", b"data");
    assert!(matches!(result, Err(Error::PollTimeout { attempts: 3 })));
}

#[test]
fn test_rerun_replaces_artifacts() {
    let input = TempDir::new().unwrap();
    fs::write(input.path().join("doc.pdf"), "broken").unwrap();
    let output = TempDir::new().unwrap();

    let summary = runner(1).run(input.path(), output.path()).unwrap();
    assert_eq!(summary.failed(), 1);
    assert!(output.path().join("doc.error.txt").exists());

    fs::write(input.path().join("doc.pdf"), "fixed").unwrap();
    let summary = runner(1).run(input.path(), output.path()).unwrap();
    assert!(summary.all_succeeded());
    assert!(output.path().join("doc.txt").exists());
    assert!(!output.path().join("doc.error.txt").exists());
}
