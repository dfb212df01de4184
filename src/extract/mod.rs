//! Page extraction: local parsing, remote OCR and the choice between them.

mod local;
mod ocr;
mod strategy;

pub use local::{ErrorMode, LopdfExtractor, PageExtractor};
pub use ocr::{
    parse_poll_response, run_operation, OcrBackend, OcrConfig, OperationHandle, OperationStatus,
    PollPolicy, RemoteOcrClient, DEFAULT_API_VERSION, DEFAULT_MAX_POLLS, DEFAULT_POLL_INTERVAL,
    DEFAULT_REQUEST_TIMEOUT,
};
pub use strategy::{
    ExtractionOptions, ExtractionStrategy, YieldPolicy, MIN_CHARS_PER_PAGE, USABLE_PAGE_FRACTION,
};
