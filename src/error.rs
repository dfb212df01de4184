//! Error types for pdftranscript.

use std::io;
use thiserror::Error;

/// Result type alias for pdftranscript operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while transcribing a document.
///
/// A low local text yield is deliberately absent: it is not a failure, it only
/// switches extraction over to the OCR backend.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading a source or writing an artifact.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The local PDF parser could not read the document.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// Text could not be extracted from a page in strict mode.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// The OCR service rejected a request, reported a failed operation,
    /// or could not be reached.
    #[error("Remote OCR failure: {0}")]
    RemoteService(String),

    /// The OCR operation did not reach a terminal status in time.
    #[error("OCR operation still running after {attempts} polls")]
    PollTimeout {
        /// Number of polls performed before giving up
        attempts: u32,
    },

    /// A backend returned a shape that cannot be normalized into pages.
    #[error("Malformed extraction result: {0}")]
    MalformedResult(String),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Processing a document panicked.
    #[error("Processing panicked: {0}")]
    Panicked(String),
}

impl Error {
    /// Whether this error came from the remote OCR backend.
    pub fn is_remote(&self) -> bool {
        matches!(self, Error::RemoteService(_) | Error::PollTimeout { .. })
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::PdfParse(err.to_string()),
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::RemoteService(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::MalformedResult(err.to_string())
    }
}
