//! Page-level types and the normalized extraction result.

use serde::{Deserialize, Serialize};

/// A single page of extracted text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed, as reported by the backend)
    pub number: u32,

    /// Page text. Raw backend text until the pipeline overwrites it with
    /// the cleaned, reconstructed transcript.
    pub text: String,
}

impl Page {
    /// Create a new page.
    pub fn new(number: u32, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }

    /// Text length in characters.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether the page carries at least `min_chars` characters of
    /// non-whitespace-trimmed text.
    pub fn meets_threshold(&self, min_chars: usize) -> bool {
        self.text.trim().chars().count() >= min_chars
    }
}

/// Which backend produced a document's pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMethod {
    /// Pages came from the local PDF parser
    Local,
    /// Pages came from the remote OCR service
    Ocr,
}

impl ExtractionMethod {
    /// Lowercase name used in transcript manifests.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::Local => "local",
            ExtractionMethod::Ocr => "ocr",
        }
    }
}

impl std::fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pages of one document together with the backend that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Backend used
    pub method: ExtractionMethod,

    /// Pages in ascending page-number order
    pub pages: Vec<Page>,
}

impl ExtractionResult {
    /// Create a result, sorting pages by page number.
    pub fn new(method: ExtractionMethod, mut pages: Vec<Page>) -> Self {
        pages.sort_by_key(|p| p.number);
        Self { method, pages }
    }

    /// Number of pages.
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Check if there are no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Fraction of pages whose text meets `min_chars` (0.0 for no pages).
    pub fn usable_fraction(&self, min_chars: usize) -> f64 {
        if self.pages.is_empty() {
            return 0.0;
        }
        let usable = self
            .pages
            .iter()
            .filter(|p| p.meets_threshold(min_chars))
            .count();
        usable as f64 / self.pages.len() as f64
    }
}
