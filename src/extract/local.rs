//! Local page extraction.
//!
//! The concrete PDF library is hidden behind [`PageExtractor`] so the strategy
//! and batch layers never see `lopdf` types.

use lopdf::Document as LopdfDocument;

use crate::error::{Error, Result};
use crate::model::Page;

/// Error handling mode during local extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail the document when any page cannot be extracted
    #[default]
    Strict,
    /// Keep going with an empty page in place of the failed one
    Lenient,
}

/// Turns PDF bytes into per-page raw text.
pub trait PageExtractor: Send + Sync {
    /// Extract every page, in ascending page order.
    fn extract_pages(&self, data: &[u8]) -> Result<Vec<Page>>;
}

/// [`PageExtractor`] backed by `lopdf`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfExtractor {
    error_mode: ErrorMode,
}

impl LopdfExtractor {
    /// Create an extractor with the given error mode.
    pub fn new(error_mode: ErrorMode) -> Self {
        Self { error_mode }
    }

    /// Create a lenient extractor.
    pub fn lenient() -> Self {
        Self::new(ErrorMode::Lenient)
    }

    /// Active error mode.
    pub fn error_mode(&self) -> ErrorMode {
        self.error_mode
    }

    fn extract_page_text(doc: &LopdfDocument, page_num: u32) -> Result<String> {
        doc.extract_text(&[page_num])
            .map_err(|e| Error::TextExtract(format!("Page {}: {}", page_num, e)))
    }
}

impl PageExtractor for LopdfExtractor {
    fn extract_pages(&self, data: &[u8]) -> Result<Vec<Page>> {
        let doc = LopdfDocument::load_mem(data)?;

        if doc.is_encrypted() {
            log::warn!("Document is encrypted; local text may be unreadable");
        }

        let page_ids = doc.get_pages();
        let mut pages = Vec::with_capacity(page_ids.len());

        for page_num in page_ids.keys().copied() {
            match Self::extract_page_text(&doc, page_num) {
                Ok(text) => pages.push(Page::new(page_num, text)),
                Err(e) => {
                    if self.error_mode == ErrorMode::Strict {
                        return Err(e);
                    }
                    log::warn!("Failed to extract text from page {}: {}", page_num, e);
                    pages.push(Page::new(page_num, String::new()));
                }
            }
        }

        Ok(pages)
    }
}
