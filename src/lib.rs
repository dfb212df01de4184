//! # pdftranscript
//!
//! Turns PDF documents into clean, structured plain-text transcripts.
//!
//! Page text comes from a local parser or, when the local text layer is too
//! thin, from a remote OCR service. Each page is then stripped of rendering
//! artifacts and rebuilt into headers, lists and paragraphs.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pdftranscript::transcribe_file;
//!
//! fn main() -> pdftranscript::Result<()> {
//!     let transcript = transcribe_file("document.pdf")?;
//!     println!("{}", transcript.render());
//!     Ok(())
//! }
//! ```
//!
//! Reconstruction alone works on any raw text:
//!
//! ```
//! let text = "CHAPTER ONE\nThis is a sentence that\ncontinues here.\n";
//! let out = pdftranscript::reconstruct_text(text);
//! assert_eq!(out, "# CHAPTER ONE #\n\nThis is a sentence that continues here.");
//! ```
//!
//! ## Features
//!
//! - **Local-first extraction**: OCR only runs when local pages are mostly empty
//! - **Bounded OCR polling**: submit/poll with a fixed interval and attempt cap
//! - **Structure reconstruction**: weighted header scoring, list detection,
//!   soft-wrap merging
//! - **Cleanup pipeline**: running footers, page numbers, hyphenation, ligatures
//! - **Batch processing**: worker pool with per-document failure isolation

pub mod batch;
pub mod error;
pub mod extract;
pub mod layout;
pub mod model;
pub mod render;

pub use batch::{
    collect_documents, BatchOptions, BatchRunner, BatchSummary, DocumentReport,
    ProcessingOutcome,
};
pub use error::{Error, Result};
pub use extract::{
    ErrorMode, ExtractionOptions, ExtractionStrategy, LopdfExtractor, OcrBackend, OcrConfig,
    PageExtractor, PollPolicy, RemoteOcrClient, YieldPolicy, MIN_CHARS_PER_PAGE,
    USABLE_PAGE_FRACTION,
};
pub use layout::{DocumentStats, HeadingConfig, LineClassifier, LineKind};
pub use model::{Block, BlockKind, ExtractionMethod, ExtractionResult, Line, Page};
pub use render::{
    CleanupOptions, CleanupPreset, DocumentReconstructor, ReconstructionStats, RenderOptions,
    Transcript,
};

use std::path::Path;

use rayon::prelude::*;

/// Clean and reconstruct raw text with default options.
///
/// # Example
///
/// ```
/// let out = pdftranscript::reconstruct_text("1. First item\n2. Second item");
/// assert_eq!(out, "1. First item\n2. Second item");
/// ```
pub fn reconstruct_text(text: &str) -> String {
    render::reconstruct(text, &RenderOptions::default())
}

/// Clean and reconstruct raw text with custom options.
///
/// # Example
///
/// ```
/// use pdftranscript::{reconstruct_text_with_options, RenderOptions};
///
/// let options = RenderOptions::new().with_heading_marker('=');
/// let out = reconstruct_text_with_options("CHAPTER ONE\nSome body text follows here.", &options);
/// assert!(out.starts_with("= CHAPTER ONE ="));
/// ```
pub fn reconstruct_text_with_options(text: &str, options: &RenderOptions) -> String {
    render::reconstruct(text, options)
}

/// Transcribe a PDF file using local extraction only.
///
/// # Example
///
/// ```no_run
/// use pdftranscript::transcribe_file;
///
/// let transcript = transcribe_file("document.pdf").unwrap();
/// println!("Pages: {}", transcript.page_count());
/// ```
pub fn transcribe_file<P: AsRef<Path>>(path: P) -> Result<Transcript> {
    Transcriber::default().transcribe_file(path)
}

/// Transcribe PDF bytes using local extraction only.
pub fn transcribe_bytes(source: &str, data: &[u8]) -> Result<Transcript> {
    Transcriber::default().transcribe_bytes(source, data)
}

/// Options for the per-document pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscribeOptions {
    /// Local-versus-OCR decision
    pub extraction: ExtractionOptions,

    /// Cleanup and reconstruction
    pub render: RenderOptions,

    /// Reconstruct the pages of one document on the rayon pool
    pub parallel: bool,
}

impl TranscribeOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set extraction options.
    pub fn with_extraction(mut self, extraction: ExtractionOptions) -> Self {
        self.extraction = extraction;
        self
    }

    /// Set render options.
    pub fn with_render(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }

    /// Set cleanup preset.
    pub fn with_cleanup(mut self, preset: CleanupPreset) -> Self {
        self.render = self.render.with_cleanup_preset(preset);
        self
    }

    /// Always use OCR.
    pub fn with_force_ocr(mut self, force: bool) -> Self {
        self.extraction = self.extraction.with_force_ocr(force);
        self
    }

    /// Enable lenient local extraction.
    pub fn lenient(mut self) -> Self {
        self.extraction = self.extraction.lenient();
        self
    }

    /// Enable or disable parallel page reconstruction.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel page reconstruction.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for TranscribeOptions {
    fn default() -> Self {
        Self {
            extraction: ExtractionOptions::default(),
            render: RenderOptions::default(),
            parallel: true,
        }
    }
}

/// Runs one document through extraction, cleanup and reconstruction.
///
/// # Example
///
/// ```no_run
/// use pdftranscript::{OcrConfig, RemoteOcrClient, TranscribeOptions, Transcriber};
///
/// let ocr = RemoteOcrClient::new(OcrConfig::new("https://ocr.example.com/analyze", "key"))?;
/// let transcript = Transcriber::new(TranscribeOptions::new().lenient())
///     .with_ocr(ocr)
///     .transcribe_file("scan.pdf")?;
/// println!("{}", transcript.render());
/// # Ok::<(), pdftranscript::Error>(())
/// ```
#[derive(Debug)]
pub struct Transcriber {
    strategy: ExtractionStrategy,
    reconstructor: DocumentReconstructor,
    options: TranscribeOptions,
}

impl Transcriber {
    /// Create a transcriber with local extraction only.
    pub fn new(options: TranscribeOptions) -> Self {
        Self {
            strategy: ExtractionStrategy::new(options.extraction.clone()),
            reconstructor: DocumentReconstructor::new(options.render.clone()),
            options,
        }
    }

    /// Replace the local extractor.
    pub fn with_extractor(mut self, extractor: impl PageExtractor + 'static) -> Self {
        self.strategy = self.strategy.with_extractor(extractor);
        self
    }

    /// Attach an OCR backend.
    pub fn with_ocr(mut self, backend: impl OcrBackend + 'static) -> Self {
        self.strategy = self.strategy.with_ocr(backend);
        self
    }

    /// Active options.
    pub fn options(&self) -> &TranscribeOptions {
        &self.options
    }

    /// The extraction strategy in use.
    pub fn strategy(&self) -> &ExtractionStrategy {
        &self.strategy
    }

    /// Read and transcribe a PDF file.
    pub fn transcribe_file<P: AsRef<Path>>(&self, path: P) -> Result<Transcript> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.transcribe_bytes(&source, &data)
    }

    /// Transcribe PDF bytes.
    pub fn transcribe_bytes(&self, source: &str, data: &[u8]) -> Result<Transcript> {
        let extracted = self.strategy.extract(data)?;
        let method = extracted.method;
        let (pages, stats) = self.reconstruct_pages(extracted.pages);

        log::debug!(
            "{}: {} pages kept via {} extraction",
            source,
            pages.len(),
            method
        );
        Ok(Transcript::new(source, method, pages).with_stats(stats))
    }

    /// Clean and reconstruct pages, dropping those left with too little text.
    ///
    /// Page order is preserved whether or not pages run in parallel.
    pub fn reconstruct_pages(&self, pages: Vec<Page>) -> (Vec<Page>, ReconstructionStats) {
        let rebuild = |page: Page| {
            let result = self.reconstructor.reconstruct(&page.text);
            (Page::new(page.number, result.content), result.stats)
        };

        let rebuilt: Vec<(Page, ReconstructionStats)> = if self.options.parallel {
            pages.into_par_iter().map(rebuild).collect()
        } else {
            pages.into_iter().map(rebuild).collect()
        };

        let min_chars = self.options.extraction.min_chars_per_page;
        let mut stats = ReconstructionStats::new();
        let mut kept = Vec::with_capacity(rebuilt.len());
        for (page, page_stats) in rebuilt {
            stats.merge(&page_stats);
            if page.meets_threshold(min_chars) {
                kept.push(page);
            } else {
                log::debug!(
                    "Dropping page {} with {} characters",
                    page.number,
                    page.char_count()
                );
            }
        }

        (kept, stats)
    }
}

impl Default for Transcriber {
    fn default() -> Self {
        Self::new(TranscribeOptions::default())
    }
}
