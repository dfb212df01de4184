//! Local-first extraction with OCR fallback.

use crate::error::{Error, Result};
use crate::model::{ExtractionMethod, ExtractionResult};

use super::local::{ErrorMode, LopdfExtractor, PageExtractor};
use super::ocr::{run_operation, OcrBackend, PollPolicy};

/// Pages with fewer characters than this count as empty.
pub const MIN_CHARS_PER_PAGE: usize = 50;

/// Local results are usable only above this share of non-empty pages.
pub const USABLE_PAGE_FRACTION: f64 = 0.5;

/// When a local extraction result is good enough to skip OCR.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum YieldPolicy {
    /// Usable iff the share of pages meeting the character threshold is
    /// strictly greater than the given fraction
    Fraction(f64),
    /// Usable iff at least one page meets the character threshold
    AnyPage,
}

impl YieldPolicy {
    /// Apply the policy to a local result.
    pub fn is_usable(&self, result: &ExtractionResult, min_chars: usize) -> bool {
        match self {
            YieldPolicy::Fraction(threshold) => result.usable_fraction(min_chars) > *threshold,
            YieldPolicy::AnyPage => result.pages.iter().any(|p| p.meets_threshold(min_chars)),
        }
    }
}

impl Default for YieldPolicy {
    fn default() -> Self {
        YieldPolicy::Fraction(USABLE_PAGE_FRACTION)
    }
}

/// Options for the extraction decision.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionOptions {
    /// Characters a page needs to count as usable
    pub min_chars_per_page: usize,

    /// Rule deciding whether local output is usable
    pub yield_policy: YieldPolicy,

    /// Skip local extraction and always use OCR
    pub force_ocr: bool,

    /// Bounds on the OCR poll loop
    pub poll: PollPolicy,

    /// Local page-level error handling
    pub error_mode: ErrorMode,
}

impl ExtractionOptions {
    /// Create new extraction options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-page character threshold.
    pub fn with_min_chars(mut self, min_chars: usize) -> Self {
        self.min_chars_per_page = min_chars;
        self
    }

    /// Set the yield policy.
    pub fn with_yield_policy(mut self, policy: YieldPolicy) -> Self {
        self.yield_policy = policy;
        self
    }

    /// Use the strict any-page yield policy.
    pub fn strict_yield(mut self) -> Self {
        self.yield_policy = YieldPolicy::AnyPage;
        self
    }

    /// Always use OCR.
    pub fn with_force_ocr(mut self, force: bool) -> Self {
        self.force_ocr = force;
        self
    }

    /// Set the poll policy.
    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    /// Set the local error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient local extraction.
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            min_chars_per_page: MIN_CHARS_PER_PAGE,
            yield_policy: YieldPolicy::default(),
            force_ocr: false,
            poll: PollPolicy::default(),
            error_mode: ErrorMode::Strict,
        }
    }
}

/// Decides per document between local pages and the OCR backend.
pub struct ExtractionStrategy {
    local: Box<dyn PageExtractor>,
    ocr: Option<Box<dyn OcrBackend>>,
    options: ExtractionOptions,
}

impl ExtractionStrategy {
    /// Create a strategy using `lopdf` locally and no OCR backend.
    pub fn new(options: ExtractionOptions) -> Self {
        Self {
            local: Box::new(LopdfExtractor::new(options.error_mode)),
            ocr: None,
            options,
        }
    }

    /// Replace the local extractor.
    pub fn with_extractor(mut self, extractor: impl PageExtractor + 'static) -> Self {
        self.local = Box::new(extractor);
        self
    }

    /// Attach an OCR backend.
    pub fn with_ocr(mut self, backend: impl OcrBackend + 'static) -> Self {
        self.ocr = Some(Box::new(backend));
        self
    }

    /// Active options.
    pub fn options(&self) -> &ExtractionOptions {
        &self.options
    }

    /// Whether an OCR backend is attached.
    pub fn has_ocr(&self) -> bool {
        self.ocr.is_some()
    }

    /// Whether a local result is good enough to skip OCR.
    pub fn is_usable(&self, result: &ExtractionResult) -> bool {
        self.options
            .yield_policy
            .is_usable(result, self.options.min_chars_per_page)
    }

    /// Extract pages from document bytes.
    ///
    /// Local extraction runs first; its result is returned when usable. A
    /// local parse error counts as zero yield. Without an OCR backend a
    /// low-yield local result is returned as is.
    pub fn extract(&self, data: &[u8]) -> Result<ExtractionResult> {
        if self.options.force_ocr {
            let ocr = self.ocr.as_deref().ok_or_else(|| {
                Error::Config("OCR was forced but no OCR backend is configured".to_string())
            })?;
            log::info!("Forced OCR extraction");
            return self.extract_ocr(ocr, data);
        }

        let local = self
            .local
            .extract_pages(data)
            .map(|pages| ExtractionResult::new(ExtractionMethod::Local, pages));

        let fraction = match &local {
            Ok(result) => {
                if self.is_usable(result) {
                    log::info!(
                        "Local extraction usable: {} pages, yield {:.2}",
                        result.page_count(),
                        result.usable_fraction(self.options.min_chars_per_page)
                    );
                    return local;
                }
                result.usable_fraction(self.options.min_chars_per_page)
            }
            Err(e) => {
                log::warn!("Local extraction failed: {}", e);
                0.0
            }
        };

        match self.ocr.as_deref() {
            Some(ocr) => {
                log::info!("Local yield {:.2} too low, falling back to OCR", fraction);
                self.extract_ocr(ocr, data)
            }
            None => {
                if local.is_ok() {
                    log::warn!(
                        "Local yield {:.2} too low and no OCR backend configured; keeping local text",
                        fraction
                    );
                }
                local
            }
        }
    }

    fn extract_ocr(&self, ocr: &dyn OcrBackend, data: &[u8]) -> Result<ExtractionResult> {
        let pages = run_operation(ocr, data, &self.options.poll)?;
        Ok(ExtractionResult::new(ExtractionMethod::Ocr, pages))
    }
}

impl Default for ExtractionStrategy {
    fn default() -> Self {
        Self::new(ExtractionOptions::default())
    }
}

impl std::fmt::Debug for ExtractionStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractionStrategy")
            .field("has_ocr", &self.has_ocr())
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{OperationHandle, OperationStatus};
    use crate::model::Page;
    use std::time::Duration;

    struct FixedExtractor {
        pages: Vec<Page>,
    }

    impl PageExtractor for FixedExtractor {
        fn extract_pages(&self, _data: &[u8]) -> Result<Vec<Page>> {
            Ok(self.pages.clone())
        }
    }

    struct BrokenExtractor;

    impl PageExtractor for BrokenExtractor {
        fn extract_pages(&self, _data: &[u8]) -> Result<Vec<Page>> {
            Err(Error::PdfParse("corrupt xref".to_string()))
        }
    }

    struct InstantOcr;

    impl OcrBackend for InstantOcr {
        fn submit(&self, _data: &[u8]) -> Result<OperationHandle> {
            Ok(OperationHandle::new("op"))
        }

        fn poll(&self, _handle: &OperationHandle) -> Result<OperationStatus> {
            Ok(OperationStatus::Succeeded(vec![
                Page::new(2, "ocr page two"),
                Page::new(1, "ocr page one"),
            ]))
        }
    }

    fn pages(usable: usize, total: usize) -> Vec<Page> {
        (1..=total as u32)
            .map(|n| {
                if (n as usize) <= usable {
                    Page::new(n, "x".repeat(MIN_CHARS_PER_PAGE))
                } else {
                    Page::new(n, "tiny")
                }
            })
            .collect()
    }

    fn options() -> ExtractionOptions {
        ExtractionOptions::default().with_poll_policy(PollPolicy::new(Duration::ZERO, 3))
    }

    #[test]
    fn test_half_usable_falls_back_to_ocr() {
        let strategy = ExtractionStrategy::new(options())
            .with_extractor(FixedExtractor { pages: pages(5, 10) })
            .with_ocr(InstantOcr);

        let result = strategy.extract(b"%PDF").unwrap();
        assert_eq!(result.method, ExtractionMethod::Ocr);
        let numbers: Vec<u32> = result.pages.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_majority_usable_stays_local() {
        let strategy = ExtractionStrategy::new(options())
            .with_extractor(FixedExtractor { pages: pages(6, 10) })
            .with_ocr(InstantOcr);

        let result = strategy.extract(b"%PDF").unwrap();
        assert_eq!(result.method, ExtractionMethod::Local);
        assert_eq!(result.page_count(), 10);
    }

    #[test]
    fn test_any_page_policy() {
        let strategy = ExtractionStrategy::new(options().strict_yield())
            .with_extractor(FixedExtractor { pages: pages(1, 10) })
            .with_ocr(InstantOcr);
        assert_eq!(strategy.extract(b"%PDF").unwrap().method, ExtractionMethod::Local);

        let strategy = ExtractionStrategy::new(options().strict_yield())
            .with_extractor(FixedExtractor { pages: pages(0, 10) })
            .with_ocr(InstantOcr);
        assert_eq!(strategy.extract(b"%PDF").unwrap().method, ExtractionMethod::Ocr);
    }

    #[test]
    fn test_zero_pages_falls_back_to_ocr() {
        let strategy = ExtractionStrategy::new(options())
            .with_extractor(FixedExtractor { pages: Vec::new() })
            .with_ocr(InstantOcr);
        assert_eq!(strategy.extract(b"%PDF").unwrap().method, ExtractionMethod::Ocr);
    }

    #[test]
    fn test_local_error_counts_as_zero_yield() {
        let strategy = ExtractionStrategy::new(options())
            .with_extractor(BrokenExtractor)
            .with_ocr(InstantOcr);
        assert_eq!(strategy.extract(b"%PDF").unwrap().method, ExtractionMethod::Ocr);
    }

    #[test]
    fn test_without_ocr_backend() {
        let strategy = ExtractionStrategy::new(options())
            .with_extractor(FixedExtractor { pages: pages(2, 10) });
        let result = strategy.extract(b"%PDF").unwrap();
        assert_eq!(result.method, ExtractionMethod::Local);

        let strategy = ExtractionStrategy::new(options()).with_extractor(BrokenExtractor);
        assert!(matches!(
            strategy.extract(b"%PDF"),
            Err(Error::PdfParse(_))
        ));
    }

    #[test]
    fn test_force_ocr() {
        let strategy = ExtractionStrategy::new(options().with_force_ocr(true))
            .with_extractor(FixedExtractor { pages: pages(10, 10) })
            .with_ocr(InstantOcr);
        assert_eq!(strategy.extract(b"%PDF").unwrap().method, ExtractionMethod::Ocr);

        let strategy = ExtractionStrategy::new(options().with_force_ocr(true))
            .with_extractor(FixedExtractor { pages: pages(10, 10) });
        assert!(matches!(strategy.extract(b"%PDF"), Err(Error::Config(_))));
    }

    #[test]
    fn test_custom_threshold() {
        let strategy = ExtractionStrategy::new(options().with_min_chars(3))
            .with_extractor(FixedExtractor { pages: pages(0, 4) })
            .with_ocr(InstantOcr);
        assert_eq!(strategy.extract(b"%PDF").unwrap().method, ExtractionMethod::Local);
    }

    #[test]
    fn test_fraction_boundary_is_exclusive() {
        let result = ExtractionResult::new(ExtractionMethod::Local, pages(5, 10));
        assert!(!YieldPolicy::Fraction(0.5).is_usable(&result, MIN_CHARS_PER_PAGE));
        assert!(YieldPolicy::Fraction(0.4).is_usable(&result, MIN_CHARS_PER_PAGE));
    }
}
