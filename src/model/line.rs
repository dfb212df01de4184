//! Line-level types.

/// A trimmed, non-empty line of page text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Zero-based position among the non-empty lines of the page
    pub index: usize,

    /// Trimmed text content
    pub text: String,
}

impl Line {
    /// Create a new line.
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    /// Length in characters (not bytes).
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    /// Lines are never empty once built by [`split_lines`].
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Split raw text into trimmed, non-empty lines.
///
/// Blank lines are discarded; indices count only the kept lines.
pub fn split_lines(text: &str) -> Vec<Line> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .enumerate()
        .map(|(index, text)| Line::new(index, text))
        .collect()
}
