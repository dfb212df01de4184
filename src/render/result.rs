//! Reconstruction result with statistics.

use serde::{Deserialize, Serialize};

/// Result of reconstructing text, including statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered text
    pub content: String,

    /// Reconstruction statistics
    pub stats: ReconstructionStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(content: String, stats: ReconstructionStats) -> Self {
        Self { content, stats }
    }
}

/// Statistics collected while assembling blocks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconstructionStats {
    /// Number of pages reconstructed
    pub page_count: u32,

    /// Number of header blocks
    pub header_count: u32,

    /// Number of list blocks
    pub list_count: u32,

    /// Number of list item lines
    pub list_item_count: u32,

    /// Number of paragraph blocks
    pub paragraph_count: u32,

    /// Number of lines merged into the previous line
    pub merged_line_count: u32,

    /// Approximate word count (whitespace-separated tokens)
    pub word_count: u32,

    /// Character count (excluding whitespace)
    pub char_count: u32,
}

impl ReconstructionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add word and character counts from text.
    pub fn count_text(&mut self, text: &str) {
        self.word_count += text.split_whitespace().count() as u32;
        self.char_count += text.chars().filter(|c| !c.is_whitespace()).count() as u32;
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ReconstructionStats) {
        self.page_count += other.page_count;
        self.header_count += other.header_count;
        self.list_count += other.list_count;
        self.list_item_count += other.list_item_count;
        self.paragraph_count += other.paragraph_count;
        self.merged_line_count += other.merged_line_count;
        self.word_count += other.word_count;
        self.char_count += other.char_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_text() {
        let mut stats = ReconstructionStats::new();
        stats.count_text("Hello, world! This is a test.");

        assert_eq!(stats.word_count, 6);
        assert_eq!(stats.char_count, 24);
    }

    #[test]
    fn test_merge() {
        let mut stats1 = ReconstructionStats {
            header_count: 2,
            paragraph_count: 5,
            ..Default::default()
        };
        let stats2 = ReconstructionStats {
            header_count: 1,
            merged_line_count: 4,
            ..Default::default()
        };

        stats1.merge(&stats2);

        assert_eq!(stats1.header_count, 3);
        assert_eq!(stats1.paragraph_count, 5);
        assert_eq!(stats1.merged_line_count, 4);
    }
}
