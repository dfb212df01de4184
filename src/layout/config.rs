//! Heading detection configuration.

/// Default score a line needs to be classified as a header.
pub const DEFAULT_HEADER_THRESHOLD: f32 = 3.0;

/// Threshold for sparse documents where headers are rarely over-detected.
pub const LENIENT_HEADER_THRESHOLD: f32 = 2.5;

/// Threshold for dense prose where short lines are common.
pub const STRICT_HEADER_THRESHOLD: f32 = 4.0;

/// Weights and cutoffs for the header scoring table.
///
/// Every number the classifier compares against lives here, so tuning never
/// touches classification logic.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingConfig {
    /// Minimum accumulated score for a header
    pub threshold: f32,

    /// Weight: line is short relative to the page median
    pub short_line_weight: f32,
    /// Weight: all-uppercase line with a bounded word count
    pub all_caps_weight: f32,
    /// Weight: title-cased line without sentence punctuation
    pub title_case_weight: f32,
    /// Weight: line does not end in terminal punctuation
    pub no_terminal_weight: f32,
    /// Weight: short line ending with a colon
    pub colon_weight: f32,
    /// Weight: single-level numbered, roman or lettered prefix
    pub numbered_weight: f32,
    /// Weight: multi-level outline number such as `2.1`
    pub outline_number_weight: f32,
    /// Weight: starts with a structural keyword
    pub keyword_weight: f32,
    /// Boost: line sits alone before a much longer line
    pub isolation_boost: f32,
    /// Penalty: line trails a much longer unterminated line
    pub embedded_penalty: f32,
    /// Penalty: line continues an unterminated sentence into a lowercase line
    pub continuation_penalty: f32,

    /// "Short" means shorter than this fraction of the median line length
    pub short_line_ratio: f32,
    /// Neighbor must be this many times longer to count as "much longer"
    pub context_length_ratio: f32,
    /// Below this sentence-ending ratio the missing-punctuation factor is ignored
    pub min_sentence_ending_ratio: f32,
    /// Above this colon-ending ratio the colon factor is ignored
    pub max_colon_ending_ratio: f32,

    /// Headers up to this many characters get level 1
    pub h1_max_len: usize,
    /// Headers up to this many characters get level 2, longer ones level 3
    pub h2_max_len: usize,
}

impl HeadingConfig {
    /// Create a configuration with default weights.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration with the strict threshold.
    pub fn strict() -> Self {
        Self::default().with_threshold(STRICT_HEADER_THRESHOLD)
    }

    /// Configuration with the lenient threshold.
    pub fn lenient() -> Self {
        Self::default().with_threshold(LENIENT_HEADER_THRESHOLD)
    }

    /// Set the header threshold.
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the short-line ratio.
    pub fn with_short_line_ratio(mut self, ratio: f32) -> Self {
        self.short_line_ratio = ratio;
        self
    }

    /// Set the character limits for header levels 1 and 2.
    pub fn with_level_limits(mut self, h1_max_len: usize, h2_max_len: usize) -> Self {
        self.h1_max_len = h1_max_len;
        self.h2_max_len = h2_max_len.max(h1_max_len);
        self
    }

    /// Header level for a line of the given length.
    pub fn level_for(&self, len: usize) -> u8 {
        if len <= self.h1_max_len {
            1
        } else if len <= self.h2_max_len {
            2
        } else {
            3
        }
    }
}

impl Default for HeadingConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_HEADER_THRESHOLD,
            short_line_weight: 1.0,
            all_caps_weight: 2.0,
            title_case_weight: 1.5,
            no_terminal_weight: 1.0,
            colon_weight: 2.0,
            numbered_weight: 1.5,
            outline_number_weight: 2.5,
            keyword_weight: 2.0,
            isolation_boost: 0.5,
            embedded_penalty: 0.5,
            continuation_penalty: 1.0,
            short_line_ratio: 0.5,
            context_length_ratio: 1.5,
            min_sentence_ending_ratio: 0.1,
            max_colon_ending_ratio: 0.3,
            h1_max_len: 30,
            h2_max_len: 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert_eq!(HeadingConfig::default().threshold, DEFAULT_HEADER_THRESHOLD);
        assert_eq!(HeadingConfig::strict().threshold, STRICT_HEADER_THRESHOLD);
        assert_eq!(HeadingConfig::lenient().threshold, LENIENT_HEADER_THRESHOLD);
    }

    #[test]
    fn test_level_for() {
        let config = HeadingConfig::default();
        assert_eq!(config.level_for(11), 1);
        assert_eq!(config.level_for(30), 1);
        assert_eq!(config.level_for(31), 2);
        assert_eq!(config.level_for(60), 2);
        assert_eq!(config.level_for(61), 3);
    }

    #[test]
    fn test_level_limits_ordered() {
        let config = HeadingConfig::new().with_level_limits(40, 20);
        assert_eq!(config.h2_max_len, 40);
    }
}
