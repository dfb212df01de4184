//! Per-page line statistics used by the classifier.

use crate::model::Line;

use super::last_significant_char;

/// Aggregate statistics over the non-empty lines of one page.
///
/// All values are zero for a page without lines; the classifier treats that
/// as "no header possible".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DocumentStats {
    /// Median line length in characters
    pub median_line_length: f32,
    /// Mean line length in characters
    pub average_line_length: f32,
    /// Fraction of lines ending in `.`, `!` or `?`
    pub sentence_ending_ratio: f32,
    /// Fraction of lines ending in `:`
    pub colon_ending_ratio: f32,
    /// Number of lines
    pub total_lines: usize,
}

impl DocumentStats {
    /// Compute statistics for a set of lines.
    pub fn from_lines(lines: &[Line]) -> Self {
        if lines.is_empty() {
            return Self::default();
        }

        let lengths: Vec<usize> = lines.iter().map(Line::len).collect();
        let total = lines.len() as f32;

        let sentence_endings = lines
            .iter()
            .filter(|l| matches!(last_significant_char(&l.text), Some('.' | '!' | '?')))
            .count();
        let colon_endings = lines.iter().filter(|l| l.text.ends_with(':')).count();

        Self {
            median_line_length: median(&lengths),
            average_line_length: lengths.iter().sum::<usize>() as f32 / total,
            sentence_ending_ratio: sentence_endings as f32 / total,
            colon_ending_ratio: colon_endings as f32 / total,
            total_lines: lines.len(),
        }
    }

    /// Check if the statistics were computed over zero lines.
    pub fn is_empty(&self) -> bool {
        self.total_lines == 0
    }
}

/// Median of a set of lengths; even-sized sets average the two middle values.
pub fn median(values: &[usize]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) as f32 / 2.0
    } else {
        sorted[mid] as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::split_lines;

    #[test]
    fn test_median_odd() {
        assert_eq!(median(&[7, 1, 3]), 3.0);
        assert_eq!(median(&[10]), 10.0);
    }

    #[test]
    fn test_median_even() {
        assert_eq!(median(&[4, 1, 3, 10]), 3.5);
        assert_eq!(median(&[2, 8]), 5.0);
    }

    #[test]
    fn test_median_empty() {
        assert_eq!(median(&[]), 0.0);
    }

    #[test]
    fn test_stats_from_lines() {
        // lengths: 5, 10, 3, 6
        let lines = split_lines("Intro\nSome text.\nKey\nItems:");
        let stats = DocumentStats::from_lines(&lines);

        assert_eq!(stats.total_lines, 4);
        assert_eq!(stats.median_line_length, 5.5);
        assert_eq!(stats.average_line_length, 6.0);
        assert_eq!(stats.sentence_ending_ratio, 0.25);
        assert_eq!(stats.colon_ending_ratio, 0.25);
    }

    #[test]
    fn test_sentence_ending_ignores_closing_quote() {
        let lines = split_lines("He said \"stop.\"\n(See above.)");
        let stats = DocumentStats::from_lines(&lines);
        assert_eq!(stats.sentence_ending_ratio, 1.0);
    }

    #[test]
    fn test_stats_empty() {
        let stats = DocumentStats::from_lines(&[]);
        assert!(stats.is_empty());
        assert_eq!(stats, DocumentStats::default());
    }
}
