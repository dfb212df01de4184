//! Line classification: header, list item, or running text.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::Line;

use super::rules::{LineContext, HEADER_RULES};
use super::{last_significant_char, DocumentStats, HeadingConfig};

/// Classification of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Structural heading of the given level
    Header {
        /// Heading level (1-3)
        level: u8,
    },
    /// Line opening with a list marker
    ListItem,
    /// Running text
    Text,
}

fn list_marker_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:\d+[.)]|[A-Za-z][.)]|[•●○■□▪▫◆◇►▻▸‣⁃–\-*·])\s+").unwrap()
    })
}

/// Whether a line opens with a list marker followed by whitespace.
///
/// Depends only on the line content, never on its position.
pub fn is_list_item(line: &str) -> bool {
    list_marker_regex().is_match(line.trim_start())
}

/// Scores lines against the header rule table.
#[derive(Debug, Clone, Default)]
pub struct LineClassifier {
    config: HeadingConfig,
}

impl LineClassifier {
    /// Create a classifier with the given configuration.
    pub fn new(config: HeadingConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &HeadingConfig {
        &self.config
    }

    fn context<'a>(
        &'a self,
        lines: &'a [Line],
        index: usize,
        stats: &'a DocumentStats,
    ) -> Option<LineContext<'a>> {
        let line = lines.get(index)?;
        Some(LineContext {
            text: &line.text,
            stats,
            prev: index
                .checked_sub(1)
                .and_then(|i| lines.get(i))
                .map(|l| l.text.as_str()),
            next: lines.get(index + 1).map(|l| l.text.as_str()),
            config: &self.config,
        })
    }

    /// Sum of the weights of every rule that fires for a context.
    pub fn score(&self, ctx: &LineContext<'_>) -> f32 {
        HEADER_RULES
            .iter()
            .filter(|rule| (rule.predicate)(ctx))
            .map(|rule| (rule.weight)(&self.config))
            .sum()
    }

    /// Header score of `lines[index]`; zero when out of range.
    pub fn score_line(&self, lines: &[Line], index: usize, stats: &DocumentStats) -> f32 {
        self.context(lines, index, stats)
            .map(|ctx| self.score(&ctx))
            .unwrap_or(0.0)
    }

    /// Names of the rules that fire for `lines[index]`.
    pub fn explain(&self, lines: &[Line], index: usize, stats: &DocumentStats) -> Vec<&'static str> {
        let Some(ctx) = self.context(lines, index, stats) else {
            return Vec::new();
        };
        HEADER_RULES
            .iter()
            .filter(|rule| (rule.predicate)(&ctx))
            .map(|rule| rule.name)
            .collect()
    }

    /// Whether `lines[index]` scores as a header.
    ///
    /// Pages without lines and lines without letters never hold headers.
    pub fn is_header_line(&self, lines: &[Line], index: usize, stats: &DocumentStats) -> bool {
        if stats.is_empty() {
            return false;
        }
        let Some(ctx) = self.context(lines, index, stats) else {
            return false;
        };
        if !ctx.text.chars().any(char::is_alphabetic) {
            return false;
        }
        self.score(&ctx) >= self.config.threshold
    }

    /// Classify `lines[index]`. Header detection takes precedence over lists.
    pub fn classify(&self, lines: &[Line], index: usize, stats: &DocumentStats) -> LineKind {
        if self.is_header_line(lines, index, stats) {
            let len = lines[index].len();
            return LineKind::Header {
                level: self.config.level_for(len),
            };
        }
        match lines.get(index) {
            Some(line) if is_list_item(&line.text) => LineKind::ListItem,
            _ => LineKind::Text,
        }
    }

    /// Whether `curr` continues the sentence on `prev`.
    ///
    /// List items never merge in either direction.
    pub fn should_merge_with_previous(&self, prev: &str, curr: &str, stats: &DocumentStats) -> bool {
        if is_list_item(prev) || is_list_item(curr) {
            return false;
        }
        let Some(first) = curr.chars().next() else {
            return false;
        };

        if first.is_lowercase() {
            return true;
        }

        if !matches!(
            last_significant_char(prev),
            Some('.' | '!' | '?' | ':' | ';')
        ) {
            return true;
        }

        let prev_is_short = stats.median_line_length > 0.0
            && (prev.chars().count() as f32)
                < stats.median_line_length * self.config.short_line_ratio;
        let opens_new_unit = first.is_uppercase() || is_opening_mark(first);
        prev_is_short && !opens_new_unit
    }
}

fn is_opening_mark(c: char) -> bool {
    matches!(
        c,
        '"' | '\'' | '“' | '‘' | '«' | '(' | '[' | '{'
    )
}
