//! The header scoring table.
//!
//! Each [`HeaderRule`] pairs a pure predicate over a [`LineContext`] with the
//! [`HeadingConfig`] field holding its weight. The classifier sums the weights
//! of every rule that fires; nothing else contributes to a header score.

use std::sync::OnceLock;

use regex::Regex;

use super::{last_significant_char, DocumentStats, HeadingConfig};

/// Upper bound (exclusive) on words for the all-caps factor.
const ALL_CAPS_MAX_WORDS: usize = 11;
/// Lower bound on words for the all-caps and title-case factors.
const MIN_HEADING_WORDS: usize = 2;
/// Upper bound (inclusive) on words for the title-case factor.
const TITLE_CASE_MAX_WORDS: usize = 14;
/// Share of capitalized words that makes a line title-cased.
const TITLE_CASE_RATIO: f32 = 0.7;
/// Lines this long or longer never get the missing-punctuation factor.
const NO_TERMINAL_MAX_LEN: usize = 100;
/// Lines this long or longer never get the colon factor.
const COLON_MAX_LEN: usize = 50;

/// Words that open structural headings.
pub const STRUCTURAL_KEYWORDS: &[&str] = &[
    "abstract",
    "acknowledgements",
    "acknowledgments",
    "annex",
    "appendix",
    "article",
    "background",
    "bibliography",
    "chapter",
    "conclusion",
    "conclusions",
    "contents",
    "discussion",
    "foreword",
    "glossary",
    "index",
    "introduction",
    "methodology",
    "methods",
    "overview",
    "part",
    "preface",
    "references",
    "results",
    "section",
    "summary",
    "table of contents",
];

/// Everything a rule may look at when scoring one line.
#[derive(Debug, Clone, Copy)]
pub struct LineContext<'a> {
    /// The trimmed line
    pub text: &'a str,
    /// Statistics of the page the line belongs to
    pub stats: &'a DocumentStats,
    /// Previous non-empty line
    pub prev: Option<&'a str>,
    /// Next non-empty line
    pub next: Option<&'a str>,
    /// Active weights and cutoffs
    pub config: &'a HeadingConfig,
}

impl<'a> LineContext<'a> {
    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// One weighted entry of the scoring table.
#[derive(Clone, Copy)]
pub struct HeaderRule {
    /// Stable rule name, reported by [`super::LineClassifier::explain`]
    pub name: &'static str,
    /// Whether the rule fires for a line
    pub predicate: fn(&LineContext<'_>) -> bool,
    /// Signed contribution when the rule fires
    pub weight: fn(&HeadingConfig) -> f32,
}

impl std::fmt::Debug for HeaderRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeaderRule").field("name", &self.name).finish()
    }
}

/// The scoring table, in evaluation order.
pub const HEADER_RULES: &[HeaderRule] = &[
    HeaderRule {
        name: "short_line",
        predicate: is_short_line,
        weight: |c| c.short_line_weight,
    },
    HeaderRule {
        name: "all_caps",
        predicate: is_all_caps_heading,
        weight: |c| c.all_caps_weight,
    },
    HeaderRule {
        name: "title_case",
        predicate: is_title_case,
        weight: |c| c.title_case_weight,
    },
    HeaderRule {
        name: "no_terminal_punctuation",
        predicate: lacks_terminal_punctuation,
        weight: |c| c.no_terminal_weight,
    },
    HeaderRule {
        name: "colon_ending",
        predicate: ends_with_colon,
        weight: |c| c.colon_weight,
    },
    HeaderRule {
        name: "numbered_heading",
        predicate: has_numbered_prefix,
        weight: |c| c.numbered_weight,
    },
    HeaderRule {
        name: "outline_number",
        predicate: has_outline_number,
        weight: |c| c.outline_number_weight,
    },
    HeaderRule {
        name: "structural_keyword",
        predicate: starts_with_keyword,
        weight: |c| c.keyword_weight,
    },
    HeaderRule {
        name: "isolated",
        predicate: is_isolated,
        weight: |c| c.isolation_boost,
    },
    HeaderRule {
        name: "embedded",
        predicate: is_embedded,
        weight: |c| -c.embedded_penalty,
    },
    HeaderRule {
        name: "mid_sentence",
        predicate: is_mid_sentence,
        weight: |c| -c.continuation_penalty,
    },
];

fn numbered_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:\d{1,3}[.)]?|[IVXLC]{1,6}[.)]|[A-Z][.)]|§\s*\d+[.)]?)\s+\p{L}").unwrap()
    })
}

fn outline_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d{1,3}(?:\.\d{1,3})+\.?\s+\p{L}").unwrap())
}

fn numbering_prefix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:\d{1,3}(?:\.\d{1,3})*[.)]?|[IVXLC]{1,6}[.)]|[A-Z][.)]|§\s*\d+[.)]?)\s+")
            .unwrap()
    })
}

/// Shorter than `short_line_ratio` × the page median.
pub fn is_short_line(ctx: &LineContext<'_>) -> bool {
    let median = ctx.stats.median_line_length;
    median > 0.0 && (ctx.len() as f32) < median * ctx.config.short_line_ratio
}

/// All letters uppercase with at least two and fewer than eleven words.
///
/// A single all-caps word is usually an acronym, not a heading.
pub fn is_all_caps_heading(ctx: &LineContext<'_>) -> bool {
    let words = ctx.word_count();
    if !(MIN_HEADING_WORDS..ALL_CAPS_MAX_WORDS).contains(&words) {
        return false;
    }
    let mut letters = ctx.text.chars().filter(|c| c.is_alphabetic()).peekable();
    letters.peek().is_some() && letters.all(char::is_uppercase)
}

/// At least 70% of 2-14 words capitalized, no sentence punctuation at the end.
pub fn is_title_case(ctx: &LineContext<'_>) -> bool {
    let words: Vec<&str> = ctx.text.split_whitespace().collect();
    if !(MIN_HEADING_WORDS..=TITLE_CASE_MAX_WORDS).contains(&words.len()) {
        return false;
    }
    if matches!(last_significant_char(ctx.text), Some('.' | '!' | '?')) {
        return false;
    }
    let capitalized = words
        .iter()
        .filter(|w| w.chars().next().is_some_and(char::is_uppercase))
        .count();
    capitalized as f32 / words.len() as f32 >= TITLE_CASE_RATIO
}

/// No terminal punctuation and under 100 characters.
///
/// Ignored on pages that almost never end lines with sentence punctuation,
/// where the signal says nothing about headers.
pub fn lacks_terminal_punctuation(ctx: &LineContext<'_>) -> bool {
    if ctx.stats.sentence_ending_ratio < ctx.config.min_sentence_ending_ratio {
        return false;
    }
    ctx.len() < NO_TERMINAL_MAX_LEN
        && !matches!(
            last_significant_char(ctx.text),
            Some('.' | '!' | '?' | ';' | ',' | ':')
        )
}

/// Ends with a colon and under 50 characters.
pub fn ends_with_colon(ctx: &LineContext<'_>) -> bool {
    if ctx.stats.colon_ending_ratio > ctx.config.max_colon_ending_ratio {
        return false;
    }
    ctx.text.ends_with(':') && ctx.len() < COLON_MAX_LEN
}

/// `1. Scope`, `IV. Results`, `B) Terms`, `§ 3 Liability`.
pub fn has_numbered_prefix(ctx: &LineContext<'_>) -> bool {
    numbered_regex().is_match(ctx.text)
}

/// `2.1 Scope`, `3.4.1. Limits`.
pub fn has_outline_number(ctx: &LineContext<'_>) -> bool {
    outline_regex().is_match(ctx.text)
}

/// Starts with a structural keyword once any numbering prefix is removed.
pub fn starts_with_keyword(ctx: &LineContext<'_>) -> bool {
    let body = numbering_prefix_regex().replace(ctx.text, "");
    let body = body.to_lowercase();
    STRUCTURAL_KEYWORDS.iter().any(|kw| {
        body.strip_prefix(kw)
            .is_some_and(|rest| !rest.starts_with(|c: char| c.is_alphanumeric()))
    })
}

/// Stands alone: the next line is much longer and the previous one, if any,
/// closed its sentence.
pub fn is_isolated(ctx: &LineContext<'_>) -> bool {
    let Some(next) = ctx.next else {
        return false;
    };
    let longer = next.chars().count() as f32 >= ctx.len() as f32 * ctx.config.context_length_ratio;
    let after_break = ctx.prev.map_or(true, is_terminated);
    longer && after_break
}

/// Trails a much longer line that has not finished its sentence.
pub fn is_embedded(ctx: &LineContext<'_>) -> bool {
    let Some(prev) = ctx.prev else {
        return false;
    };
    !is_terminated(prev)
        && prev.chars().count() as f32 >= ctx.len() as f32 * ctx.config.context_length_ratio
}

/// Sits between an unterminated line and a lowercase continuation, like a
/// proper noun wrapped onto its own line.
pub fn is_mid_sentence(ctx: &LineContext<'_>) -> bool {
    let (Some(prev), Some(next)) = (ctx.prev, ctx.next) else {
        return false;
    };
    !is_terminated(prev) && next.chars().next().is_some_and(char::is_lowercase)
}

fn is_terminated(line: &str) -> bool {
    matches!(
        last_significant_char(line),
        Some('.' | '!' | '?' | ':' | ';')
    )
}
