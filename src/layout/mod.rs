//! Layout analysis over plain page text.
//!
//! Works on trimmed lines only: per-page statistics ([`DocumentStats`]), a
//! weighted header scoring table ([`rules::HEADER_RULES`]), list-marker
//! detection and the soft-wrap merge policy ([`LineClassifier`]).

mod classifier;
mod config;
pub mod rules;
mod stats;

pub use classifier::{is_list_item, LineClassifier, LineKind};
pub use config::{
    HeadingConfig, DEFAULT_HEADER_THRESHOLD, LENIENT_HEADER_THRESHOLD, STRICT_HEADER_THRESHOLD,
};
pub use rules::{HeaderRule, LineContext, HEADER_RULES};
pub use stats::{median, DocumentStats};

/// Last character of a line, looking through closing quotes and brackets.
///
/// `He said "stop."` and `(see above.)` both end in `.` for punctuation checks.
pub(crate) fn last_significant_char(text: &str) -> Option<char> {
    text.trim_end()
        .trim_end_matches(['"', '\'', '”', '’', '»', ')', ']', '}'])
        .chars()
        .last()
}
