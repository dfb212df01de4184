//! Artifact cleanup for raw page text.
//!
//! Runs before reconstruction, while the original line breaks are still in
//! place: page-number stripping is line-anchored and hyphenation repair needs
//! the real wrap positions.

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Cleanup preset levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleanupPreset {
    /// Minimal cleanup: form feeds, lone page numbers, control characters,
    /// whitespace, NFC
    Minimal,
    /// Standard cleanup: every artifact pass plus ligature repair
    #[default]
    Standard,
    /// Aggressive cleanup: Standard plus PUA removal and bullet standardization
    Aggressive,
}

/// Options for text cleanup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupOptions {
    /// Normalize Unicode to NFC form
    pub normalize_unicode: bool,

    /// Remove `Page N of M` running footers
    pub remove_running_footers: bool,

    /// Rejoin words hyphenated across a line break
    pub fix_hyphenation: bool,

    /// Fix ligatures (fi, fl, etc.)
    pub fix_ligatures: bool,

    /// Remove Unicode replacement character (U+FFFD)
    pub remove_replacement_char: bool,

    /// Remove Private Use Area (PUA) characters
    pub remove_pua: bool,

    /// Standardize bullet characters (●, ○, ■ → •)
    pub standardize_bullets: bool,

    /// Collapse runs of spaces and tabs to one space
    pub collapse_whitespace: bool,
}

impl CleanupOptions {
    /// Create options from a preset.
    pub fn from_preset(preset: CleanupPreset) -> Self {
        match preset {
            CleanupPreset::Minimal => Self::minimal(),
            CleanupPreset::Standard => Self::standard(),
            CleanupPreset::Aggressive => Self::aggressive(),
        }
    }

    /// Minimal cleanup options.
    pub fn minimal() -> Self {
        Self {
            normalize_unicode: true,
            remove_running_footers: false,
            fix_hyphenation: false,
            fix_ligatures: false,
            remove_replacement_char: false,
            remove_pua: false,
            standardize_bullets: false,
            collapse_whitespace: true,
        }
    }

    /// Standard cleanup options.
    pub fn standard() -> Self {
        Self {
            normalize_unicode: true,
            remove_running_footers: true,
            fix_hyphenation: true,
            fix_ligatures: true,
            remove_replacement_char: true,
            remove_pua: false,
            standardize_bullets: false,
            collapse_whitespace: true,
        }
    }

    /// Aggressive cleanup options.
    pub fn aggressive() -> Self {
        Self {
            remove_pua: true,
            standardize_bullets: true,
            ..Self::standard()
        }
    }
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self::standard()
    }
}

/// Ordered artifact-stripping passes.
///
/// Line-ending normalization, form-feed removal, lone page-number removal
/// and control-character stripping always run, whatever the options say.
#[derive(Debug, Clone)]
pub struct CleanupPipeline {
    options: CleanupOptions,
    running_footer_regex: Regex,
    page_number_regex: Regex,
    hyphenation_regex: Regex,
    whitespace_regex: Regex,
    ligature_map: Vec<(&'static str, &'static str)>,
}

impl CleanupPipeline {
    /// Create a new cleanup pipeline with the given options.
    pub fn new(options: CleanupOptions) -> Self {
        Self {
            options,
            running_footer_regex: Regex::new(
                r"(?im)^[ \t]*page[ \t]+\d+(?:[ \t]*(?:of|/)[ \t]*\d+)?[ \t]*$\n?",
            )
            .unwrap(),
            page_number_regex: Regex::new(r"(?m)^[ \t]*[-–—]?[ \t]*\d+[ \t]*[-–—]?[ \t]*$\n?")
                .unwrap(),
            hyphenation_regex: Regex::new(r"(\p{L})-[ \t]*\n[ \t]*(\p{Ll})").unwrap(),
            whitespace_regex: Regex::new(r"[ \t\u{00A0}]+").unwrap(),
            ligature_map: vec![
                ("\u{FB00}", "ff"),  // ﬀ
                ("\u{FB01}", "fi"),  // ﬁ
                ("\u{FB02}", "fl"),  // ﬂ
                ("\u{FB03}", "ffi"), // ﬃ
                ("\u{FB04}", "ffl"), // ﬄ
                ("\u{FB05}", "st"),  // ﬅ (long s + t)
                ("\u{FB06}", "st"),  // ﬆ
            ],
        }
    }

    /// Create a pipeline from a preset.
    pub fn from_preset(preset: CleanupPreset) -> Self {
        Self::new(CleanupOptions::from_preset(preset))
    }

    /// Active options.
    pub fn options(&self) -> &CleanupOptions {
        &self.options
    }

    /// Process raw page text through the cleanup passes.
    pub fn process(&self, text: &str) -> String {
        // Line endings first: every later pass is line-anchored
        let mut result = text.replace("\r\n", "\n").replace('\r', "\n");

        if self.options.normalize_unicode {
            result = result.nfc().collect();
        }

        // Form feeds mark page boundaries; keep the boundary as a line break
        result = result.replace('\u{000C}', "\n");

        if self.options.remove_running_footers {
            result = self
                .running_footer_regex
                .replace_all(&result, "")
                .into_owned();
        }

        // Removed lines take their newline with them so a word split around
        // a page number still meets its other half
        result = self.page_number_regex.replace_all(&result, "").into_owned();

        result = strip_control_chars(&result);

        if self.options.fix_ligatures {
            for (ligature, replacement) in &self.ligature_map {
                result = result.replace(ligature, replacement);
            }
        }

        if self.options.remove_replacement_char {
            result = result.replace('\u{FFFD}', "");
        }

        if self.options.remove_pua {
            result = remove_pua_chars(&result);
        }

        if self.options.standardize_bullets {
            result = standardize_bullets(&result);
        }

        if self.options.fix_hyphenation {
            result = self
                .hyphenation_regex
                .replace_all(&result, "$1$2")
                .into_owned();
        }

        if self.options.collapse_whitespace {
            result = self.whitespace_regex.replace_all(&result, " ").into_owned();
        }

        result
    }
}

impl Default for CleanupPipeline {
    fn default() -> Self {
        Self::new(CleanupOptions::default())
    }
}

fn strip_control_chars(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

fn remove_pua_chars(text: &str) -> String {
    text.chars()
        .filter(|c| {
            let code = *c as u32;
            !(0xE000..=0xF8FF).contains(&code)
                && !(0xF0000..=0xFFFFD).contains(&code)
                && !(0x100000..=0x10FFFD).contains(&code)
        })
        .collect()
}

fn standardize_bullets(text: &str) -> String {
    let bullets = ['●', '○', '■', '□', '◆', '◇', '▪', '▫', '►', '▻'];
    text.chars()
        .map(|c| if bullets.contains(&c) { '•' } else { c })
        .collect()
}
