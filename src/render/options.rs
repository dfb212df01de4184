//! Rendering options and configuration.

use super::{CleanupOptions, CleanupPreset};
use crate::layout::HeadingConfig;

/// Options for cleaning and reconstructing page text.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Header scoring weights and threshold
    pub heading: HeadingConfig,

    /// Character repeated around header text (`#` renders `## TITLE ##`)
    pub heading_marker: char,

    /// Join paragraph lines with newlines instead of spaces, keeping every
    /// line the merge policy chose not to merge on its own line
    pub preserve_line_breaks: bool,

    /// Artifact cleanup applied to raw page text (None = no cleanup)
    pub cleanup: Option<CleanupOptions>,

    /// Collect reconstruction statistics
    pub collect_stats: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the heading configuration.
    pub fn with_heading_config(mut self, config: HeadingConfig) -> Self {
        self.heading = config;
        self
    }

    /// Set the header marker character.
    pub fn with_heading_marker(mut self, marker: char) -> Self {
        self.heading_marker = marker;
        self
    }

    /// Enable or disable line break preservation.
    pub fn with_line_breaks(mut self, preserve: bool) -> Self {
        self.preserve_line_breaks = preserve;
        self
    }

    /// Set cleanup options.
    pub fn with_cleanup(mut self, cleanup: CleanupOptions) -> Self {
        self.cleanup = Some(cleanup);
        self
    }

    /// Set cleanup preset.
    pub fn with_cleanup_preset(mut self, preset: CleanupPreset) -> Self {
        self.cleanup = Some(CleanupOptions::from_preset(preset));
        self
    }

    /// Disable artifact cleanup.
    pub fn without_cleanup(mut self) -> Self {
        self.cleanup = None;
        self
    }

    /// Enable statistics collection during reconstruction.
    pub fn with_stats(mut self, collect: bool) -> Self {
        self.collect_stats = collect;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            heading: HeadingConfig::default(),
            heading_marker: '#',
            preserve_line_breaks: false,
            cleanup: Some(CleanupOptions::default()),
            collect_stats: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_options_builder() {
        let options = RenderOptions::new()
            .with_heading_marker('=')
            .with_line_breaks(true)
            .with_cleanup_preset(CleanupPreset::Minimal)
            .with_stats(true);

        assert_eq!(options.heading_marker, '=');
        assert!(options.preserve_line_breaks);
        assert_eq!(options.cleanup, Some(CleanupOptions::minimal()));
        assert!(options.collect_stats);
    }

    #[test]
    fn test_render_options_defaults() {
        let options = RenderOptions::default();
        assert_eq!(options.heading_marker, '#');
        assert!(!options.preserve_line_breaks);
        assert_eq!(options.cleanup, Some(CleanupOptions::standard()));
        assert!(RenderOptions::new().without_cleanup().cleanup.is_none());
    }
}
