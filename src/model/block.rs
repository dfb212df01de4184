//! Structural blocks assembled during reconstruction.

/// Kind of a reconstructed block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Structural heading with a nesting level (1-3)
    Header {
        /// Heading level derived from line length
        level: u8,
    },
    /// Run of list-marker-prefixed lines
    List,
    /// Prose rebuilt from soft line wraps
    Paragraph,
}

/// A contiguous run of lines sharing one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Block kind
    pub kind: BlockKind,

    /// Lines in source order
    pub lines: Vec<String>,
}

impl Block {
    /// Create an empty block of the given kind.
    pub fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            lines: Vec::new(),
        }
    }

    /// Create a header block holding a single line.
    pub fn header(text: impl Into<String>, level: u8) -> Self {
        Self {
            kind: BlockKind::Header {
                level: level.clamp(1, 3),
            },
            lines: vec![text.into()],
        }
    }

    /// Create an empty paragraph block.
    pub fn paragraph() -> Self {
        Self::new(BlockKind::Paragraph)
    }

    /// Create an empty list block.
    pub fn list() -> Self {
        Self::new(BlockKind::List)
    }

    /// Append a line.
    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Join `line` onto the last line with a single space.
    ///
    /// Falls back to [`Block::push`] when the block is empty.
    pub fn merge_into_last(&mut self, line: &str) {
        match self.lines.last_mut() {
            Some(last) => {
                last.push(' ');
                last.push_str(line);
            }
            None => self.push(line),
        }
    }

    /// Last line, if any.
    pub fn last_line(&self) -> Option<&str> {
        self.lines.last().map(String::as_str)
    }

    /// Check if the block holds no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether this is a list block.
    pub fn is_list(&self) -> bool {
        self.kind == BlockKind::List
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_into_last() {
        let mut block = Block::paragraph();
        block.merge_into_last("This is a sentence that");
        block.merge_into_last("continues here.");
        assert_eq!(block.lines, vec!["This is a sentence that continues here."]);
    }

    #[test]
    fn test_header_level_clamped() {
        let block = Block::header("Intro", 7);
        assert_eq!(block.kind, BlockKind::Header { level: 3 });
    }
}
