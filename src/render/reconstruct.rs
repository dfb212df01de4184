//! Block assembly and rendering of page text.

use std::sync::OnceLock;

use regex::Regex;

use crate::layout::{DocumentStats, LineClassifier, LineKind};
use crate::model::{split_lines, Block, BlockKind, Line};

use super::{CleanupPipeline, ReconstructionStats, RenderOptions, RenderResult};

/// Clean and reconstruct one page of raw text.
pub fn reconstruct(text: &str, options: &RenderOptions) -> String {
    DocumentReconstructor::new(options.clone())
        .reconstruct(text)
        .content
}

/// Clean and reconstruct one page of raw text, with statistics.
pub fn reconstruct_with_stats(text: &str, options: &RenderOptions) -> RenderResult {
    let options = options.clone().with_stats(true);
    DocumentReconstructor::new(options).reconstruct(text)
}

fn excess_newlines_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{3,}").unwrap())
}

/// Rebuilds headers, lists and paragraphs from the lines of one page.
///
/// Statistics are page-scoped: every line is scored against the stats of the
/// page it came from. The reconstructor holds no per-page state, so one
/// instance can serve pages on several threads.
#[derive(Debug, Clone)]
pub struct DocumentReconstructor {
    options: RenderOptions,
    classifier: LineClassifier,
    cleanup: Option<CleanupPipeline>,
}

impl DocumentReconstructor {
    /// Create a new reconstructor.
    pub fn new(options: RenderOptions) -> Self {
        let classifier = LineClassifier::new(options.heading.clone());
        let cleanup = options.cleanup.clone().map(CleanupPipeline::new);
        Self {
            options,
            classifier,
            cleanup,
        }
    }

    /// Active options.
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Clean raw page text, then assemble and render its blocks.
    pub fn reconstruct(&self, raw: &str) -> RenderResult {
        let cleaned = match &self.cleanup {
            Some(pipeline) => pipeline.process(raw),
            None => raw.to_string(),
        };

        let lines = split_lines(&cleaned);
        let mut stats = ReconstructionStats::new();
        let blocks = self.assemble(&lines, &mut stats);
        let content = self.render_blocks(&blocks);

        stats.page_count = 1;
        if self.options.collect_stats {
            stats.count_text(&content);
        }
        RenderResult::new(content, stats)
    }

    /// Group lines into blocks in a single left-to-right pass.
    ///
    /// Every line lands in exactly one block, blocks keep line order and no
    /// empty block is emitted.
    pub fn assemble(&self, lines: &[Line], stats: &mut ReconstructionStats) -> Vec<Block> {
        let doc_stats = DocumentStats::from_lines(lines);
        let mut blocks = Vec::new();
        let mut open = Block::paragraph();

        for (index, line) in lines.iter().enumerate() {
            let text = line.text.as_str();

            match self.classifier.classify(lines, index, &doc_stats) {
                LineKind::Header { level } => {
                    flush(&mut blocks, &mut open, stats);
                    stats.header_count += 1;
                    blocks.push(Block::header(text, level));
                }
                LineKind::ListItem => {
                    if !open.is_list() {
                        flush(&mut blocks, &mut open, stats);
                        open = Block::list();
                    }
                    stats.list_item_count += 1;
                    open.push(text);
                }
                LineKind::Text => {
                    if open.is_list() {
                        flush(&mut blocks, &mut open, stats);
                    }
                    let merge = open.last_line().is_some_and(|prev| {
                        self.classifier
                            .should_merge_with_previous(prev, text, &doc_stats)
                    });
                    if merge {
                        stats.merged_line_count += 1;
                        open.merge_into_last(text);
                    } else {
                        open.push(text);
                    }
                }
            }
        }
        flush(&mut blocks, &mut open, stats);

        blocks
    }

    /// Render blocks separated by blank lines.
    pub fn render_blocks(&self, blocks: &[Block]) -> String {
        let joined = blocks
            .iter()
            .filter(|b| !b.is_empty())
            .map(|b| self.render_block(b))
            .collect::<Vec<_>>()
            .join("\n\n");

        excess_newlines_regex()
            .replace_all(&joined, "\n\n")
            .trim()
            .to_string()
    }

    fn render_block(&self, block: &Block) -> String {
        match block.kind {
            BlockKind::Header { level } => {
                let marker = self.options.heading_marker.to_string().repeat(level as usize);
                format!(
                    "\n{} {} {}\n",
                    marker,
                    block.lines.join(" ").to_uppercase(),
                    marker
                )
            }
            BlockKind::List => block.lines.join("\n"),
            BlockKind::Paragraph => {
                let separator = if self.options.preserve_line_breaks {
                    "\n"
                } else {
                    " "
                };
                block.lines.join(separator)
            }
        }
    }
}

impl Default for DocumentReconstructor {
    fn default() -> Self {
        Self::new(RenderOptions::default())
    }
}

/// Move the open block into `blocks` if it holds anything, leaving an empty
/// paragraph open.
fn flush(blocks: &mut Vec<Block>, open: &mut Block, stats: &mut ReconstructionStats) {
    let block = std::mem::replace(open, Block::paragraph());
    if block.is_empty() {
        return;
    }
    match block.kind {
        BlockKind::List => stats.list_count += 1,
        BlockKind::Paragraph => stats.paragraph_count += 1,
        BlockKind::Header { .. } => {}
    }
    blocks.push(block);
}
