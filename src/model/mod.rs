//! Data model shared by extraction, reconstruction and batch processing.
//!
//! Backends produce [`Page`]s, the layout analyzer works on [`Line`]s, and the
//! reconstructor groups lines into [`Block`]s before rendering them to text.

mod block;
mod line;
mod page;

pub use block::{Block, BlockKind};
pub use line::{split_lines, Line};
pub use page::{ExtractionMethod, ExtractionResult, Page};
