//! Cleaning, reconstruction and artifact rendering.

mod cleanup;
mod options;
mod reconstruct;
mod result;
mod transcript;

pub use cleanup::{CleanupOptions, CleanupPipeline, CleanupPreset};
pub use options::RenderOptions;
pub use reconstruct::{reconstruct, reconstruct_with_stats, DocumentReconstructor};
pub use result::{ReconstructionStats, RenderResult};
pub use transcript::{render_error_record, Transcript};
