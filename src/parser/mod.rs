//! Structure inference: plain résumé text to a block document.

mod cleanup;
mod inferencer;
mod options;
mod vocabulary;

pub use cleanup::{CleanupOptions, CleanupPipeline, CleanupPreset};
pub use inferencer::{infer, StructureInferencer};
pub use options::{InferOptions, DEFAULT_TITLE_MAX_LEN};
pub use vocabulary::{SectionVocabulary, DEFAULT_SECTIONS};
