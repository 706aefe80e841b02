//! Synset sequence pipeline.
mod pipeline;
mod types;

pub use pipeline::SynsetPipeline;
pub use types::{SynsetEntry, SynsetOutcome};
