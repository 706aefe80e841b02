//! Pipelines.
//!
//! Document-level operations assembled from the chunking and annotation
//! building blocks. Currently a single pipeline is implemented, turning a
//! document into a validated synset sequence.
pub mod synsets;

pub use synsets::{SynsetEntry, SynsetOutcome, SynsetPipeline};
