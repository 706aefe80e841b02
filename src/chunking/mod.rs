//! Document chunking.
//!
//! The annotation service bounds the size of a single query, so documents
//! are split into chunks before querying. Chunks carry the character
//! offset of their first character so that chunk-local annotation offsets
//! can be translated back to document-global ones.
mod chunker;

pub use chunker::{Chunk, Chunker, DEFAULT_MAX_CHUNK_CHARS};
