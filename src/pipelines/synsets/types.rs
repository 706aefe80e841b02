//! Pipeline result types.
use serde::{Deserialize, Serialize};

use crate::annotation::Candidate;

/// One validated annotation of the final sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynsetEntry {
    synset_id: String,
    text: String,
}

impl SynsetEntry {
    pub fn new(synset_id: String, text: String) -> Self {
        Self { synset_id, text }
    }

    /// Get a reference to the knowledge-base concept key.
    pub fn synset_id(&self) -> &str {
        &self.synset_id
    }

    /// Get a reference to the surface text this synset matched.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl From<Candidate> for SynsetEntry {
    fn from(candidate: Candidate) -> Self {
        let (synset_id, text) = candidate.into_parts();
        Self { synset_id, text }
    }
}

/// Document-level result of the synset pipeline.
///
/// `Unsupported` marks the whole document as invalid for the caller: the
/// annotation service refused its language, and any candidates already
/// gathered have been discarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SynsetOutcome {
    Sequence(Vec<SynsetEntry>),
    Unsupported,
}

impl SynsetOutcome {
    pub fn is_unsupported(&self) -> bool {
        matches!(self, SynsetOutcome::Unsupported)
    }

    /// The validated entries, if the document was supported.
    pub fn entries(&self) -> Option<&[SynsetEntry]> {
        match self {
            SynsetOutcome::Sequence(entries) => Some(entries),
            SynsetOutcome::Unsupported => None,
        }
    }
}
