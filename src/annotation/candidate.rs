//! Annotation candidates.
use serde::{Deserialize, Serialize};

/// One annotation over the document, before or after consolidation.
///
/// `start` and `end` are inclusive character offsets into the
/// document-global text. A candidate is immutable once built, but may be
/// replaced wholesale in the consolidation list by a later, better one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    start: usize,
    end: usize,
    score: f64,
    synset_id: String,
    text: String,
}

impl Candidate {
    pub fn new(start: usize, end: usize, score: f64, synset_id: String, text: String) -> Self {
        Self {
            start,
            end,
            score,
            synset_id,
            text,
        }
    }

    /// Inclusive start offset (characters, document-global).
    pub fn start(&self) -> usize {
        self.start
    }

    /// Inclusive end offset (characters, document-global).
    pub fn end(&self) -> usize {
        self.end
    }

    /// Confidence reported by the annotation service, higher is better.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Get a reference to the knowledge-base concept key.
    pub fn synset_id(&self) -> &str {
        &self.synset_id
    }

    /// Get a reference to the surface text the annotation covers.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether `other`'s span is fully contained in this candidate's span.
    pub fn contains(&self, other: &Candidate) -> bool {
        other.start >= self.start && other.end <= self.end
    }

    /// Whether both candidates cover exactly the same span.
    pub fn same_span(&self, other: &Candidate) -> bool {
        self.start == other.start && self.end == other.end
    }

    pub fn into_parts(self) -> (String, String) {
        (self.synset_id, self.text)
    }
}

/// Extract the inclusive character span `[start, end]` from `text`.
///
/// Returns [None] when the span falls outside the text.
pub fn char_span(text: &str, start: usize, end: usize) -> Option<String> {
    if start > end {
        return None;
    }
    let extracted: String = text.chars().skip(start).take(end - start + 1).collect();
    // chars() silently stops at the end of the text, so check the length
    if extracted.chars().count() == end - start + 1 {
        Some(extracted)
    } else {
        None
    }
}
