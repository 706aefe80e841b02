//! Query-sized document chunker.
//!
//! Splitting prefers sentence terminators over whitespace over hard cuts,
//! so that the annotation service sees whole phrases whenever possible. No
//! overlap is introduced between chunks: an annotation whose true span
//! straddles a cut point can be truncated or missed by the service. This
//! is an accepted limitation of the splitting scheme.

/// Default maximum chunk size, in characters.
///
/// Matches the query-size limit of the annotation service.
pub const DEFAULT_MAX_CHUNK_CHARS: usize = 3000;

/// A bounded slice of the document, submitted in one annotation query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk<'a> {
    text: &'a str,
    base: usize,
}

impl<'a> Chunk<'a> {
    /// Get the chunk text.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Get the character offset of the chunk's first character in the
    /// whole document.
    pub fn base(&self) -> usize {
        self.base
    }
}

/// Splits documents into chunks of at most `max_chars` characters.
///
/// Concatenating the emitted chunks always reproduces the input exactly.
/// Only the final chunk may be shorter than `max_chars`; no chunk is ever
/// longer.
#[derive(Debug, Clone)]
pub struct Chunker {
    max_chars: usize,
}

impl Chunker {
    pub fn new(max_chars: usize) -> Self {
        assert!(max_chars >= 1, "chunk size must be at least one character");
        Self { max_chars }
    }

    /// Split `text` into query-sized chunks.
    ///
    /// While the remaining text is longer than the limit, the cut point is
    /// searched backward from the limit: the last sentence terminator
    /// (together with the whitespace run following it, while it fits),
    /// failing that the last whitespace, failing that a hard cut at
    /// exactly `max_chars` characters. The final remainder is emitted
    /// unconditionally, so an empty document yields one empty chunk.
    pub fn chunk<'a>(&self, text: &'a str) -> Vec<Chunk<'a>> {
        let mut chunks = Vec::new();
        let mut rest = text;
        let mut base = 0usize;

        loop {
            // byte index and char of the first max_chars + 1 characters;
            // a full window means the remainder is longer than the limit.
            let window: Vec<(usize, char)> =
                rest.char_indices().take(self.max_chars + 1).collect();
            if window.len() <= self.max_chars {
                break;
            }

            // last included character, as an index into the window
            let last = match Self::find_terminator(&window, self.max_chars) {
                Some(i) => i,
                None => match Self::find_whitespace(&window, self.max_chars) {
                    Some(i) => i,
                    // hard break inside a token, known degradation
                    None => self.max_chars - 1,
                },
            };

            let byte_end = window[last + 1].0;
            chunks.push(Chunk {
                text: &rest[..byte_end],
                base,
            });
            base += last + 1;
            rest = &rest[byte_end..];
        }

        chunks.push(Chunk { text: rest, base });
        chunks
    }

    /// Last sentence terminator within the first `max` window characters,
    /// extended over the whitespace run that follows it as long as the
    /// chunk stays within bounds.
    fn find_terminator(window: &[(usize, char)], max: usize) -> Option<usize> {
        let dot = (0..max).rev().find(|&i| window[i].1 == '.')?;
        let mut last = dot;
        while last + 1 < max && window[last + 1].1.is_whitespace() {
            last += 1;
        }
        Some(last)
    }

    fn find_whitespace(window: &[(usize, char)], max: usize) -> Option<usize> {
        (0..max).rev().find(|&i| window[i].1.is_whitespace())
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHUNK_CHARS)
    }
}
