/*! Span consolidation.

Chunk boundaries and re-querying frequently make the annotation service
report duplicate or near-duplicate annotations over the same surface text
at different confidences. The consolidator keeps exactly one
representative per contiguous span cluster, preferring the higher-scoring
or broader annotation.
!*/
use log::trace;

use super::candidate::Candidate;

/// Consolidates a stream of document-global [Candidate]s into an
/// insertion-ordered list, one candidate at a time.
///
/// The list is never re-sorted by offset: output order is arrival order,
/// with replacements happening in place.
#[derive(Debug, Default)]
pub struct SpanConsolidator {
    entries: Vec<Candidate>,
}

impl SpanConsolidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer one candidate to the list.
    ///
    /// The list is scanned linearly from the front and the scan stops at
    /// the first entry in a containment relation with the candidate, or at
    /// the last entry when there is none. Against that entry:
    /// - identical span with a higher score replaces it,
    /// - a candidate properly contained in it is discarded,
    /// - an entry properly contained in the candidate is replaced by it,
    /// - anything else (disjoint, partial overlap) appends the candidate.
    ///
    /// The scan is deliberately not an exhaustive overlap search: when
    /// several accepted entries could overlap the candidate from different
    /// directions, resolution happens against whichever entry the scan
    /// lands on. Kept as-is for compatibility with existing outputs.
    pub fn offer(&mut self, candidate: Candidate) {
        if self.entries.is_empty() {
            self.entries.push(candidate);
            return;
        }

        let mut pos = 0;
        while !self.entries[pos].contains(&candidate)
            && !candidate.contains(&self.entries[pos])
            && pos < self.entries.len() - 1
        {
            pos += 1;
        }

        let entry = &self.entries[pos];
        if entry.same_span(&candidate) && candidate.score() > entry.score() {
            trace!(
                "replacing [{}] with higher-scoring [{}] over [{}, {}]",
                entry.synset_id(),
                candidate.synset_id(),
                candidate.start(),
                candidate.end()
            );
            self.entries[pos] = candidate;
        } else if entry.contains(&candidate) {
            // covers the identical span with a lower or equal score too
            trace!(
                "discarding [{}], contained in accepted [{}]",
                candidate.synset_id(),
                entry.synset_id()
            );
        } else if candidate.contains(entry) {
            trace!(
                "replacing [{}] with broader [{}]",
                entry.synset_id(),
                candidate.synset_id()
            );
            self.entries[pos] = candidate;
        } else {
            self.entries.push(candidate);
        }
    }

    /// Number of accepted entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the accepted entries, in insertion/replacement order.
    pub fn entries(&self) -> &[Candidate] {
        &self.entries
    }

    /// Consume the consolidator, yielding the accepted entries.
    pub fn into_entries(self) -> Vec<Candidate> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cand(start: usize, end: usize, score: f64, id: &str) -> Candidate {
        Candidate::new(start, end, score, id.into(), format!("t{start}-{end}"))
    }

    fn spans(c: &SpanConsolidator) -> Vec<(usize, usize)> {
        c.entries().iter().map(|e| (e.start(), e.end())).collect()
    }

    #[test]
    fn test_identical_span_keeps_higher_score() {
        let mut c = SpanConsolidator::new();
        c.offer(cand(5, 9, 0.3, "bn:1"));
        c.offer(cand(5, 9, 0.8, "bn:2"));

        assert_eq!(c.len(), 1);
        assert_eq!(c.entries()[0].score(), 0.8);
        assert_eq!(c.entries()[0].synset_id(), "bn:2");
    }

    #[test]
    fn test_identical_span_keeps_first_on_lower_score() {
        let mut c = SpanConsolidator::new();
        c.offer(cand(5, 9, 0.8, "bn:1"));
        c.offer(cand(5, 9, 0.3, "bn:2"));

        assert_eq!(c.len(), 1);
        assert_eq!(c.entries()[0].synset_id(), "bn:1");
    }

    #[test]
    fn test_contained_candidate_discarded() {
        let mut c = SpanConsolidator::new();
        c.offer(cand(3, 12, 0.4, "bn:broad"));
        c.offer(cand(5, 10, 0.9, "bn:narrow"));

        assert_eq!(spans(&c), vec![(3, 12)]);
        assert_eq!(c.entries()[0].synset_id(), "bn:broad");
        assert_eq!(c.entries()[0].score(), 0.4);
    }

    #[test]
    fn test_containing_candidate_replaces() {
        let mut c = SpanConsolidator::new();
        c.offer(cand(5, 10, 0.9, "bn:narrow"));
        c.offer(cand(3, 12, 0.4, "bn:broad"));

        assert_eq!(spans(&c), vec![(3, 12)]);
        assert_eq!(c.entries()[0].synset_id(), "bn:broad");
    }

    #[test]
    fn test_disjoint_candidates_kept_in_arrival_order() {
        let mut c = SpanConsolidator::new();
        c.offer(cand(10, 14, 0.2, "bn:b"));
        c.offer(cand(0, 2, 0.9, "bn:a"));

        assert_eq!(spans(&c), vec![(10, 14), (0, 2)]);
    }

    #[test]
    fn test_partial_overlap_appends() {
        let mut c = SpanConsolidator::new();
        c.offer(cand(0, 5, 0.5, "bn:a"));
        c.offer(cand(3, 8, 0.5, "bn:b"));

        assert_eq!(spans(&c), vec![(0, 5), (3, 8)]);
    }

    #[test]
    fn test_scan_stops_at_first_containment() {
        let mut c = SpanConsolidator::new();
        c.offer(cand(0, 2, 0.5, "bn:a"));
        c.offer(cand(20, 30, 0.5, "bn:b"));
        // contained in the second entry, not the first scanned one
        c.offer(cand(22, 25, 0.9, "bn:c"));

        assert_eq!(spans(&c), vec![(0, 2), (20, 30)]);
        assert_eq!(c.entries()[1].synset_id(), "bn:b");
    }

    #[test]
    fn test_unrelated_candidate_resolves_against_last_entry() {
        // The scan terminates at the last element even without any
        // containment relation; a candidate containing no entry and
        // contained in none is appended.
        let mut c = SpanConsolidator::new();
        c.offer(cand(0, 2, 0.5, "bn:a"));
        c.offer(cand(10, 12, 0.5, "bn:b"));
        c.offer(cand(40, 45, 0.5, "bn:c"));

        assert_eq!(spans(&c), vec![(0, 2), (10, 12), (40, 45)]);
    }
}
