/*! Document-to-synset-sequence pipeline.

Orchestrates one document's processing: chunking, one annotation query per
chunk under the quota backoff policy, translation of chunk-local offsets
to document-global ones, span consolidation, and knowledge-base
validation.

# Processing
1. The document is split into query-sized chunks.
1. Chunks are queried strictly in order; a quota-exhausted query suspends
   the whole operation until the next daily reset and then retries the
   *same* chunk, an unsupported language aborts the document, any other
   failure sacrifices the chunk's candidates and moves on.
1. Surviving candidates, with offsets translated to document coordinates,
   are fed one at a time into a single shared consolidator.
1. Consolidated entries that do not resolve in the knowledge base are
   dropped.
!*/
use std::sync::atomic::{AtomicU64, Ordering};

use log::{info, warn};
use oxilangtag::LanguageTag;
use tokio_util::sync::CancellationToken;

use super::types::{SynsetEntry, SynsetOutcome};
use crate::annotation::candidate::char_span;
use crate::annotation::validate::Validator;
use crate::annotation::{
    AnnotationService, Candidate, KnowledgeBase, QuotaBackoff, QueryError, SpanConsolidator,
};
use crate::chunking::Chunker;
use crate::error::Error;

/// Turns a document into a deduplicated, ordered, validated sequence of
/// synset annotations.
///
/// One pipeline owns its service handles; independent documents can be
/// processed concurrently by independent pipelines, but a single
/// document's processing is strictly sequential.
pub struct SynsetPipeline<A, K> {
    service: A,
    kb: K,
    chunker: Chunker,
    backoff: QuotaBackoff,
    /// Cumulative successful queries, for diagnostics only. Best-effort
    /// when observed concurrently; reset after every quota pause.
    queries: AtomicU64,
}

impl<A, K> SynsetPipeline<A, K>
where
    A: AnnotationService,
    K: KnowledgeBase,
{
    pub fn new(service: A, kb: K) -> Self {
        Self::with_chunker(service, kb, Chunker::default())
    }

    pub fn with_chunker(service: A, kb: K, chunker: Chunker) -> Self {
        Self {
            service,
            kb,
            chunker,
            backoff: QuotaBackoff::new(),
            queries: AtomicU64::new(0),
        }
    }

    /// Get a reference to the annotation-service handle.
    pub fn service(&self) -> &A {
        &self.service
    }

    /// Get a reference to the knowledge-base handle.
    pub fn kb(&self) -> &K {
        &self.kb
    }

    /// Successful queries since construction or the last quota pause.
    pub fn queries(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }

    /// Process one document.
    ///
    /// Never fails on service errors: they degrade the result instead
    /// (skipped chunks, dropped entries) or turn the whole outcome into
    /// [SynsetOutcome::Unsupported]. The only error surfaced is
    /// [Error::Interrupted], when `cancel` fires during a quota pause.
    pub async fn run(
        &self,
        text: &str,
        lang: &LanguageTag<String>,
        cancel: &CancellationToken,
    ) -> Result<SynsetOutcome, Error> {
        let doc_chars = text.chars().count();
        let chunks = self.chunker.chunk(text);
        let mut consolidator = SpanConsolidator::new();

        let mut current = 0;
        while current < chunks.len() {
            let chunk = &chunks[current];
            info!(
                "querying chunk {}/{}, lang {}, previous queries: {}",
                current + 1,
                chunks.len(),
                lang,
                self.queries()
            );

            match self.service.annotate(chunk.text(), lang).await {
                Ok(annotations) => {
                    self.queries.fetch_add(1, Ordering::Relaxed);
                    for raw in annotations {
                        self.consolidate(&mut consolidator, text, doc_chars, chunk.base(), raw);
                    }
                    current += 1;
                }
                Err(QueryError::QuotaExhausted) => {
                    // suspend, then retry the same chunk
                    self.backoff.wait_for_reset(cancel).await?;
                    self.queries.store(0, Ordering::Relaxed);
                }
                Err(QueryError::UnsupportedLanguage(msg)) => {
                    info!("document invalidated, language {lang} refused: {msg}");
                    return Ok(SynsetOutcome::Unsupported);
                }
                Err(QueryError::Transient(msg)) => {
                    warn!("skipping chunk {}: {}", current + 1, msg);
                    current += 1;
                }
            }
        }

        let validator = Validator::new(&self.kb);
        let entries = validator
            .retain_resolved(consolidator.into_entries())
            .await
            .into_iter()
            .map(SynsetEntry::from)
            .collect();

        Ok(SynsetOutcome::Sequence(entries))
    }

    /// Translate one raw annotation to document coordinates and offer it
    /// to the consolidator. Out-of-range offsets are dropped.
    fn consolidate(
        &self,
        consolidator: &mut SpanConsolidator,
        text: &str,
        doc_chars: usize,
        base: usize,
        raw: crate::annotation::RawAnnotation,
    ) {
        let start = base + raw.start;
        let end = base + raw.end;
        if end >= doc_chars || start > end {
            warn!(
                "dropping annotation [{}] with offsets [{start}, {end}] outside the document",
                raw.synset_id
            );
            return;
        }
        match char_span(text, start, end) {
            Some(matched) => {
                consolidator.offer(Candidate::new(start, end, raw.score, raw.synset_id, matched));
            }
            None => {
                warn!(
                    "dropping annotation [{}], span [{start}, {end}] not extractable",
                    raw.synset_id
                );
            }
        }
    }
}
