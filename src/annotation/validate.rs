//! Knowledge-base validation of consolidated annotations.
use log::error;

use super::candidate::Candidate;
use super::service::KnowledgeBase;

/// Drops consolidated entries whose synset does not resolve in the
/// knowledge base.
///
/// Validation is one existence lookup per entry; failed lookups count as
/// misses and are not retried. Each drop is logged with the matched text
/// so the mismatch can be diagnosed after the fact. Order is preserved.
pub struct Validator<'a, K: KnowledgeBase + ?Sized> {
    kb: &'a K,
}

impl<'a, K: KnowledgeBase + ?Sized> Validator<'a, K> {
    pub fn new(kb: &'a K) -> Self {
        Self { kb }
    }

    /// Keep the entries that resolve in the knowledge base.
    pub async fn retain_resolved(&self, entries: Vec<Candidate>) -> Vec<Candidate> {
        let mut kept = Vec::with_capacity(entries.len());
        for entry in entries {
            if self.resolves(&entry).await {
                kept.push(entry);
            }
        }
        kept
    }

    async fn resolves(&self, entry: &Candidate) -> bool {
        match self.kb.resolve(entry.synset_id()).await {
            Ok(true) => true,
            Ok(false) => {
                error!(
                    "the text [{}] annotated as [{}] does not exist in the knowledge base",
                    entry.text(),
                    entry.synset_id()
                );
                false
            }
            Err(e) => {
                error!(
                    "the text [{}] annotated as [{}] could not be checked: {}",
                    entry.text(),
                    entry.synset_id(),
                    e
                );
                false
            }
        }
    }
}
