/*! Service boundaries.

The annotation service and the knowledge base are remote collaborators.
They are modeled as explicitly constructed, injectable trait handles so
that pipelines can be exercised against fakes without touching any
process-wide state.
!*/
use async_trait::async_trait;
use oxilangtag::LanguageTag;
use serde::Deserialize;

/// Per-query failure classification.
///
/// Each variant maps to a different pipeline reaction: quota exhaustion
/// suspends and retries the same chunk, an unsupported language aborts the
/// whole document, anything else skips the offending chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The daily request quota was hit; retry after the quota resets.
    QuotaExhausted,
    /// The service refuses the requested language; fatal for the document.
    UnsupportedLanguage(String),
    /// Network, parse, timeout or any other transient failure.
    Transient(String),
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryError::QuotaExhausted => write!(f, "daily request quota exhausted"),
            QueryError::UnsupportedLanguage(lang) => {
                write!(f, "language not supported by the service: {lang}")
            }
            QueryError::Transient(msg) => write!(f, "transient query failure: {msg}"),
        }
    }
}

impl From<reqwest::Error> for QueryError {
    fn from(e: reqwest::Error) -> QueryError {
        QueryError::Transient(e.to_string())
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(e: serde_json::Error) -> QueryError {
        QueryError::Transient(e.to_string())
    }
}

/// One raw annotation as returned by the service for a single chunk.
///
/// Offsets are inclusive character indices, local to the queried chunk.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawAnnotation {
    pub start: usize,
    pub end: usize,
    pub score: f64,
    pub synset_id: String,
}

/// Semantic annotation service (one query per chunk).
#[async_trait]
pub trait AnnotationService {
    /// Annotate `text`, returning chunk-local candidates.
    async fn annotate(
        &self,
        text: &str,
        lang: &LanguageTag<String>,
    ) -> Result<Vec<RawAnnotation>, QueryError>;
}

/// An outgoing hypernym relation of a synset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HypernymEdge {
    /// Synset id the edge points to.
    pub target: String,
    /// True for plain HYPERNYM pointers, false for the wider
    /// any-hypernym relation group.
    pub direct: bool,
}

/// Knowledge-base lookups.
#[async_trait]
pub trait KnowledgeBase {
    /// Whether the synset id resolves in the knowledge base.
    async fn resolve(&self, synset_id: &str) -> Result<bool, QueryError>;

    /// Whether the term has at least one synset in the given language.
    async fn contains_term(
        &self,
        term: &str,
        lang: &LanguageTag<String>,
    ) -> Result<bool, QueryError>;

    /// Outgoing hypernym edges of a synset.
    async fn hypernym_edges(&self, synset_id: &str) -> Result<Vec<HypernymEdge>, QueryError>;
}
