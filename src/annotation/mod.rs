/*! Semantic annotation.

Everything needed to turn a document into knowledge-base concept
annotations: the service boundaries ([service::AnnotationService],
[service::KnowledgeBase]), the HTTP clients implementing them against
Babelfy/BabelNet, the quota backoff policy, and the span consolidation
that reconciles duplicate and overlapping annotations across chunk
boundaries.
!*/
pub mod babelfy;
pub mod babelnet;
pub mod backoff;
pub mod candidate;
pub mod consolidate;
pub mod hypernyms;
pub mod service;
pub mod validate;

pub use babelfy::BabelfyClient;
pub use babelnet::BabelnetClient;
pub use backoff::QuotaBackoff;
pub use candidate::Candidate;
pub use consolidate::SpanConsolidator;
pub use hypernyms::HypernymWalker;
pub use service::{AnnotationService, KnowledgeBase, QueryError, RawAnnotation};
pub use validate::Validator;
