pub mod annotation;
pub mod chunking;
pub mod error;
pub mod lang;
pub mod pipelines;
