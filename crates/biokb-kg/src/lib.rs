//! Relation extraction for the biomedical knowledge base.
//!
//! A [`RelationExtractor`] turns one sentence into subject-predicate-object
//! triples. Extractors are obtained through an [`ExtractorSession`], which is
//! acquired once per run and released when the run ends, whether it
//! succeeded or not.

mod extractor;
pub mod openie;
pub mod pattern;
pub mod session;

pub use extractor::RelationExtractor;
pub use openie::OpenIeExtractor;
pub use pattern::PatternExtractor;
pub use session::{ExtractorBackend, ExtractorSession, ServerLaunch, SessionConfig};

pub type Result<T> = std::result::Result<T, RelationError>;

#[derive(Debug, thiserror::Error)]
pub enum RelationError {
    #[error("Relation extraction service error: {0}")]
    Service(String),

    #[error("Relation extraction service unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to launch relation extraction server: {0}")]
    Launch(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Ner(#[from] biokb_ner::NerError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
