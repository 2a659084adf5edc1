//! Biomedical annotation services for the knowledge base pipeline.
//!
//! Provides the [`Annotator`] abstraction, the fixed [`AnnotatorPool`] that
//! runs every domain model over a sentence, and the [`Segmenter`] that splits
//! abstracts into sentences using one canonical annotator.
//!
//! Two annotator backends ship with the crate:
//! - [`LexiconAnnotator`]: offline gazetteer matching plus rule-based
//!   tokenization, tagging and lemmatization.
//! - [`CoreNlpAnnotator`]: client of a CoreNLP-compatible annotation server.

mod annotator;
pub mod corenlp;
mod entity_types;
mod gazetteer;
mod lexicon;
mod pool;
pub mod rules;
mod segmenter;

pub use annotator::{Annotation, Annotator, Domain, NerEntity, Word};
pub use corenlp::{CoreNlpAnnotator, CoreNlpClient};
pub use entity_types::{normalize_entity_label, EntityType};
pub use lexicon::{LexiconAnnotator, LexiconStats};
pub use pool::{AnnotatorPool, BUILTIN_MODELS};
pub use segmenter::Segmenter;

pub type Result<T> = std::result::Result<T, NerError>;

#[derive(Debug, thiserror::Error)]
pub enum NerError {
    #[error("Model loading failed: {0}")]
    ModelLoad(String),

    #[error("Annotation service error: {0}")]
    Service(String),

    #[error("Annotator '{annotator}' failed: {source}")]
    Annotator {
        annotator: String,
        #[source]
        source: Box<NerError>,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NerError {
    /// Attribute an error to the annotator that raised it.
    pub fn in_annotator(self, annotator: &str) -> Self {
        match self {
            e @ NerError::Annotator { .. } => e,
            other => NerError::Annotator {
                annotator: annotator.to_string(),
                source: Box::new(other),
            },
        }
    }
}
