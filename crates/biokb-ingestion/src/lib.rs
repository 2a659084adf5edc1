//! biokb-ingestion: from PubMed XML to knowledge base records.
//!
//! - [`sources`]: corpus readers (PubMed `PubmedArticleSet` XML)
//! - [`aggregator`]: merges every annotator's output for one sentence
//! - [`processor`]: turns one article into an [`biokb_common::ArticleRecord`]
//! - [`pipeline`]: runs the processor over a corpus on a bounded worker pool

pub mod aggregator;
pub mod models;
pub mod pipeline;
pub mod processor;
pub mod sources;

pub use aggregator::Aggregator;
pub use models::CorpusArticle;
pub use pipeline::{run_batch, ArticleOutcome, BatchProgress, BatchReport, BatchStats, PipelineOptions};
pub use processor::DocumentProcessor;
pub use sources::{CorpusSource, SourceError};

pub type Result<T> = std::result::Result<T, IngestionError>;

/// Failure while turning one article into a record.
#[derive(Debug, thiserror::Error)]
pub enum IngestionError {
    #[error(transparent)]
    Annotation(#[from] biokb_ner::NerError),

    #[error("Relation extraction failed: {0}")]
    Relation(#[from] biokb_kg::RelationError),
}
