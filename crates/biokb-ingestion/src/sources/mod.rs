//! Corpus sources.

pub mod pubmed;

use std::path::PathBuf;

use async_trait::async_trait;

use crate::models::CorpusArticle;

pub use pubmed::PubmedXmlSource;

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed XML at byte {position}: {message}")]
    Xml { position: u64, message: String },
}

/// Anything that can produce the articles of one run, in corpus order.
#[async_trait]
pub trait CorpusSource: Send + Sync {
    fn describe(&self) -> String;

    async fn load(&self) -> Result<Vec<CorpusArticle>, SourceError>;
}
