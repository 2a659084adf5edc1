use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Identifies the article being processed when a run-level error occurs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleRef {
    /// Zero-based position in the corpus.
    pub ordinal: usize,
    pub pmid: Option<String>,
}

impl ArticleRef {
    pub fn new(ordinal: usize, pmid: Option<String>) -> Self {
        Self { ordinal, pmid }
    }
}

impl fmt::Display for ArticleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pmid {
            Some(pmid) => write!(f, "article #{} (PMID {})", self.ordinal, pmid),
            None => write!(f, "article #{}", self.ordinal),
        }
    }
}

#[derive(Debug, Error)]
pub enum KbError {
    #[error("Corpus parse error: {0}")]
    SourceParse(String),

    #[error("Annotation failed for {article}: {message}")]
    Annotation { article: ArticleRef, message: String },

    #[error("Processing of {article} timed out after {limit:?}")]
    Timeout { article: ArticleRef, limit: Duration },

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KbError {
    /// The article the error is attributed to, if any.
    pub fn article(&self) -> Option<&ArticleRef> {
        match self {
            KbError::Annotation { article, .. } | KbError::Timeout { article, .. } => Some(article),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, KbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_ref_display_with_pmid() {
        let r = ArticleRef::new(3, Some("1001".to_string()));
        assert_eq!(r.to_string(), "article #3 (PMID 1001)");
    }

    #[test]
    fn test_article_ref_display_without_pmid() {
        assert_eq!(ArticleRef::new(0, None).to_string(), "article #0");
    }

    #[test]
    fn test_annotation_error_names_article() {
        let err = KbError::Annotation {
            article: ArticleRef::new(7, Some("42".to_string())),
            message: "bad encoding".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("PMID 42"));
        assert!(msg.contains("bad encoding"));
        assert_eq!(err.article().map(|a| a.ordinal), Some(7));
    }

    #[test]
    fn test_timeout_reports_sub_second_limit() {
        let err = KbError::Timeout {
            article: ArticleRef::new(0, Some("1".to_string())),
            limit: Duration::from_millis(50),
        };
        assert_eq!(err.to_string(), "Processing of article #0 (PMID 1) timed out after 50ms");
    }

    #[test]
    fn test_persistence_error_has_no_article() {
        let err = KbError::Persistence("disk full".to_string());
        assert!(err.article().is_none());
    }
}
