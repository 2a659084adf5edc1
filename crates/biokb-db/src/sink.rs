//! Persistence sink: JSON archive first, document store second.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use biokb_common::KnowledgeBase;
use serde::Serialize;
use tracing::{info, instrument};

use crate::document_store::DocumentStore;
use crate::error::Result;
use crate::json_store::{read_knowledge_base, write_knowledge_base};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaveReport {
    pub json_path: PathBuf,
    pub articles_written: usize,
    /// `None` when no store is configured.
    pub documents_inserted: Option<usize>,
}

pub struct PersistenceSink {
    json_path: PathBuf,
    store: Option<Arc<dyn DocumentStore>>,
}

impl PersistenceSink {
    pub fn new(json_path: impl Into<PathBuf>, store: Option<Arc<dyn DocumentStore>>) -> Self {
        Self { json_path: json_path.into(), store }
    }

    pub fn json_path(&self) -> &Path {
        &self.json_path
    }

    /// Archive `kb` as JSON, then re-read the archive and insert every
    /// article into the store. An empty knowledge base is archived as `[]`
    /// and nothing is inserted.
    #[instrument(skip(self, kb), fields(articles = kb.len(), path = %self.json_path.display()))]
    pub async fn save(&self, kb: &KnowledgeBase) -> Result<SaveReport> {
        write_knowledge_base(&self.json_path, kb)?;
        info!(path = %self.json_path.display(), articles = kb.len(), "Knowledge base written");

        let mut report = SaveReport {
            json_path: self.json_path.clone(),
            articles_written: kb.len(),
            documents_inserted: None,
        };

        let Some(store) = &self.store else {
            return Ok(report);
        };

        let archived = read_knowledge_base(&self.json_path)?;
        if archived.is_empty() {
            info!(store = %store.describe(), "Knowledge base is empty, nothing to insert");
            report.documents_inserted = Some(0);
            return Ok(report);
        }

        let inserted = store.insert_articles(archived.articles()).await?;
        info!(store = %store.describe(), documents = inserted, "Documents inserted");
        report.documents_inserted = Some(inserted);
        Ok(report)
    }
}
