//! The fixed, ordered set of annotators every sentence is run through.
//!
//! The pool is built once at startup and shared behind an `Arc` by every
//! worker. Its order is the order in which annotator outputs are
//! concatenated, so it never changes after construction.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use tracing::{info, instrument};

use crate::annotator::{Annotation, Annotator};
use crate::lexicon::LexiconAnnotator;
use crate::{NerError, Result};

/// Default biomedical models, in pool order.
pub const BUILTIN_MODELS: [&str; 8] = [
    "bc5cdr",
    "bionlp13cg",
    "jnlpba",
    "linnaeus",
    "ncbi_disease",
    "s800",
    "i2b2",
    "radiology",
];

pub struct AnnotatorPool {
    annotators: Vec<Arc<dyn Annotator>>,
}

impl std::fmt::Debug for AnnotatorPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotatorPool")
            .field("annotators", &self.names().collect::<Vec<_>>())
            .finish()
    }
}

impl AnnotatorPool {
    /// Fix the pool order. Fails on an empty list or repeated names.
    pub fn new(annotators: Vec<Arc<dyn Annotator>>) -> Result<Self> {
        if annotators.is_empty() {
            return Err(NerError::Config("annotator pool is empty".to_string()));
        }
        let mut seen = HashSet::new();
        for annotator in &annotators {
            if !seen.insert(annotator.name()) {
                return Err(NerError::Config(format!(
                    "annotator '{}' appears more than once in the pool",
                    annotator.name()
                )));
            }
        }

        let pool = Self { annotators };
        info!(annotators = ?pool.names().collect::<Vec<_>>(), "Annotator pool ready");
        Ok(pool)
    }

    /// Offline lexicon annotators for all of [`BUILTIN_MODELS`].
    pub fn builtin_biomedical() -> Result<Self> {
        let annotators = BUILTIN_MODELS
            .iter()
            .map(|model| LexiconAnnotator::builtin(model).map(|a| Arc::new(a) as Arc<dyn Annotator>))
            .collect::<Result<Vec<_>>>()?;
        Self::new(annotators)
    }

    pub fn len(&self) -> usize {
        self.annotators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotators.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.annotators.iter().map(|a| a.name())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Annotator>> {
        self.annotators.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Annotator>> {
        self.annotators.iter().find(|a| a.name() == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.annotators.iter().position(|a| a.name() == name)
    }

    /// The first annotator; a pool is never empty.
    pub fn first(&self) -> &Arc<dyn Annotator> {
        &self.annotators[0]
    }

    /// Run every annotator over the same text.
    ///
    /// Calls may overlap in time, but results come back in pool order. Any
    /// failure fails the whole call; the error reported is the one from the
    /// earliest failing annotator in pool order.
    #[instrument(skip(self, sentence), fields(annotators = self.annotators.len(), len = sentence.len()))]
    pub async fn annotate_all(&self, sentence: &str) -> Result<Vec<(String, Annotation)>> {
        join_all(self.annotators.iter().map(|annotator| async move {
            annotator
                .annotate(sentence)
                .await
                .map(|annotation| (annotator.name().to_string(), annotation))
                .map_err(|e| e.in_annotator(annotator.name()))
        }))
        .await
        .into_iter()
        .collect()
    }
}
