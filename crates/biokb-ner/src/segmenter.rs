//! Sentence segmentation through one canonical annotator of the pool.

use std::sync::Arc;

use tracing::debug;

use crate::annotator::Annotator;
use crate::pool::AnnotatorPool;
use crate::{NerError, Result};

pub struct Segmenter {
    annotator: Arc<dyn Annotator>,
}

impl Segmenter {
    /// Segment with the pool annotator called `name`, or the first one.
    pub fn new(pool: &AnnotatorPool, name: Option<&str>) -> Result<Self> {
        let annotator = match name {
            Some(name) => pool
                .get(name)
                .ok_or_else(|| NerError::Config(format!("segmenter annotator '{name}' is not in the pool")))?,
            None => pool.first(),
        };
        Ok(Self { annotator: Arc::clone(annotator) })
    }

    pub fn annotator_name(&self) -> &str {
        self.annotator.name()
    }

    /// Split a document into trimmed, non-empty sentences in document order.
    pub async fn segment(&self, text: &str) -> Result<Vec<String>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let sentences: Vec<String> = self
            .annotator
            .split_sentences(text)
            .await
            .map_err(|e| e.in_annotator(self.annotator.name()))?
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        debug!(annotator = self.annotator.name(), sentences = sentences.len(), "Segmented text");
        Ok(sentences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotator::{Annotation, Domain};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Lines {
        name: &'static str,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Annotator for Lines {
        fn name(&self) -> &str {
            self.name
        }

        fn domain(&self) -> Domain {
            Domain::General
        }

        async fn annotate(&self, _text: &str) -> Result<Annotation> {
            Ok(Annotation::default())
        }

        async fn split_sentences(&self, text: &str) -> Result<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(text.split('|').map(|s| format!("{} ", s)).collect())
        }
    }

    fn lines(name: &'static str) -> Arc<Lines> {
        Arc::new(Lines { name, calls: AtomicUsize::new(0) })
    }

    #[tokio::test]
    async fn test_uses_first_annotator_by_default() {
        let first = lines("first");
        let second = lines("second");
        let pool = AnnotatorPool::new(vec![first.clone() as Arc<dyn Annotator>, second.clone()]).unwrap();
        let segmenter = Segmenter::new(&pool, None).unwrap();

        let sentences = segmenter.segment("A.|B.||").await.unwrap();
        assert_eq!(sentences, vec!["A.", "B."]);
        assert_eq!(segmenter.annotator_name(), "first");
        assert_eq!(first.calls.load(Ordering::SeqCst), 1);
        assert_eq!(second.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_named_annotator() {
        let pool = AnnotatorPool::new(vec![lines("first") as Arc<dyn Annotator>, lines("second")]).unwrap();
        let segmenter = Segmenter::new(&pool, Some("second")).unwrap();
        assert_eq!(segmenter.annotator_name(), "second");
        assert!(Segmenter::new(&pool, Some("third")).is_err());
    }

    #[tokio::test]
    async fn test_blank_text_skips_annotator() {
        let only = lines("only");
        let pool = AnnotatorPool::new(vec![only.clone() as Arc<dyn Annotator>]).unwrap();
        let segmenter = Segmenter::new(&pool, None).unwrap();
        assert!(segmenter.segment("  \n\t").await.unwrap().is_empty());
        assert_eq!(only.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_builtin_segmenter_splits_abstract() {
        let pool = AnnotatorPool::builtin_biomedical().unwrap();
        let segmenter = Segmenter::new(&pool, None).unwrap();
        let sentences = segmenter
            .segment("Aspirin reduces inflammation. It is widely used.")
            .await
            .unwrap();
        assert_eq!(sentences, vec!["Aspirin reduces inflammation.", "It is widely used."]);
    }
}
