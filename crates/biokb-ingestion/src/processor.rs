//! Turn one corpus article into an [`ArticleRecord`].

use biokb_common::{ArticleRecord, DEFAULT_TITLE};
use biokb_ner::Segmenter;
use tracing::{debug, info, instrument};

use crate::aggregator::Aggregator;
use crate::models::CorpusArticle;
use crate::Result;

pub struct DocumentProcessor {
    segmenter: Segmenter,
    aggregator: Aggregator,
}

impl DocumentProcessor {
    pub fn new(segmenter: Segmenter, aggregator: Aggregator) -> Self {
        Self { segmenter, aggregator }
    }

    /// Segment the abstract and aggregate each sentence in document order.
    ///
    /// Returns `None` when the abstract is missing or blank. A missing or
    /// empty title becomes [`DEFAULT_TITLE`].
    #[instrument(skip(self, title, abstract_text))]
    pub async fn process_article(
        &self,
        pmid: Option<&str>,
        title: Option<&str>,
        abstract_text: Option<&str>,
    ) -> Result<Option<ArticleRecord>> {
        let Some(abstract_text) = abstract_text.filter(|a| !a.trim().is_empty()) else {
            debug!("No abstract, skipping");
            return Ok(None);
        };

        let sentences = self.segmenter.segment(abstract_text).await?;
        let mut records = Vec::with_capacity(sentences.len());
        for sentence in &sentences {
            records.push(self.aggregator.aggregate(sentence).await?);
        }

        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TITLE);
        let article = ArticleRecord {
            pmid: pmid.map(str::to_string),
            title: title.to_string(),
            abstract_text: abstract_text.to_string(),
            sentences: records,
        };

        info!(
            sentences = article.sentences.len(),
            entities = article.entity_count(),
            triples = article.triple_count(),
            "Article processed"
        );
        Ok(Some(article))
    }

    pub async fn process(&self, article: &CorpusArticle) -> Result<Option<ArticleRecord>> {
        self.process_article(
            article.pmid.as_deref(),
            article.title.as_deref(),
            article.abstract_text.as_deref(),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use biokb_kg::PatternExtractor;
    use biokb_ner::AnnotatorPool;

    fn processor() -> DocumentProcessor {
        let pool = Arc::new(AnnotatorPool::builtin_biomedical().unwrap());
        let segmenter = Segmenter::new(&pool, None).unwrap();
        let aggregator = Aggregator::new(pool, Arc::new(PatternExtractor::new().unwrap()));
        DocumentProcessor::new(segmenter, aggregator)
    }

    #[tokio::test]
    async fn test_two_sentence_abstract() {
        let record = processor()
            .process_article(
                Some("1001"),
                Some("Study A"),
                Some("Aspirin reduces inflammation. It is widely used."),
            )
            .await
            .unwrap()
            .unwrap();

        assert_eq!(record.pmid.as_deref(), Some("1001"));
        assert_eq!(record.title, "Study A");
        assert_eq!(record.sentences.len(), 2);
        assert_eq!(record.sentences[0].text, "Aspirin reduces inflammation.");
        assert_eq!(record.sentences[1].text, "It is widely used.");
        assert!(record.sentences.iter().all(|s| !s.tokens.is_empty()));
    }

    #[tokio::test]
    async fn test_missing_or_blank_abstract_yields_none() {
        let p = processor();
        assert!(p.process_article(Some("1"), Some("T"), None).await.unwrap().is_none());
        assert!(p.process_article(Some("1"), Some("T"), Some("")).await.unwrap().is_none());
        assert!(p.process_article(Some("1"), Some("T"), Some(" \n ")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_default_title() {
        let p = processor();
        let untitled = p.process_article(None, None, Some("Mice died.")).await.unwrap().unwrap();
        assert_eq!(untitled.title, DEFAULT_TITLE);
        assert_eq!(untitled.pmid, None);

        let blank = p.process_article(None, Some("  "), Some("Mice died.")).await.unwrap().unwrap();
        assert_eq!(blank.title, DEFAULT_TITLE);
    }

    #[tokio::test]
    async fn test_sentence_count_matches_segmenter() {
        let p = processor();
        let text = "KRAS is mutated in tumors. Cisplatin was given. Patients improved.";
        let expected = p.segmenter.segment(text).await.unwrap().len();
        let record = p.process_article(Some("3"), Some("T"), Some(text)).await.unwrap().unwrap();
        assert_eq!(record.sentences.len(), expected);
        assert_eq!(expected, 3);
    }
}
