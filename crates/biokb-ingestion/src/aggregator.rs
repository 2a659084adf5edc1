//! Merge every annotator's view of one sentence into a [`SentenceRecord`].
//!
//! Outputs are concatenated in pool order without alignment or
//! deduplication: with N annotators the same surface tokens appear N times.

use std::sync::Arc;

use biokb_common::{EntityMention, PosTag, SentenceRecord};
use biokb_kg::RelationExtractor;
use biokb_ner::AnnotatorPool;
use tracing::{debug, instrument};

use crate::Result;

pub struct Aggregator {
    pool: Arc<AnnotatorPool>,
    extractor: Arc<dyn RelationExtractor>,
}

impl Aggregator {
    pub fn new(pool: Arc<AnnotatorPool>, extractor: Arc<dyn RelationExtractor>) -> Self {
        Self { pool, extractor }
    }

    pub fn pool(&self) -> &AnnotatorPool {
        &self.pool
    }

    #[instrument(skip(self, sentence), fields(len = sentence.len()))]
    pub async fn aggregate(&self, sentence: &str) -> Result<SentenceRecord> {
        let mut record = SentenceRecord::new(sentence);

        for (_, annotation) in self.pool.annotate_all(sentence).await? {
            for word in annotation.words {
                record.pos_tags.push(PosTag::new(word.text.as_str(), word.xpos));
                record.tokens.push(word.text);
                record.lemmas.push(word.lemma);
            }
            record
                .entities
                .extend(annotation.entities.into_iter().map(|e| EntityMention::new(e.text, e.label)));
        }

        record.triples = self.extractor.extract_triples(sentence).await?;

        debug!(
            tokens = record.tokens.len(),
            entities = record.entities.len(),
            triples = record.triples.len(),
            "Sentence aggregated"
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biokb_kg::PatternExtractor;
    use biokb_ner::{Annotator, LexiconAnnotator};

    fn aggregator(models: &[&str]) -> Aggregator {
        let annotators = models
            .iter()
            .map(|m| Arc::new(LexiconAnnotator::builtin(m).unwrap()) as Arc<dyn Annotator>)
            .collect();
        Aggregator::new(
            Arc::new(AnnotatorPool::new(annotators).unwrap()),
            Arc::new(PatternExtractor::new().unwrap()),
        )
    }

    #[tokio::test]
    async fn test_tokens_repeat_once_per_annotator() {
        let agg = aggregator(&["bc5cdr", "i2b2"]);
        let record = agg.aggregate("Aspirin reduces inflammation.").await.unwrap();

        assert_eq!(record.text, "Aspirin reduces inflammation.");
        assert_eq!(record.tokens.len(), 8);
        assert_eq!(&record.tokens[..4], &record.tokens[4..]);
        assert_eq!(record.pos_tags.len(), record.tokens.len());
        assert_eq!(record.lemmas.len(), record.tokens.len());
        // bc5cdr entities first, then i2b2
        let entities: Vec<_> = record.entities.iter().map(|e| (e.text(), e.label())).collect();
        assert_eq!(
            entities,
            vec![
                ("Aspirin", "CHEMICAL"),
                ("inflammation", "DISEASE"),
                ("Aspirin", "TREATMENT"),
                ("inflammation", "PROBLEM"),
            ]
        );
        assert_eq!(record.triples.len(), 1);
    }

    #[tokio::test]
    async fn test_aggregation_is_deterministic() {
        let agg = aggregator(&["bc5cdr", "jnlpba", "s800"]);
        let first = agg.aggregate("IL-6 levels rose in mice.").await.unwrap();
        let second = agg.aggregate("IL-6 levels rose in mice.").await.unwrap();
        assert_eq!(first, second);
    }
}
