//! OpenIE triples from a CoreNLP-compatible server.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use biokb_common::Triple;
use biokb_ner::corenlp::{pipeline_properties, CoreNlpClient, CoreNlpDocument};
use tracing::{debug, instrument};

use crate::extractor::RelationExtractor;
use crate::Result;

pub const OPENIE_ANNOTATORS: &str = "tokenize,ssplit,pos,lemma,depparse,natlog,openie";

/// Upper bound on the affinity probability for OpenIE clause splitting.
pub const AFFINITY_PROBABILITY_CAP: f64 = 2.0 / 3.0;

pub struct OpenIeExtractor {
    client: Arc<CoreNlpClient>,
}

impl OpenIeExtractor {
    pub fn new(client: Arc<CoreNlpClient>) -> Self {
        Self { client }
    }

    pub fn properties() -> BTreeMap<String, String> {
        let mut props = pipeline_properties(OPENIE_ANNOTATORS);
        props.insert(
            "openie.affinity_probability_cap".to_string(),
            AFFINITY_PROBABILITY_CAP.to_string(),
        );
        props
    }
}

/// Triples of every sentence in the response, in order.
pub fn flatten_triples(doc: CoreNlpDocument) -> Vec<Triple> {
    doc.sentences
        .into_iter()
        .flat_map(|s| s.openie)
        .map(|t| Triple::new(t.subject, t.relation, t.object))
        .collect()
}

#[async_trait]
impl RelationExtractor for OpenIeExtractor {
    fn name(&self) -> &str {
        "openie"
    }

    #[instrument(skip(self, sentence), fields(len = sentence.len()))]
    async fn extract_triples(&self, sentence: &str) -> Result<Vec<Triple>> {
        let doc = self.client.annotate(sentence, &Self::properties()).await?;
        let triples = flatten_triples(doc);
        debug!(triples = triples.len(), "OpenIE complete");
        Ok(triples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_properties() {
        let props = OpenIeExtractor::properties();
        assert_eq!(props["annotators"], OPENIE_ANNOTATORS);
        assert_eq!(props["outputFormat"], "json");
        let cap: f64 = props["openie.affinity_probability_cap"].parse().unwrap();
        assert!((cap - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_flatten_triples_across_sentences() {
        let doc: CoreNlpDocument = serde_json::from_str(
            r#"{"sentences": [
                {"openie": [
                    {"subject": "Aspirin", "relation": "reduces", "object": "inflammation"},
                    {"subject": "Aspirin", "relation": "reduces", "object": "acute inflammation"}
                ]},
                {"tokens": []},
                {"openie": [{"subject": "it", "relation": "is", "object": "used"}]}
            ]}"#,
        )
        .unwrap();
        let triples = flatten_triples(doc);
        assert_eq!(triples.len(), 3);
        assert_eq!(triples[2], Triple::new("it", "is", "used"));
    }
}
