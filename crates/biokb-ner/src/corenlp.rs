//! Client for a CoreNLP-compatible annotation server.
//!
//! The server takes raw text as the request body and an annotator pipeline
//! description in the `properties` query parameter, and answers with one JSON
//! document per request. The same client backs both the [`CoreNlpAnnotator`]
//! here and the OpenIE relation extractor.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use crate::annotator::{Annotation, Annotator, Domain, NerEntity, Word};
use crate::{NerError, Result};

pub const CORENLP_DEFAULT_URL: &str = "http://localhost:9000";

const NER_ANNOTATORS: &str = "tokenize,ssplit,pos,lemma,ner";
const SSPLIT_ANNOTATORS: &str = "tokenize,ssplit";

/// HTTP client for one annotation server.
#[derive(Debug, Clone)]
pub struct CoreNlpClient {
    base_url: Url,
    client: Client,
}

impl CoreNlpClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| NerError::Config(format!("invalid annotation server URL '{base_url}': {e}")))?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Whether the server answers its readiness probe.
    pub async fn is_ready(&self) -> bool {
        let Ok(url) = self.base_url.join("ready") else {
            return false;
        };
        match self.client.get(url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    /// Run the annotators named in `properties` over `text`.
    #[instrument(skip(self, text, properties), fields(text_len = text.len()))]
    pub async fn annotate(&self, text: &str, properties: &BTreeMap<String, String>) -> Result<CoreNlpDocument> {
        let properties = serde_json::to_string(properties)
            .map_err(|e| NerError::InvalidInput(format!("unserializable properties: {e}")))?;

        let resp = self
            .client
            .post(self.base_url.clone())
            .query(&[("properties", properties)])
            .body(text.to_string())
            .send()
            .await
            .map_err(|e| NerError::Service(format!("annotation server unreachable at {}: {e}", self.base_url)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(NerError::Service(format!("annotation server error {status}: {body}")));
        }

        let doc: CoreNlpDocument = resp
            .json()
            .await
            .map_err(|e| NerError::Service(format!("failed to parse annotation response: {e}")))?;
        debug!(sentences = doc.sentences.len(), "Annotation response received");
        Ok(doc)
    }
}

/// Pipeline properties with JSON output.
pub fn pipeline_properties(annotators: &str) -> BTreeMap<String, String> {
    BTreeMap::from([
        ("annotators".to_string(), annotators.to_string()),
        ("outputFormat".to_string(), "json".to_string()),
    ])
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoreNlpDocument {
    #[serde(default)]
    pub sentences: Vec<CoreNlpSentence>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoreNlpSentence {
    #[serde(default)]
    pub tokens: Vec<CoreNlpToken>,
    #[serde(default, rename = "entitymentions")]
    pub entity_mentions: Vec<CoreNlpMention>,
    #[serde(default)]
    pub openie: Vec<CoreNlpTriple>,
}

/// Offsets count UTF-16 code units, as the server reports them.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreNlpToken {
    pub word: String,
    #[serde(default)]
    pub pos: Option<String>,
    #[serde(default)]
    pub lemma: Option<String>,
    pub character_offset_begin: usize,
    pub character_offset_end: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreNlpMention {
    pub text: String,
    pub ner: String,
    pub character_offset_begin: usize,
    pub character_offset_end: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoreNlpTriple {
    pub subject: String,
    pub relation: String,
    pub object: String,
}

/// Byte offset in `text` of the given UTF-16 offset, if it falls on a
/// character boundary.
pub fn utf16_to_byte(text: &str, offset: usize) -> Option<usize> {
    let mut units = 0;
    for (byte, c) in text.char_indices() {
        if units == offset {
            return Some(byte);
        }
        if units > offset {
            return None;
        }
        units += c.len_utf16();
    }
    (units == offset).then_some(text.len())
}

/// Sentence texts as spans of the request text, from the first token of
/// each sentence to its last.
pub fn sentence_texts(text: &str, doc: &CoreNlpDocument) -> Result<Vec<String>> {
    let mut sentences = Vec::with_capacity(doc.sentences.len());
    for sentence in &doc.sentences {
        let (Some(first), Some(last)) = (sentence.tokens.first(), sentence.tokens.last()) else {
            continue;
        };
        let start = utf16_to_byte(text, first.character_offset_begin);
        let end = utf16_to_byte(text, last.character_offset_end);
        match (start, end) {
            (Some(start), Some(end)) if start <= end => sentences.push(text[start..end].to_string()),
            _ => {
                return Err(NerError::Service(format!(
                    "sentence offsets {}..{} out of range",
                    first.character_offset_begin, last.character_offset_end
                )))
            }
        }
    }
    Ok(sentences)
}

/// Flatten a server document into an [`Annotation`] over `text`.
pub fn to_annotation(text: &str, doc: CoreNlpDocument) -> Result<Annotation> {
    let mut annotation = Annotation::default();
    for sentence in doc.sentences {
        annotation.words.extend(sentence.tokens.into_iter().map(|t| Word {
            lemma: t.lemma.unwrap_or_else(|| t.word.to_lowercase()),
            xpos: t.pos.unwrap_or_default(),
            text: t.word,
        }));

        for mention in sentence.entity_mentions {
            let span = utf16_to_byte(text, mention.character_offset_begin)
                .zip(utf16_to_byte(text, mention.character_offset_end));
            let Some((start, end)) = span else {
                return Err(NerError::Service(format!(
                    "entity '{}' has offsets outside the text",
                    mention.text
                )));
            };
            annotation.entities.push(NerEntity {
                text: mention.text,
                label: mention.ner,
                start,
                end,
            });
        }
    }
    Ok(annotation)
}

/// An annotator that delegates to a remote server, optionally with a
/// model-specific NER model.
pub struct CoreNlpAnnotator {
    name: String,
    domain: Domain,
    client: Arc<CoreNlpClient>,
    ner_model: Option<String>,
}

impl CoreNlpAnnotator {
    pub fn new(name: impl Into<String>, client: Arc<CoreNlpClient>, ner_model: Option<String>) -> Self {
        let name = name.into();
        let domain = Domain::for_model(&name).unwrap_or(Domain::General);
        Self { name, domain, client, ner_model }
    }

    fn ner_properties(&self) -> BTreeMap<String, String> {
        let mut props = pipeline_properties(NER_ANNOTATORS);
        props.insert("ssplit.isOneSentence".to_string(), "true".to_string());
        if let Some(model) = &self.ner_model {
            props.insert("ner.model".to_string(), model.clone());
        }
        props
    }
}

#[async_trait]
impl Annotator for CoreNlpAnnotator {
    fn name(&self) -> &str {
        &self.name
    }

    fn domain(&self) -> Domain {
        self.domain
    }

    async fn annotate(&self, text: &str) -> Result<Annotation> {
        let doc = self.client.annotate(text, &self.ner_properties()).await?;
        to_annotation(text, doc)
    }

    async fn split_sentences(&self, text: &str) -> Result<Vec<String>> {
        let doc = self
            .client
            .annotate(text, &pipeline_properties(SSPLIT_ANNOTATORS))
            .await?;
        sentence_texts(text, &doc)
    }
}
