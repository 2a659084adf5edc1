//! Knowledge base record types.
//!
//! These serialize to the archive layout consumed downstream: one JSON array
//! of articles, each carrying its per-sentence annotations.

use serde::{Deserialize, Serialize};

/// Title used when an article has no `ArticleTitle`.
pub const DEFAULT_TITLE: &str = "No Title";

/// A `(token, tag)` pair. Serialized as a two-element array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PosTag(pub String, pub String);

impl PosTag {
    pub fn new(token: impl Into<String>, tag: impl Into<String>) -> Self {
        Self(token.into(), tag.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }

    pub fn tag(&self) -> &str {
        &self.1
    }
}

/// A `(text, type)` entity mention. Serialized as a two-element array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityMention(pub String, pub String);

impl EntityMention {
    pub fn new(text: impl Into<String>, label: impl Into<String>) -> Self {
        Self(text.into(), label.into())
    }

    pub fn text(&self) -> &str {
        &self.0
    }

    pub fn label(&self) -> &str {
        &self.1
    }
}

/// Subject-predicate-object triple from open information extraction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: String,
    #[serde(rename = "relation")]
    pub predicate: String,
    pub object: String,
}

impl Triple {
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

/// Merged annotations for one sentence.
///
/// `tokens`, `pos_tags` and `lemmas` are plain concatenations of every
/// annotator's output in pool order; each annotator tokenizes independently,
/// so the same surface tokens repeat once per annotator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceRecord {
    #[serde(rename = "sentence")]
    pub text: String,
    pub tokens: Vec<String>,
    pub pos_tags: Vec<PosTag>,
    pub entities: Vec<EntityMention>,
    pub lemmas: Vec<String>,
    pub triples: Vec<Triple>,
}

impl SentenceRecord {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// One knowledge base entry per article with a non-empty abstract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    #[serde(rename = "PMID")]
    pub pmid: Option<String>,
    pub title: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub sentences: Vec<SentenceRecord>,
}

impl ArticleRecord {
    pub fn entity_count(&self) -> usize {
        self.sentences.iter().map(|s| s.entities.len()).sum()
    }

    pub fn triple_count(&self) -> usize {
        self.sentences.iter().map(|s| s.triples.len()).sum()
    }
}

/// Ordered, append-only collection of article records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnowledgeBase {
    articles: Vec<ArticleRecord>,
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, article: ArticleRecord) {
        self.articles.push(article);
    }

    pub fn articles(&self) -> &[ArticleRecord] {
        &self.articles
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    pub fn sentence_count(&self) -> usize {
        self.articles.iter().map(|a| a.sentences.len()).sum()
    }

    pub fn into_articles(self) -> Vec<ArticleRecord> {
        self.articles
    }
}

impl From<Vec<ArticleRecord>> for KnowledgeBase {
    fn from(articles: Vec<ArticleRecord>) -> Self {
        Self { articles }
    }
}

impl FromIterator<ArticleRecord> for KnowledgeBase {
    fn from_iter<I: IntoIterator<Item = ArticleRecord>>(iter: I) -> Self {
        Self {
            articles: iter.into_iter().collect(),
        }
    }
}
