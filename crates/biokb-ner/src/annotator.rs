//! The annotator contract shared by every backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// Biomedical domain an annotator specializes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Disease,
    Chemical,
    Gene,
    Species,
    CellLine,
    Clinical,
    Radiology,
    General,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Disease => "disease",
            Domain::Chemical => "chemical",
            Domain::Gene => "gene",
            Domain::Species => "species",
            Domain::CellLine => "cell_line",
            Domain::Clinical => "clinical",
            Domain::Radiology => "radiology",
            Domain::General => "general",
        }
    }

    /// Domain of a known biomedical model tag.
    pub fn for_model(model: &str) -> Option<Self> {
        let domain = match model {
            "ncbi_disease" => Domain::Disease,
            "bc5cdr" => Domain::Chemical,
            "jnlpba" => Domain::Gene,
            "linnaeus" | "s800" => Domain::Species,
            "bionlp13cg" | "anatem" => Domain::CellLine,
            "i2b2" => Domain::Clinical,
            "radiology" => Domain::Radiology,
            "conll03" | "ontonotes" => Domain::General,
            _ => return None,
        };
        Some(domain)
    }
}

/// A single word with its treebank tag and lemma.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub text: String,
    pub xpos: String,
    pub lemma: String,
}

/// An entity span found by one annotator. Offsets are byte offsets into the
/// annotated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NerEntity {
    pub text: String,
    pub label: String,
    pub start: usize,
    pub end: usize,
}

/// Output of one annotator over one piece of text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    pub words: Vec<Word>,
    pub entities: Vec<NerEntity>,
}

impl Annotation {
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(|w| w.text.as_str())
    }

    pub fn pos_tags(&self) -> impl Iterator<Item = (&str, &str)> {
        self.words.iter().map(|w| (w.text.as_str(), w.xpos.as_str()))
    }

    pub fn lemmas(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(|w| w.lemma.as_str())
    }
}

/// A named-entity recognizer bound to one biomedical model.
///
/// Implementations are loaded once and shared across workers, so calls take
/// `&self` and must not mutate observable state.
#[async_trait]
pub trait Annotator: Send + Sync {
    /// Model tag, unique within a pool (e.g. `bc5cdr`).
    fn name(&self) -> &str;

    fn domain(&self) -> Domain;

    /// Tokenize, tag, lemmatize and recognize entities in `text`.
    async fn annotate(&self, text: &str) -> Result<Annotation>;

    /// Split document text into sentences using this annotator's sentence model.
    async fn split_sentences(&self, text: &str) -> Result<Vec<String>>;
}
