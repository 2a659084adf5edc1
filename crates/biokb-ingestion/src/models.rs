use serde::{Deserialize, Serialize};

/// One article as read from the corpus, before any annotation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusArticle {
    pub pmid: Option<String>,
    pub title: Option<String>,
    pub abstract_text: Option<String>,
}

impl CorpusArticle {
    pub fn new(pmid: Option<&str>, title: Option<&str>, abstract_text: Option<&str>) -> Self {
        Self {
            pmid: pmid.map(str::to_string),
            title: title.map(str::to_string),
            abstract_text: abstract_text.map(str::to_string),
        }
    }

    /// Whether there is any abstract text to process.
    pub fn has_abstract(&self) -> bool {
        self.abstract_text.as_deref().is_some_and(|a| !a.trim().is_empty())
    }
}
