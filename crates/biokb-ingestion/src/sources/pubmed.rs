//! PubMed `PubmedArticleSet` XML reader.
//!
//! Extracts per `PubmedArticle`: the first `PMID`, the first `ArticleTitle`
//! and every `AbstractText` directly under `Abstract` (structured abstracts
//! have several), joined with a single space. Nested inline markup such as
//! `<i>` or `<sup>` contributes its text. `OtherAbstract` is ignored.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::{debug, info, instrument};

use super::{CorpusSource, SourceError};
use crate::models::CorpusArticle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Pmid,
    Title,
    AbstractText,
}

struct Capture {
    field: Field,
    depth: usize,
    text: String,
}

#[derive(Default)]
struct ArticleBuilder {
    pmid: Option<String>,
    title: Option<String>,
    sections: Option<Vec<String>>,
}

impl ArticleBuilder {
    fn wants(&self, name: &[u8], parent: Option<&[u8]>) -> Option<Field> {
        match name {
            b"PMID" if self.pmid.is_none() => Some(Field::Pmid),
            b"ArticleTitle" if self.title.is_none() => Some(Field::Title),
            b"AbstractText" if parent == Some(b"Abstract".as_slice()) => Some(Field::AbstractText),
            _ => None,
        }
    }

    fn finish(&mut self, field: Field, text: String) {
        let text = text.trim().to_string();
        match field {
            Field::Pmid => self.pmid = Some(text),
            Field::Title => self.title = Some(text),
            Field::AbstractText => self.sections.get_or_insert_with(Vec::new).push(text),
        }
    }

    fn build(self) -> CorpusArticle {
        let abstract_text = self.sections.map(|sections| {
            sections
                .into_iter()
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        });
        CorpusArticle {
            pmid: self.pmid,
            title: self.title,
            abstract_text,
        }
    }
}

fn xml_error(reader: &Reader<&[u8]>, message: impl ToString) -> SourceError {
    SourceError::Xml {
        position: reader.error_position() as u64,
        message: message.to_string(),
    }
}

/// Parse a `PubmedArticleSet` document. Any well-formedness error fails the
/// whole document.
pub fn parse_pubmed_xml(xml: &str) -> Result<Vec<CorpusArticle>, SourceError> {
    let mut articles = Vec::new();
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut current: Option<ArticleBuilder> = None;
    let mut capture: Option<Capture> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = e.name().as_ref().to_vec();
                if name == b"PubmedArticle" {
                    current = Some(ArticleBuilder::default());
                }
                if capture.is_none() {
                    let parent = stack.last().map(Vec::as_slice);
                    if let Some(field) = current.as_ref().and_then(|a| a.wants(&name, parent)) {
                        capture = Some(Capture { field, depth: stack.len() + 1, text: String::new() });
                    }
                }
                stack.push(name);
            }
            Ok(Event::Empty(ref e)) => {
                if capture.is_none() {
                    if let Some(article) = current.as_mut() {
                        if let Some(field) = article.wants(e.name().as_ref(), stack.last().map(Vec::as_slice)) {
                            article.finish(field, String::new());
                        }
                    }
                }
            }
            Ok(Event::Text(ref e)) => {
                if let Some(cap) = capture.as_mut() {
                    let text = e.unescape().map_err(|err| xml_error(&reader, err))?;
                    cap.text.push_str(&text);
                }
            }
            Ok(Event::CData(ref e)) => {
                if let Some(cap) = capture.as_mut() {
                    cap.text.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Ok(Event::End(ref e)) => {
                if capture.as_ref().is_some_and(|c| c.depth == stack.len()) {
                    if let (Some(cap), Some(article)) = (capture.take(), current.as_mut()) {
                        article.finish(cap.field, cap.text);
                    }
                }
                stack.pop();
                if e.name().as_ref() == b"PubmedArticle" {
                    if let Some(article) = current.take() {
                        articles.push(article.build());
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(xml_error(&reader, e)),
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(xml_error(
            &reader,
            format!("unexpected end of document inside <{}>", String::from_utf8_lossy(open)),
        ));
    }

    debug!(articles = articles.len(), "Parsed PubMed XML");
    Ok(articles)
}

/// Read and parse a PubMed XML file.
#[instrument]
pub async fn read_pubmed_file(path: &Path) -> Result<Vec<CorpusArticle>, SourceError> {
    let xml = tokio::fs::read_to_string(path).await.map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let articles = parse_pubmed_xml(&xml)?;
    info!(
        path = %path.display(),
        articles = articles.len(),
        with_abstract = articles.iter().filter(|a| a.has_abstract()).count(),
        "Loaded PubMed corpus"
    );
    Ok(articles)
}

/// A PubMed XML file on disk.
#[derive(Debug, Clone)]
pub struct PubmedXmlSource {
    path: PathBuf,
}

impl PubmedXmlSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CorpusSource for PubmedXmlSource {
    fn describe(&self) -> String {
        format!("PubMed XML {}", self.path.display())
    }

    async fn load(&self) -> Result<Vec<CorpusArticle>, SourceError> {
        read_pubmed_file(&self.path).await
    }
}
