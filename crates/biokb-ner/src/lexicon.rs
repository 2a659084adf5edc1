//! Offline annotator backed by an Aho-Corasick gazetteer.
//!
//! Entity recognition is a linear scan of the text against every term the
//! model knows. Tokens, tags and lemmas come from [`crate::rules`]. The scan
//! is CPU-bound, so annotation runs on the blocking thread pool.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use aho_corasick::{AhoCorasick, MatchKind};
use async_trait::async_trait;
use tracing::{debug, info};

use crate::annotator::{Annotation, Annotator, Domain, NerEntity, Word};
use crate::gazetteer::builtin_entries;
use crate::{rules, NerError, Result};

/// A gazetteer-driven annotator for one biomedical model.
pub struct LexiconAnnotator {
    name: String,
    domain: Domain,
    gazetteer: Arc<Gazetteer>,
    stats: LexiconStats,
}

struct Gazetteer {
    automaton: AhoCorasick,
    /// Pattern index -> entity label
    labels: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LexiconStats {
    pub total_patterns: usize,
    pub distinct_labels: usize,
}

impl LexiconAnnotator {
    /// Build an annotator from `(term, label)` pairs. Terms match
    /// case-insensitively; a term listed twice keeps its last label.
    pub fn new<I, T, L>(name: impl Into<String>, domain: Domain, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (T, L)>,
        T: AsRef<str>,
        L: Into<String>,
    {
        let name = name.into();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut patterns: Vec<String> = Vec::new();
        let mut labels: Vec<String> = Vec::new();

        for (term, label) in entries {
            let term = term.as_ref().trim().to_lowercase();
            if term.is_empty() {
                continue;
            }
            let label = label.into();
            match index.get(&term) {
                Some(&i) => labels[i] = label,
                None => {
                    index.insert(term.clone(), patterns.len());
                    patterns.push(term);
                    labels.push(label);
                }
            }
        }

        // Standard semantics so overlapping candidates survive the boundary
        // filter; the longest one is kept afterwards.
        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .ascii_case_insensitive(true)
            .build(&patterns)
            .map_err(|e| NerError::ModelLoad(format!("{name}: {e}")))?;

        let mut distinct: Vec<&str> = labels.iter().map(String::as_str).collect();
        distinct.sort_unstable();
        distinct.dedup();
        let stats = LexiconStats {
            total_patterns: patterns.len(),
            distinct_labels: distinct.len(),
        };

        debug!(
            annotator = %name,
            patterns = stats.total_patterns,
            labels = stats.distinct_labels,
            "Lexicon built"
        );

        Ok(Self {
            name,
            domain,
            gazetteer: Arc::new(Gazetteer { automaton, labels }),
            stats,
        })
    }

    /// The embedded gazetteer for a known model tag.
    pub fn builtin(model: &str) -> Result<Self> {
        let entries = builtin_entries(model)
            .ok_or_else(|| NerError::ModelLoad(format!("no built-in lexicon for model '{model}'")))?;
        let domain = Domain::for_model(model).unwrap_or(Domain::General);
        let annotator = Self::new(model, domain, entries.iter().copied())?;
        info!(
            annotator = model,
            domain = domain.as_str(),
            patterns = annotator.stats.total_patterns,
            "Loaded built-in lexicon"
        );
        Ok(annotator)
    }

    /// The built-in gazetteer for `model` (if any) extended with the entries
    /// of a tab-separated `term<TAB>LABEL` file. Blank lines and lines
    /// starting with `#` are ignored.
    pub fn with_lexicon_file(model: &str, path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let extra = parse_lexicon(&content)
            .map_err(|e| NerError::ModelLoad(format!("{}: {e}", path.display())))?;

        let mut entries: Vec<(String, String)> = builtin_entries(model)
            .unwrap_or_default()
            .iter()
            .map(|(t, l)| (t.to_string(), l.to_string()))
            .collect();
        let added = extra.len();
        entries.extend(extra);

        let domain = Domain::for_model(model).unwrap_or(Domain::General);
        let annotator = Self::new(model, domain, entries)?;
        info!(
            annotator = model,
            file = %path.display(),
            added,
            patterns = annotator.stats.total_patterns,
            "Loaded lexicon file"
        );
        Ok(annotator)
    }

    pub fn stats(&self) -> &LexiconStats {
        &self.stats
    }

    /// Find entity mentions in `text`. Matches must start and end on word
    /// boundaries; overlapping matches resolve to the longest.
    pub fn extract(&self, text: &str) -> Vec<NerEntity> {
        self.gazetteer.extract(text)
    }
}

impl Gazetteer {
    fn extract(&self, text: &str) -> Vec<NerEntity> {
        let entities = self
            .automaton
            .find_overlapping_iter(text)
            .filter(|m| on_word_boundaries(text, m.start(), m.end()))
            .map(|m| NerEntity {
                text: text[m.start()..m.end()].to_string(),
                label: self.labels[m.pattern().as_usize()].clone(),
                start: m.start(),
                end: m.end(),
            })
            .collect();

        remove_overlapping(entities)
    }

    fn annotate(&self, text: &str) -> Annotation {
        let tokens = rules::tokenize(text);
        let tags = rules::tag_tokens(&tokens);
        let words = tokens
            .iter()
            .zip(tags)
            .map(|(token, tag)| Word {
                text: token.to_string(),
                xpos: tag.to_string(),
                lemma: rules::lemmatize(token, tag),
            })
            .collect();

        Annotation {
            words,
            entities: self.extract(text),
        }
    }
}

#[async_trait]
impl Annotator for LexiconAnnotator {
    fn name(&self) -> &str {
        &self.name
    }

    fn domain(&self) -> Domain {
        self.domain
    }

    async fn annotate(&self, text: &str) -> Result<Annotation> {
        let gazetteer = Arc::clone(&self.gazetteer);
        let text = text.to_string();
        tokio::task::spawn_blocking(move || gazetteer.annotate(&text))
            .await
            .map_err(|e| NerError::Service(format!("annotation task failed: {e}")))
    }

    async fn split_sentences(&self, text: &str) -> Result<Vec<String>> {
        let text = text.to_string();
        tokio::task::spawn_blocking(move || rules::split_sentences(&text))
            .await
            .map_err(|e| NerError::Service(format!("sentence split task failed: {e}")))
    }
}

fn parse_lexicon(content: &str) -> std::result::Result<Vec<(String, String)>, String> {
    let mut entries = Vec::new();
    for (lineno, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (term, label) = line
            .split_once('\t')
            .ok_or_else(|| format!("line {}: expected 'term<TAB>LABEL'", lineno + 1))?;
        let (term, label) = (term.trim(), label.trim());
        if term.is_empty() || label.is_empty() {
            return Err(format!("line {}: empty term or label", lineno + 1));
        }
        entries.push((term.to_string(), label.to_string()));
    }
    Ok(entries)
}

fn on_word_boundaries(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

fn remove_overlapping(mut entities: Vec<NerEntity>) -> Vec<NerEntity> {
    if entities.is_empty() {
        return entities;
    }

    // Start position, then longest first
    entities.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then_with(|| (b.end - b.start).cmp(&(a.end - a.start)))
    });

    let mut result = Vec::new();
    let mut last_end = 0;
    for entity in entities {
        if entity.start >= last_end {
            last_end = entity.end;
            result.push(entity);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn spans(entities: &[NerEntity]) -> Vec<(&str, &str)> {
        entities.iter().map(|e| (e.text.as_str(), e.label.as_str())).collect()
    }

    #[test]
    fn test_builtin_bc5cdr_finds_chemical_and_disease() {
        let ner = LexiconAnnotator::builtin("bc5cdr").unwrap();
        let found = ner.extract("Aspirin reduces inflammation.");
        assert_eq!(spans(&found), vec![("Aspirin", "CHEMICAL"), ("inflammation", "DISEASE")]);
        assert_eq!(found[0].start, 0);
        assert_eq!(found[0].end, 7);
    }

    #[test]
    fn test_longest_match_wins() {
        let ner = LexiconAnnotator::builtin("ncbi_disease").unwrap();
        let found = ner.extract("Risk of lung cancer rises with age.");
        assert_eq!(spans(&found), vec![("lung cancer", "DISEASE")]);
    }

    #[test]
    fn test_matches_respect_word_boundaries() {
        let ner = LexiconAnnotator::new("test", Domain::General, [("cancer", "DISEASE")]).unwrap();
        assert!(ner.extract("anticancer agents").is_empty());
        assert!(ner.extract("cancerous tissue").is_empty());
        assert_eq!(ner.extract("(cancer)").len(), 1);
    }

    #[test]
    fn test_duplicate_term_keeps_last_label() {
        let ner = LexiconAnnotator::new(
            "test",
            Domain::General,
            [("egfr", "PROTEIN"), ("EGFR", "GENE_OR_GENE_PRODUCT")],
        )
        .unwrap();
        assert_eq!(ner.stats().total_patterns, 1);
        assert_eq!(ner.stats().distinct_labels, 1);
        assert_eq!(spans(&ner.extract("EGFR")), vec![("EGFR", "GENE_OR_GENE_PRODUCT")]);
    }

    #[test]
    fn test_unknown_builtin_model_fails() {
        let err = LexiconAnnotator::builtin("craft").err().unwrap();
        assert!(matches!(err, NerError::ModelLoad(_)));
    }

    #[test]
    fn test_lexicon_file_extends_builtin() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# extra terms").unwrap();
        writeln!(file, "sotorasib\tCHEMICAL").unwrap();
        writeln!(file).unwrap();

        let ner = LexiconAnnotator::with_lexicon_file("bc5cdr", file.path()).unwrap();
        let found = ner.extract("Sotorasib and aspirin.");
        assert_eq!(spans(&found), vec![("Sotorasib", "CHEMICAL"), ("aspirin", "CHEMICAL")]);
    }

    #[test]
    fn test_malformed_lexicon_file_reports_line() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "sotorasib CHEMICAL").unwrap();

        let err = LexiconAnnotator::with_lexicon_file("bc5cdr", file.path()).err().unwrap();
        assert!(err.to_string().contains("line 1"));
    }

    #[tokio::test]
    async fn test_annotate_fills_words_and_entities() {
        let ner = LexiconAnnotator::builtin("bc5cdr").unwrap();
        let annotation = ner.annotate("Aspirin reduces inflammation.").await.unwrap();
        assert_eq!(
            annotation.tokens().collect::<Vec<_>>(),
            vec!["Aspirin", "reduces", "inflammation", "."]
        );
        assert_eq!(annotation.pos_tags().nth(1), Some(("reduces", "VBZ")));
        assert_eq!(annotation.lemmas().nth(1), Some("reduce"));
        assert_eq!(annotation.entities.len(), 2);
    }

    #[tokio::test]
    async fn test_split_sentences_through_annotator() {
        let ner = LexiconAnnotator::builtin("bc5cdr").unwrap();
        let sentences = ner.split_sentences("Aspirin reduces inflammation. It is widely used.").await.unwrap();
        assert_eq!(sentences, vec!["Aspirin reduces inflammation.", "It is widely used."]);
    }

    #[tokio::test]
    async fn test_annotate_empty_text() {
        let ner = LexiconAnnotator::builtin("s800").unwrap();
        let annotation = ner.annotate("").await.unwrap();
        assert!(annotation.words.is_empty());
        assert!(annotation.entities.is_empty());
    }
}
