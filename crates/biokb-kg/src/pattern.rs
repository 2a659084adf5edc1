//! Offline triple extraction driven by a lexicon of relation phrases.
//!
//! Each clause (split on `;`) yields at most one triple: the subject is the
//! text before the first relation phrase, the object is the text after it.

use aho_corasick::{AhoCorasick, MatchKind};
use async_trait::async_trait;
use biokb_common::Triple;

use crate::extractor::RelationExtractor;
use crate::{RelationError, Result};

const RELATION_PHRASES: &[&str] = &[
    "is", "are", "was", "were", "is associated with", "are associated with",
    "was associated with", "were associated with", "is involved in", "are involved in",
    "has", "have", "had", "contains", "contain",
    "reduces", "reduce", "reduced", "decreases", "decrease", "decreased",
    "increases", "increase", "increased", "inhibits", "inhibit", "inhibited",
    "activates", "activate", "activated", "induces", "induce", "induced",
    "causes", "cause", "caused", "prevents", "prevent", "prevented",
    "treats", "treat", "treated", "regulates", "regulate", "regulated",
    "upregulates", "downregulates", "suppresses", "suppress", "suppressed",
    "promotes", "promote", "promoted", "enhances", "enhance", "enhanced",
    "blocks", "block", "blocked", "targets", "target", "targeted",
    "binds", "bind", "binds to", "bind to", "bound to", "encodes", "encode",
    "interacts with", "interact with", "mediates", "mediate", "mediated",
    "improves", "improve", "improved", "correlates with", "correlated with",
    "leads to", "lead to", "led to", "results in", "resulted in",
    "expresses", "express", "expressed", "modulates", "modulate", "attenuates",
    "protects against", "contributes to", "depends on", "affects", "affect", "affected",
];

fn is_clause_trailer(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | ',' | ':' | ';') || c.is_whitespace()
}

pub struct PatternExtractor {
    automaton: AhoCorasick,
}

impl PatternExtractor {
    pub fn new() -> Result<Self> {
        Self::with_phrases(RELATION_PHRASES.iter().copied())
    }

    pub fn with_phrases<'a>(phrases: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let phrases: Vec<String> = phrases.into_iter().map(|p| p.trim().to_lowercase()).collect();
        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .ascii_case_insensitive(true)
            .build(&phrases)
            .map_err(|e| RelationError::Config(format!("invalid relation phrases: {e}")))?;
        Ok(Self { automaton })
    }

    /// The leftmost relation phrase on word boundaries, longest first.
    fn find_relation(&self, clause: &str) -> Option<(usize, usize)> {
        self.automaton
            .find_overlapping_iter(clause)
            .filter(|m| {
                let before = clause[..m.start()].chars().next_back();
                let after = clause[m.end()..].chars().next();
                !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
            })
            .map(|m| (m.start(), m.end()))
            .min_by(|a, b| a.0.cmp(&b.0).then_with(|| b.1.cmp(&a.1)))
    }

    pub fn extract(&self, sentence: &str) -> Vec<Triple> {
        sentence
            .split(';')
            .filter_map(|clause| {
                let (start, end) = self.find_relation(clause)?;
                let subject = clause[..start].trim_matches(is_clause_trailer);
                let object = clause[end..].trim_matches(is_clause_trailer);
                if subject.is_empty() || object.is_empty() {
                    return None;
                }
                Some(Triple::new(subject, &clause[start..end], object))
            })
            .collect()
    }
}

#[async_trait]
impl RelationExtractor for PatternExtractor {
    fn name(&self) -> &str {
        "pattern"
    }

    async fn extract_triples(&self, sentence: &str) -> Result<Vec<Triple>> {
        Ok(self.extract(sentence))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_clause() {
        let extractor = PatternExtractor::new().unwrap();
        assert_eq!(
            extractor.extract("Aspirin reduces inflammation."),
            vec![Triple::new("Aspirin", "reduces", "inflammation")]
        );
    }

    #[test]
    fn test_longest_phrase_at_same_position() {
        let extractor = PatternExtractor::new().unwrap();
        assert_eq!(
            extractor.extract("Obesity is associated with type 2 diabetes."),
            vec![Triple::new("Obesity", "is associated with", "type 2 diabetes")]
        );
    }

    #[test]
    fn test_phrase_inside_word_is_ignored() {
        let extractor = PatternExtractor::new().unwrap();
        // "this" contains "is" but is not a relation
        assert_eq!(
            extractor.extract("In this cohort, metformin improved survival."),
            vec![Triple::new("In this cohort, metformin", "improved", "survival")]
        );
    }

    #[test]
    fn test_one_triple_per_clause() {
        let extractor = PatternExtractor::new().unwrap();
        let triples = extractor.extract("KRAS activates MEK; MEK activates ERK.");
        assert_eq!(
            triples,
            vec![Triple::new("KRAS", "activates", "MEK"), Triple::new("MEK", "activates", "ERK")]
        );
    }

    #[test]
    fn test_no_relation_or_missing_argument() {
        let extractor = PatternExtractor::new().unwrap();
        assert!(extractor.extract("Background and aims.").is_empty());
        assert!(extractor.extract("Increased.").is_empty());
        assert!(extractor.extract("").is_empty());
    }

    #[tokio::test]
    async fn test_trait_call_matches_extract() {
        let extractor = PatternExtractor::new().unwrap();
        let triples = extractor.extract_triples("It is widely used.").await.unwrap();
        assert_eq!(triples, vec![Triple::new("It", "is", "widely used")]);
    }
}
