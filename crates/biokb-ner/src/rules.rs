//! Rule-based tokenization, Penn Treebank tagging, lemmatization and sentence
//! splitting for the offline annotator.
//!
//! None of this aims at parser quality. It gives every sentence a stable,
//! deterministic token stream so records can be built without a model server.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

/// Abbreviations whose trailing period never ends a sentence (lower-cased, without the final period).
const ABBREVIATIONS: &[&str] = &[
    "e.g", "i.e", "al", "fig", "figs", "vs", "dr", "mr", "mrs", "ms", "no", "nos", "approx", "ca",
    "cf", "ref", "refs", "eq", "vol", "u.s", "st", "resp", "spp", "sp",
];

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // decimals | words with inner hyphen/apostrophe/slash | any other single symbol
        Regex::new(r"\p{N}+(?:[.,]\p{N}+)+|[\p{L}\p{N}]+(?:['’/\-][\p{L}\p{N}]+)*|[^\s\p{L}\p{N}]")
            .expect("token pattern is valid")
    })
}

/// Split text into word and punctuation tokens.
pub fn tokenize(text: &str) -> Vec<&str> {
    token_regex().find_iter(text).map(|m| m.as_str()).collect()
}

fn closed_class() -> &'static HashMap<&'static str, &'static str> {
    static MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    MAP.get_or_init(|| {
        let mut m = HashMap::new();
        for w in ["the", "a", "an", "this", "that", "these", "those", "each", "every", "no", "some", "any", "all", "both", "another", "either", "neither"] {
            m.insert(w, "DT");
        }
        for w in [
            "of", "in", "on", "at", "by", "for", "with", "from", "into", "during", "after", "before",
            "between", "through", "against", "among", "under", "over", "via", "per", "than", "as",
            "because", "although", "whereas", "while", "if", "whether", "within", "without", "upon",
            "across", "toward", "towards", "despite", "since", "until", "about", "following",
        ] {
            m.insert(w, "IN");
        }
        for w in ["and", "or", "but", "nor", "plus"] {
            m.insert(w, "CC");
        }
        m.insert("to", "TO");
        for w in ["can", "could", "may", "might", "must", "shall", "should", "will", "would"] {
            m.insert(w, "MD");
        }
        for w in ["it", "he", "she", "they", "we", "i", "you", "them", "us", "him", "itself", "themselves"] {
            m.insert(w, "PRP");
        }
        for w in ["its", "their", "our", "his", "her", "my", "your"] {
            m.insert(w, "PRP$");
        }
        for (w, t) in [
            ("is", "VBZ"), ("has", "VBZ"), ("does", "VBZ"),
            ("are", "VBP"), ("have", "VBP"), ("do", "VBP"), ("am", "VBP"),
            ("was", "VBD"), ("were", "VBD"), ("had", "VBD"), ("did", "VBD"),
            ("be", "VB"), ("been", "VBN"), ("being", "VBG"),
        ] {
            m.insert(w, t);
        }
        for w in ["not", "also", "very", "however", "often", "well", "still", "only", "further", "thus", "therefore", "here", "then", "never", "always", "too"] {
            m.insert(w, "RB");
        }
        for w in ["more", "less"] {
            m.insert(w, "RBR");
        }
        for w in ["most", "least"] {
            m.insert(w, "RBS");
        }
        for w in ["which", "whose"] {
            m.insert(w, "WDT");
        }
        for w in ["who", "whom", "what"] {
            m.insert(w, "WP");
        }
        for w in ["when", "where", "how", "why"] {
            m.insert(w, "WRB");
        }
        m.insert("there", "EX");
        for w in ["such", "other", "new", "high", "low", "many", "several", "same", "different", "human"] {
            m.insert(w, "JJ");
        }
        m
    })
}

fn punctuation_tag(token: &str) -> Option<&'static str> {
    let tag = match token {
        "." | "!" | "?" => ".",
        "," => ",",
        ":" | ";" | "-" | "–" | "—" | "..." => ":",
        "(" | "[" | "{" => "-LRB-",
        ")" | "]" | "}" => "-RRB-",
        "\"" | "“" | "”" | "'" | "‘" | "’" | "`" => "''",
        "$" | "€" | "£" => "$",
        "#" => "#",
        "%" => "NN",
        _ => {
            if token.chars().all(|c| !c.is_alphanumeric()) {
                "SYM"
            } else {
                return None;
            }
        }
    };
    Some(tag)
}

fn is_aux(word: &str) -> bool {
    matches!(
        word,
        "is" | "are" | "was" | "were" | "be" | "been" | "being" | "has" | "have" | "had" | "get" | "got"
    )
}

const ADJECTIVE_SUFFIXES: &[&str] = &["ous", "ive", "ical", "ic", "al", "able", "ible", "ful", "less", "ary", "ant", "ent"];
const NOUN_SUFFIXES: &[&str] = &["tion", "sion", "ment", "ness", "ity", "ism", "ance", "ence", "ogy", "sis"];

fn tag_token(token: &str, sentence_start: bool, prev_tag: Option<&str>, recent: &[String]) -> &'static str {
    if let Some(tag) = punctuation_tag(token) {
        return tag;
    }

    let has_alpha = token.chars().any(|c| c.is_alphabetic());
    if !has_alpha {
        return "CD";
    }

    let lower = token.to_lowercase();
    if let Some(tag) = closed_class().get(lower.as_str()) {
        return tag;
    }
    if matches!(prev_tag, Some("TO") | Some("MD")) {
        return "VB";
    }

    let has_digit = token.chars().any(|c| c.is_numeric());
    let has_upper = token.chars().any(|c| c.is_uppercase());
    let all_upper = token.chars().filter(|c| c.is_alphabetic()).all(|c| c.is_uppercase());
    if has_digit {
        return if has_upper { "NNP" } else { "NN" };
    }
    if token.chars().count() > 1 && all_upper {
        return "NNP";
    }
    if has_upper && !sentence_start {
        return "NNP";
    }

    let len = lower.chars().count();
    if len > 4 && lower.ends_with("ly") {
        return "RB";
    }
    if len > 5 && lower.ends_with("ing") {
        return "VBG";
    }
    if len > 3 && lower.ends_with("ed") {
        if recent.iter().any(|w| is_aux(w)) {
            return "VBN";
        }
        return match prev_tag {
            Some("NN") | Some("NNS") | Some("NNP") | Some("PRP") => "VBD",
            _ => "VBN",
        };
    }
    if NOUN_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        return "NN";
    }
    if len > 3 && lower.ends_with('s') && !lower.ends_with("ss") && !lower.ends_with("us") && !lower.ends_with("is") {
        return match prev_tag {
            Some("NN") | Some("NNP") | Some("PRP") => "VBZ",
            _ => "NNS",
        };
    }
    if len > 4 && ADJECTIVE_SUFFIXES.iter().any(|s| lower.ends_with(s)) {
        return "JJ";
    }
    "NN"
}

/// Assign a Penn Treebank tag to every token of one sentence.
pub fn tag_tokens(tokens: &[&str]) -> Vec<&'static str> {
    let mut tags: Vec<&'static str> = Vec::with_capacity(tokens.len());
    let mut recent: Vec<String> = Vec::with_capacity(2);

    for token in tokens {
        let prev_tag = tags.last().copied();
        let sentence_start = matches!(prev_tag, None | Some(".") | Some("''") | Some("-LRB-"));
        let tag = tag_token(token, sentence_start, prev_tag, &recent);
        tags.push(tag);

        if recent.len() == 2 {
            recent.remove(0);
        }
        recent.push(token.to_lowercase());
    }

    tags
}

fn irregular_lemmas() -> &'static HashMap<&'static str, &'static str> {
    static MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    MAP.get_or_init(|| {
        HashMap::from([
            ("is", "be"), ("are", "be"), ("was", "be"), ("were", "be"), ("been", "be"),
            ("being", "be"), ("am", "be"), ("has", "have"), ("had", "have"), ("does", "do"),
            ("did", "do"), ("done", "do"), ("mice", "mouse"), ("children", "child"),
            ("men", "man"), ("women", "woman"), ("feet", "foot"), ("teeth", "tooth"),
            ("made", "make"), ("found", "find"), ("shown", "show"), ("given", "give"),
            ("taken", "take"), ("seen", "see"), ("known", "know"), ("led", "lead"),
            ("began", "begin"), ("held", "hold"), ("became", "become"), ("underwent", "undergo"),
            ("undergone", "undergo"), ("its", "its"), ("data", "data"),
        ])
    })
}

fn strip_plural(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        if stem.chars().count() > 1 {
            return format!("{stem}y");
        }
    }
    for suffix in ["sses", "shes", "ches", "xes", "zes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return word.to_string();
    }
    word.strip_suffix('s').unwrap_or(word).to_string()
}

fn needs_silent_e(stem: &str) -> bool {
    if stem.ends_with("ss") {
        return false;
    }
    if stem.ends_with(['c', 'g', 's', 'v', 'z', 'u']) {
        return true;
    }
    // activat -> activate, but treat stays treat
    let bytes = stem.as_bytes();
    let n = bytes.len();
    n > 3 && stem.ends_with("at") && !b"aeiou".contains(&bytes[n - 3])
}

fn strip_verb_suffix(word: &str, suffix: &str) -> String {
    let Some(stem) = word.strip_suffix(suffix) else {
        return word.to_string();
    };
    if stem.len() < 2 || !stem.is_ascii() {
        return stem.to_string();
    }

    let bytes = stem.as_bytes();
    let n = bytes.len();
    // stopped -> stop; killed keeps its double l
    if n >= 3 && bytes[n - 1] == bytes[n - 2] && !b"aeiouls".contains(&bytes[n - 1]) {
        return stem[..n - 1].to_string();
    }
    if needs_silent_e(stem) {
        return format!("{stem}e");
    }
    stem.to_string()
}

/// Dictionary form of a token given its tag.
pub fn lemmatize(token: &str, tag: &str) -> String {
    if matches!(tag, "NNP" | "NNPS") {
        return token.to_string();
    }

    let lower = token.to_lowercase();
    if let Some(lemma) = irregular_lemmas().get(lower.as_str()) {
        return lemma.to_string();
    }

    match tag {
        "NNS" | "VBZ" => strip_plural(&lower),
        "VBG" => strip_verb_suffix(&lower, "ing"),
        "VBD" | "VBN" => match lower.strip_suffix("ied") {
            Some(stem) => format!("{stem}y"),
            None => strip_verb_suffix(&lower, "ed"),
        },
        _ => lower,
    }
}

fn opens_sentence(c: char) -> bool {
    c.is_uppercase() || c.is_numeric() || matches!(c, '"' | '“' | '(' | '[')
}

fn ends_with_abbreviation(before: &str) -> bool {
    let word = before
        .rsplit(|c: char| c.is_whitespace() || c == '(')
        .next()
        .unwrap_or("");
    if ABBREVIATIONS.contains(&word.to_lowercase().as_str()) {
        return true;
    }
    // Single initials as in "J. Smith"
    let mut chars = word.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if c.is_uppercase())
}

fn push_trimmed(out: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        out.push(piece.to_string());
    }
}

/// Split text at sentence-final punctuation followed by whitespace and a
/// sentence-opening character.
pub fn split_sentences(text: &str) -> Vec<String> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        let (pos, c) = chars[i];
        if !matches!(c, '.' | '!' | '?') {
            i += 1;
            continue;
        }

        // Absorb repeated terminators and closing quotes or brackets
        let mut j = i + 1;
        while j < chars.len() && matches!(chars[j].1, '.' | '!' | '?' | '"' | '\'' | ')' | ']' | '”' | '’') {
            j += 1;
        }
        if j >= chars.len() {
            break;
        }
        if !chars[j].1.is_whitespace() {
            i = j;
            continue;
        }

        let mut k = j;
        while k < chars.len() && chars[k].1.is_whitespace() {
            k += 1;
        }
        let boundary = k < chars.len()
            && opens_sentence(chars[k].1)
            && !(c == '.' && ends_with_abbreviation(&text[start..pos]));

        if boundary {
            push_trimmed(&mut sentences, &text[start..chars[j].0]);
            start = chars[k].0;
            i = k;
        } else {
            i = j;
        }
    }

    push_trimmed(&mut sentences, &text[start..]);
    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_keeps_biomedical_names_whole() {
        let tokens = tokenize("IL-6 and COVID-19 rose by 3.5% (p<0.05).");
        assert_eq!(
            tokens,
            vec!["IL-6", "and", "COVID-19", "rose", "by", "3.5", "%", "(", "p", "<", "0.05", ")", "."]
        );
    }

    #[test]
    fn test_tag_simple_sentence() {
        let tokens = tokenize("Aspirin reduces inflammation.");
        assert_eq!(tag_tokens(&tokens), vec!["NN", "VBZ", "NN", "."]);
    }

    #[test]
    fn test_tag_passive_construction() {
        let tokens = tokenize("It is widely used.");
        assert_eq!(tag_tokens(&tokens), vec!["PRP", "VBZ", "RB", "VBN", "."]);
    }

    #[test]
    fn test_tag_proper_nouns_and_modals() {
        let tokens = tokenize("Mutations in KRAS may drive tumors.");
        let tags = tag_tokens(&tokens);
        assert_eq!(tags[0], "NNS");
        assert_eq!(tags[2], "NNP");
        assert_eq!(tags[3], "MD");
        assert_eq!(tags[4], "VB");
    }

    #[test]
    fn test_lemmatize_verbs_and_plurals() {
        assert_eq!(lemmatize("reduces", "VBZ"), "reduce");
        assert_eq!(lemmatize("used", "VBN"), "use");
        assert_eq!(lemmatize("is", "VBZ"), "be");
        assert_eq!(lemmatize("studies", "NNS"), "study");
        assert_eq!(lemmatize("processes", "NNS"), "process");
        assert_eq!(lemmatize("stopped", "VBD"), "stop");
        assert_eq!(lemmatize("activated", "VBN"), "activate");
        assert_eq!(lemmatize("treated", "VBN"), "treat");
        assert_eq!(lemmatize("reducing", "VBG"), "reduce");
        assert_eq!(lemmatize("Mice", "NNS"), "mouse");
    }

    #[test]
    fn test_lemmatize_keeps_proper_nouns() {
        assert_eq!(lemmatize("KRAS", "NNP"), "KRAS");
        assert_eq!(lemmatize("Aspirin", "NN"), "aspirin");
    }

    #[test]
    fn test_split_two_sentences() {
        let sentences = split_sentences("Aspirin reduces inflammation. It is widely used.");
        assert_eq!(sentences, vec!["Aspirin reduces inflammation.", "It is widely used."]);
    }

    #[test]
    fn test_split_respects_abbreviations_and_initials() {
        let text = "Smith et al. Reported a drug, e.g. Aspirin. Dr. J. Smith agreed! Was it safe?";
        let sentences = split_sentences(text);
        assert_eq!(
            sentences,
            vec![
                "Smith et al. Reported a drug, e.g. Aspirin.",
                "Dr. J. Smith agreed!",
                "Was it safe?",
            ]
        );
    }

    #[test]
    fn test_split_does_not_break_decimals_or_lowercase_continuations() {
        let sentences = split_sentences("Levels rose 2.5 fold. then fell. Finally stable");
        assert_eq!(sentences, vec!["Levels rose 2.5 fold. then fell.", "Finally stable"]);
    }

    #[test]
    fn test_split_empty_text() {
        assert!(split_sentences("   \n ").is_empty());
    }
}
