//! Search token generation.
//!
//! Every snippet record carries a single space-joined string of lower-cased,
//! unique search terms built from its title, the collection's language
//! names, its non-expertise tags and the words of its short excerpt.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

/// Splits free text into search terms.
pub trait Tokenize: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

static NON_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\-']+").expect("non-word regex"));

/// Common English words that carry no search value.
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for",
    "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself",
    "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "it's", "its", "itself",
    "just", "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on",
    "once", "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "same",
    "she", "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too",
    "under", "until", "up", "use", "uses", "using", "very", "was", "we", "were", "what", "when",
    "where", "which", "while", "who", "whom", "why", "will", "with", "would", "you", "your",
    "yours", "yourself", "yourselves",
];

/// Default tokenizer: lower-case words of two or more characters, minus
/// stop words, each kept once in order of first appearance.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchTokenizer;

impl Tokenize for SearchTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        let cleaned = NON_WORD_RE.replace_all(&lowered, " ");
        let mut seen = HashSet::new();

        cleaned
            .split_whitespace()
            .map(|w| w.trim_matches(|c| c == '-' || c == '\''))
            .filter(|w| w.chars().count() >= 2 && !STOP_WORDS.contains(w))
            .filter(|w| seen.insert(*w))
            .map(str::to_string)
            .collect()
    }
}

/// Merge terms into a search token string.
///
/// Terms are lower-cased, empty ones dropped, and duplicates removed
/// case-insensitively keeping the first occurrence.
pub fn search_tokens<I, S>(terms: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut tokens = Vec::new();

    for term in terms {
        let term = term.as_ref().trim().to_lowercase();
        if !term.is_empty() && seen.insert(term.clone()) {
            tokens.push(term);
        }
    }

    tokens.join(" ")
}
