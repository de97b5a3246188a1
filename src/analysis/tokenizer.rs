// Markup stripping and tokenization for review comments
// Comments arrive as raw markdown/HTML; tokens are lowercase word units
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

use crate::lexicon::Lexicon;

static FENCED_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```.*?```").expect("fenced code pattern"));
static INLINE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`[^`]*`").expect("inline code pattern"));
static MARKDOWN_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").expect("markdown link pattern"));
static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("html tag pattern"));
static EMPHASIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[#*_~`]").expect("emphasis pattern"));
static NON_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_\s가-힣]").expect("non-word pattern"));
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern"));
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z0-9_가-힣]+").expect("word pattern"));

/// Strip markup from a comment and collapse whitespace
///
/// Order matters: code spans go first so their contents never leak into
/// tokens, links keep only their anchor text.
pub fn strip_markup(text: &str) -> String {
    let text = FENCED_CODE.replace_all(text, "");
    let text = INLINE_CODE.replace_all(&text, "");
    let text = MARKDOWN_LINK.replace_all(&text, "$1");
    let text = HTML_TAG.replace_all(&text, "");
    let text = EMPHASIS.replace_all(&text, "");
    let text = NON_WORD.replace_all(&text, " ");
    let text = WHITESPACE.replace_all(&text, " ");
    text.trim().to_string()
}

/// Stopword-aware tokenizer
pub struct Tokenizer {
    lexicon: Arc<Lexicon>,
}

impl Tokenizer {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// Tokenize one comment
    ///
    /// Drops tokens shorter than two characters, stopwords, and purely
    /// numeric tokens.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let normalized = strip_markup(text).to_lowercase();

        WORD.find_iter(&normalized)
            .map(|m| m.as_str())
            .filter(|token| self.keep(token))
            .map(str::to_string)
            .collect()
    }

    /// Tokenize every comment independently
    pub fn tokenize_all(&self, corpus: &[String]) -> Vec<Vec<String>> {
        corpus.iter().map(|comment| self.tokenize(comment)).collect()
    }

    fn keep(&self, token: &str) -> bool {
        if token.chars().count() < 2 {
            return false;
        }
        if token.chars().all(|c| c.is_ascii_digit()) {
            return false;
        }
        !self.lexicon.is_stopword(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_tokenizer() -> Tokenizer {
        Tokenizer::new(Arc::new(
            Lexicon::builtin().expect("Failed to create test lexicon"),
        ))
    }

    #[test]
    fn test_strip_code_spans() {
        let text = "before ```rust\nlet x = 1;\n``` middle `inline()` after";
        assert_eq!(strip_markup(text), "before middle after");
    }

    #[test]
    fn test_strip_links_keep_anchor() {
        let text = "see [the docs](https://example.com/a_b) please";
        assert_eq!(strip_markup(text), "see the docs please");
    }

    #[test]
    fn test_strip_html_and_emphasis() {
        let text = "<b>**important**</b> ## heading ~~gone~~";
        assert_eq!(strip_markup(text), "important heading gone");
    }

    #[test]
    fn test_punctuation_becomes_space() {
        assert_eq!(strip_markup("성능,문제!  fix-me"), "성능 문제 fix me");
    }

    #[test]
    fn test_tokenize_filters() {
        let tokenizer = create_test_tokenizer();
        let tokens = tokenizer.tokenize("The Cache is 100 times faster 및 a x 성능");

        assert!(tokens.contains(&"cache".to_string()));
        assert!(tokens.contains(&"faster".to_string()));
        assert!(tokens.contains(&"성능".to_string()));
        // stopwords
        assert!(!tokens.contains(&"the".to_string()));
        assert!(!tokens.contains(&"is".to_string()));
        // numeric
        assert!(!tokens.contains(&"100".to_string()));
        // single character
        assert!(!tokens.contains(&"및".to_string()));
        assert!(!tokens.contains(&"x".to_string()));
    }

    #[test]
    fn test_tokenize_ignores_code() {
        let tokenizer = create_test_tokenizer();
        let tokens = tokenizer.tokenize("rename `someVariable` please");
        assert_eq!(tokens, vec!["rename", "please"]);
    }

    #[test]
    fn test_tokenize_empty() {
        let tokenizer = create_test_tokenizer();
        assert!(tokenizer.tokenize("").is_empty());
        assert!(tokenizer.tokenize("```only code```").is_empty());
    }

    #[test]
    fn test_mixed_alphanumeric_kept() {
        let tokenizer = create_test_tokenizer();
        let tokens = tokenizer.tokenize("upgrade to v2 and es2020");
        assert!(tokens.contains(&"v2".to_string()));
        assert!(tokens.contains(&"es2020".to_string()));
    }
}
