// Utility functions for text windows and number formatting
use regex::RegexBuilder;

/// Slice of text around a byte range, widened by `radius` characters on each side
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextWindow<'a> {
    pub text: &'a str,
    /// Window starts after the beginning of the source text
    pub cut_start: bool,
    /// Window ends before the end of the source text
    pub cut_end: bool,
}

/// Widen `[start, end)` (byte offsets on char boundaries) by `radius` characters
pub fn char_window(text: &str, start: usize, end: usize, radius: usize) -> TextWindow<'_> {
    let window_start = text[..start]
        .char_indices()
        .rev()
        .nth(radius.saturating_sub(1))
        .map(|(i, _)| i)
        .unwrap_or(0);
    let window_start = if radius == 0 { start } else { window_start };

    let window_end = text[end..]
        .char_indices()
        .nth(radius)
        .map(|(i, _)| end + i)
        .unwrap_or(text.len());

    TextWindow {
        text: &text[window_start..window_end],
        cut_start: window_start > 0,
        cut_end: window_end < text.len(),
    }
}

/// Byte range of the first case-insensitive literal occurrence of `term`
pub fn find_case_insensitive(text: &str, term: &str) -> Option<(usize, usize)> {
    if term.is_empty() {
        return None;
    }
    let regex = RegexBuilder::new(&regex::escape(term))
        .case_insensitive(true)
        .build()
        .ok()?;
    regex.find(text).map(|m| (m.start(), m.end()))
}

/// Snippets around the first occurrence of `term` in each comment containing it
///
/// Each snippet keeps `radius` characters on either side, is trimmed, and
/// carries `...` where it was cut. At most `max` snippets are returned.
pub fn extract_contexts(term: &str, corpus: &[String], max: usize, radius: usize) -> Vec<String> {
    let mut contexts = Vec::new();

    for comment in corpus {
        if contexts.len() >= max {
            break;
        }
        let Some((start, end)) = find_case_insensitive(comment, term) else {
            continue;
        };

        let window = char_window(comment, start, end, radius);
        let mut context = window.text.trim().to_string();
        if window.cut_start {
            context.insert_str(0, "...");
        }
        if window.cut_end {
            context.push_str("...");
        }
        contexts.push(context);
    }

    contexts
}

/// Round to a fixed number of decimal places
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_window_counts_characters() {
        let text = "가나다라마바사";
        // "라" is bytes 9..12
        let window = char_window(text, 9, 12, 2);
        assert_eq!(window.text, "나다라마바");
        assert!(window.cut_start);
        assert!(window.cut_end);
    }

    #[test]
    fn test_char_window_clamps_at_edges() {
        let text = "memory leak here";
        let window = char_window(text, 0, 6, 50);
        assert_eq!(window.text, text);
        assert!(!window.cut_start);
        assert!(!window.cut_end);
    }

    #[test]
    fn test_find_case_insensitive_literal() {
        assert_eq!(find_case_insensitive("Use React.memo", "react.memo"), Some((4, 14)));
        assert_eq!(find_case_insensitive("reactxmemo", "react.memo"), None);
        assert_eq!(find_case_insensitive("anything", ""), None);
    }

    #[test]
    fn test_extract_contexts_ellipsis() {
        let corpus = vec![
            "This function has a serious performance problem in the render loop right now"
                .to_string(),
            "short performance".to_string(),
        ];
        let contexts = extract_contexts("performance", &corpus, 3, 25);

        assert_eq!(contexts.len(), 2);
        assert!(contexts[0].starts_with("..."));
        assert!(contexts[0].ends_with("..."));
        assert!(contexts[0].contains("performance"));
        assert_eq!(contexts[1], "short performance");
    }

    #[test]
    fn test_extract_contexts_max() {
        let corpus: Vec<String> = (0..5).map(|i| format!("cache miss {}", i)).collect();
        let contexts = extract_contexts("CACHE", &corpus, 3, 25);
        assert_eq!(contexts.len(), 3);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(3.14159, 1), 3.1);
        assert_eq!(round_to(0.12345, 3), 0.123);
        assert_eq!(round_to(2.0, 1), 2.0);
    }
}
