//! Local comment input adapter
//!
//! `-` reads stdin, `*.json` files hold a JSON array of strings, any other
//! file holds one comment per non-empty line.

use crate::error::{Result, ReviewLensError};
use std::io::Read;
use std::path::Path;

/// Load and concatenate comments from every input, in order
pub fn load_corpus<P: AsRef<Path>>(inputs: &[P]) -> Result<Vec<String>> {
    let mut corpus = Vec::new();
    for input in inputs {
        let input = input.as_ref();
        let comments = if input == Path::new("-") {
            let mut content = String::new();
            std::io::stdin()
                .read_to_string(&mut content)
                .map_err(|e| ReviewLensError::Io {
                    source: e,
                    context: "Failed to read comments from stdin".to_string(),
                })?;
            parse_comments(&content, false)?
        } else {
            let content = std::fs::read_to_string(input).map_err(|e| ReviewLensError::Io {
                source: e,
                context: format!("Failed to read comments file: {:?}", input),
            })?;
            let is_json = input
                .extension()
                .map_or(false, |ext| ext.eq_ignore_ascii_case("json"));
            parse_comments(&content, is_json)?
        };
        tracing::debug!("Loaded {} comments from {:?}", comments.len(), input);
        corpus.extend(comments);
    }
    Ok(corpus)
}

/// Decode one input's content
pub fn parse_comments(content: &str, json: bool) -> Result<Vec<String>> {
    if json {
        return serde_json::from_str::<Vec<String>>(content).map_err(|e| {
            ReviewLensError::Corpus(format!("Expected a JSON array of strings: {}", e))
        });
    }
    Ok(content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lines() {
        let comments = parse_comments("first\n\n  \nsecond line\n", false).unwrap();
        assert_eq!(comments, vec!["first", "second line"]);
    }

    #[test]
    fn test_parse_json() {
        let comments = parse_comments(r#"["a\nmultiline", "", "b"]"#, true).unwrap();
        assert_eq!(comments.len(), 3);
        assert_eq!(comments[0], "a\nmultiline");
    }

    #[test]
    fn test_parse_json_rejects_objects() {
        let err = parse_comments(r#"{"comments": []}"#, true).unwrap_err();
        assert!(matches!(err, ReviewLensError::Corpus(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_corpus(&["/definitely/not/here.txt"]).unwrap_err();
        assert!(matches!(err, ReviewLensError::Io { .. }));
    }
}
