// Bigram/trigram phrase extraction
// Windows never cross comment boundaries
use ahash::{HashMap, HashMapExt};

use crate::analysis::types::Phrase;
use crate::config::PhraseConfig;

/// Frequent n-gram extractor
pub struct PhraseExtractor {
    config: PhraseConfig,
}

impl PhraseExtractor {
    pub fn new(config: PhraseConfig) -> Self {
        Self { config }
    }

    /// Count contiguous 2- and 3-token windows per tokenized comment
    ///
    /// Phrases below `min_frequency` are dropped; the rest are sorted by
    /// count descending (ties keep first-encounter order) and capped.
    pub fn extract(&self, documents: &[Vec<String>]) -> Vec<Phrase> {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut phrases: Vec<Phrase> = Vec::new();

        for tokens in documents {
            for n in [2, 3] {
                for window in tokens.windows(n) {
                    let text = window.join(" ");
                    match index.get(&text) {
                        Some(&slot) => phrases[slot].count += 1,
                        None => {
                            index.insert(text.clone(), phrases.len());
                            phrases.push(Phrase { text, count: 1 });
                        }
                    }
                }
            }
        }

        phrases.retain(|p| p.count >= self.config.min_frequency);
        phrases.sort_by(|a, b| b.count.cmp(&a.count));
        phrases.truncate(self.config.max_phrases);
        phrases
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(lines: &[&[&str]]) -> Vec<Vec<String>> {
        lines
            .iter()
            .map(|tokens| tokens.iter().map(|t| t.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_bigrams_and_trigrams() {
        let extractor = PhraseExtractor::new(PhraseConfig::default());
        let documents = docs(&[
            &["memory", "leak", "detected"],
            &["memory", "leak", "detected"],
            &["memory", "leak"],
        ]);
        let phrases = extractor.extract(&documents);

        assert_eq!(phrases[0], Phrase { text: "memory leak".into(), count: 3 });
        assert!(phrases.contains(&Phrase { text: "leak detected".into(), count: 2 }));
        assert!(phrases.contains(&Phrase {
            text: "memory leak detected".into(),
            count: 2
        }));
    }

    #[test]
    fn test_windows_do_not_span_comments() {
        let extractor = PhraseExtractor::new(PhraseConfig::default());
        let documents = docs(&[&["alpha", "beta"], &["gamma", "delta"], &["beta", "gamma"]]);
        let phrases = extractor.extract(&documents);
        // "beta gamma" appears once inside a comment only
        assert!(phrases.is_empty());
    }

    #[test]
    fn test_cap_and_min_frequency() {
        let config = PhraseConfig {
            min_frequency: 1,
            max_phrases: 3,
        };
        let extractor = PhraseExtractor::new(config);
        let documents = docs(&[&["a1", "b1", "c1", "d1", "e1"]]);
        let phrases = extractor.extract(&documents);
        assert_eq!(phrases.len(), 3);
        assert!(phrases.iter().all(|p| p.count == 1));
    }

    #[test]
    fn test_empty_documents() {
        let extractor = PhraseExtractor::new(PhraseConfig::default());
        assert!(extractor.extract(&[]).is_empty());
        assert!(extractor.extract(&docs(&[&["single"]])).is_empty());
    }
}
