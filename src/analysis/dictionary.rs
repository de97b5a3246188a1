// Dictionary-weighted keyword scoring with context sentiment
//
// Dictionary keywords are matched as case-insensitive literals against the
// raw text, so multi-word entries like "memory leak" match as substrings.
// score = frequency * group weight * sentiment multiplier
//
// With tone adjustment on, each match is also scaled by the tone multiplier
// of the comment it was found in.
use ahash::HashMap;
use std::sync::Arc;

use crate::analysis::tone::ToneAnalyzer;
use crate::analysis::types::{Category, Keyword, Sentiment, Strategy};
use crate::analysis::utils;
use crate::analysis::KeywordScorer;
use crate::config::DictionaryConfig;
use crate::lexicon::Lexicon;

/// Merged match data for one normalized keyword
struct DictionaryMatch {
    text: String,
    frequency: u32,
    /// Sum of per-comment counts times that comment's tone multiplier
    toned_frequency: f64,
    weight: f64,
    category: Category,
}

/// Keyword matches accumulated over one or more comments
#[derive(Default)]
struct MatchSet {
    index: HashMap<String, usize>,
    matches: Vec<DictionaryMatch>,
}

impl MatchSet {
    fn add(&mut self, lexicon: &Lexicon, text: &str, tone_multiplier: f64) {
        for entry in &lexicon.dictionary {
            let count = entry.regex.find_iter(text).count() as u32;
            if count == 0 {
                continue;
            }
            let toned = count as f64 * tone_multiplier;
            match self.index.get(&entry.normalized) {
                Some(&slot) => {
                    self.matches[slot].frequency += count;
                    self.matches[slot].toned_frequency += toned;
                }
                None => {
                    self.index.insert(entry.normalized.clone(), self.matches.len());
                    self.matches.push(DictionaryMatch {
                        text: entry.normalized.clone(),
                        frequency: count,
                        toned_frequency: toned,
                        weight: entry.weight,
                        category: entry.category,
                    });
                }
            }
        }
    }
}

/// Domain dictionary scorer over the dictionary taxonomy
pub struct DictionaryScorer {
    lexicon: Arc<Lexicon>,
    tone: ToneAnalyzer,
    config: DictionaryConfig,
}

impl DictionaryScorer {
    pub fn new(lexicon: Arc<Lexicon>, config: DictionaryConfig) -> Self {
        Self {
            tone: ToneAnalyzer::new(lexicon.clone()),
            lexicon,
            config,
        }
    }

    /// Score one block of text as a single comment
    ///
    /// Keywords appearing in several groups keep the first group's weight and
    /// category and sum their frequencies.
    pub fn score_text(&self, text: &str) -> Vec<Keyword> {
        let mut set = MatchSet::default();
        set.add(&self.lexicon, text, self.tone_multiplier(text));
        self.rank(text, set)
    }

    fn tone_multiplier(&self, comment: &str) -> f64 {
        if !self.config.tone_adjustment {
            return 1.0;
        }
        let report = self.tone.analyze(comment);
        tracing::trace!(
            "Tone {:?}, intent {:?}, multiplier {:.2}",
            report.tone,
            report.intent,
            report.multiplier
        );
        report.multiplier
    }

    /// Build, sort and cap keywords; contexts are cut from `text`
    fn rank(&self, text: &str, set: MatchSet) -> Vec<Keyword> {
        let mut keywords: Vec<Keyword> = set
            .matches
            .into_iter()
            .map(|m| self.build_keyword(text, m))
            .collect();

        keywords.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        keywords.truncate(self.config.max_keywords);

        tracing::debug!("Dictionary matched {} keywords", keywords.len());
        keywords
    }

    fn build_keyword(&self, text: &str, m: DictionaryMatch) -> Keyword {
        let (sentiment, multiplier, contexts) =
            match utils::find_case_insensitive(text, &m.text) {
                Some((start, end)) => {
                    let window = utils::char_window(text, start, end, self.config.context_window);
                    let (sentiment, multiplier) = self.lexicon.match_sentiment(window.text);
                    (sentiment, multiplier, vec![window.text.trim().to_string()])
                }
                None => (Sentiment::Neutral, 1.0, Vec::new()),
            };

        Keyword {
            score: m.toned_frequency * m.weight * multiplier,
            text: m.text,
            frequency: m.frequency,
            category: m.category,
            sentiment,
            contexts,
        }
    }
}

impl KeywordScorer for DictionaryScorer {
    fn strategy(&self) -> Strategy {
        Strategy::Dictionary
    }

    /// Count matches per comment; contexts come from the newline-joined corpus
    fn score(&self, corpus: &[String]) -> Vec<Keyword> {
        if corpus.is_empty() {
            return Vec::new();
        }
        let mut set = MatchSet::default();
        for comment in corpus {
            set.add(&self.lexicon, comment, self.tone_multiplier(comment));
        }
        self.rank(&corpus.join("\n"), set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_scorer(tone_adjustment: bool) -> DictionaryScorer {
        let lexicon = Arc::new(Lexicon::builtin().expect("Failed to create test lexicon"));
        DictionaryScorer::new(
            lexicon,
            DictionaryConfig {
                tone_adjustment,
                ..DictionaryConfig::default()
            },
        )
    }

    #[test]
    fn test_memory_leak_strong_negative() {
        let scorer = create_test_scorer(false);
        let keywords = scorer.score_text("memory leak 문제가 있습니다. Another memory leak here");

        let leak = keywords.iter().find(|k| k.text == "memory leak").unwrap();
        assert_eq!(leak.frequency, 2);
        assert_eq!(leak.category, Category::Critical);
        assert_eq!(leak.sentiment, Sentiment::Negative);
        assert!((leak.score - 15.0).abs() < 1e-9);
    }

    #[test]
    fn test_case_insensitive_literal_match() {
        let scorer = create_test_scorer(false);
        let keywords = scorer.score_text("Next.js and NEXT.JS but not nextxjs");
        let next = keywords.iter().find(|k| k.text == "next.js").unwrap();
        assert_eq!(next.frequency, 2);
        assert_eq!(next.category, Category::Tech);
    }

    #[test]
    fn test_neutral_context() {
        let scorer = create_test_scorer(false);
        let keywords = scorer.score_text("we added caching");
        let caching = keywords.iter().find(|k| k.text == "caching").unwrap();
        assert_eq!(caching.sentiment, Sentiment::Neutral);
        assert!((caching.score - 2.4).abs() < 1e-9);
        assert_eq!(caching.contexts, vec!["we added caching".to_string()]);
    }

    #[test]
    fn test_sorted_and_capped() {
        let lexicon = Arc::new(Lexicon::builtin().unwrap());
        let scorer = DictionaryScorer::new(
            lexicon,
            DictionaryConfig {
                max_keywords: 2,
                ..DictionaryConfig::default()
            },
        );
        let keywords = scorer.score_text("security token JWT React hook 리팩토링");
        assert_eq!(keywords.len(), 2);
        assert!(keywords[0].score >= keywords[1].score);
    }

    #[test]
    fn test_no_matches() {
        let scorer = create_test_scorer(false);
        assert!(scorer.score_text("nothing to see").is_empty());
        assert!(scorer.score(&[]).is_empty());
    }

    #[test]
    fn test_corpus_joined_with_newline() {
        let scorer = create_test_scorer(false);
        let corpus = vec!["memory leak".to_string(), "memory leak".to_string()];
        let keywords = scorer.score(&corpus);
        let leak = keywords.iter().find(|k| k.text == "memory leak").unwrap();
        assert_eq!(leak.frequency, 2);
        // neutral context: 2 * 3.0 * 1.0
        assert!((leak.score - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_tone_adjustment_rescales() {
        let plain = create_test_scorer(false);
        let adjusted = create_test_scorer(true);
        let text = "정말 심각한 문제입니다: memory leak";

        let base = plain.score_text(text);
        let scaled = adjusted.score_text(text);
        let base_leak = base.iter().find(|k| k.text == "memory leak").unwrap();
        let scaled_leak = scaled.iter().find(|k| k.text == "memory leak").unwrap();
        assert!((scaled_leak.score - base_leak.score * 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_tone_applied_per_comment() {
        let plain = create_test_scorer(false);
        let adjusted = create_test_scorer(true);

        // a question elsewhere in the corpus leaves the alarmed comment at 2.0
        let corpus = vec![
            "정말 심각한 문제입니다: memory leak".to_string(),
            "왜 이렇게 했나요?".to_string(),
        ];
        let base = plain.score(&corpus);
        let scaled = adjusted.score(&corpus);
        let base_leak = base.iter().find(|k| k.text == "memory leak").unwrap();
        let scaled_leak = scaled.iter().find(|k| k.text == "memory leak").unwrap();
        assert!((scaled_leak.score - base_leak.score * 2.0).abs() < 1e-9);

        // one neutral mention (1.0) and one alarmed mention (2.0)
        let corpus = vec![
            "memory leak".to_string(),
            "정말 심각한 문제입니다: memory leak".to_string(),
        ];
        let base = plain.score(&corpus);
        let scaled = adjusted.score(&corpus);
        let base_leak = base.iter().find(|k| k.text == "memory leak").unwrap();
        let scaled_leak = scaled.iter().find(|k| k.text == "memory leak").unwrap();
        assert_eq!(scaled_leak.frequency, 2);
        assert!((scaled_leak.score - base_leak.score * 1.5).abs() < 1e-9);
    }
}
