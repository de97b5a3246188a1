// Corpus-wide TF-IDF keyword scoring
//
// Every comment is one document. A term's score is its tf*idf averaged over
// all documents, absent documents contributing zero.
use ahash::{HashMap, HashMapExt, HashSet, HashSetExt};
use std::sync::Arc;

use crate::analysis::classifier::CategoryClassifier;
use crate::analysis::tokenizer::Tokenizer;
use crate::analysis::types::{Keyword, Strategy};
use crate::analysis::utils;
use crate::analysis::KeywordScorer;
use crate::config::AnalysisConfig;
use crate::lexicon::Lexicon;

/// Per-term accumulator, kept in first-encounter order
struct TermStats {
    term: String,
    frequency: u32,
    tfidf_sum: f64,
}

/// TF-IDF keyword scorer over the generic taxonomy
pub struct TfIdfScorer {
    lexicon: Arc<Lexicon>,
    tokenizer: Tokenizer,
    classifier: CategoryClassifier,
    config: AnalysisConfig,
}

impl TfIdfScorer {
    pub fn new(lexicon: Arc<Lexicon>, config: AnalysisConfig) -> Self {
        Self {
            tokenizer: Tokenizer::new(lexicon.clone()),
            classifier: CategoryClassifier::new(lexicon.clone()),
            lexicon,
            config,
        }
    }

    /// Score pre-tokenized documents
    ///
    /// `corpus` supplies the raw comments used for context snippets and must
    /// line up with `documents`.
    pub fn score_documents(&self, corpus: &[String], documents: &[Vec<String>]) -> Vec<Keyword> {
        let num_documents = documents.len();
        if num_documents == 0 {
            return Vec::new();
        }

        // Pass 1: corpus frequency and document frequency
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut terms: Vec<TermStats> = Vec::new();
        let mut document_frequency: Vec<usize> = Vec::new();

        for document in documents {
            let mut seen_in_doc: HashSet<usize> = HashSet::new();
            for token in document {
                let slot = *index.entry(token.as_str()).or_insert_with(|| {
                    terms.push(TermStats {
                        term: token.clone(),
                        frequency: 0,
                        tfidf_sum: 0.0,
                    });
                    document_frequency.push(0);
                    terms.len() - 1
                });
                terms[slot].frequency += 1;
                if seen_in_doc.insert(slot) {
                    document_frequency[slot] += 1;
                }
            }
        }

        // Pass 2: accumulate tf*idf per document
        for document in documents {
            if document.is_empty() {
                continue;
            }
            let len = document.len() as f64;
            let mut counts: HashMap<usize, u32> = HashMap::new();
            for token in document {
                if let Some(&slot) = index.get(token.as_str()) {
                    *counts.entry(slot).or_insert(0) += 1;
                }
            }
            for (slot, count) in counts {
                let idf = inverse_document_frequency(num_documents, document_frequency[slot]);
                terms[slot].tfidf_sum += (count as f64 / len) * idf;
            }
        }

        let mut scored: Vec<(TermStats, f64)> = terms
            .into_iter()
            .map(|stats| {
                let average = stats.tfidf_sum / num_documents as f64;
                (stats, average)
            })
            .filter(|(stats, average)| {
                stats.frequency >= self.config.min_frequency && *average > self.config.min_tfidf
            })
            .collect();

        // Stable: ties keep first-encounter order
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(self.config.max_keywords);

        tracing::debug!(
            "TF-IDF kept {} terms over {} documents",
            scored.len(),
            num_documents
        );

        scored
            .into_iter()
            .map(|(stats, average)| self.build_keyword(corpus, stats, average))
            .collect()
    }

    fn build_keyword(&self, corpus: &[String], stats: TermStats, score: f64) -> Keyword {
        let contexts = utils::extract_contexts(
            &stats.term,
            corpus,
            self.config.max_contexts,
            self.config.context_radius,
        );
        // Sentiment is a tag only; the TF-IDF score is never rescaled
        let sentiment = contexts
            .first()
            .map(|context| self.lexicon.match_sentiment(context).0)
            .unwrap_or_default();

        Keyword {
            category: self.classifier.classify(&stats.term),
            text: stats.term,
            frequency: stats.frequency,
            score,
            sentiment,
            contexts,
        }
    }
}

impl KeywordScorer for TfIdfScorer {
    fn strategy(&self) -> Strategy {
        Strategy::Tfidf
    }

    fn score(&self, corpus: &[String]) -> Vec<Keyword> {
        let documents = self.tokenizer.tokenize_all(corpus);
        self.score_documents(corpus, &documents)
    }
}

/// `ln(N / df)`, zero when no document contains the term
pub fn inverse_document_frequency(num_documents: usize, containing: usize) -> f64 {
    if containing == 0 {
        return 0.0;
    }
    (num_documents as f64 / containing as f64).ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::types::{Category, Sentiment};

    fn create_test_scorer() -> TfIdfScorer {
        let lexicon = Arc::new(Lexicon::builtin().expect("Failed to create test lexicon"));
        TfIdfScorer::new(lexicon, AnalysisConfig::default())
    }

    fn corpus(comments: &[&str]) -> Vec<String> {
        comments.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_idf() {
        assert_eq!(inverse_document_frequency(3, 0), 0.0);
        assert_eq!(inverse_document_frequency(3, 3), 0.0);
        assert!((inverse_document_frequency(4, 1) - 4f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_empty_corpus() {
        let scorer = create_test_scorer();
        assert!(scorer.score(&[]).is_empty());
    }

    #[test]
    fn test_average_over_all_documents() {
        let scorer = create_test_scorer();
        let comments = corpus(&[
            "cache cache miss",
            "rendering looks fine",
            "rendering again",
            "nothing related",
        ]);
        let keywords = scorer.score(&comments);

        // cache: tf=2/3 in doc 0 only, idf=ln(4), averaged over 4 docs
        let cache = keywords.iter().find(|k| k.text == "cache").unwrap();
        let expected = (2.0 / 3.0) * 4f64.ln() / 4.0;
        assert!((cache.score - expected).abs() < 1e-12);
        assert_eq!(cache.frequency, 2);
        assert_eq!(cache.category, Category::Performance);

        // rendering: tf=1/3 and 1/2, idf=ln(2)
        let rendering = keywords.iter().find(|k| k.text == "rendering").unwrap();
        let expected = (1.0 / 3.0 + 1.0 / 2.0) * 2f64.ln() / 4.0;
        assert!((rendering.score - expected).abs() < 1e-12);
    }

    #[test]
    fn test_singletons_dropped() {
        let scorer = create_test_scorer();
        let comments = corpus(&["unique words everywhere", "different tokens entirely"]);
        assert!(scorer.score(&comments).is_empty());
    }

    #[test]
    fn test_ubiquitous_term_has_zero_score() {
        let scorer = create_test_scorer();
        let comments = corpus(&[
            "이 함수는 성능 문제가 있습니다",
            "성능 문제를 개선해야 합니다",
            "성능 최적화가 필요합니다",
        ]);
        let keywords = scorer.score(&comments);
        // idf(성능) = ln(3/3) = 0, so it cannot clear the threshold
        assert!(keywords.iter().all(|k| k.text != "성능"));
    }

    #[test]
    fn test_sorted_and_capped() {
        let lexicon = Arc::new(Lexicon::builtin().unwrap());
        let config = AnalysisConfig {
            max_keywords: 2,
            ..AnalysisConfig::default()
        };
        let scorer = TfIdfScorer::new(lexicon, config);
        let comments = corpus(&[
            "alpha alpha alpha",
            "beta beta",
            "gamma gamma delta",
            "filler words",
        ]);
        let keywords = scorer.score(&comments);

        assert_eq!(keywords.len(), 2);
        assert_eq!(keywords[0].text, "alpha");
        assert!(keywords[0].score >= keywords[1].score);
    }

    #[test]
    fn test_deterministic_order() {
        let scorer = create_test_scorer();
        let comments = corpus(&["foo foo bar bar", "baz qux", "more text"]);
        let first = scorer.score(&comments);
        let second = scorer.score(&comments);
        assert_eq!(first, second);
        // foo and bar tie; encounter order wins
        assert_eq!(first[0].text, "foo");
        assert_eq!(first[1].text, "bar");
    }

    #[test]
    fn test_contexts_and_sentiment_tag() {
        let scorer = create_test_scorer();
        let comments = corpus(&[
            "cache has a critical issue",
            "cache again",
            "unrelated",
        ]);
        let keywords = scorer.score(&comments);
        let cache = keywords.iter().find(|k| k.text == "cache").unwrap();
        assert_eq!(cache.contexts.len(), 2);
        assert_eq!(cache.sentiment, Sentiment::Negative);
    }
}
