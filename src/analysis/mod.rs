// Text analysis pipeline for code review comments
//
// Comments -> tokens -> scored, categorized keywords (+ phrases in parallel)
// The result feeds action item generation and the word cloud transform.

mod classifier;
mod dictionary;
mod phrases;
mod stats;
mod tfidf;
mod tokenizer;
mod tone;
mod types;
pub mod utils;

pub use classifier::CategoryClassifier;
pub use dictionary::DictionaryScorer;
pub use phrases::PhraseExtractor;
pub use stats::{
    category_breakdown, keyword_ranking, percentage, AnalysisStats, CategoryBreakdown,
    RankedKeyword,
};
pub use tfidf::{inverse_document_frequency, TfIdfScorer};
pub use tokenizer::{strip_markup, Tokenizer};
pub use tone::{Intent, Tone, ToneAnalyzer, ToneReport};
pub use types::{AnalysisResult, Category, Keyword, Phrase, Sentiment, Strategy};

use ahash::HashSet;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::lexicon::Lexicon;

/// Keyword scoring strategy
///
/// Both implementations produce the same `Keyword` shape but on different
/// score scales, so a result only ever holds one scorer's output.
pub trait KeywordScorer: Send + Sync {
    fn strategy(&self) -> Strategy;

    /// Score a corpus; results are sorted by score descending
    fn score(&self, corpus: &[String]) -> Vec<Keyword>;
}

/// Pipeline orchestrator
/// Tokenizes once, runs the selected scorer and the phrase extractor
pub struct TextAnalyzer {
    tokenizer: Tokenizer,
    scorer: Box<dyn KeywordScorer>,
    phrases: PhraseExtractor,
}

impl TextAnalyzer {
    /// Build an analyzer for the strategy selected in `config`
    pub fn new(lexicon: Arc<Lexicon>, config: &Config) -> Self {
        Self::with_strategy(lexicon, config, config.analysis.strategy)
    }

    /// Build an analyzer for an explicit strategy
    pub fn with_strategy(lexicon: Arc<Lexicon>, config: &Config, strategy: Strategy) -> Self {
        let scorer: Box<dyn KeywordScorer> = match strategy {
            Strategy::Tfidf => Box::new(TfIdfScorer::new(lexicon.clone(), config.analysis.clone())),
            Strategy::Dictionary => Box::new(DictionaryScorer::new(
                lexicon.clone(),
                config.dictionary.clone(),
            )),
        };
        Self::with_scorer(lexicon, scorer, config)
    }

    /// Build an analyzer around a caller-supplied scorer
    pub fn with_scorer(lexicon: Arc<Lexicon>, scorer: Box<dyn KeywordScorer>, config: &Config) -> Self {
        Self {
            tokenizer: Tokenizer::new(lexicon),
            scorer,
            phrases: PhraseExtractor::new(config.phrases.clone()),
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.scorer.strategy()
    }

    /// Run the full pipeline over a corpus
    ///
    /// Empty input, or input whose comments are all blank once markup is
    /// stripped, yields [`AnalysisResult::empty`].
    pub fn analyze(&self, corpus: &[String]) -> AnalysisResult {
        let start = Instant::now();
        let strategy = self.strategy();

        let documents = self.tokenizer.tokenize_all(corpus);
        let total_words: usize = documents.iter().map(Vec::len).sum();
        if total_words == 0 {
            tracing::debug!("No tokens in {} comments; returning empty result", corpus.len());
            return AnalysisResult::empty(strategy);
        }

        let unique_words = documents
            .iter()
            .flatten()
            .map(String::as_str)
            .collect::<HashSet<&str>>()
            .len();
        let average_words_per_comment = total_words as f64 / corpus.len() as f64;

        let keywords = self.scorer.score(corpus);
        let categories = bucket_by_category(strategy, &keywords);
        let common_phrases = self.phrases.extract(&documents);

        tracing::info!(
            "Analyzed {} comments with {} in {}ms: {} keywords, {} phrases",
            corpus.len(),
            strategy,
            start.elapsed().as_millis(),
            keywords.len(),
            common_phrases.len()
        );

        AnalysisResult {
            strategy,
            keywords,
            categories,
            total_words,
            unique_words,
            average_words_per_comment,
            common_phrases,
        }
    }
}

/// Bucket keywords by category, every taxonomy category present
///
/// Keywords keep their score order within a bucket.
pub fn bucket_by_category(strategy: Strategy, keywords: &[Keyword]) -> BTreeMap<Category, Vec<Keyword>> {
    let mut categories: BTreeMap<Category, Vec<Keyword>> = strategy
        .taxonomy()
        .iter()
        .map(|category| (*category, Vec::new()))
        .collect();
    for keyword in keywords {
        categories
            .entry(keyword.category)
            .or_default()
            .push(keyword.clone());
    }
    categories
}
