//! Word-cloud projection of scored keywords
//!
//! Scores are min-max normalized into a bounded font size; colors come from
//! the palette of the strategy that produced the keywords.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::analysis::utils::round_to;
use crate::analysis::{AnalysisResult, Category, Keyword, Strategy};
use crate::config::WordCloudConfig;
use crate::lexicon::Lexicon;

/// Visualization-ready keyword
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordCloudEntry {
    pub text: String,
    /// Font size within the configured bounds
    pub size: u32,
    /// Hex color
    pub color: String,
    pub category: Category,
    pub frequency: u32,
    pub score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScoreRange {
    pub min: f64,
    pub max: f64,
}

/// Word-cloud summary of one analysis result
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordCloud {
    pub entries: Vec<WordCloudEntry>,
    pub max_frequency: u32,
    pub total_keywords: usize,
    pub score_range: ScoreRange,
}

/// Entries restricted to a category selection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilteredWordCloud {
    pub entries: Vec<WordCloudEntry>,
    /// Every category present before filtering, sorted by name
    pub available_categories: Vec<Category>,
    pub filtered_count: usize,
}

/// Frequency bands: high >= 10, medium 3..=9, low 1..=2
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FrequencyBands {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WordCloudStats {
    pub total_words: usize,
    /// Rounded to 0.1
    pub avg_frequency: f64,
    /// Rounded to 0.001
    pub avg_score: f64,
    pub category_distribution: BTreeMap<Category, usize>,
    pub frequency_distribution: FrequencyBands,
}

/// Keyword to word-cloud transform
pub struct WordCloudTransform {
    lexicon: Arc<Lexicon>,
    config: WordCloudConfig,
}

impl WordCloudTransform {
    pub fn new(lexicon: Arc<Lexicon>, config: WordCloudConfig) -> Self {
        Self { lexicon, config }
    }

    /// Map every keyword to exactly one entry, preserving input order
    pub fn entries(&self, keywords: &[Keyword], strategy: Strategy) -> Vec<WordCloudEntry> {
        let range = score_range(keywords);
        let palette = self.lexicon.palette(strategy);

        keywords
            .iter()
            .map(|keyword| WordCloudEntry {
                text: keyword.text.clone(),
                size: self.font_size(normalize(keyword.score, range)),
                color: palette.color(keyword.category).to_string(),
                category: keyword.category,
                frequency: keyword.frequency,
                score: keyword.score,
            })
            .collect()
    }

    /// Build the word-cloud summary for an analysis result
    pub fn build(&self, result: &AnalysisResult) -> WordCloud {
        WordCloud {
            entries: self.entries(&result.keywords, result.strategy),
            max_frequency: result.keywords.iter().map(|k| k.frequency).max().unwrap_or(0),
            total_keywords: result.keywords.len(),
            score_range: score_range(&result.keywords),
        }
    }

    fn font_size(&self, normalized: f64) -> u32 {
        let min = self.config.min_size as f64;
        let max = self.config.max_size as f64;
        let size = (min + normalized * (max - min)).clamp(min, max);
        size.round() as u32
    }
}

fn score_range(keywords: &[Keyword]) -> ScoreRange {
    if keywords.is_empty() {
        return ScoreRange::default();
    }
    keywords.iter().fold(
        ScoreRange {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        },
        |range, k| ScoreRange {
            min: range.min.min(k.score),
            max: range.max.max(k.score),
        },
    )
}

/// Position of `score` within the range; 0.5 when the range is degenerate
fn normalize(score: f64, range: ScoreRange) -> f64 {
    if range.max <= range.min {
        return 0.5;
    }
    (score - range.min) / (range.max - range.min)
}

impl WordCloud {
    /// Keep entries in the selected categories (empty selection keeps all)
    pub fn filter_by_categories(&self, selected: &[Category]) -> FilteredWordCloud {
        let mut available: Vec<Category> = self.entries.iter().map(|e| e.category).collect();
        available.sort_by_key(|c| c.as_str());
        available.dedup();

        let entries: Vec<WordCloudEntry> = if selected.is_empty() {
            self.entries.clone()
        } else {
            self.entries
                .iter()
                .filter(|e| selected.contains(&e.category))
                .cloned()
                .collect()
        };

        FilteredWordCloud {
            filtered_count: entries.len(),
            entries,
            available_categories: available,
        }
    }
}

pub fn top_by_frequency(entries: &[WordCloudEntry], limit: usize) -> Vec<WordCloudEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    sorted.truncate(limit);
    sorted
}

pub fn top_by_score(entries: &[WordCloudEntry], limit: usize) -> Vec<WordCloudEntry> {
    let mut sorted = entries.to_vec();
    sorted.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    sorted.truncate(limit);
    sorted
}

pub fn group_by_category(entries: &[WordCloudEntry]) -> BTreeMap<Category, Vec<WordCloudEntry>> {
    let mut groups: BTreeMap<Category, Vec<WordCloudEntry>> = BTreeMap::new();
    for entry in entries {
        groups.entry(entry.category).or_default().push(entry.clone());
    }
    groups
}

pub fn word_cloud_stats(entries: &[WordCloudEntry]) -> WordCloudStats {
    if entries.is_empty() {
        return WordCloudStats::default();
    }

    let count = entries.len() as f64;
    let total_frequency: u64 = entries.iter().map(|e| e.frequency as u64).sum();
    let total_score: f64 = entries.iter().map(|e| e.score).sum();

    let mut category_distribution = BTreeMap::new();
    let mut bands = FrequencyBands::default();
    for entry in entries {
        *category_distribution.entry(entry.category).or_insert(0) += 1;
        match entry.frequency {
            f if f >= 10 => bands.high += 1,
            f if f >= 3 => bands.medium += 1,
            _ => bands.low += 1,
        }
    }

    WordCloudStats {
        total_words: entries.len(),
        avg_frequency: round_to(total_frequency as f64 / count, 1),
        avg_score: round_to(total_score / count, 3),
        category_distribution,
        frequency_distribution: bands,
    }
}

/// Case-insensitive substring search; a blank term returns everything
pub fn search(entries: &[WordCloudEntry], term: &str) -> Vec<WordCloudEntry> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return entries.to_vec();
    }
    entries
        .iter()
        .filter(|e| e.text.to_lowercase().contains(&term))
        .cloned()
        .collect()
}
