// Summary statistics over an analysis result
use serde::Serialize;

use crate::analysis::types::{AnalysisResult, Category};
use crate::analysis::utils::round_to;

/// Headline numbers of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisStats {
    pub total_words: usize,
    pub unique_words: usize,
    pub total_keywords: usize,
    /// Categories with at least one keyword
    pub category_count: usize,
    /// Rounded to one decimal place
    pub avg_words_per_comment: f64,
}

impl AnalysisStats {
    pub fn from_result(result: &AnalysisResult) -> Self {
        Self {
            total_words: result.total_words,
            unique_words: result.unique_words,
            total_keywords: result.keywords.len(),
            category_count: result.categories.values().filter(|k| !k.is_empty()).count(),
            avg_words_per_comment: round_to(result.average_words_per_comment, 1),
        }
    }
}

/// Size of one category bucket with a few sample keywords
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBreakdown {
    pub category: Category,
    pub count: usize,
    pub samples: Vec<String>,
}

/// Largest five non-empty categories, three sample keywords each
pub fn category_breakdown(result: &AnalysisResult) -> Vec<CategoryBreakdown> {
    let mut breakdown: Vec<CategoryBreakdown> = result
        .categories
        .iter()
        .filter(|(_, keywords)| !keywords.is_empty())
        .map(|(category, keywords)| CategoryBreakdown {
            category: *category,
            count: keywords.len(),
            samples: keywords.iter().take(3).map(|k| k.text.clone()).collect(),
        })
        .collect();

    breakdown.sort_by(|a, b| b.count.cmp(&a.count));
    breakdown.truncate(5);
    breakdown
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedKeyword {
    pub rank: usize,
    pub text: String,
    pub frequency: u32,
    pub score: f64,
}

/// Top `limit` keywords with 1-based ranks
pub fn keyword_ranking(result: &AnalysisResult, limit: usize) -> Vec<RankedKeyword> {
    result
        .keywords
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, k)| RankedKeyword {
            rank: i + 1,
            text: k.text.clone(),
            frequency: k.frequency,
            score: k.score,
        })
        .collect()
}

/// Whole-number percentage, zero when `total` is zero
pub fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((part as f64 / total as f64) * 100.0).round() as u32
}
