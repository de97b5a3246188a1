// Shared types for the analysis pipeline
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Keyword category tag
///
/// Covers both taxonomies: the generic one used by TF-IDF scoring and the
/// domain one used by dictionary scoring. Declaration order is the iteration
/// order of [`AnalysisResult::categories`] and of action item generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    CodeQuality,
    Performance,
    BugFix,
    Architecture,
    Testing,
    Documentation,
    Security,
    UiUx,
    Critical,
    Quality,
    Improvement,
    Positive,
    Tech,
    General,
}

/// Generic taxonomy, in classification order
const GENERIC_TAXONOMY: &[Category] = &[
    Category::CodeQuality,
    Category::Performance,
    Category::BugFix,
    Category::Architecture,
    Category::Testing,
    Category::Documentation,
    Category::Security,
    Category::UiUx,
    Category::General,
];

/// Dictionary taxonomy
const DICTIONARY_TAXONOMY: &[Category] = &[
    Category::Critical,
    Category::Security,
    Category::Quality,
    Category::Performance,
    Category::Architecture,
    Category::Testing,
    Category::Improvement,
    Category::Positive,
    Category::Tech,
    Category::General,
];

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::CodeQuality => "code-quality",
            Category::Performance => "performance",
            Category::BugFix => "bug-fix",
            Category::Architecture => "architecture",
            Category::Testing => "testing",
            Category::Documentation => "documentation",
            Category::Security => "security",
            Category::UiUx => "ui-ux",
            Category::Critical => "critical",
            Category::Quality => "quality",
            Category::Improvement => "improvement",
            Category::Positive => "positive",
            Category::Tech => "tech",
            Category::General => "general",
        }
    }

    /// Every tag, in declaration order
    pub fn all() -> &'static [Category] {
        &[
            Category::CodeQuality,
            Category::Performance,
            Category::BugFix,
            Category::Architecture,
            Category::Testing,
            Category::Documentation,
            Category::Security,
            Category::UiUx,
            Category::Critical,
            Category::Quality,
            Category::Improvement,
            Category::Positive,
            Category::Tech,
            Category::General,
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

/// Keyword scoring strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Corpus-wide average TF-IDF
    #[default]
    Tfidf,
    /// Domain dictionary weight times context sentiment multiplier
    Dictionary,
}

impl Strategy {
    /// Category set this strategy classifies into
    pub fn taxonomy(&self) -> &'static [Category] {
        match self {
            Strategy::Tfidf => GENERIC_TAXONOMY,
            Strategy::Dictionary => DICTIONARY_TAXONOMY,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Tfidf => "tfidf",
            Strategy::Dictionary => "dictionary",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tfidf" | "tf-idf" => Ok(Strategy::Tfidf),
            "dictionary" => Ok(Strategy::Dictionary),
            _ => Err(format!(
                "Strategy must be 'tfidf' or 'dictionary', got '{}'",
                s
            )),
        }
    }
}

/// Sentiment of the text surrounding a keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
    Suggestion,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
            Sentiment::Suggestion => "suggestion",
        }
    }
}

/// Scored keyword
///
/// `score` is on the scale of the strategy that produced it; see
/// [`AnalysisResult::strategy`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Keyword {
    /// Normalized (lowercase) term
    pub text: String,
    /// Occurrences across the corpus (always >= 1)
    pub frequency: u32,
    /// Importance score (always >= 0)
    pub score: f64,
    /// Single category from the strategy's taxonomy
    pub category: Category,
    /// Sentiment of the first occurrence's surroundings
    pub sentiment: Sentiment,
    /// Text snippets where the keyword was found
    pub contexts: Vec<String>,
}

/// Frequent multi-word phrase (bigram or trigram)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phrase {
    pub text: String,
    pub count: u32,
}

/// Output of one pipeline run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Strategy whose score scale `keywords` use
    pub strategy: Strategy,
    /// Keywords sorted by score descending
    pub keywords: Vec<Keyword>,
    /// Keywords bucketed by category (taxonomy order)
    pub categories: BTreeMap<Category, Vec<Keyword>>,
    pub total_words: usize,
    pub unique_words: usize,
    pub average_words_per_comment: f64,
    /// Phrases sorted by count descending
    pub common_phrases: Vec<Phrase>,
}

impl AnalysisResult {
    /// Zero-valued result for empty or degenerate input
    pub fn empty(strategy: Strategy) -> Self {
        Self {
            strategy,
            keywords: Vec::new(),
            categories: BTreeMap::new(),
            total_words: 0,
            unique_words: 0,
            average_words_per_comment: 0.0,
            common_phrases: Vec::new(),
        }
    }

    /// Keywords of a category (empty slice when the bucket is absent)
    pub fn keywords_in(&self, category: Category) -> &[Keyword] {
        self.categories
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
