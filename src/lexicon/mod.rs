//! Lexicon registry for configuration-driven text analysis
//!
//! This module provides:
//! - Stopword sets used by the tokenizer (Korean and English)
//! - The generic keyword taxonomy with per-category term sets and colors
//! - The domain dictionary (keyword groups with base weights) and its palette
//! - Ordered sentiment pattern families with multipliers
//! - Tone/intent patterns and action item templates
//!
//! Tables are read from TOML (built-in copies live in `config-templates/`),
//! compiled once, and shared read-only behind an `Arc`.

use crate::actions::ActionTemplate;
use crate::analysis::{Category, Sentiment, Strategy};
use crate::error::{Result, ReviewLensError};
use ahash::{HashMap, HashMapExt, HashSet};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

const BUILTIN_VOCABULARY: &str = include_str!("../../config-templates/vocabulary.toml");
const BUILTIN_DICTIONARY: &str = include_str!("../../config-templates/dictionary.toml");
const BUILTIN_ACTIONS: &str = include_str!("../../config-templates/actions.toml");

/// Stopword lists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopwordsConfig {
    #[serde(default)]
    pub korean: Vec<String>,
    #[serde(default)]
    pub english: Vec<String>,
}

/// Generic taxonomy category definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryConfig {
    pub tag: Category,
    #[serde(default)]
    pub label: String,
    pub color: String,
    #[serde(default)]
    pub terms: Vec<String>,
}

/// Vocabulary file structure (stopwords + generic taxonomy)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularyConfig {
    pub stopwords: StopwordsConfig,
    pub category: Vec<CategoryConfig>,
}

/// Dictionary keyword group
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictionaryGroupConfig {
    pub name: String,
    pub category: Category,
    pub weight: f64,
    pub keywords: Vec<String>,
}

/// Sentiment pattern family
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentFamilyConfig {
    pub name: String,
    pub sentiment: Sentiment,
    pub multiplier: f64,
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToneConfig {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
    pub emphasis: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentConfig {
    pub question: String,
    pub suggestion: String,
    pub concern: String,
    pub praise: String,
}

/// Dictionary file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainDictionaryConfig {
    pub group: Vec<DictionaryGroupConfig>,
    pub sentiment: Vec<SentimentFamilyConfig>,
    pub colors: BTreeMap<Category, String>,
    pub tone: ToneConfig,
    pub intent: IntentConfig,
}

/// Templates for one keyword category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionPatternConfig {
    pub category: Category,
    pub action: Vec<ActionTemplate>,
}

/// Action template file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionsConfig {
    pub pattern: Vec<ActionPatternConfig>,
}

/// Generic taxonomy entry with lowercase term set
#[derive(Debug, Clone)]
pub struct TaxonomyEntry {
    pub category: Category,
    pub label: String,
    pub terms: HashSet<String>,
}

/// Dictionary keyword with pre-compiled literal matcher
#[derive(Debug, Clone)]
pub struct CompiledDictionaryEntry {
    /// Keyword as written in the table
    pub keyword: String,
    /// Lowercase form used as the keyword text
    pub normalized: String,
    pub category: Category,
    pub weight: f64,
    /// Case-insensitive literal matcher
    pub regex: Regex,
}

/// Sentiment family with pre-compiled patterns
#[derive(Debug, Clone)]
pub struct CompiledSentimentFamily {
    pub name: String,
    pub sentiment: Sentiment,
    pub multiplier: f64,
    pub patterns: Vec<Regex>,
}

#[derive(Debug, Clone)]
pub struct CompiledTone {
    pub positive: Vec<Regex>,
    pub negative: Vec<Regex>,
    pub emphasis: Regex,
}

#[derive(Debug, Clone)]
pub struct CompiledIntent {
    pub question: Regex,
    pub suggestion: Regex,
    pub concern: Regex,
    pub praise: Regex,
}

/// Category to hex color lookup with a `general` fallback
#[derive(Debug, Clone)]
pub struct ColorPalette {
    colors: HashMap<Category, String>,
    fallback: String,
}

impl ColorPalette {
    pub fn color(&self, category: Category) -> &str {
        self.colors
            .get(&category)
            .map(String::as_str)
            .unwrap_or(&self.fallback)
    }

    /// Snapshot of the palette, ordered by category
    pub fn entries(&self) -> BTreeMap<Category, String> {
        self.colors
            .iter()
            .map(|(category, color)| (*category, color.clone()))
            .collect()
    }

    fn build(colors: HashMap<Category, String>, table: &str) -> Result<Self> {
        let fallback = colors.get(&Category::General).cloned().ok_or_else(|| {
            ReviewLensError::Lexicon(format!("{} palette has no 'general' color", table))
        })?;
        for (category, color) in &colors {
            if !is_hex_color(color) {
                return Err(ReviewLensError::Lexicon(format!(
                    "Invalid color '{}' for category '{}' in {} palette",
                    color, category, table
                )));
            }
        }
        Ok(Self { colors, fallback })
    }
}

/// Lexicon with all pre-compiled tables
#[derive(Debug, Clone)]
pub struct Lexicon {
    korean_stopwords: HashSet<String>,
    english_stopwords: HashSet<String>,
    /// Generic taxonomy in classification order
    pub taxonomy: Vec<TaxonomyEntry>,
    /// Dictionary entries in table order
    pub dictionary: Vec<CompiledDictionaryEntry>,
    /// Sentiment families in evaluation order
    pub sentiment_families: Vec<CompiledSentimentFamily>,
    pub tone: CompiledTone,
    pub intent: CompiledIntent,
    action_patterns: Vec<(Category, Vec<ActionTemplate>)>,
    generic_palette: ColorPalette,
    dictionary_palette: ColorPalette,
}

impl Lexicon {
    /// Load the tables shipped with the crate
    pub fn builtin() -> Result<Self> {
        let vocabulary: VocabularyConfig = toml::from_str(BUILTIN_VOCABULARY)?;
        let dictionary: DomainDictionaryConfig = toml::from_str(BUILTIN_DICTIONARY)?;
        let actions: ActionsConfig = toml::from_str(BUILTIN_ACTIONS)?;
        Self::from_configs(vocabulary, dictionary, actions)
    }

    /// Load lexicon from configuration files
    pub fn from_config_files(
        vocabulary_path: &Path,
        dictionary_path: &Path,
        actions_path: &Path,
    ) -> Result<Self> {
        let vocabulary: VocabularyConfig = toml::from_str(&read_table(vocabulary_path)?)?;
        let dictionary: DomainDictionaryConfig = toml::from_str(&read_table(dictionary_path)?)?;
        let actions: ActionsConfig = toml::from_str(&read_table(actions_path)?)?;
        Self::from_configs(vocabulary, dictionary, actions)
    }

    /// Load with any subset of the tables overridden; missing paths use the built-in copy
    pub fn with_overrides(
        vocabulary_path: Option<&Path>,
        dictionary_path: Option<&Path>,
        actions_path: Option<&Path>,
    ) -> Result<Self> {
        let vocabulary: VocabularyConfig = match vocabulary_path {
            Some(path) => toml::from_str(&read_table(path)?)?,
            None => toml::from_str(BUILTIN_VOCABULARY)?,
        };
        let dictionary: DomainDictionaryConfig = match dictionary_path {
            Some(path) => toml::from_str(&read_table(path)?)?,
            None => toml::from_str(BUILTIN_DICTIONARY)?,
        };
        let actions: ActionsConfig = match actions_path {
            Some(path) => toml::from_str(&read_table(path)?)?,
            None => toml::from_str(BUILTIN_ACTIONS)?,
        };
        Self::from_configs(vocabulary, dictionary, actions)
    }

    /// Build lexicon from parsed configurations
    pub fn from_configs(
        vocabulary: VocabularyConfig,
        dictionary: DomainDictionaryConfig,
        actions: ActionsConfig,
    ) -> Result<Self> {
        let korean_stopwords = lowercase_set(&vocabulary.stopwords.korean);
        let english_stopwords = lowercase_set(&vocabulary.stopwords.english);

        // Generic taxonomy
        let mut taxonomy = Vec::with_capacity(vocabulary.category.len());
        let mut generic_colors = HashMap::new();
        for cat in &vocabulary.category {
            if !Strategy::Tfidf.taxonomy().contains(&cat.tag) {
                return Err(ReviewLensError::Lexicon(format!(
                    "Category '{}' is not part of the generic taxonomy",
                    cat.tag
                )));
            }
            if taxonomy.iter().any(|e: &TaxonomyEntry| e.category == cat.tag) {
                return Err(ReviewLensError::Lexicon(format!(
                    "Duplicate vocabulary category '{}'",
                    cat.tag
                )));
            }
            generic_colors.insert(cat.tag, cat.color.clone());
            taxonomy.push(TaxonomyEntry {
                category: cat.tag,
                label: cat.label.clone(),
                terms: lowercase_set(&cat.terms),
            });
        }
        let generic_palette = ColorPalette::build(generic_colors, "vocabulary")?;

        // Dictionary entries
        let mut entries = Vec::new();
        for group in &dictionary.group {
            if !Strategy::Dictionary.taxonomy().contains(&group.category) {
                return Err(ReviewLensError::Lexicon(format!(
                    "Dictionary group '{}' uses category '{}' outside the dictionary taxonomy",
                    group.name, group.category
                )));
            }
            if group.weight <= 0.0 {
                return Err(ReviewLensError::Lexicon(format!(
                    "Dictionary group '{}' must have a positive weight",
                    group.name
                )));
            }
            for keyword in &group.keywords {
                if keyword.trim().is_empty() {
                    return Err(ReviewLensError::Lexicon(format!(
                        "Dictionary group '{}' contains an empty keyword",
                        group.name
                    )));
                }
                let regex = RegexBuilder::new(&regex::escape(keyword))
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| {
                        ReviewLensError::Lexicon(format!(
                            "Invalid dictionary keyword '{}': {}",
                            keyword, e
                        ))
                    })?;
                entries.push(CompiledDictionaryEntry {
                    keyword: keyword.clone(),
                    normalized: keyword.to_lowercase(),
                    category: group.category,
                    weight: group.weight,
                    regex,
                });
            }
        }

        // Sentiment families (order preserved)
        let sentiment_families = dictionary
            .sentiment
            .iter()
            .map(|family| {
                if family.multiplier <= 0.0 {
                    return Err(ReviewLensError::Lexicon(format!(
                        "Sentiment family '{}' must have a positive multiplier",
                        family.name
                    )));
                }
                let patterns = family
                    .patterns
                    .iter()
                    .map(|p| compile_pattern(p, &family.name))
                    .collect::<Result<Vec<_>>>()?;
                Ok(CompiledSentimentFamily {
                    name: family.name.clone(),
                    sentiment: family.sentiment,
                    multiplier: family.multiplier,
                    patterns,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let tone = CompiledTone {
            positive: dictionary
                .tone
                .positive
                .iter()
                .map(|p| compile_pattern(p, "tone.positive"))
                .collect::<Result<Vec<_>>>()?,
            negative: dictionary
                .tone
                .negative
                .iter()
                .map(|p| compile_pattern(p, "tone.negative"))
                .collect::<Result<Vec<_>>>()?,
            emphasis: compile_pattern(&dictionary.tone.emphasis, "tone.emphasis")?,
        };

        let intent = CompiledIntent {
            question: compile_pattern(&dictionary.intent.question, "intent.question")?,
            suggestion: compile_pattern(&dictionary.intent.suggestion, "intent.suggestion")?,
            concern: compile_pattern(&dictionary.intent.concern, "intent.concern")?,
            praise: compile_pattern(&dictionary.intent.praise, "intent.praise")?,
        };

        let mut dictionary_colors = HashMap::new();
        for (category, color) in &dictionary.colors {
            dictionary_colors.insert(*category, color.clone());
        }
        let dictionary_palette = ColorPalette::build(dictionary_colors, "dictionary")?;

        // Action templates
        let mut action_patterns: Vec<(Category, Vec<ActionTemplate>)> = Vec::new();
        for pattern in actions.pattern {
            if pattern.action.is_empty() {
                return Err(ReviewLensError::Lexicon(format!(
                    "Action pattern '{}' defines no actions",
                    pattern.category
                )));
            }
            if action_patterns.iter().any(|(c, _)| *c == pattern.category) {
                return Err(ReviewLensError::Lexicon(format!(
                    "Duplicate action pattern for '{}'",
                    pattern.category
                )));
            }
            action_patterns.push((pattern.category, pattern.action));
        }

        tracing::debug!(
            "Lexicon compiled: {} categories, {} dictionary keywords, {} sentiment families, {} action patterns",
            taxonomy.len(),
            entries.len(),
            sentiment_families.len(),
            action_patterns.len()
        );

        Ok(Self {
            korean_stopwords,
            english_stopwords,
            taxonomy,
            dictionary: entries,
            sentiment_families,
            tone,
            intent,
            action_patterns,
            generic_palette,
            dictionary_palette,
        })
    }

    /// Check a token against both stopword sets (case-insensitive)
    pub fn is_stopword(&self, token: &str) -> bool {
        let lower = token.to_lowercase();
        self.korean_stopwords.contains(&lower) || self.english_stopwords.contains(&lower)
    }

    /// First sentiment family with a matching pattern, or neutral with multiplier 1.0
    pub fn match_sentiment(&self, window: &str) -> (Sentiment, f64) {
        self.sentiment_families
            .iter()
            .find(|family| family.patterns.iter().any(|p| p.is_match(window)))
            .map(|family| (family.sentiment, family.multiplier))
            .unwrap_or((Sentiment::Neutral, 1.0))
    }

    /// Templates registered for a category
    pub fn action_templates(&self, category: Category) -> Option<&[ActionTemplate]> {
        self.action_patterns
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, templates)| templates.as_slice())
    }

    /// Color palette for a strategy's taxonomy
    pub fn palette(&self, strategy: Strategy) -> &ColorPalette {
        match strategy {
            Strategy::Tfidf => &self.generic_palette,
            Strategy::Dictionary => &self.dictionary_palette,
        }
    }

    /// Display label of a generic category (falls back to the tag)
    pub fn label(&self, category: Category) -> &str {
        self.taxonomy
            .iter()
            .find(|e| e.category == category)
            .map(|e| e.label.as_str())
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| category.as_str())
    }
}

fn read_table(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| ReviewLensError::Io {
        source: e,
        context: format!("Failed to read lexicon table: {:?}", path),
    })
}

fn compile_pattern(pattern: &str, owner: &str) -> Result<Regex> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| {
            ReviewLensError::Lexicon(format!("Invalid pattern in '{}': {}", owner, e))
        })
}

fn lowercase_set(words: &[String]) -> HashSet<String> {
    words.iter().map(|w| w.to_lowercase()).collect()
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7 && s.starts_with('#') && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}
