//! Configuration management for ReviewLens
//!
//! Pipeline thresholds, lexicon table overrides and the optional enhancement
//! collaborator are configured from one TOML file. Every value has a default,
//! so a missing section falls back to the built-in behavior.

use crate::analysis::Strategy;
use crate::error::{Result, ReviewLensError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

mod validator;

pub use validator::ConfigValidator;

pub const SCHEMA_VERSION: &str = "1.0.0";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "_meta")]
    pub meta: MetaConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub dictionary: DictionaryConfig,
    #[serde(default)]
    pub phrases: PhraseConfig,
    #[serde(default)]
    pub word_cloud: WordCloudConfig,
    #[serde(default)]
    pub lexicon: LexiconConfig,
    #[serde(default)]
    pub enhancement: EnhancementConfig,
    #[serde(default)]
    pub profiles: HashMap<String, ProfileOverrides>,
}

/// Metadata about the configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaConfig {
    pub schema_version: String,
    #[serde(default = "current_timestamp")]
    pub created_at: String,
    #[serde(default = "current_timestamp")]
    pub last_modified: String,
}

fn current_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// TF-IDF scoring and general pipeline settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub strategy: Strategy,
    /// Minimum corpus frequency for a TF-IDF keyword
    pub min_frequency: u32,
    /// Average TF-IDF must be strictly above this
    pub min_tfidf: f64,
    pub max_keywords: usize,
    pub max_contexts: usize,
    /// Characters kept either side of a keyword in context snippets
    pub context_radius: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::Tfidf,
            min_frequency: 2,
            min_tfidf: 0.01,
            max_keywords: 50,
            max_contexts: 3,
            context_radius: 25,
        }
    }
}

/// Dictionary scoring settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryConfig {
    /// Characters inspected either side of a keyword for sentiment
    pub context_window: usize,
    pub max_keywords: usize,
    /// Rescale scores by whole-text tone and intent
    pub tone_adjustment: bool,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            context_window: 50,
            max_keywords: 30,
            tone_adjustment: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhraseConfig {
    pub min_frequency: u32,
    pub max_phrases: usize,
}

impl Default for PhraseConfig {
    fn default() -> Self {
        Self {
            min_frequency: 2,
            max_phrases: 20,
        }
    }
}

/// Word-cloud font size bounds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordCloudConfig {
    pub min_size: u32,
    pub max_size: u32,
}

impl Default for WordCloudConfig {
    fn default() -> Self {
        Self {
            min_size: 12,
            max_size: 48,
        }
    }
}

/// Optional overrides for the built-in lexicon tables
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexiconConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vocabulary_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dictionary_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions_file: Option<PathBuf>,
}

/// Enhancement collaborator configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhancementConfig {
    pub enabled: bool,
    pub provider: String,
    pub api_key_env: String,
    pub model: String,
    /// Duration string such as "30s" or "1500ms"
    pub timeout: String,
    /// Gate: joined text longer than this many characters
    pub min_text_length: usize,
    /// Gate: more comments than this
    pub min_comment_count: usize,
    /// Gate: signals required before calling the provider
    pub min_signals: usize,
}

impl Default for EnhancementConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: "gemini".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            model: "gemini-1.5-flash".to_string(),
            timeout: "30s".to_string(),
            min_text_length: 200,
            min_comment_count: 10,
            min_signals: 2,
        }
    }
}

impl EnhancementConfig {
    pub fn timeout_duration(&self) -> Result<Duration> {
        parse_duration(&self.timeout).ok_or_else(|| ReviewLensError::InvalidConfigValue {
            path: "enhancement.timeout".to_string(),
            message: format!("Invalid duration format: {}", self.timeout),
        })
    }
}

/// Profile-specific configuration overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<Strategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enhancement_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone_adjustment: Option<bool>,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ReviewLensError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ReviewLensError::Io {
            source: e,
            context: format!("Failed to read config file: {:?}", path),
        })?;
        let mut config: Config = toml::from_str(&content)?;

        // Apply environment variable overrides
        config.apply_env_overrides();

        // Validate configuration
        ConfigValidator::validate(&config)?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ReviewLensError::Io {
                source: e,
                context: format!("Failed to create config directory: {:?}", parent),
            })?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ReviewLensError::Io {
            source: e,
            context: format!("Failed to write config file: {:?}", path),
        })?;
        Ok(())
    }

    /// Load configuration with a specific profile applied
    pub fn load_with_profile(path: &Path, profile: &str) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_profile(profile)?;
        Ok(config)
    }

    /// Apply a profile's overrides to the configuration
    pub fn apply_profile(&mut self, profile: &str) -> Result<()> {
        let overrides = self.profiles.get(profile).cloned().ok_or_else(|| {
            ReviewLensError::Config(format!("Unknown profile: {}", profile))
        })?;

        if let Some(strategy) = overrides.strategy {
            self.analysis.strategy = strategy;
        }
        if let Some(enabled) = overrides.enhancement_enabled {
            self.enhancement.enabled = enabled;
        }
        if let Some(tone) = overrides.tone_adjustment {
            self.dictionary.tone_adjustment = tone;
        }
        Ok(())
    }

    /// Apply environment variable overrides
    /// Environment variables in format: REVIEWLENS_SECTION__KEY=value
    pub fn apply_env_overrides(&mut self) {
        for (key, value) in std::env::vars() {
            if let Some(config_key) = key.strip_prefix("REVIEWLENS_") {
                if let Err(e) = self.set_value_from_env(config_key, &value) {
                    tracing::warn!("Failed to apply env override {}: {}", key, e);
                }
            }
        }
    }

    fn set_value_from_env(&mut self, path: &str, value: &str) -> Result<()> {
        match path {
            "ANALYSIS__STRATEGY" => {
                self.analysis.strategy =
                    value
                        .parse()
                        .map_err(|message| ReviewLensError::InvalidConfigValue {
                            path: path.to_string(),
                            message,
                        })?;
            }
            "ANALYSIS__MIN_FREQUENCY" => {
                self.analysis.min_frequency = parse_env(path, value)?;
            }
            "ANALYSIS__MIN_TFIDF" => {
                self.analysis.min_tfidf = parse_env(path, value)?;
            }
            "DICTIONARY__CONTEXT_WINDOW" => {
                self.dictionary.context_window = parse_env(path, value)?;
            }
            "DICTIONARY__TONE_ADJUSTMENT" => {
                self.dictionary.tone_adjustment = parse_env(path, value)?;
            }
            "ENHANCEMENT__ENABLED" => {
                self.enhancement.enabled = parse_env(path, value)?;
            }
            "ENHANCEMENT__MODEL" => {
                self.enhancement.model = value.to_string();
            }
            "ENHANCEMENT__TIMEOUT" => {
                self.enhancement.timeout = value.to_string();
            }
            _ => {
                tracing::debug!("Unknown env config key: {}", path);
            }
        }
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            ReviewLensError::Config("Cannot determine config directory".to_string())
        })?;

        Ok(config_dir.join("reviewlens").join("config.toml"))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            meta: MetaConfig {
                schema_version: SCHEMA_VERSION.to_string(),
                created_at: current_timestamp(),
                last_modified: current_timestamp(),
            },
            analysis: AnalysisConfig::default(),
            dictionary: DictionaryConfig::default(),
            phrases: PhraseConfig::default(),
            word_cloud: WordCloudConfig::default(),
            lexicon: LexiconConfig::default(),
            enhancement: EnhancementConfig::default(),
            profiles: HashMap::new(),
        }
    }
}

fn parse_env<T: std::str::FromStr>(path: &str, value: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| ReviewLensError::InvalidConfigValue {
            path: path.to_string(),
            message: format!("Cannot parse '{}'", value),
        })
}

/// Parse "500ms", "30s", "2m", "1h" or bare seconds
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    let (digits, unit) = match s.find(|c: char| !c.is_ascii_digit()) {
        Some(idx) => s.split_at(idx),
        None => (s, "s"),
    };
    let value: u64 = digits.parse().ok()?;
    match unit {
        "ms" => Some(Duration::from_millis(value)),
        "s" => Some(Duration::from_secs(value)),
        "m" => Some(Duration::from_secs(value.checked_mul(60)?)),
        "h" => Some(Duration::from_secs(value.checked_mul(3600)?)),
        _ => None,
    }
}
