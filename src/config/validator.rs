use crate::config::{parse_duration, Config, SCHEMA_VERSION};
use crate::error::{Result, ReviewLensError, ValidationError};

const VALID_PROVIDERS: [&str; 1] = ["gemini"];

/// Configuration validator
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration
    pub fn validate(config: &Config) -> Result<()> {
        let mut errors = Vec::new();

        // Validate schema version
        Self::validate_schema_version(config, &mut errors);

        // Validate scoring thresholds
        Self::validate_analysis(config, &mut errors);
        Self::validate_dictionary(config, &mut errors);
        Self::validate_phrases(config, &mut errors);

        // Validate word cloud bounds
        Self::validate_word_cloud(config, &mut errors);

        // Validate lexicon override paths
        Self::validate_lexicon(config, &mut errors);

        // Validate enhancement settings
        Self::validate_enhancement(config, &mut errors);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ReviewLensError::ConfigValidation { errors })
        }
    }

    fn validate_schema_version(config: &Config, errors: &mut Vec<ValidationError>) {
        let version = &config.meta.schema_version;
        if version != SCHEMA_VERSION {
            errors.push(ValidationError::new(
                "_meta.schema_version",
                format!("Unsupported schema version: {}", version),
            ));
        }
    }

    fn validate_analysis(config: &Config, errors: &mut Vec<ValidationError>) {
        let analysis = &config.analysis;

        if analysis.min_frequency == 0 {
            errors.push(ValidationError::new(
                "analysis.min_frequency",
                "Minimum frequency must be at least 1",
            ));
        }

        if !analysis.min_tfidf.is_finite() || analysis.min_tfidf < 0.0 {
            errors.push(ValidationError::new(
                "analysis.min_tfidf",
                format!("TF-IDF threshold must be >= 0, got {}", analysis.min_tfidf),
            ));
        }

        if analysis.max_keywords == 0 {
            errors.push(ValidationError::new(
                "analysis.max_keywords",
                "Keyword cap must be greater than 0",
            ));
        }
    }

    fn validate_dictionary(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.dictionary.max_keywords == 0 {
            errors.push(ValidationError::new(
                "dictionary.max_keywords",
                "Keyword cap must be greater than 0",
            ));
        }
    }

    fn validate_phrases(config: &Config, errors: &mut Vec<ValidationError>) {
        if config.phrases.min_frequency == 0 {
            errors.push(ValidationError::new(
                "phrases.min_frequency",
                "Minimum frequency must be at least 1",
            ));
        }
    }

    fn validate_word_cloud(config: &Config, errors: &mut Vec<ValidationError>) {
        let cloud = &config.word_cloud;
        if cloud.min_size == 0 {
            errors.push(ValidationError::new(
                "word_cloud.min_size",
                "Minimum size must be greater than 0",
            ));
        }
        if cloud.max_size < cloud.min_size {
            errors.push(ValidationError::new(
                "word_cloud.max_size",
                format!(
                    "Maximum size {} is smaller than minimum size {}",
                    cloud.max_size, cloud.min_size
                ),
            ));
        }
    }

    fn validate_lexicon(config: &Config, errors: &mut Vec<ValidationError>) {
        // Existence is checked when the tables are loaded
        let lexicon = &config.lexicon;
        let paths = [
            ("lexicon.vocabulary_file", &lexicon.vocabulary_file),
            ("lexicon.dictionary_file", &lexicon.dictionary_file),
            ("lexicon.actions_file", &lexicon.actions_file),
        ];
        for (key, path) in paths {
            if matches!(path, Some(p) if p.as_os_str().is_empty()) {
                errors.push(ValidationError::new(key, "Path cannot be empty"));
            }
        }
    }

    fn validate_enhancement(config: &Config, errors: &mut Vec<ValidationError>) {
        let enhancement = &config.enhancement;

        // A missing key only disables enhancement at runtime; the run falls back
        if enhancement.enabled {
            let env_var = &enhancement.api_key_env;
            match std::env::var(env_var) {
                Ok(key) if key.trim().is_empty() => tracing::warn!(
                    "Environment variable {} is empty, enhancement will use the fallback",
                    env_var
                ),
                Ok(_) => {}
                Err(_) => tracing::warn!(
                    "Environment variable {} is not set, enhancement will use the fallback",
                    env_var
                ),
            }
        }

        if !VALID_PROVIDERS.contains(&enhancement.provider.as_str()) {
            errors.push(ValidationError::new(
                "enhancement.provider",
                format!(
                    "Provider must be one of {:?}, got '{}'",
                    VALID_PROVIDERS, enhancement.provider
                ),
            ));
        }

        if enhancement.model.is_empty() {
            errors.push(ValidationError::new(
                "enhancement.model",
                "Model name cannot be empty",
            ));
        }

        if parse_duration(&enhancement.timeout).is_none() {
            errors.push(ValidationError::new(
                "enhancement.timeout",
                format!("Invalid duration format: {}", enhancement.timeout),
            ));
        }

        if enhancement.min_signals == 0 {
            errors.push(ValidationError::new(
                "enhancement.min_signals",
                "At least one gate signal must be required",
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_valid_config() {
        let config = Config::default();
        assert!(ConfigValidator::validate(&config).is_ok());
    }

    #[test]
    fn test_empty_lexicon_path() {
        let mut config = Config::default();
        config.lexicon.dictionary_file = Some(PathBuf::new());
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_invalid_word_cloud_bounds() {
        let mut config = Config::default();
        config.word_cloud.min_size = 40;
        config.word_cloud.max_size = 20;
        assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = Config::default();
        config.meta.schema_version = "0.1.0".to_string();
        config.analysis.max_keywords = 0;
        config.enhancement.timeout = "whenever".to_string();
        config.enhancement.provider = "carrier-pigeon".to_string();

        match ConfigValidator::validate(&config) {
            Err(ReviewLensError::ConfigValidation { errors }) => {
                assert_eq!(errors.len(), 4);
                assert!(errors.iter().any(|e| e.path == "enhancement.timeout"));
            }
            other => panic!("expected validation failure, got {:?}", other),
        }
    }

    #[test]
    fn test_enabled_without_api_key_is_valid() {
        let mut config = Config::default();
        config.enhancement.enabled = true;
        config.enhancement.api_key_env = "REVIEWLENS_TEST_KEY_THAT_IS_NEVER_SET".to_string();
        assert!(ConfigValidator::validate(&config).is_ok());
    }
}
