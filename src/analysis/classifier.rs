// Category classification against the static taxonomy tables
use std::sync::Arc;

use crate::analysis::types::Category;
use crate::lexicon::Lexicon;

/// Assigns exactly one category to each keyword
///
/// Generic terms are looked up across the vocabulary categories in file
/// order; the first category whose term set contains the term wins.
/// Dictionary keywords use their group's category. Anything else is
/// `general`.
pub struct CategoryClassifier {
    lexicon: Arc<Lexicon>,
}

impl CategoryClassifier {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// Classify a normalized term against the generic taxonomy
    pub fn classify(&self, term: &str) -> Category {
        let lower = term.to_lowercase();
        self.lexicon
            .taxonomy
            .iter()
            .find(|entry| entry.terms.contains(&lower))
            .map(|entry| entry.category)
            .unwrap_or(Category::General)
    }

    /// Classify a dictionary keyword by group membership
    pub fn classify_dictionary(&self, keyword: &str) -> Category {
        let lower = keyword.to_lowercase();
        self.lexicon
            .dictionary
            .iter()
            .find(|entry| entry.normalized == lower)
            .map(|entry| entry.category)
            .unwrap_or(Category::General)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::types::Strategy;

    fn create_test_classifier() -> CategoryClassifier {
        CategoryClassifier::new(Arc::new(
            Lexicon::builtin().expect("Failed to create test lexicon"),
        ))
    }

    #[test]
    fn test_classify_generic_terms() {
        let classifier = create_test_classifier();
        assert_eq!(classifier.classify("성능"), Category::Performance);
        assert_eq!(classifier.classify("bug"), Category::BugFix);
        assert_eq!(classifier.classify("Refactor"), Category::CodeQuality);
    }

    #[test]
    fn test_classify_first_category_wins() {
        let classifier = create_test_classifier();
        // Listed under both code-quality and performance; code-quality comes first
        assert_eq!(classifier.classify("optimize"), Category::CodeQuality);
        assert_eq!(classifier.classify("최적화"), Category::CodeQuality);
    }

    #[test]
    fn test_classify_unknown_is_general() {
        let classifier = create_test_classifier();
        assert_eq!(classifier.classify("banana"), Category::General);
        assert_eq!(classifier.classify(""), Category::General);
    }

    #[test]
    fn test_classify_dictionary_membership() {
        let classifier = create_test_classifier();
        assert_eq!(
            classifier.classify_dictionary("Memory Leak"),
            Category::Critical
        );
        assert_eq!(classifier.classify_dictionary("jwt"), Category::Security);
        assert_eq!(classifier.classify_dictionary("nothing"), Category::General);
    }

    #[test]
    fn test_classification_is_total() {
        let classifier = create_test_classifier();
        for term in ["성능", "banana", "test", "xss", "문서"] {
            let category = classifier.classify(term);
            assert!(Strategy::Tfidf.taxonomy().contains(&category));
        }
    }
}
