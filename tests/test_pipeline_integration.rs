// Integration test for the analysis pipeline with realistic review comments
use std::sync::Arc;
use reviewlens::actions::{ActionGenerator, Priority};
use reviewlens::analysis::{AnalysisStats, Category, Sentiment, Strategy, TextAnalyzer};
use reviewlens::config::Config;
use reviewlens::lexicon::Lexicon;

fn create_lexicon() -> Arc<Lexicon> {
    Arc::new(Lexicon::builtin().expect("Failed to load built-in lexicon"))
}

fn corpus(comments: &[&str]) -> Vec<String> {
    comments.iter().map(|s| s.to_string()).collect()
}

fn performance_corpus() -> Vec<String> {
    corpus(&[
        "이 함수는 성능 문제가 있습니다",
        "성능 문제를 개선해야 합니다",
        "성능 최적화가 필요합니다",
    ])
}

fn review_thread() -> Vec<String> {
    corpus(&[
        "The **cache** lookup is slow here, consider memoization.",
        "`let x = compute();` - this cache is never invalidated",
        "Please add a unit test for the cache invalidation path",
        "Naming: `tmp` should describe what it holds. See [guide](https://example.com)",
        "<b>LGTM</b> after the cache fix",
        "```rust\nfn main() {}\n```\nThe refactor looks good, but the test is flaky",
    ])
}

#[test]
fn test_empty_corpus() {
    let analyzer = TextAnalyzer::new(create_lexicon(), &Config::default());
    let result = analyzer.analyze(&[]);

    assert_eq!(result.total_words, 0);
    assert_eq!(result.unique_words, 0);
    assert_eq!(result.average_words_per_comment, 0.0);
    assert!(result.keywords.is_empty());
    assert!(result.common_phrases.is_empty());
}

#[test]
fn test_markup_only_corpus_is_empty() {
    let analyzer = TextAnalyzer::new(create_lexicon(), &Config::default());
    let result = analyzer.analyze(&corpus(&["```\nlet a = 1;\n```", "`inline`", "<br/>"]));

    assert_eq!(result.total_words, 0);
    assert!(result.keywords.is_empty());
}

#[test]
fn test_dictionary_performance_scenario() {
    let lexicon = create_lexicon();
    let analyzer =
        TextAnalyzer::with_strategy(lexicon.clone(), &Config::default(), Strategy::Dictionary);
    let result = analyzer.analyze(&performance_corpus());

    let optimization = result
        .keywords
        .iter()
        .find(|k| k.text == "성능 최적화")
        .expect("performance keyword");
    assert_eq!(optimization.category, Category::Performance);
    assert!(!result.keywords_in(Category::Performance).is_empty());

    let items = ActionGenerator::new(lexicon).generate(&result);
    let performance = items
        .iter()
        .find(|i| i.keyword_category == Category::Performance)
        .expect("performance action item");
    assert_eq!(performance.id, "performance-0");
    assert_eq!(performance.title, "성능 최적화 필요");
    assert_eq!(performance.priority, Priority::P1);
    assert!(performance
        .related_keywords
        .contains(&"성능 최적화".to_string()));
}

#[test]
fn test_tfidf_drops_terms_present_in_every_comment() {
    let analyzer = TextAnalyzer::new(create_lexicon(), &Config::default());
    let result = analyzer.analyze(&performance_corpus());

    // idf is zero when every comment contains the term
    assert!(result.keywords.iter().all(|k| k.text != "성능"));
    assert!(result.total_words > 0);
    assert!(result.unique_words <= result.total_words);
}

#[test]
fn test_memory_leak_strong_negative() {
    let analyzer =
        TextAnalyzer::with_strategy(create_lexicon(), &Config::default(), Strategy::Dictionary);
    let result = analyzer.analyze(&corpus(&[
        "memory leak 문제가 있습니다. Another memory leak here",
    ]));

    let leak = result
        .keywords
        .iter()
        .find(|k| k.text == "memory leak")
        .expect("memory leak keyword");
    assert_eq!(leak.frequency, 2);
    assert_eq!(leak.sentiment, Sentiment::Negative);
    assert!((leak.score - 15.0).abs() < 1e-9);
    assert_eq!(result.keywords_in(Category::Critical).len(), 1);
}

#[test]
fn test_tfidf_review_thread() {
    let analyzer = TextAnalyzer::new(create_lexicon(), &Config::default());
    let comments = review_thread();
    let result = analyzer.analyze(&comments);

    assert_eq!(result.strategy, Strategy::Tfidf);
    assert!(result.total_words > 0);

    let cache = result
        .keywords
        .iter()
        .find(|k| k.text == "cache")
        .expect("cache keyword");
    assert_eq!(cache.frequency, 4);
    assert_eq!(cache.category, Category::Performance);
    assert!(cache.contexts.len() <= 3);
    assert!(cache.contexts.iter().all(|c| c.to_lowercase().contains("cache")));

    // code spans never become tokens
    assert!(result.keywords.iter().all(|k| k.text != "compute"));
    assert!(result.keywords.iter().all(|k| k.text != "main"));
}

#[test]
fn test_categories_cover_taxonomy() {
    for strategy in [Strategy::Tfidf, Strategy::Dictionary] {
        let analyzer = TextAnalyzer::with_strategy(create_lexicon(), &Config::default(), strategy);
        let result = analyzer.analyze(&review_thread());

        for category in strategy.taxonomy() {
            assert!(result.categories.contains_key(category));
        }
        let bucketed: usize = result.categories.values().map(Vec::len).sum();
        assert_eq!(bucketed, result.keywords.len());
    }
}

#[test]
fn test_keywords_sorted_and_bounded() {
    let mut config = Config::default();
    config.analysis.max_keywords = 3;
    config.analysis.min_frequency = 1;
    config.phrases.max_phrases = 2;
    config.phrases.min_frequency = 1;

    let analyzer = TextAnalyzer::new(create_lexicon(), &config);
    let result = analyzer.analyze(&review_thread());

    assert!(result.keywords.len() <= 3);
    assert!(result.common_phrases.len() <= 2);
    for pair in result.keywords.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
    for pair in result.common_phrases.windows(2) {
        assert!(pair[0].count >= pair[1].count);
    }
    assert!(result.keywords.iter().all(|k| k.frequency >= 1 && k.score >= 0.0));
}

#[test]
fn test_deterministic() {
    let lexicon = create_lexicon();
    let config = Config::default();
    for strategy in [Strategy::Tfidf, Strategy::Dictionary] {
        let first = TextAnalyzer::with_strategy(lexicon.clone(), &config, strategy)
            .analyze(&review_thread());
        let second = TextAnalyzer::with_strategy(lexicon.clone(), &config, strategy)
            .analyze(&review_thread());
        assert_eq!(first, second);
    }
}

#[test]
fn test_stats_from_pipeline() {
    let analyzer = TextAnalyzer::new(create_lexicon(), &Config::default());
    let result = analyzer.analyze(&review_thread());
    let stats = AnalysisStats::from_result(&result);

    assert_eq!(stats.total_words, result.total_words);
    assert_eq!(stats.total_keywords, result.keywords.len());
    assert!(stats.category_count >= 1);
}

#[test]
fn test_json_shape() {
    let analyzer = TextAnalyzer::new(create_lexicon(), &Config::default());
    let result = analyzer.analyze(&review_thread());
    let json = serde_json::to_value(&result).unwrap();

    assert!(json.get("totalWords").is_some());
    assert!(json.get("averageWordsPerComment").is_some());
    assert!(json.get("commonPhrases").is_some());
    assert!(json["categories"].get("code-quality").is_some());
}
