use reviewlens::actions::{ActionFilter, ActionGenerator, ActionItemStats};
use reviewlens::analysis::{category_breakdown, percentage, AnalysisStats, TextAnalyzer};
use reviewlens::cli::{Cli, Commands, ConfigAction};
use reviewlens::config::Config;
use reviewlens::corpus::load_corpus;
use reviewlens::enhance::{
    enhance_or_fallback, EnhancedAnalysis, EnhancementGate, EnhancementOutcome,
    EnhancementSource, GeminiProvider,
};
use reviewlens::error::{Result, ReviewLensError};
use reviewlens::lexicon::Lexicon;
use reviewlens::wordcloud::{word_cloud_stats, WordCloudTransform};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Initialize logging
    init_logging(cli.verbose);

    // Handle commands
    match cli.command {
        Commands::Analyze {
            inputs,
            strategy,
            profile,
            json,
        } => {
            let mut config = load_config(cli.config, profile)?;
            if let Some(strategy) = strategy {
                config.analysis.strategy = strategy;
            }
            cmd_analyze(&config, &inputs, json)?;
        }
        Commands::Actions {
            inputs,
            priority,
            category,
            profile,
            json,
        } => {
            let config = load_config(cli.config, profile)?;
            cmd_actions(&config, &inputs, ActionFilter { priority, category }, json)?;
        }
        Commands::Cloud {
            inputs,
            categories,
            profile,
            json,
        } => {
            let config = load_config(cli.config, profile)?;
            cmd_cloud(&config, &inputs, &categories, json)?;
        }
        Commands::Enhance {
            inputs,
            force,
            profile,
        } => {
            let config = load_config(cli.config, profile)?;
            cmd_enhance(&config, &inputs, force)?;
        }
        Commands::Config { action } => {
            cmd_config(cli.config, action)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default = if verbose {
        "reviewlens=debug"
    } else {
        "reviewlens=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_analyze(config: &Config, inputs: &[PathBuf], json: bool) -> Result<()> {
    let lexicon = load_lexicon(config)?;
    let corpus = load_corpus(inputs)?;
    let result = TextAnalyzer::new(lexicon, config).analyze(&corpus);

    if json {
        print_json(&result)?;
        return Ok(());
    }

    let stats = AnalysisStats::from_result(&result);
    println!("Analysis ({})", result.strategy);
    println!("==========");
    println!("Comments: {}", corpus.len());
    println!(
        "Words: {} total, {} unique, {} per comment",
        stats.total_words, stats.unique_words, stats.avg_words_per_comment
    );
    println!(
        "Keywords: {} in {} categories",
        stats.total_keywords, stats.category_count
    );

    if !result.keywords.is_empty() {
        println!("\nTop keywords:");
        for keyword in result.keywords.iter().take(15) {
            println!(
                "  {:<20} {:>4}x  {:>8.3}  {:<14} {}",
                keyword.text,
                keyword.frequency,
                keyword.score,
                keyword.category.as_str(),
                keyword.sentiment.as_str()
            );
        }
    }

    let breakdown = category_breakdown(&result);
    if !breakdown.is_empty() {
        println!("\nCategories:");
        for entry in &breakdown {
            println!(
                "  {:<14} {:>3} ({}%)  {}",
                entry.category.as_str(),
                entry.count,
                percentage(entry.count, stats.total_keywords),
                entry.samples.join(", ")
            );
        }
    }

    if !result.common_phrases.is_empty() {
        println!("\nCommon phrases:");
        for phrase in result.common_phrases.iter().take(10) {
            println!("  {:<30} {}", phrase.text, phrase.count);
        }
    }

    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ActionsReport {
    action_items: Vec<reviewlens::actions::ActionItem>,
    stats: ActionItemStats,
}

fn cmd_actions(config: &Config, inputs: &[PathBuf], filter: ActionFilter, json: bool) -> Result<()> {
    let lexicon = load_lexicon(config)?;
    let corpus = load_corpus(inputs)?;
    let result = TextAnalyzer::new(lexicon.clone(), config).analyze(&corpus);
    let items = filter.apply(&ActionGenerator::new(lexicon).generate(&result));
    let stats = ActionItemStats::from_items(&items);

    if json {
        print_json(&ActionsReport {
            action_items: items,
            stats,
        })?;
        return Ok(());
    }

    if items.is_empty() {
        println!("No action items");
        return Ok(());
    }

    println!(
        "Action items: {} (P1 {}, P2 {}, P3 {})",
        stats.total_items, stats.by_priority.p1, stats.by_priority.p2, stats.by_priority.p3
    );
    for item in &items {
        println!(
            "\n[{}] {} ({}, impact {}, effort {})",
            item.priority,
            item.title,
            item.category.as_str(),
            item.impact.as_str(),
            item.effort.as_str()
        );
        println!("  {}", item.description);
        println!("  Keywords: {}", item.related_keywords.join(", "));
        if let Some(examples) = &item.examples {
            for example in examples {
                println!("  - {}", example);
            }
        }
    }

    Ok(())
}

fn cmd_cloud(
    config: &Config,
    inputs: &[PathBuf],
    categories: &[reviewlens::analysis::Category],
    json: bool,
) -> Result<()> {
    let lexicon = load_lexicon(config)?;
    let corpus = load_corpus(inputs)?;
    let result = TextAnalyzer::new(lexicon.clone(), config).analyze(&corpus);
    let cloud = WordCloudTransform::new(lexicon, config.word_cloud.clone()).build(&result);
    let filtered = cloud.filter_by_categories(categories);

    if json {
        print_json(&filtered)?;
        return Ok(());
    }

    let stats = word_cloud_stats(&filtered.entries);
    println!(
        "Word cloud: {} words, avg frequency {}, avg score {}",
        stats.total_words, stats.avg_frequency, stats.avg_score
    );
    for entry in &filtered.entries {
        println!(
            "  {:<20} size {:>2}  {}  {}",
            entry.text,
            entry.size,
            entry.color,
            entry.category.as_str()
        );
    }

    Ok(())
}

fn cmd_enhance(config: &Config, inputs: &[PathBuf], force: bool) -> Result<()> {
    let lexicon = load_lexicon(config)?;
    let corpus = load_corpus(inputs)?;
    let result = TextAnalyzer::new(lexicon, config).analyze(&corpus);
    let existing: Vec<String> = result.keywords.iter().map(|k| k.text.clone()).collect();

    let gate = EnhancementGate::from_config(&config.enhancement);
    let signals = gate.signals(&corpus);
    tracing::debug!("Gate signals: {:?}", signals);

    let fallback = || EnhancementOutcome {
        source: EnhancementSource::Fallback,
        analysis: EnhancedAnalysis::fallback(&existing),
    };

    let outcome = if !force && !config.enhancement.enabled {
        tracing::info!("Enhancement disabled in config; using fallback");
        fallback()
    } else if !force && signals.count() < gate.min_signals {
        tracing::info!(
            "Comments too simple for enhancement ({} of {} signals)",
            signals.count(),
            gate.min_signals
        );
        fallback()
    } else {
        match GeminiProvider::from_config(&config.enhancement) {
            Ok(provider) => {
                let timeout = config.enhancement.timeout_duration()?;
                let rt = tokio::runtime::Runtime::new().map_err(|e| ReviewLensError::Io {
                    source: e,
                    context: "Failed to create tokio runtime".to_string(),
                })?;
                rt.block_on(enhance_or_fallback(&provider, &corpus, &existing, timeout))
            }
            Err(e) => {
                tracing::warn!("Enhancement provider unavailable, using fallback: {}", e);
                fallback()
            }
        }
    };

    print_json(&outcome)
}

fn cmd_config(config_path: Option<PathBuf>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(config_path, None)?;
            let toml = toml::to_string_pretty(&config)?;
            println!("{}", toml);
        }
        ConfigAction::Validate { file } => {
            let path = match file.or(config_path) {
                Some(path) => path,
                None => Config::default_path()?,
            };
            let config = Config::load(&path)?;
            // Lexicon overrides must also parse
            load_lexicon(&config)?;
            println!("✓ Configuration is valid");
            println!("  Schema version: {}", config.meta.schema_version);
        }
        ConfigAction::Init { force } => {
            let path = match config_path {
                Some(path) => path,
                None => Config::default_path()?,
            };

            if path.exists() && !force {
                println!("Configuration file already exists at: {}", path.display());
                println!("Use --force to overwrite");
                return Ok(());
            }

            Config::default().save(&path)?;
            println!("✓ Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

fn load_config(config_path: Option<PathBuf>, profile: Option<String>) -> Result<Config> {
    let path = match config_path {
        Some(path) => path,
        None => Config::default_path()?,
    };

    if !path.exists() {
        tracing::debug!(
            "Config file not found, using defaults. Run 'reviewlens config init' to create one."
        );
        let mut config = Config::default();
        config.apply_env_overrides();
        if let Some(profile) = profile {
            config.apply_profile(&profile)?;
        }
        return Ok(config);
    }

    if let Some(profile) = profile {
        Config::load_with_profile(&path, &profile)
    } else {
        Config::load(&path)
    }
}

fn load_lexicon(config: &Config) -> Result<Arc<Lexicon>> {
    let tables = &config.lexicon;
    let lexicon = Lexicon::with_overrides(
        tables.vocabulary_file.as_deref(),
        tables.dictionary_file.as_deref(),
        tables.actions_file.as_deref(),
    )?;
    Ok(Arc::new(lexicon))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| ReviewLensError::Json {
        source: e,
        context: "Failed to serialize output".to_string(),
    })?;
    println!("{}", json);
    Ok(())
}
