//! CLI command definitions and parsing
use crate::actions::{ActionCategory, Priority};
use crate::analysis::{Category, Strategy};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "reviewlens",
    version,
    about = "Keyword, category and action item analysis for code review comments",
    long_about = "ReviewLens reads code review comments from files or stdin, scores keywords with \
                  TF-IDF or a domain dictionary, groups them into categories, and derives \
                  prioritized action items and word-cloud data."
)]
pub struct Cli {
    /// Global config file path (defaults to ~/.config/reviewlens/config.toml)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract keywords, categories and phrases
    Analyze {
        /// Comment inputs ("-" for stdin, *.json for a JSON array, otherwise one comment per line)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Scoring strategy ("tfidf" or "dictionary")
        #[arg(short, long)]
        strategy: Option<Strategy>,

        /// Profile to apply from the config file
        #[arg(short, long)]
        profile: Option<String>,

        /// Show results in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Generate prioritized action items
    Actions {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Keep only items with this priority (P1, P2, P3)
        #[arg(long)]
        priority: Option<Priority>,

        /// Keep only items of this kind (immediate, improvement, consideration)
        #[arg(long)]
        category: Option<ActionCategory>,

        #[arg(short, long)]
        profile: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Produce word-cloud entries
    Cloud {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Restrict to categories (repeatable)
        #[arg(short = 'C', long = "category")]
        categories: Vec<Category>,

        #[arg(short, long)]
        profile: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Run the optional LLM enhancement with fallback
    Enhance {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Skip the complexity gate
        #[arg(long)]
        force: bool,

        #[arg(short, long)]
        profile: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Validate configuration file
    Validate {
        /// Path to config file (defaults to standard location)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Initialize default configuration
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse CLI arguments from command line
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "reviewlens",
            "analyze",
            "comments.txt",
            "-",
            "--strategy",
            "dictionary",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Analyze {
                inputs,
                strategy,
                json,
                ..
            } => {
                assert_eq!(inputs.len(), 2);
                assert_eq!(strategy, Some(Strategy::Dictionary));
                assert!(json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_action_filters() {
        let cli = Cli::try_parse_from([
            "reviewlens",
            "actions",
            "c.json",
            "--priority",
            "P1",
            "--category",
            "immediate",
        ])
        .unwrap();
        match cli.command {
            Commands::Actions {
                priority, category, ..
            } => {
                assert_eq!(priority, Some(Priority::P1));
                assert_eq!(category, Some(ActionCategory::Immediate));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_strategy() {
        assert!(Cli::try_parse_from(["reviewlens", "analyze", "x", "--strategy", "bm25"]).is_err());
    }
}
