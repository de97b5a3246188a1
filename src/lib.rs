//! ReviewLens - Code Review Comment Analysis
//!
//! Turns a batch of free-form code-review comments (Korean and English) into
//! ranked keywords, categories, frequent phrases, prioritized action items and
//! word-cloud entries, with an optional LLM enhancement step that degrades to
//! a neutral fallback.

pub mod actions;
pub mod analysis;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod enhance;
pub mod error;
pub mod lexicon;
pub mod wordcloud;

pub use error::{Result, ReviewLensError};
