//! Rule-based action item generation
//!
//! Each keyword category with a non-empty bucket instantiates every template
//! registered for it in the lexicon's action table. Aggregate keyword
//! frequency can escalate a template's base priority.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::analysis::{AnalysisResult, Category};
use crate::lexicon::Lexicon;

/// Aggregate frequency at which every template becomes P1
const ESCALATE_TO_P1: u32 = 10;
/// Aggregate frequency at which P3 templates become P2
const ESCALATE_TO_P2: u32 = 5;
const MAX_RELATED_KEYWORDS: usize = 5;

/// Action priority; `P1` sorts first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Priority {
    P1,
    P2,
    P3,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::P1 => "P1",
            Priority::P2 => "P2",
            Priority::P3 => "P3",
        }
    }

    /// Raise the base priority according to aggregate keyword frequency
    pub fn escalate(self, total_frequency: u32) -> Self {
        if total_frequency >= ESCALATE_TO_P1 {
            Priority::P1
        } else if total_frequency >= ESCALATE_TO_P2 {
            self.min(Priority::P2)
        } else {
            self
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "P1" => Ok(Priority::P1),
            "P2" => Ok(Priority::P2),
            "P3" => Ok(Priority::P3),
            _ => Err(format!("Priority must be P1, P2 or P3, got '{}'", s)),
        }
    }
}

/// Urgency bucket of an action item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionCategory {
    Immediate,
    Improvement,
    Consideration,
}

impl ActionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionCategory::Immediate => "immediate",
            ActionCategory::Improvement => "improvement",
            ActionCategory::Consideration => "consideration",
        }
    }
}

impl FromStr for ActionCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "immediate" => Ok(ActionCategory::Immediate),
            "improvement" => Ok(ActionCategory::Improvement),
            "consideration" => Ok(ActionCategory::Consideration),
            _ => Err(format!(
                "Action category must be immediate, improvement or consideration, got '{}'",
                s
            )),
        }
    }
}

/// Impact/effort level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    High,
    Medium,
    Low,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::High => "high",
            Level::Medium => "medium",
            Level::Low => "low",
        }
    }
}

/// Template record from the action table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionTemplate {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub category: ActionCategory,
    pub impact: Level,
    pub effort: Level,
    #[serde(default)]
    pub examples: Vec<String>,
}

/// Instantiated recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionItem {
    /// `<keyword category>-<template index>`
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub category: ActionCategory,
    pub keyword_category: Category,
    /// At most five keyword texts
    pub related_keywords: Vec<String>,
    pub impact: Level,
    pub effort: Level,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub examples: Option<Vec<String>>,
}

/// Declarative interpreter over the action table
pub struct ActionGenerator {
    lexicon: Arc<Lexicon>,
}

impl ActionGenerator {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// Generate action items for every non-empty category with templates
    ///
    /// Output is stable-sorted by priority, so within a priority items keep
    /// category order then template order.
    pub fn generate(&self, result: &AnalysisResult) -> Vec<ActionItem> {
        let mut items = Vec::new();
        let mut processed: BTreeSet<Category> = BTreeSet::new();

        for (category, keywords) in &result.categories {
            if keywords.is_empty() || !processed.insert(*category) {
                continue;
            }
            let Some(templates) = self.lexicon.action_templates(*category) else {
                continue;
            };

            let total_frequency: u32 = keywords.iter().map(|k| k.frequency).sum();
            let related: Vec<String> = keywords
                .iter()
                .take(MAX_RELATED_KEYWORDS)
                .map(|k| k.text.clone())
                .collect();

            for (index, template) in templates.iter().enumerate() {
                items.push(ActionItem {
                    id: format!("{}-{}", category, index),
                    title: template.title.clone(),
                    description: template.description.clone(),
                    priority: template.priority.escalate(total_frequency),
                    category: template.category,
                    keyword_category: *category,
                    related_keywords: related.clone(),
                    impact: template.impact,
                    effort: template.effort,
                    examples: (!template.examples.is_empty()).then(|| template.examples.clone()),
                });
            }
        }

        items.sort_by_key(|item| item.priority);
        tracing::debug!(
            "Generated {} action items from {} categories",
            items.len(),
            processed.len()
        );
        items
    }
}

/// Counts by priority
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PriorityCounts {
    #[serde(rename = "P1")]
    pub p1: usize,
    #[serde(rename = "P2")]
    pub p2: usize,
    #[serde(rename = "P3")]
    pub p3: usize,
}

/// Counts by action category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    pub immediate: usize,
    pub improvement: usize,
    pub consideration: usize,
}

/// Counts by impact
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImpactCounts {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

/// Aggregate counts over a list of action items
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionItemStats {
    pub total_items: usize,
    pub by_priority: PriorityCounts,
    pub by_category: CategoryCounts,
    pub by_impact: ImpactCounts,
}

impl ActionItemStats {
    pub fn from_items(items: &[ActionItem]) -> Self {
        let mut stats = Self {
            total_items: items.len(),
            ..Self::default()
        };

        for item in items {
            match item.priority {
                Priority::P1 => stats.by_priority.p1 += 1,
                Priority::P2 => stats.by_priority.p2 += 1,
                Priority::P3 => stats.by_priority.p3 += 1,
            }
            match item.category {
                ActionCategory::Immediate => stats.by_category.immediate += 1,
                ActionCategory::Improvement => stats.by_category.improvement += 1,
                ActionCategory::Consideration => stats.by_category.consideration += 1,
            }
            match item.impact {
                Level::High => stats.by_impact.high += 1,
                Level::Medium => stats.by_impact.medium += 1,
                Level::Low => stats.by_impact.low += 1,
            }
        }

        stats
    }
}

/// Optional, conjunctive filter over generated items
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActionFilter {
    pub priority: Option<Priority>,
    pub category: Option<ActionCategory>,
}

impl ActionFilter {
    pub fn matches(&self, item: &ActionItem) -> bool {
        self.priority.map_or(true, |p| item.priority == p)
            && self.category.map_or(true, |c| item.category == c)
    }

    pub fn apply(&self, items: &[ActionItem]) -> Vec<ActionItem> {
        items.iter().filter(|item| self.matches(item)).cloned().collect()
    }
}
