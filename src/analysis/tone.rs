// Whole-text tone and intent detection
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::lexicon::Lexicon;

/// Overall tone of a review text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
}

/// What the reviewer is trying to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Question,
    Suggestion,
    Concern,
    Praise,
}

/// Tone, intent and the score multiplier derived from them
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ToneReport {
    pub tone: Tone,
    pub intent: Intent,
    pub emphasis: bool,
    pub multiplier: f64,
}

/// Rule-based tone/intent detector driven by the lexicon's patterns
pub struct ToneAnalyzer {
    lexicon: Arc<Lexicon>,
}

impl ToneAnalyzer {
    pub fn new(lexicon: Arc<Lexicon>) -> Self {
        Self { lexicon }
    }

    /// Compare how many positive and negative pattern groups match
    pub fn detect_tone(&self, text: &str) -> Tone {
        let tone = &self.lexicon.tone;
        let positive = tone.positive.iter().filter(|p| p.is_match(text)).count();
        let negative = tone.negative.iter().filter(|p| p.is_match(text)).count();

        match positive.cmp(&negative) {
            std::cmp::Ordering::Greater => Tone::Positive,
            std::cmp::Ordering::Less => Tone::Negative,
            std::cmp::Ordering::Equal => Tone::Neutral,
        }
    }

    /// First matching rule wins; unmatched text reads as a suggestion
    pub fn detect_intent(&self, text: &str) -> Intent {
        let intent = &self.lexicon.intent;
        if intent.question.is_match(text) {
            Intent::Question
        } else if intent.suggestion.is_match(text) {
            Intent::Suggestion
        } else if intent.concern.is_match(text) {
            Intent::Concern
        } else if intent.praise.is_match(text) {
            Intent::Praise
        } else {
            Intent::Suggestion
        }
    }

    pub fn has_emphasis(&self, text: &str) -> bool {
        self.lexicon.tone.emphasis.is_match(text)
    }

    /// Analyze a text and compute its score multiplier (never below 0.5)
    pub fn analyze(&self, text: &str) -> ToneReport {
        let tone = self.detect_tone(text);
        let intent = self.detect_intent(text);
        let emphasis = self.has_emphasis(text);

        let mut multiplier = 1.0;
        if tone == Tone::Negative {
            multiplier += 0.3;
        }
        match intent {
            Intent::Concern => multiplier += 0.5,
            Intent::Question => multiplier -= 0.2,
            _ => {}
        }
        if emphasis {
            multiplier += 0.2;
        }

        ToneReport {
            tone,
            intent,
            emphasis,
            multiplier: f64::max(0.5, multiplier),
        }
    }
}
