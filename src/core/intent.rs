// src/core/intent.rs - Keyword intent matching

use super::knowledge::KnowledgeBase;
use super::types::{Classification, IntentCategory};

/// Minimum score a category must exceed to win.
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Classifies free text into an intent category.
pub trait IntentMatcher: Send + Sync {
    fn classify(&self, text: &str) -> Classification;
}

/// Substring matcher: a pattern found in the message scores
/// `pattern_len / message_len`; the best category must beat the threshold.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    categories: Vec<(IntentCategory, Vec<String>)>,
    threshold: f64,
}

impl KeywordMatcher {
    pub fn new(knowledge: &KnowledgeBase) -> Self {
        Self::with_threshold(knowledge, DEFAULT_THRESHOLD)
    }

    pub fn with_threshold(knowledge: &KnowledgeBase, threshold: f64) -> Self {
        let categories = knowledge
            .entries()
            .iter()
            .map(|e| (e.category, e.patterns.clone()))
            .collect();
        Self {
            categories,
            threshold,
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

/// Best score among `patterns` that occur in `message` (already lowercased).
fn pattern_score(message: &str, message_len: usize, patterns: &[String]) -> f64 {
    patterns
        .iter()
        .filter(|p| message.contains(p.as_str()))
        .map(|p| p.chars().count() as f64 / message_len as f64)
        .fold(0.0, f64::max)
}

impl IntentMatcher for KeywordMatcher {
    fn classify(&self, text: &str) -> Classification {
        let lowered = text.to_lowercase();
        let len = lowered.chars().count();
        if len == 0 {
            return Classification::unknown();
        }

        let mut best = Classification::unknown();
        for (category, patterns) in &self.categories {
            let score = pattern_score(&lowered, len, patterns);
            // Strict comparison keeps the earliest category on ties.
            if score > best.score {
                best = Classification {
                    category: *category,
                    score,
                };
            }
        }

        if best.score > self.threshold {
            best
        } else {
            Classification::unknown()
        }
    }
}
