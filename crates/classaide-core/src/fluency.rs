//! Reading-fluency scoring.
//!
//! Aligns a recognized transcript against the text a student was asked to
//! read aloud, word by word and position by position, and produces an
//! [`AssessmentResult`].
//!
//! Known limitation: words are compared exactly after lower-casing, so
//! punctuation attached to a word (`"dog."` vs `"dog"`) counts as a miss.

use serde::{Deserialize, Serialize};

/// Points subtracted from fluency to obtain the pronunciation score.
pub const PRONUNCIATION_PENALTY: u8 = 10;

/// Maximum number of struggled words reported per assessment.
pub const MAX_STRUGGLED_WORDS: usize = 5;

/// Maximum number of coaching tips reported per assessment.
pub const MAX_RECOMMENDATIONS: usize = 3;

/// Coaching tips, in the order they are offered.
pub const RECOMMENDATIONS: [&str; 4] = [
    "Practice reading aloud daily",
    "Focus on difficult words",
    "Work on reading pace",
    "Use phonetic exercises",
];

/// Outcome of one reading assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    /// Percentage of expected words read correctly at their position.
    pub fluency: u8,
    /// Fluency minus a fixed penalty, clamped to 0..=100.
    pub pronunciation: u8,
    /// Expected words that were missed, in reading order.
    pub struggled_words: Vec<String>,
    /// Coaching tips for the reader.
    pub recommendations: Vec<String>,
}

/// Tunables for [`FluencyScorer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorerConfig {
    /// Points subtracted from fluency for the pronunciation score.
    #[serde(default = "default_penalty")]
    pub pronunciation_penalty: u8,
    /// Struggled words to report (capped at [`MAX_STRUGGLED_WORDS`]).
    #[serde(default = "default_max_struggled")]
    pub max_struggled_words: usize,
    /// Tips to report (capped at [`MAX_RECOMMENDATIONS`]).
    #[serde(default = "default_max_recommendations")]
    pub max_recommendations: usize,
}

fn default_penalty() -> u8 {
    PRONUNCIATION_PENALTY
}
fn default_max_struggled() -> usize {
    MAX_STRUGGLED_WORDS
}
fn default_max_recommendations() -> usize {
    MAX_RECOMMENDATIONS
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            pronunciation_penalty: PRONUNCIATION_PENALTY,
            max_struggled_words: MAX_STRUGGLED_WORDS,
            max_recommendations: MAX_RECOMMENDATIONS,
        }
    }
}

/// Stateless word-alignment scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct FluencyScorer {
    config: ScorerConfig,
}

impl FluencyScorer {
    pub fn new(config: ScorerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    /// Score `transcript` against `expected_text`.
    ///
    /// Total over all inputs: empty strings and any script are accepted.
    pub fn score(&self, transcript: &str, expected_text: &str) -> AssessmentResult {
        let spoken = words(transcript);
        let expected = words(expected_text);

        let max_struggled = self.config.max_struggled_words.min(MAX_STRUGGLED_WORDS);
        let mut correct = 0usize;
        let mut struggled_words = Vec::new();

        for (i, expected_word) in expected.iter().enumerate() {
            if spoken.get(i) == Some(expected_word) {
                correct += 1;
            } else if struggled_words.len() < max_struggled {
                struggled_words.push(expected_word.clone());
            }
        }

        let fluency = percentage(correct, expected.len());
        let pronunciation = fluency.saturating_sub(self.config.pronunciation_penalty);

        let max_recommendations = self.config.max_recommendations.min(MAX_RECOMMENDATIONS);
        let recommendations = RECOMMENDATIONS
            .iter()
            .take(max_recommendations)
            .map(|tip| tip.to_string())
            .collect();

        AssessmentResult {
            fluency,
            pronunciation,
            struggled_words,
            recommendations,
        }
    }
}

/// Score with the default configuration.
pub fn score(transcript: &str, expected_text: &str) -> AssessmentResult {
    FluencyScorer::default().score(transcript, expected_text)
}

fn words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// `round(100 * part / whole)` with halves rounded up; 0 when `whole` is 0.
fn percentage(part: usize, whole: usize) -> u8 {
    if whole == 0 {
        return 0;
    }
    let rounded = (200 * part + whole) / (2 * whole);
    rounded.min(100) as u8
}
