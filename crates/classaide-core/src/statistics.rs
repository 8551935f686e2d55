//! Class-level statistics over a batch of reading assessments.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::report::StudentResult;

/// Readers below this fluency are flagged for extra support.
pub const SUPPORT_THRESHOLD: u8 = 60;

/// Aggregate statistics across one class assessment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassStats {
    /// Number of readings scored.
    pub readings: usize,
    /// Mean fluency percentage.
    pub mean_fluency: f64,
    /// Mean pronunciation percentage.
    pub mean_pronunciation: f64,
    /// Median fluency percentage.
    pub median_fluency: f64,
    /// How often each word was struggled with, most frequent first.
    pub struggled_word_counts: Vec<WordCount>,
    /// Students whose fluency fell below [`SUPPORT_THRESHOLD`].
    pub needs_support: Vec<String>,
}

/// A struggled word and the number of readers who missed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCount {
    pub word: String,
    pub count: usize,
}

/// Compute aggregate statistics from all student results.
pub fn compute_class_stats(results: &[StudentResult]) -> ClassStats {
    if results.is_empty() {
        return ClassStats::default();
    }

    let n = results.len() as f64;
    let mean_fluency = results
        .iter()
        .map(|r| r.result.fluency as f64)
        .sum::<f64>()
        / n;
    let mean_pronunciation = results
        .iter()
        .map(|r| r.result.pronunciation as f64)
        .sum::<f64>()
        / n;

    let mut fluencies: Vec<u8> = results.iter().map(|r| r.result.fluency).collect();
    fluencies.sort_unstable();
    let mid = fluencies.len() / 2;
    let median_fluency = if fluencies.len() % 2 == 0 {
        (fluencies[mid - 1] as f64 + fluencies[mid] as f64) / 2.0
    } else {
        fluencies[mid] as f64
    };

    // Count each word once per reader
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for r in results {
        let mut seen = std::collections::HashSet::new();
        for word in &r.result.struggled_words {
            if seen.insert(word.as_str()) {
                *counts.entry(word.as_str()).or_default() += 1;
            }
        }
    }
    let mut struggled_word_counts: Vec<WordCount> = counts
        .into_iter()
        .map(|(word, count)| WordCount {
            word: word.to_string(),
            count,
        })
        .collect();
    struggled_word_counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));

    let needs_support = results
        .iter()
        .filter(|r| r.result.fluency < SUPPORT_THRESHOLD)
        .map(|r| r.student.clone())
        .collect();

    ClassStats {
        readings: results.len(),
        mean_fluency,
        mean_pronunciation,
        median_fluency,
        struggled_word_counts,
        needs_support,
    }
}
