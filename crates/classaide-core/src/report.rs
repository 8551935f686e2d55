//! Class assessment reports with JSON persistence and progress tracking.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::fluency::{AssessmentResult, FluencyScorer};
use crate::model::{Language, Roster};
use crate::statistics::{compute_class_stats, ClassStats};

/// A complete class assessment report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was created.
    pub created_at: DateTime<Utc>,
    /// Summary of the roster.
    pub roster: RosterSummary,
    /// Individual results, in roster order.
    pub results: Vec<StudentResult>,
    /// Aggregate statistics.
    pub aggregate: ClassStats,
}

/// Summary of a roster (without the readings).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterSummary {
    pub id: String,
    pub name: String,
    pub expected_text: String,
    pub language: Language,
    #[serde(default)]
    pub grade: Option<String>,
    pub reading_count: usize,
}

/// One student's scored reading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentResult {
    pub student: String,
    pub transcript: String,
    pub result: AssessmentResult,
}

/// Score every reading in a roster.
pub fn assess_roster(roster: &Roster, scorer: &FluencyScorer) -> ClassReport {
    let results: Vec<StudentResult> = roster
        .readings
        .iter()
        .map(|reading| StudentResult {
            student: reading.student.clone(),
            transcript: reading.transcript.clone(),
            result: scorer.score(&reading.transcript, &roster.expected_text),
        })
        .collect();

    let aggregate = compute_class_stats(&results);
    tracing::info!(
        roster = %roster.id,
        readings = results.len(),
        mean_fluency = aggregate.mean_fluency,
        "class assessed"
    );

    ClassReport {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
        roster: RosterSummary {
            id: roster.id.clone(),
            name: roster.name.clone(),
            expected_text: roster.expected_text.clone(),
            language: roster.language,
            grade: roster.grade.clone(),
            reading_count: roster.readings.len(),
        },
        results,
        aggregate,
    }
}

impl ClassReport {
    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: ClassReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Compare fluency against an earlier report of the same class.
    ///
    /// Changes of at most `threshold` points count as unchanged. When a
    /// student appears more than once, their best reading is used.
    pub fn compare(&self, baseline: &ClassReport, threshold: u8) -> ProgressReport {
        let fluency_map = |report: &ClassReport| -> HashMap<String, u8> {
            let mut map: HashMap<String, u8> = HashMap::new();
            for r in &report.results {
                let entry = map.entry(r.student.to_lowercase()).or_insert(0);
                *entry = (*entry).max(r.result.fluency);
            }
            map
        };

        let baseline_scores = fluency_map(baseline);
        let current_scores = fluency_map(self);
        let threshold = i16::from(threshold);

        let mut regressions = Vec::new();
        let mut improvements = Vec::new();
        let mut unchanged = 0usize;
        let mut new_students = Vec::new();

        let display_name = |key: &str| -> String {
            self.results
                .iter()
                .chain(baseline.results.iter())
                .find(|r| r.student.to_lowercase() == key)
                .map(|r| r.student.clone())
                .unwrap_or_else(|| key.to_string())
        };

        for (key, &current) in &current_scores {
            match baseline_scores.get(key) {
                Some(&previous) => {
                    let delta = i16::from(current) - i16::from(previous);
                    let change = FluencyChange {
                        student: display_name(key),
                        baseline_fluency: previous,
                        current_fluency: current,
                        delta,
                    };
                    if delta < -threshold {
                        regressions.push(change);
                    } else if delta > threshold {
                        improvements.push(change);
                    } else {
                        unchanged += 1;
                    }
                }
                None => new_students.push(display_name(key)),
            }
        }

        let mut missing_students: Vec<String> = baseline_scores
            .keys()
            .filter(|k| !current_scores.contains_key(*k))
            .map(|k| display_name(k))
            .collect();

        regressions.sort_by(|a, b| a.delta.cmp(&b.delta).then_with(|| a.student.cmp(&b.student)));
        improvements.sort_by(|a, b| b.delta.cmp(&a.delta).then_with(|| a.student.cmp(&b.student)));
        new_students.sort();
        missing_students.sort();

        ProgressReport {
            regressions,
            improvements,
            unchanged,
            new_students,
            missing_students,
        }
    }
}

/// Result of comparing two class reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressReport {
    /// Students whose fluency went down, largest drop first.
    pub regressions: Vec<FluencyChange>,
    /// Students whose fluency went up, largest gain first.
    pub improvements: Vec<FluencyChange>,
    /// Students with no significant change.
    pub unchanged: usize,
    /// Students in current but not baseline.
    pub new_students: Vec<String>,
    /// Students in baseline but not current.
    pub missing_students: Vec<String>,
}

/// A student's fluency movement between two reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FluencyChange {
    pub student: String,
    pub baseline_fluency: u8,
    pub current_fluency: u8,
    pub delta: i16,
}

impl ProgressReport {
    /// Format the progress report as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Summary:** {} regressions, {} improvements, {} unchanged\n\n",
            self.regressions.len(),
            self.improvements.len(),
            self.unchanged
        ));

        let sections = [
            ("Regressions", &self.regressions),
            ("Improvements", &self.improvements),
        ];
        for (title, changes) in sections {
            if changes.is_empty() {
                continue;
            }
            md.push_str(&format!("### {title}\n\n"));
            md.push_str("| Student | Baseline | Current | Delta |\n");
            md.push_str("|---------|----------|---------|-------|\n");
            for c in changes {
                md.push_str(&format!(
                    "| {} | {}% | {}% | {:+} |\n",
                    c.student, c.baseline_fluency, c.current_fluency, c.delta
                ));
            }
            md.push('\n');
        }

        if !self.new_students.is_empty() {
            md.push_str(&format!("New students: {}\n", self.new_students.join(", ")));
        }
        if !self.missing_students.is_empty() {
            md.push_str(&format!(
                "Missing students: {}\n",
                self.missing_students.join(", ")
            ));
        }

        md
    }

    /// Returns true if there are any regressions.
    pub fn has_regressions(&self) -> bool {
        !self.regressions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Reading;

    const TEXT: &str = "the quick brown fox jumps over the lazy dog";

    fn roster(readings: &[(&str, &str)]) -> Roster {
        Roster {
            id: "week".into(),
            name: "Week".into(),
            expected_text: TEXT.into(),
            language: Language::English,
            grade: Some("Grade 3".into()),
            readings: readings
                .iter()
                .map(|(student, transcript)| Reading {
                    student: student.to_string(),
                    transcript: transcript.to_string(),
                })
                .collect(),
        }
    }

    fn assess(readings: &[(&str, &str)]) -> ClassReport {
        assess_roster(&roster(readings), &FluencyScorer::default())
    }

    #[test]
    fn assess_scores_every_reading() {
        let report = assess(&[
            ("Asha", TEXT),
            ("Ravi", "the quick brown fox jumps over the lazy cat"),
        ]);
        assert_eq!(report.roster.reading_count, 2);
        assert_eq!(report.results[0].result.fluency, 100);
        assert_eq!(report.results[1].result.struggled_words, vec!["dog"]);
        assert_eq!(report.aggregate.readings, 2);
    }

    #[test]
    fn compare_identical_reports() {
        let baseline = assess(&[("Asha", TEXT)]);
        let current = assess(&[("Asha", TEXT)]);

        let progress = current.compare(&baseline, 5);
        assert!(progress.regressions.is_empty());
        assert!(progress.improvements.is_empty());
        assert_eq!(progress.unchanged, 1);
    }

    #[test]
    fn compare_with_regression_and_improvement() {
        let baseline = assess(&[("Asha", TEXT), ("Ravi", "the quick")]);
        let current = assess(&[("Asha", "the quick"), ("Ravi", TEXT)]);

        let progress = current.compare(&baseline, 5);
        assert_eq!(progress.regressions.len(), 1);
        assert_eq!(progress.regressions[0].student, "Asha");
        assert_eq!(progress.regressions[0].delta, -78);
        assert_eq!(progress.improvements[0].student, "Ravi");
        assert!(progress.has_regressions());
    }

    #[test]
    fn compare_with_new_and_missing() {
        let baseline = assess(&[("Old", TEXT)]);
        let current = assess(&[("New", TEXT)]);

        let progress = current.compare(&baseline, 5);
        assert_eq!(progress.new_students, vec!["New"]);
        assert_eq!(progress.missing_students, vec!["Old"]);
    }

    #[test]
    fn small_changes_are_unchanged() {
        // 8/9 -> 9/9 is an 11 point move
        let baseline = assess(&[("Asha", "the quick brown fox jumps over the lazy cat")]);
        let current = assess(&[("Asha", TEXT)]);
        assert_eq!(current.compare(&baseline, 15).unchanged, 1);
        assert_eq!(current.compare(&baseline, 5).improvements.len(), 1);
    }

    #[test]
    fn json_roundtrip() {
        let report = assess(&[("Asha", TEXT)]);
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("report.json");

        report.save_json(&path).unwrap();
        let loaded = ClassReport::load_json(&path).unwrap();

        assert_eq!(loaded.id, report.id);
        assert_eq!(loaded.results[0].result, report.results[0].result);
    }

    #[test]
    fn markdown_output() {
        let baseline = assess(&[("Asha", TEXT)]);
        let current = assess(&[("Asha", "")]);

        let md = current.compare(&baseline, 5).to_markdown();
        assert!(md.contains("### Regressions"));
        assert!(md.contains("| Asha | 100% | 0% | -100 |"));
    }
}
