//! TOML class roster parser.
//!
//! Loads reading-assessment rosters from TOML files and directories, and
//! validates them.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::model::{Language, Reading, Roster};

/// Intermediate TOML structure for parsing roster files.
#[derive(Debug, Deserialize)]
struct TomlRosterFile {
    assessment: TomlAssessmentHeader,
    #[serde(default)]
    readings: Vec<TomlReading>,
}

#[derive(Debug, Deserialize)]
struct TomlAssessmentHeader {
    id: String,
    name: String,
    expected_text: String,
    #[serde(default = "default_language_str")]
    language: String,
    #[serde(default)]
    grade: Option<String>,
}

fn default_language_str() -> String {
    "en".to_string()
}

#[derive(Debug, Deserialize)]
struct TomlReading {
    student: String,
    #[serde(default)]
    transcript: String,
}

/// Parse a single TOML file into a `Roster`.
pub fn parse_roster(path: &Path) -> Result<Roster> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read roster file: {}", path.display()))?;

    parse_roster_str(&content, path)
}

/// Parse a TOML string into a `Roster` (useful for testing).
pub fn parse_roster_str(content: &str, source_path: &Path) -> Result<Roster> {
    let parsed: TomlRosterFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let language: Language = parsed
        .assessment
        .language
        .parse()
        .map_err(|e: String| anyhow::anyhow!("{}", e))?;

    let readings = parsed
        .readings
        .into_iter()
        .map(|r| Reading {
            student: r.student,
            transcript: r.transcript,
        })
        .collect();

    Ok(Roster {
        id: parsed.assessment.id,
        name: parsed.assessment.name,
        expected_text: parsed.assessment.expected_text,
        language,
        grade: parsed.assessment.grade,
        readings,
    })
}

/// Recursively load all `.toml` roster files from a directory.
pub fn load_roster_directory(dir: &Path) -> Result<Vec<Roster>> {
    let mut rosters = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.path());

    for entry in entries {
        let path = entry.path();

        if path.is_dir() {
            rosters.extend(load_roster_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_roster(&path) {
                Ok(roster) => rosters.push(roster),
                Err(e) => {
                    tracing::warn!("skipping {}: {:#}", path.display(), e);
                }
            }
        }
    }

    Ok(rosters)
}

/// Load a single roster file, or every roster under a directory.
pub fn load_rosters(path: &Path) -> Result<Vec<Roster>> {
    if path.is_dir() {
        load_roster_directory(path)
    } else {
        Ok(vec![parse_roster(path)?])
    }
}

/// A warning from roster validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The student (if applicable).
    pub student: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate a roster for common issues.
pub fn validate_roster(roster: &Roster) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if roster.expected_text.trim().is_empty() {
        warnings.push(ValidationWarning {
            student: None,
            message: "expected_text is empty; every reading will score 0".into(),
        });
    }

    // Punctuation stays attached to words, so a spoken transcript rarely matches it
    let punctuated: Vec<&str> = roster
        .expected_text
        .split_whitespace()
        .filter(|w| w.ends_with(|c: char| c.is_ascii_punctuation() || c == '।'))
        .collect();
    if !punctuated.is_empty() {
        warnings.push(ValidationWarning {
            student: None,
            message: format!(
                "expected_text has words with trailing punctuation that transcripts must reproduce exactly: {}",
                punctuated.join(" ")
            ),
        });
    }

    let mut seen = std::collections::HashSet::new();
    for reading in &roster.readings {
        if !seen.insert(reading.student.to_lowercase()) {
            warnings.push(ValidationWarning {
                student: Some(reading.student.clone()),
                message: format!("duplicate student: {}", reading.student),
            });
        }
    }

    for reading in &roster.readings {
        if reading.transcript.trim().is_empty() {
            warnings.push(ValidationWarning {
                student: Some(reading.student.clone()),
                message: "transcript is empty".into(),
            });
        }
    }

    if roster.readings.is_empty() {
        warnings.push(ValidationWarning {
            student: None,
            message: "roster has no readings".into(),
        });
    }

    warnings
}
