//! The `classaide compare` command.

use std::path::PathBuf;

use anyhow::Result;

use classaide_core::report::ClassReport;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    threshold: u8,
    fail_on_regression: bool,
    format: String,
) -> Result<()> {
    let baseline = ClassReport::load_json(&baseline_path)?;
    let current = ClassReport::load_json(&current_path)?;

    if baseline.roster.id != current.roster.id {
        tracing::warn!(
            baseline = %baseline.roster.id,
            current = %current.roster.id,
            "comparing reports from different rosters"
        );
    }

    let report = current.compare(&baseline, threshold);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", report.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            println!(
                "Comparison: {} regressions, {} improvements, {} unchanged",
                report.regressions.len(),
                report.improvements.len(),
                report.unchanged
            );

            if !report.regressions.is_empty() {
                println!("\nRegressions:");
                for r in &report.regressions {
                    println!(
                        "  {} {}% -> {}% ({:+})",
                        r.student, r.baseline_fluency, r.current_fluency, r.delta
                    );
                }
            }

            if !report.improvements.is_empty() {
                println!("\nImprovements:");
                for i in &report.improvements {
                    println!(
                        "  {} {}% -> {}% ({:+})",
                        i.student, i.baseline_fluency, i.current_fluency, i.delta
                    );
                }
            }

            if !report.new_students.is_empty() {
                println!("\nNew students: {}", report.new_students.join(", "));
            }
            if !report.missing_students.is_empty() {
                println!("Missing students: {}", report.missing_students.join(", "));
            }
        }
    }

    if fail_on_regression && report.has_regressions() {
        std::process::exit(1);
    }

    Ok(())
}
