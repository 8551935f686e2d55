//! The `classaide batch` command.

use std::path::PathBuf;

use anyhow::Result;

use classaide_core::fluency::FluencyScorer;
use classaide_core::parser;
use classaide_core::report::{assess_roster, ClassReport};
use classaide_providers::config::load_config_from;
use classaide_report::html::write_html_report;

pub fn execute(
    roster_path: PathBuf,
    output: Option<PathBuf>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let output = output.unwrap_or_else(|| config.output_dir.clone());
    let scorer = FluencyScorer::new(config.assessment);

    let rosters = parser::load_rosters(&roster_path)?;
    anyhow::ensure!(
        !rosters.is_empty(),
        "no rosters found in {}",
        roster_path.display()
    );

    let formats: Vec<&str> = match format.as_str() {
        "all" => vec!["json", "html"],
        "none" => vec![],
        other => other.split(',').map(str::trim).collect(),
    };

    for roster in &rosters {
        for w in parser::validate_roster(roster) {
            let prefix = w
                .student
                .map(|s| format!("[{s}] "))
                .unwrap_or_default();
            eprintln!("Warning: {}: {prefix}{}", roster.id, w.message);
        }

        eprintln!(
            "Assessing {} ({} readings)",
            roster.name,
            roster.readings.len()
        );
        let report = assess_roster(roster, &scorer);
        print_summary(&report);

        if formats.is_empty() {
            continue;
        }
        std::fs::create_dir_all(&output)?;
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H%M%S");

        for fmt in &formats {
            match *fmt {
                "json" => {
                    let path = output.join(format!("{}-{timestamp}.json", roster.id));
                    report.save_json(&path)?;
                    eprintln!("Results saved to: {}", path.display());
                }
                "html" => {
                    let path = output.join(format!("{}-{timestamp}.html", roster.id));
                    write_html_report(&report, &path)?;
                    eprintln!("HTML report: {}", path.display());
                }
                _ => {
                    eprintln!("Unknown format: {fmt}");
                }
            }
        }
    }

    Ok(())
}

fn print_summary(report: &ClassReport) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "Student",
        "Fluency",
        "Pronunciation",
        "Struggled words",
    ]);

    for r in &report.results {
        table.add_row(vec![
            Cell::new(&r.student),
            Cell::new(format!("{}%", r.result.fluency)),
            Cell::new(format!("{}%", r.result.pronunciation)),
            Cell::new(r.result.struggled_words.join(", ")),
        ]);
    }

    let stats = &report.aggregate;
    println!("{table}");
    println!(
        "Class: mean fluency {:.1}%, median {:.1}%, mean pronunciation {:.1}%",
        stats.mean_fluency, stats.median_fluency, stats.mean_pronunciation
    );
    if !stats.needs_support.is_empty() {
        println!("Needs support: {}", stats.needs_support.join(", "));
    }
    if let Some(top) = stats.struggled_word_counts.first() {
        println!("Most missed word: {} ({} readers)", top.word, top.count);
    }
    println!();
}
