//! The `classaide validate` command.

use std::path::PathBuf;

use anyhow::Result;

use classaide_core::parser;

pub fn execute(roster_path: PathBuf) -> Result<()> {
    let rosters = parser::load_rosters(&roster_path)?;

    let mut total_warnings = 0;

    for roster in &rosters {
        println!(
            "Roster: {} ({} readings, {})",
            roster.name,
            roster.readings.len(),
            roster.language.name()
        );

        let warnings = parser::validate_roster(roster);
        for w in &warnings {
            let prefix = w
                .student
                .as_ref()
                .map(|s| format!("  [{s}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All rosters valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
