//! The `classaide resources` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use classaide_core::community::{ResourceFilter, ResourceLibrary};

pub fn execute(
    subject: Option<String>,
    language: Option<String>,
    grade: Option<String>,
) -> Result<()> {
    let library = ResourceLibrary::with_samples();
    let filter = ResourceFilter {
        subject,
        language,
        grade,
    };

    let found = library.filter(&filter);
    if found.is_empty() {
        println!("No resources match the filter.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "ID",
        "Title",
        "Subject",
        "Grade",
        "Language",
        "Author",
        "Rating",
        "Downloads",
    ]);
    for r in found {
        table.add_row(vec![
            Cell::new(r.id),
            Cell::new(&r.title),
            Cell::new(&r.subject),
            Cell::new(&r.grade),
            Cell::new(&r.language),
            Cell::new(&r.author),
            Cell::new(format!("{:.1}", r.rating)),
            Cell::new(r.downloads),
        ]);
    }
    println!("{table}");
    Ok(())
}
