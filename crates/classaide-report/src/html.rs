//! HTML report generator.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined, so a report
//! can be shared with parents or head teachers as a single attachment.

use anyhow::{Context, Result};
use std::path::Path;

use classaide_core::report::{ClassReport, StudentResult};
use classaide_core::statistics::SUPPORT_THRESHOLD;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML report from a class report.
pub fn generate_html(report: &ClassReport) -> String {
    let mut html = String::new();
    let roster = &report.roster;
    let stats = &report.aggregate;

    html.push_str(&format!(
        "<!DOCTYPE html>\n<html lang=\"{}\">\n<head>\n",
        roster.language.code()
    ));
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>Reading assessment: {}</title>\n",
        html_escape(&roster.name)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    html.push_str("<header>\n");
    html.push_str(&format!("<h1>{}</h1>\n", html_escape(&roster.name)));
    let grade = roster
        .grade
        .as_deref()
        .map(|g| format!(" | {}", html_escape(g)))
        .unwrap_or_default();
    html.push_str(&format!(
        "<p class=\"meta\">{} readings | {}{} | {}</p>\n",
        roster.reading_count,
        roster.language.name(),
        grade,
        report.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    html.push_str(&format!(
        "<blockquote class=\"passage\">{}</blockquote>\n",
        html_escape(&roster.expected_text)
    ));
    html.push_str("</header>\n");

    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Mean fluency</th><th>Median fluency</th><th>Mean pronunciation</th><th>Need support</th></tr></thead>\n");
    html.push_str(&format!(
        "<tbody><tr><td>{:.1}%</td><td>{:.1}%</td><td>{:.1}%</td><td>{}</td></tr></tbody></table>\n",
        stats.mean_fluency,
        stats.median_fluency,
        stats.mean_pronunciation,
        stats.needs_support.len()
    ));

    if !report.results.is_empty() {
        html.push_str(&generate_bar_chart(&report.results));
    }

    if !stats.needs_support.is_empty() {
        html.push_str(&format!(
            "<p class=\"support\">Below {}% fluency: {}</p>\n",
            SUPPORT_THRESHOLD,
            stats
                .needs_support
                .iter()
                .map(|s| html_escape(s))
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }
    html.push_str("</section>\n");

    if !stats.struggled_word_counts.is_empty() {
        html.push_str("<section class=\"words\">\n");
        html.push_str("<h2>Words to practise</h2>\n");
        html.push_str("<table>\n<thead><tr><th>Word</th><th>Readers who missed it</th></tr></thead>\n<tbody>\n");
        for w in &stats.struggled_word_counts {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td></tr>\n",
                html_escape(&w.word),
                w.count
            ));
        }
        html.push_str("</tbody></table>\n</section>\n");
    }

    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Students</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"results\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">Student</th><th onclick=\"sortTable(1)\">Fluency</th><th onclick=\"sortTable(2)\">Pronunciation</th><th>Struggled words</th><th>Practice tips</th></tr></thead>\n");
    html.push_str("<tbody>\n");

    for r in &report.results {
        let row_class = if r.result.fluency >= SUPPORT_THRESHOLD {
            "pass"
        } else {
            "fail"
        };
        html.push_str(&format!(
            "<tr class=\"{}\"><td title=\"{}\">{}</td><td>{}%</td><td>{}%</td><td>{}</td><td>{}</td></tr>\n",
            row_class,
            html_escape(&r.transcript),
            html_escape(&r.student),
            r.result.fluency,
            r.result.pronunciation,
            html_escape(&r.result.struggled_words.join(", ")),
            html_escape(&r.result.recommendations.join(" "))
        ));
    }

    html.push_str("</tbody></table>\n");
    html.push_str("</section>\n");

    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(
        &serde_json::to_string_pretty(report)
            .unwrap_or_default()
            .replace('<', "&lt;")
            .replace('>', "&gt;"),
    );
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &ClassReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)
        .with_context(|| format!("failed to write HTML report to {}", path.display()))?;
    Ok(())
}

fn generate_bar_chart(results: &[StudentResult]) -> String {
    let bar_height = 24;
    let max_width = 400;
    let padding = 8;
    let label_width = 160;

    let total_height = results.len() * (bar_height + padding) + padding;

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{}\" xmlns=\"http://www.w3.org/2000/svg\">\n",
        label_width + max_width + 60,
        total_height
    );

    for (i, r) in results.iter().enumerate() {
        let y = i * (bar_height + padding) + padding;
        let fluency = usize::from(r.result.fluency);
        let width = fluency * max_width / 100;

        let color = if fluency >= 80 {
            "#22c55e"
        } else if fluency >= usize::from(SUPPORT_THRESHOLD) {
            "#eab308"
        } else {
            "#ef4444"
        };

        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"14\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
            label_width - 10,
            y + bar_height / 2,
            html_escape(&r.student)
        ));
        svg.push_str(&format!(
            "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" rx=\"4\"/>\n",
            label_width, y, width, bar_height, color
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" dominant-baseline=\"middle\">{}%</text>\n",
            label_width + width + 8,
            y + bar_height / 2,
            fluency
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; }
}
body { font-family: 'Noto Sans', 'Noto Sans Devanagari', 'Noto Sans Telugu', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.passage { font-size: 1.2rem; border-left: 4px solid var(--border); margin: 1rem 0; padding: 0.5rem 1rem; }
.support { font-weight: bold; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('results');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  const key = cell => col === 0 ? cell.textContent : parseFloat(cell.textContent);
  rows.sort((a, b) => {
    const va = key(a.cells[col]);
    const vb = key(b.cells[col]);
    if (col === 0) return asc ? va.localeCompare(vb) : vb.localeCompare(va);
    return asc ? va - vb : vb - va;
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use classaide_core::fluency::FluencyScorer;
    use classaide_core::model::{Language, Reading, Roster};
    use classaide_core::report::assess_roster;

    fn make_test_report() -> ClassReport {
        let roster = Roster {
            id: "grade3-week1".into(),
            name: "Grade 3 <Week 1>".into(),
            expected_text: "the quick brown fox".into(),
            language: Language::English,
            grade: Some("Grade 3".into()),
            readings: vec![
                Reading {
                    student: "Asha".into(),
                    transcript: "the quick brown fox".into(),
                },
                Reading {
                    student: "Ravi".into(),
                    transcript: "the quick".into(),
                },
            ],
        };
        let mut report = assess_roster(&roster, &FluencyScorer::default());
        report.id = uuid::Uuid::nil();
        report
    }

    #[test]
    fn html_report_contains_required_elements() {
        let report = make_test_report();
        let html = generate_html(&report);

        assert!(html.contains("<html lang=\"en\">"));
        assert!(html.contains("</html>"));
        assert!(html.contains("Asha"));
        assert!(html.contains("<td>100%</td>"));
        assert!(html.contains("Grade 3 &lt;Week 1&gt;"));
        assert!(html.contains("Words to practise"));
        assert!(html.contains("Below 60% fluency: Ravi"));
        assert!(html.contains("<svg"));
    }

    #[test]
    fn empty_class_has_no_chart() {
        let mut report = make_test_report();
        report.results.clear();
        report.aggregate = Default::default();

        let html = generate_html(&report);
        assert!(!html.contains("<svg"));
        assert!(!html.contains("Words to practise"));
    }

    #[test]
    fn html_report_write_to_file() {
        let report = make_test_report();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("report.html");

        write_html_report(&report, &path).unwrap();
        assert!(path.exists());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));
    }
}
