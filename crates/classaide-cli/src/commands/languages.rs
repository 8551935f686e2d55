//! The `classaide languages` command.

use anyhow::Result;
use comfy_table::{Cell, Table};

use classaide_core::i18n::{catalog_languages, Translator};
use classaide_core::model::Language;

/// UI labels shown by `--ui`.
const LABEL_KEYS: &[&str] = &[
    "readingAssessment",
    "hyperLocalContent",
    "differentiatedMaterials",
    "educationalGames",
    "lessonPlanner",
    "communitySharing",
];

pub fn execute(ui: Option<String>) -> Result<()> {
    if let Some(code) = ui {
        let language: Language = code.parse().map_err(|e: String| anyhow::anyhow!(e))?;
        let t = Translator::new(language);
        let english = t.with_language(Language::English);
        if !t.has(LABEL_KEYS[0]) {
            eprintln!(
                "No UI translations for {}; showing English.",
                language.name()
            );
        }
        for key in LABEL_KEYS {
            println!("{:<28} {}", english.translate(key), t.translate(key));
        }
        return Ok(());
    }

    let with_catalog: Vec<Language> = catalog_languages().collect();

    let mut table = Table::new();
    table.set_header(vec!["Code", "Language", "Native", "Speech locale", "UI"]);
    for language in Language::ALL {
        table.add_row(vec![
            Cell::new(language.code()),
            Cell::new(language.name()),
            Cell::new(language.local_name()),
            Cell::new(language.speech_locale()),
            Cell::new(if with_catalog.contains(&language) {
                "yes"
            } else {
                "-"
            }),
        ]);
    }
    println!("{table}");
    Ok(())
}
