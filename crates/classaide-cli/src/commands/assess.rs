//! The `classaide assess` command.

use std::path::PathBuf;

use anyhow::Result;

use classaide_core::fluency::FluencyScorer;
use classaide_core::i18n::Translator;
use classaide_core::session::{ReadingSession, SessionState};
use classaide_core::speech::ScriptedRecognizer;
use classaide_providers::config::load_config_from;

use super::resolve_language;

pub fn execute(
    text: String,
    transcript: String,
    student: Option<String>,
    language: Option<String>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(
        !text.trim().is_empty(),
        "--text must contain the passage the student read"
    );

    let config = load_config_from(config_path.as_deref())?;
    let language = resolve_language(language.as_deref(), &config)?;
    let scorer = FluencyScorer::new(config.assessment);

    // Replay the transcript through a session as a live recognizer would deliver it
    let recognizer = ScriptedRecognizer::from_transcript(&transcript);
    let mut session = ReadingSession::new(recognizer, text, language).with_scorer(scorer);
    session.start()?;

    let result = match session.pump() {
        SessionState::Completed(result) => result.clone(),
        SessionState::Failed(e) => anyhow::bail!("reading could not be assessed: {e}"),
        _ => match session.stop() {
            Some(result) => result.clone(),
            None => anyhow::bail!("no speech was recognized"),
        },
    };

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let t = Translator::new(language);
    match &student {
        Some(name) => println!("{}: {name}", t.translate("assessmentResults")),
        None => println!("{}", t.translate("assessmentResults")),
    }
    println!("  {}: {}%", t.translate("readingFluency"), result.fluency);
    println!("  {}: {}%", t.translate("pronunciation"), result.pronunciation);
    if !result.struggled_words.is_empty() {
        println!(
            "  {}: {}",
            t.translate("struggledWords"),
            result.struggled_words.join(", ")
        );
    }
    if !result.recommendations.is_empty() {
        println!("  {}:", t.translate("recommendations"));
        for tip in &result.recommendations {
            println!("    - {tip}");
        }
    }

    Ok(())
}
