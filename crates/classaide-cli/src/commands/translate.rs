//! The `classaide translate` command.

use anyhow::Result;

use classaide_core::model::Language;

use super::build_assistant;
use crate::ProviderArgs;

pub async fn execute(text: String, to: String, args: ProviderArgs) -> Result<()> {
    let target: Language = to.parse().map_err(|e: String| anyhow::anyhow!(e))?;

    // English needs no provider at all
    if target == Language::English {
        println!("{text}");
        return Ok(());
    }

    let (assistant, _) = build_assistant(&args)?;
    let translated = assistant.translate_text(&text, target).await?;
    println!("{}", translated.trim_end());
    Ok(())
}
