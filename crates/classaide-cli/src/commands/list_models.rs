//! The `classaide list-models` command.

use std::path::PathBuf;

use anyhow::Result;

use classaide_providers::create_provider;

pub fn execute(provider_filter: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let config = classaide_providers::config::load_config_from(config_path.as_deref())?;

    let mut names: Vec<&String> = config.providers.keys().collect();
    names.sort();

    let mut found_any = false;

    for name in names {
        if provider_filter.as_ref().is_some_and(|filter| filter != name) {
            continue;
        }

        let provider = match create_provider(&config.providers[name]) {
            Ok(provider) => provider,
            Err(e) => {
                eprintln!("Skipping {name}: {e:#}");
                continue;
            }
        };
        let models = provider.available_models();

        if models.is_empty() {
            continue;
        }
        found_any = true;
        println!("Provider: {name}");
        for model in &models {
            let vision = if model.vision { ", images" } else { "" };
            println!(
                "  {} ({}K context{vision}) {}",
                model.id,
                model.max_context / 1000,
                model.name,
            );
        }
        println!();
    }

    if !found_any {
        println!("No providers configured. Run `classaide init` to create a config file.");
    }

    Ok(())
}
