pub mod assess;
pub mod batch;
pub mod compare;
pub mod generate;
pub mod init;
pub mod languages;
pub mod list_models;
pub mod resources;
pub mod translate;
pub mod validate;

use std::sync::Arc;

use anyhow::Result;

use classaide_core::assistant::Assistant;
use classaide_core::model::Language;
use classaide_providers::config::{create_provider, load_config_from, ClassaideConfig};

use crate::ProviderArgs;

/// Parse a `--language` flag, falling back to the configured language.
pub fn resolve_language(flag: Option<&str>, config: &ClassaideConfig) -> Result<Language> {
    match flag {
        Some(value) => value.parse().map_err(|e: String| anyhow::anyhow!(e)),
        None => Ok(config.language),
    }
}

/// Load config and build an assistant for the selected provider.
pub fn build_assistant(args: &ProviderArgs) -> Result<(Assistant, ClassaideConfig)> {
    let config = load_config_from(args.config.as_deref())?;
    let (name, provider_config) = config.provider(args.provider.as_deref())?;
    tracing::debug!(provider = name, "using provider");

    let provider = create_provider(provider_config)?;
    let mut assistant_config = config.assistant_config();
    if let Some(model) = &args.model {
        assistant_config.model = model.clone();
    }

    let assistant = Assistant::new(Arc::from(provider), assistant_config);
    Ok((assistant, config))
}
