//! Provider configuration and factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use classaide_core::assistant::AssistantConfig;
use classaide_core::fluency::ScorerConfig;
use classaide_core::model::Language;
use classaide_core::traits::LlmProvider;

use crate::gemini::GeminiProvider;
use crate::mock::MockProvider;
use crate::ollama::OllamaProvider;

/// Configuration for a single provider.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Gemini {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
    },
    /// Offline canned responses, for demos and tests.
    Mock {
        #[serde(default)]
        response: Option<String>,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Gemini {
                api_key: _,
                base_url,
            } => f
                .debug_struct("Gemini")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::Ollama { base_url } => f
                .debug_struct("Ollama")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::Mock { response } => f
                .debug_struct("Mock")
                .field("response", response)
                .finish(),
        }
    }
}

fn default_ollama_url() -> String {
    "http://localhost:11434".to_string()
}

/// Top-level classaide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassaideConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Default provider to use.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Default text model.
    #[serde(default = "default_model")]
    pub default_model: String,
    /// Model used for textbook page images.
    #[serde(default = "default_vision_model")]
    pub vision_model: String,
    /// Language for generated content and UI strings.
    #[serde(default)]
    pub language: Language,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Max retries on provider errors.
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    /// Delay before the first retry in milliseconds.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
    /// Output directory for class reports.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Fluency scorer settings.
    #[serde(default)]
    pub assessment: ScorerConfig,
}

fn default_provider() -> String {
    "gemini".to_string()
}
fn default_model() -> String {
    "gemini-pro".to_string()
}
fn default_vision_model() -> String {
    "gemini-pro-vision".to_string()
}
fn default_temperature() -> f64 {
    0.7
}
fn default_max_tokens() -> u32 {
    2048
}
fn default_retries() -> u32 {
    3
}
fn default_retry_delay() -> u64 {
    1000
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("./classaide-results")
}

impl Default for ClassaideConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            default_model: default_model(),
            vision_model: default_vision_model(),
            language: Language::default(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            max_retries: default_retries(),
            retry_delay_ms: default_retry_delay(),
            output_dir: default_output_dir(),
            assessment: ScorerConfig::default(),
        }
    }
}

impl ClassaideConfig {
    /// Assistant settings derived from this config.
    pub fn assistant_config(&self) -> AssistantConfig {
        AssistantConfig {
            model: self.default_model.clone(),
            vision_model: self.vision_model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            max_retries: self.max_retries,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
            system_prompt_override: None,
        }
    }

    /// Look up a provider by name, falling back to `default_provider`.
    pub fn provider(&self, name: Option<&str>) -> Result<(&str, &ProviderConfig)> {
        let name = name.unwrap_or(&self.default_provider);
        let (key, config) = self.providers.get_key_value(name).with_context(|| {
            format!(
                "provider '{name}' is not configured. Add it to classaide.toml or set GEMINI_API_KEY"
            )
        })?;
        Ok((key.as_str(), config))
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Resolve env vars in a provider config.
fn resolve_provider_config(config: &ProviderConfig) -> ProviderConfig {
    match config {
        ProviderConfig::Gemini { api_key, base_url } => ProviderConfig::Gemini {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
        },
        ProviderConfig::Ollama { base_url } => ProviderConfig::Ollama {
            base_url: resolve_env_vars(base_url),
        },
        ProviderConfig::Mock { response } => ProviderConfig::Mock {
            response: response.clone(),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `classaide.toml` in the current directory
/// 2. `~/.config/classaide/config.toml`
///
/// Environment variable overrides: `CLASSAIDE_GEMINI_KEY`, then `GEMINI_API_KEY`.
pub fn load_config() -> Result<ClassaideConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<ClassaideConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("classaide.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            parse_config(&path)?
        }
        None => ClassaideConfig::default(),
    };

    let env_key = std::env::var("CLASSAIDE_GEMINI_KEY")
        .or_else(|_| std::env::var("GEMINI_API_KEY"))
        .ok()
        .filter(|k| !k.is_empty());
    if let Some(key) = env_key {
        apply_gemini_key(&mut config, key);
    }

    let resolved: HashMap<String, ProviderConfig> = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v)))
        .collect();
    config.providers = resolved;

    Ok(config)
}

fn parse_config(path: &Path) -> Result<ClassaideConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str::<ClassaideConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))
}

fn apply_gemini_key(config: &mut ClassaideConfig, key: String) {
    let entry = config
        .providers
        .entry("gemini".into())
        .or_insert(ProviderConfig::Gemini {
            api_key: String::new(),
            base_url: None,
        });
    if let ProviderConfig::Gemini { api_key, .. } = entry {
        *api_key = key;
    }
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("classaide"))
}

/// Create a provider instance from its configuration.
pub fn create_provider(config: &ProviderConfig) -> Result<Box<dyn LlmProvider>> {
    match config {
        ProviderConfig::Gemini { api_key, base_url } => {
            anyhow::ensure!(
                !api_key.trim().is_empty(),
                "Gemini API key is empty. Set GEMINI_API_KEY or api_key in classaide.toml"
            );
            Ok(Box::new(GeminiProvider::new(api_key, base_url.clone())))
        }
        ProviderConfig::Ollama { base_url } => Ok(Box::new(OllamaProvider::new(base_url))),
        ProviderConfig::Mock { response } => Ok(Box::new(match response {
            Some(text) => MockProvider::with_fixed_response(text),
            None => MockProvider::new(HashMap::new()),
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_CLASSAIDE_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_CLASSAIDE_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_CLASSAIDE_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("unterminated ${VAR"), "unterminated ${VAR");
        std::env::remove_var("_CLASSAIDE_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = ClassaideConfig::default();
        assert_eq!(config.default_provider, "gemini");
        assert_eq!(config.default_model, "gemini-pro");
        assert_eq!(config.vision_model, "gemini-pro-vision");
        assert_eq!(config.language, Language::English);
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.assessment.pronunciation_penalty, 10);
    }

    #[test]
    fn parse_provider_config() {
        let toml_str = r#"
default_provider = "gemini"
language = "hi"
temperature = 0.4

[assessment]
pronunciation_penalty = 15

[providers.gemini]
type = "gemini"
api_key = "test-key"

[providers.local]
type = "ollama"
base_url = "http://localhost:11434"
"#;
        let config: ClassaideConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.providers.len(), 2);
        assert!(matches!(
            config.providers.get("local"),
            Some(ProviderConfig::Ollama { .. })
        ));
        assert_eq!(config.language, Language::Hindi);
        assert_eq!(config.assessment.pronunciation_penalty, 15);
        assert_eq!(config.assessment.max_struggled_words, 5);

        let assistant = config.assistant_config();
        assert_eq!(assistant.temperature, 0.4);
        assert_eq!(assistant.retry_delay, Duration::from_millis(1000));
    }

    #[test]
    fn debug_masks_api_key() {
        let config = ProviderConfig::Gemini {
            api_key: "super-secret".into(),
            base_url: None,
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn load_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("classaide.toml");
        std::fs::write(
            &path,
            "default_provider = \"demo\"\n\n[providers.demo]\ntype = \"mock\"\nresponse = \"hi\"\n",
        )
        .unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        let (name, provider) = config.provider(None).unwrap();
        assert_eq!(name, "demo");
        assert!(matches!(provider, ProviderConfig::Mock { .. }));
        assert!(config.provider(Some("missing")).is_err());

        assert!(load_config_from(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn gemini_key_override() {
        let mut config = ClassaideConfig::default();
        apply_gemini_key(&mut config, "from-env".into());
        match config.providers.get("gemini") {
            Some(ProviderConfig::Gemini { api_key, .. }) => assert_eq!(api_key, "from-env"),
            other => panic!("unexpected provider: {other:?}"),
        }
    }

    #[test]
    fn create_provider_requires_key() {
        let empty = ProviderConfig::Gemini {
            api_key: String::new(),
            base_url: None,
        };
        assert!(create_provider(&empty).is_err());

        let mock = create_provider(&ProviderConfig::Mock { response: None }).unwrap();
        assert_eq!(mock.name(), "mock");
    }
}
