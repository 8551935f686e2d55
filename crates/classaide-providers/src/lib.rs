//! classaide-providers: generative-AI provider integrations.
//!
//! Implements the `LlmProvider` trait for Google Gemini and a local Ollama
//! server, plus the configuration layer that picks between them.

pub mod config;
pub mod gemini;
pub mod mock;
pub mod ollama;

pub use classaide_core::error::ProviderError;
pub use config::{create_provider, load_config, ClassaideConfig, ProviderConfig};
