//! Provider abstraction.
//!
//! [`TextGenerator`] is the single seam between the simulation and whatever
//! produces text. [`Generator`] wraps a boxed provider and prepends the
//! system preamble to every prompt before dispatching.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::prompts::DEFAULT_INSTRUCTIONS;
use crate::providers::{LmStudioProvider, OllamaProvider, OpenAiProvider};
use crate::template::TemplateGenerator;

/// Errors from text generation.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("provider returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("provider returned an empty response")]
    EmptyResponse,
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("missing provider configuration: {0}")]
    MissingConfig(&'static str),
}

/// Produce text given a prompt. The engine depends on nothing else.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}

/// Which provider backs the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    OpenAi,
    Ollama,
    LmStudio,
    /// Offline canned-response provider; no network required.
    Template,
}

/// Provider configuration, loaded from the tuning file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub provider: ProviderKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Custom system preamble; the built-in default applies when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Template,
            api_key: None,
            base_url: None,
            model: "gpt-3.5-turbo".to_string(),
            temperature: 0.7,
            max_tokens: 1024,
            instructions: None,
        }
    }
}

/// The bridge's entry point: a provider plus the system preamble.
pub struct Generator {
    provider: Box<dyn TextGenerator>,
    preamble: String,
}

impl Generator {
    /// Builds the provider named by the config.
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, GenerateError> {
        let provider: Box<dyn TextGenerator> = match config.provider {
            ProviderKind::OpenAi => Box::new(OpenAiProvider::new(config)?),
            ProviderKind::Ollama => Box::new(OllamaProvider::new(config)?),
            ProviderKind::LmStudio => Box::new(LmStudioProvider::new(config)),
            ProviderKind::Template => Box::new(TemplateGenerator::new()),
        };

        let preamble = config
            .instructions
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_INSTRUCTIONS.to_string());

        Ok(Self { provider, preamble })
    }

    /// Wraps an existing provider with the default preamble.
    pub fn with_provider(provider: Box<dyn TextGenerator>) -> Self {
        Self {
            provider,
            preamble: DEFAULT_INSTRUCTIONS.to_string(),
        }
    }

    /// Replaces the system preamble (e.g. when an instruction set is
    /// selected).
    pub fn set_preamble(&mut self, preamble: impl Into<String>) {
        let preamble = preamble.into();
        self.preamble = if preamble.trim().is_empty() {
            DEFAULT_INSTRUCTIONS.to_string()
        } else {
            preamble
        };
    }

    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    /// Prepends the preamble and dispatches to the provider.
    pub async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let full_prompt = format!("{}\n\n{}", self.preamble, prompt);
        let response = self.provider.generate(&full_prompt).await?;
        if response.trim().is_empty() {
            return Err(GenerateError::EmptyResponse);
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::ScriptedGenerator;

    #[test]
    fn test_provider_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&ProviderKind::OpenAi).unwrap(),
            r#""open_ai""#
        );
        assert_eq!(
            serde_json::to_string(&ProviderKind::LmStudio).unwrap(),
            r#""lm_studio""#
        );
        assert_eq!(
            serde_json::to_string(&ProviderKind::Template).unwrap(),
            r#""template""#
        );
    }

    #[test]
    fn test_default_config_is_offline() {
        let config = GeneratorConfig::default();
        assert_eq!(config.provider, ProviderKind::Template);
        assert!(Generator::from_config(&config).is_ok());
    }

    #[test]
    fn test_blank_instructions_fall_back_to_default() {
        let mut generator = Generator::with_provider(Box::new(ScriptedGenerator::new()));
        generator.set_preamble("   ");
        assert_eq!(generator.preamble(), DEFAULT_INSTRUCTIONS);
    }

    #[tokio::test]
    async fn test_generate_prepends_preamble() {
        let scripted = ScriptedGenerator::new();
        let prompts = scripted.prompts();
        let generator = Generator::with_provider(Box::new(scripted));

        generator.generate("write a post").await.unwrap();

        let seen = prompts.lock().unwrap();
        assert!(seen[0].starts_with(DEFAULT_INSTRUCTIONS));
        assert!(seen[0].ends_with("write a post"));
    }
}
