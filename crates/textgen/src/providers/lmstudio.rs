//! LM Studio chat completions client.
//!
//! LM Studio serves a single loaded model behind an OpenAI-shaped endpoint
//! with no auth; the configured model name is ignored.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::provider::{GenerateError, GeneratorConfig, TextGenerator};

const DEFAULT_BASE_URL: &str = "http://localhost:1234";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Client for a local LM Studio server.
pub struct LmStudioProvider {
    http: reqwest::Client,
    base_url: String,
    temperature: f32,
    max_tokens: u32,
}

impl LmStudioProvider {
    pub fn new(config: &GeneratorConfig) -> Self {
        if config.model != "gpt-3.5-turbo" && config.model != "default" {
            warn!(model = %config.model, "lm studio serves a single model; model setting ignored");
        }

        Self {
            http: reqwest::Client::new(),
            base_url: config
                .base_url
                .clone()
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

#[async_trait]
impl TextGenerator for LmStudioProvider {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let request = ChatRequest {
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stream: false,
        };

        debug!(url = %url, "lm studio chat request");

        let response = self.http.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerateError::Api { status, body });
        }

        let chat: ChatResponse = response.json().await?;
        chat.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(GenerateError::EmptyResponse)
    }
}
