//! OpenAI chat-completions client.

use super::TextGenerator;
use crate::config_loader::Settings;
use crate::error::{GenerationError, GenerationResult, TransportError};
use crate::transport::Transport;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Single-turn chat request. Built once per call and never modified.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

impl ChatCompletionRequest {
    pub fn new(model: &str, prompt: &str, max_tokens: u32) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![ChatMessage {
                role: "user",
                content: prompt.to_string(),
            }],
            max_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: Option<String>,
}

pub struct OpenAiClient {
    transport: Arc<dyn Transport>,
    api_key: String,
    url: String,
    model: String,
    max_tokens: u32,
}

impl OpenAiClient {
    pub fn new(settings: &Settings, api_key: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            api_key: api_key.to_string(),
            url: settings.openai_url.clone(),
            model: settings.openai_model.clone(),
            max_tokens: settings.max_tokens,
        }
    }
}

impl TextGenerator for OpenAiClient {
    fn id(&self) -> &'static str {
        "openai"
    }

    fn complete(&self, prompt: &str) -> GenerationResult<String> {
        if prompt.is_empty() {
            return Err(GenerationError::InvalidInput("prompt must not be empty"));
        }

        let request = ChatCompletionRequest::new(&self.model, prompt, self.max_tokens);
        let body = serde_json::to_vec(&request)
            .map_err(|e| TransportError::Malformed(e.to_string()))?;
        let headers = [
            ("Authorization", format!("Bearer {}", self.api_key)),
            ("Content-Type", "application/json".to_string()),
        ];

        debug!(target = "openai", url = %self.url, model = %self.model, "requesting completion");
        let response = self.transport.post(&self.url, body, &headers)?;

        let result = classify(&response);
        if let Err(GenerationError::Provider(message)) = &result {
            warn!(target = "openai", error = %message, "provider reported an error");
        }
        result
    }
}

/// Error message first, then missing choices, then the first choice's text.
pub(crate) fn classify(body: &[u8]) -> GenerationResult<String> {
    let parsed: ChatCompletionResponse =
        serde_json::from_slice(body).map_err(|e| TransportError::Malformed(e.to_string()))?;

    if let Some(message) = parsed
        .error
        .and_then(|e| e.message)
        .filter(|m| !m.is_empty())
    {
        return Err(GenerationError::Provider(message));
    }

    let first = parsed.choices.into_iter().next().ok_or(GenerationError::Empty)?;
    Ok(first.message.and_then(|m| m.content).unwrap_or_default())
}
