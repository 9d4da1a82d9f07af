//! Chat-completion wire types and the LLM error taxonomy.
//!
//! The daemon talks to an OpenAI-compatible `/chat/completions` endpoint.
//! Content-level fallbacks (invalid category, missing field) are NOT errors
//! and never appear here; `LlmError` covers configuration problems and
//! provider failures only.

use serde::{Deserialize, Serialize};

/// One role-tagged message in a chat request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for an OpenAI-compatible chat completion.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

/// `{"type": "json_object"}` marker requesting a single JSON object reply.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub format_type: String,
}

impl ResponseFormat {
    pub fn json_object() -> Self {
        Self {
            format_type: "json_object".to_string(),
        }
    }
}

/// Response body of a chat completion; only the fields we read.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// First choice's trimmed content, if the provider returned any.
    pub fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// Configuration and provider failures at the LLM boundary.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    #[error("LLM_API_KEY is not set. Export it or add api_key to the [llm] config section")]
    MissingApiKey,

    #[error("unknown LLM provider '{0}': use \"groq\" or \"gemini\"")]
    UnknownProvider(String),

    #[error("provider '{0}' is not implemented yet; set LLM_PROVIDER=groq for now")]
    UnsupportedProvider(String),

    #[error("invalid credentials: provider rejected the API key (HTTP {0})")]
    InvalidCredentials(u16),

    #[error("rate limited by the LLM provider")]
    RateLimited,

    #[error("LLM request timed out after {0}s")]
    Timeout(u64),

    #[error("LLM request failed: {0}")]
    Http(String),

    #[error("LLM request failed (HTTP {status}): {body}")]
    Status { status: u16, body: String },

    #[error("LLM returned no content")]
    EmptyResponse,

    #[error("LLM response is not valid JSON: {0}")]
    InvalidJson(String),
}

impl LlmError {
    /// True for errors the operator fixes in configuration, as opposed to
    /// transient provider failures.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingApiKey | Self::UnknownProvider(_) | Self::UnsupportedProvider(_)
        )
    }
}
