//! Chat client abstraction for the text-understanding provider.
//!
//! `ChatClient` is the only seam where non-determinism and external failure
//! enter the pipeline. Production code uses `HttpChatClient` against an
//! OpenAI-compatible endpoint; tests use `FakeChatClient` with queued
//! responses and no network.

use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, error, info};
use triage_common::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, LlmError, LlmSettings,
    ResponseFormat,
};

const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_GROQ_MODEL: &str = "llama-3.1-8b-instant";

/// Default generation cap; draft requests raise this explicitly.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Max error-body characters carried into an error message.
const ERROR_BODY_PREVIEW: usize = 200;

/// Per-call knobs: response-size cap and JSON-object mode.
#[derive(Debug, Clone, Copy)]
pub struct ChatOptions {
    /// Ask the provider for a single JSON object.
    pub json_object: bool,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            json_object: false,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl ChatOptions {
    pub fn json() -> Self {
        Self {
            json_object: true,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Resolved provider endpoint for one call.
#[derive(Debug, Clone)]
struct ProviderConfig {
    base_url: String,
    api_key: String,
    model: String,
    supports_json_mode: bool,
}

/// Turn the configured provider selection into a concrete endpoint.
/// Fails on the first attempted call, not at startup, so the daemon can
/// serve routing and health without a credential.
fn resolve_provider(settings: &LlmSettings) -> Result<ProviderConfig, LlmError> {
    let api_key = settings
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or(LlmError::MissingApiKey)?;

    match settings.provider.trim().to_lowercase().as_str() {
        "groq" => Ok(ProviderConfig {
            base_url: settings
                .endpoint
                .clone()
                .unwrap_or_else(|| GROQ_BASE_URL.to_string()),
            api_key: api_key.to_string(),
            model: settings
                .model
                .clone()
                .unwrap_or_else(|| DEFAULT_GROQ_MODEL.to_string()),
            supports_json_mode: true,
        }),
        "gemini" => Err(LlmError::UnsupportedProvider("gemini".to_string())),
        other => Err(LlmError::UnknownProvider(other.to_string())),
    }
}

/// Generic chat client trait. One outbound call per invocation, hard
/// timeout, token cap; provider failures surface as `LlmError`.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Send role-tagged messages and return the assistant reply as text,
    /// trimmed of surrounding whitespace.
    async fn chat(&self, messages: &[ChatMessage], options: ChatOptions)
        -> Result<String, LlmError>;

    /// Like `chat` with JSON mode, parsing the reply as a single JSON
    /// object. Tolerates a fenced-code-block wrapper; anything else that
    /// fails to parse is a hard `InvalidJson` error, never a fallback.
    async fn chat_json(
        &self,
        messages: &[ChatMessage],
        options: ChatOptions,
    ) -> Result<serde_json::Value, LlmError> {
        let text = self.chat(messages, options).await?;
        let json_text = extract_json_object(&text);
        serde_json::from_str(&json_text).map_err(|e| {
            let preview: String = json_text.chars().take(ERROR_BODY_PREVIEW).collect();
            LlmError::InvalidJson(format!("{e}: {preview}"))
        })
    }
}

/// Strip an optional ```json fence, falling back to the outermost brace
/// span when the reply wraps the object in prose.
fn extract_json_object(text: &str) -> String {
    let trimmed = text.trim();

    if let Some(rest) = trimmed.strip_prefix("```") {
        let rest = rest.strip_prefix("json").unwrap_or(rest);
        let inner = rest.strip_suffix("```").unwrap_or(rest);
        return inner.trim().to_string();
    }

    if trimmed.starts_with('{') {
        return trimmed.to_string();
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            return trimmed[start..=end].to_string();
        }
    }

    trimmed.to_string()
}

/// Real chat client over HTTP with a client-level hard timeout.
pub struct HttpChatClient {
    settings: LlmSettings,
    http: reqwest::Client,
}

impl HttpChatClient {
    pub fn new(settings: LlmSettings) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("failed to create HTTP client: {e}"))?;
        Ok(Self { settings, http })
    }
}

#[async_trait]
impl ChatClient for HttpChatClient {
    async fn chat(
        &self,
        messages: &[ChatMessage],
        options: ChatOptions,
    ) -> Result<String, LlmError> {
        let provider = resolve_provider(&self.settings)?;
        let url = format!("{}/chat/completions", provider.base_url);

        let request = ChatCompletionRequest {
            model: provider.model.clone(),
            messages: messages.to_vec(),
            max_tokens: options.max_tokens,
            response_format: (options.json_object && provider.supports_json_mode)
                .then(ResponseFormat::json_object),
        };

        info!(
            "[>] LLM call [{}] ({} messages, max_tokens {})",
            provider.model,
            messages.len(),
            options.max_tokens
        );
        if let Some(user) = messages.iter().find(|m| m.role == "user") {
            let preview: String = user.content.chars().take(500).collect();
            debug!("[U] user prompt ({} chars): {}", user.content.len(), preview);
        }

        let response = self
            .http
            .post(&url)
            .bearer_auth(&provider.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(self.settings.timeout_secs)
                } else {
                    LlmError::Http(e.to_string())
                }
            })?;

        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            error!("[-] LLM auth rejected (HTTP {})", status);
            return Err(LlmError::InvalidCredentials(status.as_u16()));
        }
        if status.as_u16() == 429 {
            error!("[-] LLM rate limited");
            return Err(LlmError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.chars().take(ERROR_BODY_PREVIEW).collect();
            error!("[-] LLM error {}: {}", status, body);
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidJson(format!("provider envelope: {e}")))?;

        let content = completion.content().ok_or(LlmError::EmptyResponse)?;
        info!("[<] LLM response ({} chars)", content.len());

        Ok(content.to_string())
    }
}

/// Fake chat client for tests: queued responses, call counting, no I/O.
pub struct FakeChatClient {
    responses: Mutex<Vec<Result<String, LlmError>>>,
    call_count: Mutex<usize>,
}

impl FakeChatClient {
    /// Create a fake client with pre-defined responses, consumed in order.
    /// The last response repeats once the queue is down to one entry.
    pub fn new(responses: Vec<Result<String, LlmError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
            call_count: Mutex::new(0),
        }
    }

    /// Fake client that always returns the same text.
    pub fn always_text(text: impl Into<String>) -> Self {
        Self::new(vec![Ok(text.into())])
    }

    /// Fake client that always returns an error.
    pub fn always_error(error: LlmError) -> Self {
        Self::new(vec![Err(error)])
    }

    /// Number of chat calls made so far.
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().expect("call_count mutex poisoned")
    }
}

#[async_trait]
impl ChatClient for FakeChatClient {
    async fn chat(
        &self,
        _messages: &[ChatMessage],
        _options: ChatOptions,
    ) -> Result<String, LlmError> {
        let mut count = self.call_count.lock().expect("call_count mutex poisoned");
        *count += 1;

        let mut responses = self.responses.lock().expect("responses mutex poisoned");
        if responses.is_empty() {
            return Err(LlmError::EmptyResponse);
        }
        if responses.len() == 1 {
            responses[0].clone()
        } else {
            responses.remove(0)
        }
    }
}
