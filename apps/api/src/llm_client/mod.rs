/// LLM Client: the single point of entry for all text-generation calls in BangerList.
///
/// ARCHITECTURAL RULE: No other module may call the OpenAI API directly.
/// All LLM interactions MUST go through this module.
///
/// Model: gpt-4-turbo-preview (hardcoded, not configurable)
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

pub mod retry;

pub use retry::RetryPolicy;

/// The model used for all generation calls.
pub const MODEL: &str = "gpt-4-turbo-preview";
const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 4000;

const QUOTA_CODE: &str = "insufficient_quota";
const INVALID_KEY_CODE: &str = "invalid_api_key";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Invalid API key: {0}")]
    InvalidApiKey(String),

    #[error("No response from the model")]
    EmptyContent,
}

impl LlmError {
    /// Whether another attempt could plausibly succeed.
    /// Quota, credential and other 4xx failures are terminal.
    pub fn is_transient(&self) -> bool {
        match self {
            LlmError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            LlmError::Api { status, .. } => *status == 429 || *status >= 500,
            LlmError::QuotaExceeded(_) | LlmError::InvalidApiKey(_) | LlmError::EmptyContent => {
                false
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types (OpenAI Chat Completions)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub model: String,
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
    #[serde(default, rename = "type")]
    error_type: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

/// Text returned by one successful generation call, plus the bookkeeping the
/// endpoint echoes back in its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub text: String,
    pub model: String,
    pub tokens_used: u32,
}

impl ChatCompletionResponse {
    /// Extracts the first choice's content. Blank content counts as no content.
    pub fn into_completion(self) -> Result<Completion, LlmError> {
        let text = self
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|t| !t.trim().is_empty())
            .ok_or(LlmError::EmptyContent)?;

        Ok(Completion {
            text,
            model: self.model,
            tokens_used: self.usage.map(|u| u.total_tokens).unwrap_or(0),
        })
    }
}

/// Maps a non-success upstream response onto the error taxonomy.
fn classify_error_response(status: u16, body: &str) -> LlmError {
    let parsed = serde_json::from_str::<OpenAiError>(body).ok().map(|e| e.error);

    let (message, code, error_type) = match parsed {
        Some(err) => (err.message, err.code, err.error_type),
        None => (body.to_string(), None, None),
    };

    let is_code = |wanted: &str| {
        code.as_deref() == Some(wanted) || error_type.as_deref() == Some(wanted)
    };

    if is_code(QUOTA_CODE) {
        LlmError::QuotaExceeded(message)
    } else if is_code(INVALID_KEY_CODE) || status == 401 {
        LlmError::InvalidApiKey(message)
    } else {
        LlmError::Api { status, message }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Generator seam
// ────────────────────────────────────────────────────────────────────────────

/// Anything that can turn a system + user prompt into JSON text.
///
/// Carried in `AppState` as `Arc<dyn TextGenerator>` so handlers can be
/// exercised against stubs.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn complete_json(&self, system: &str, prompt: &str) -> Result<Completion, LlmError>;
}

/// The single LLM client used by the generation endpoint.
/// Wraps the Chat Completions API with the bounded retry policy.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
    endpoint: String,
    retry: RetryPolicy,
}

impl LlmClient {
    pub fn new(
        api_key: String,
        base_url: &str,
        retry: RetryPolicy,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            api_key,
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
            retry,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, LlmError> {
        Self::new(
            config.openai_api_key.clone(),
            &config.openai_base_url,
            RetryPolicy::new(config.llm_max_attempts),
            Duration::from_secs(config.llm_timeout_secs),
        )
    }

    /// Makes the generation call, returning the raw completion.
    /// With `max_attempts > 1`, transient failures (network, 5xx, plain 429)
    /// are retried with jittered backoff. The default is a single call.
    pub async fn call(&self, prompt: &str, system: &str) -> Result<Completion, LlmError> {
        let request_body = ChatCompletionRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            response_format: ResponseFormat {
                format_type: "json_object",
            },
        };

        let mut attempt = 1;
        loop {
            match self.send_once(&request_body).await {
                Ok(completion) => return Ok(completion),
                Err(e) if e.is_transient() && attempt < self.retry.max_attempts => {
                    let delay = self.retry.delay_for(attempt);
                    warn!(
                        "LLM call attempt {}/{} failed ({e}), retrying after {}ms...",
                        attempt,
                        self.retry.max_attempts,
                        delay.as_millis()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_once(
        &self,
        request_body: &ChatCompletionRequest<'_>,
    ) -> Result<Completion, LlmError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("LLM API returned {}: {}", status, body);
            return Err(classify_error_response(status.as_u16(), &body));
        }

        let completion = response
            .json::<ChatCompletionResponse>()
            .await?
            .into_completion()?;

        debug!(
            "LLM call succeeded: model={}, total_tokens={}",
            completion.model, completion.tokens_used
        );

        Ok(completion)
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn complete_json(&self, system: &str, prompt: &str) -> Result<Completion, LlmError> {
        self.call(prompt, system).await
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}
