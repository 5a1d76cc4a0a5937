//! OpenAI API client implementation
//!
//! Implements the CompletionClient trait for OpenAI's Chat Completions API.
//! With `base-url` pointed at any OpenAI-compatible server (Ollama, vLLM,
//! LM Studio) this covers local models too.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{CompletionClient, CompletionError, CompletionRequest, CompletionResponse, StopReason, TokenUsage};
use crate::config::LlmConfig;

/// Maximum number of retries for transient errors
const MAX_RETRIES: u32 = 3;

/// OpenAI API client
pub struct OpenAIClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
    timeout: Duration,
}

impl OpenAIClient {
    /// Create a new client from configuration
    ///
    /// Reads the API key from environment variable or file specified in config.
    pub fn from_config(config: &LlmConfig) -> Result<Self, CompletionError> {
        debug!(?config, "from_config: called");
        let api_key = config
            .get_api_key()
            .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;

        let timeout = Duration::from_millis(config.timeout_ms);

        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(CompletionError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.clone(),
            http,
            max_tokens: config.max_tokens,
            timeout,
        })
    }

    /// Build the request body for the OpenAI API
    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        debug!(%self.model, %request.max_tokens, "build_request_body: called");

        let mut messages = vec![serde_json::json!({
            "role": "system",
            "content": request.system_prompt,
        })];

        messages.extend(request.messages.iter().map(|msg| serde_json::json!(msg)));

        let max_tokens = request.max_tokens.min(self.max_tokens);

        // GPT-5.x and o1/o3 models use max_completion_tokens instead of max_tokens
        let uses_completion_tokens =
            self.model.starts_with("gpt-5") || self.model.starts_with("o1") || self.model.starts_with("o3");

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
        });

        if uses_completion_tokens {
            body["max_completion_tokens"] = serde_json::json!(max_tokens);
        } else {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        body
    }

    /// Parse the OpenAI API response
    fn parse_response(&self, api_response: OpenAIResponse) -> CompletionResponse {
        debug!(?api_response.choices, "parse_response: called");
        let choice = api_response.choices.into_iter().next();

        let (content, stop_reason) = match choice {
            Some(c) => {
                let stop_reason = match c.finish_reason.as_deref() {
                    Some("stop") => StopReason::EndTurn,
                    Some("length") => StopReason::MaxTokens,
                    _ => StopReason::EndTurn,
                };
                (c.message.content, stop_reason)
            }
            None => (None, StopReason::EndTurn),
        };

        // Some OpenAI-compatible servers omit usage
        let usage = api_response.usage.unwrap_or_default();

        CompletionResponse {
            content,
            stop_reason,
            usage: TokenUsage {
                input_tokens: usage.prompt_tokens,
                output_tokens: usage.completion_tokens,
            },
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAIClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, CompletionError> {
        debug!(%self.model, %request.max_tokens, "complete: called");
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = self.build_request_body(&request);

        let mut last_error: Option<CompletionError> = None;
        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                // last_error is always set before a retry
                let delay = last_error.as_ref().map(|e| e.retry_delay(attempt)).unwrap_or_default();
                warn!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "complete: retrying after transient error"
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self
                .http
                .post(url.clone())
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("content-type", "application/json")
                .json(&body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) if e.is_timeout() => {
                    debug!(attempt, "complete: request timed out");
                    last_error = Some(CompletionError::Timeout(self.timeout));
                    continue;
                }
                Err(e) => {
                    debug!(attempt, error = %e, "complete: network error");
                    last_error = Some(CompletionError::Network(e));
                    continue;
                }
            };

            let status = response.status().as_u16();

            if !response.status().is_success() {
                let err = if status == 429 {
                    debug!("complete: rate limited (429)");
                    let retry_after = response
                        .headers()
                        .get("retry-after")
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(60);
                    CompletionError::RateLimited {
                        retry_after: Duration::from_secs(retry_after),
                    }
                } else {
                    let text = response.text().await.unwrap_or_default();
                    CompletionError::ApiError { status, message: text }
                };

                if err.is_retryable() && attempt < MAX_RETRIES {
                    debug!(attempt, status, "complete: retryable error");
                    last_error = Some(err);
                    continue;
                }

                debug!(%status, "complete: API error, giving up");
                return Err(err);
            }

            debug!("complete: success");
            let api_response: OpenAIResponse = response.json().await?;
            return Ok(self.parse_response(api_response));
        }

        Err(last_error.unwrap_or_else(|| CompletionError::InvalidResponse("Max retries exceeded".to_string())))
    }
}

// OpenAI API response types

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}
