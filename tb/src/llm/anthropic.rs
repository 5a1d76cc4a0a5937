//! Anthropic Claude API client implementation
//!
//! Implements the CompletionClient trait for Anthropic's Messages API.
//! Briefing calls are blocking text completions; transient errors are
//! retried here with exponential backoff, invisible to callers.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{CompletionClient, CompletionError, CompletionRequest, CompletionResponse, StopReason, TokenUsage};
use crate::config::LlmConfig;

/// Maximum number of retries for transient errors
const MAX_RETRIES: u32 = 3;

/// Anthropic Claude API client
pub struct AnthropicClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
    timeout: Duration,
}

impl AnthropicClient {
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

    /// Build the request body for the Anthropic API
    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        debug!(%self.model, %request.max_tokens, "build_request_body: called");
        serde_json::json!({
            "model": self.model,
            "max_tokens": request.max_tokens.min(self.max_tokens),
            "system": request.system_prompt,
            "messages": request.messages,
        })
    }

    /// Parse the Anthropic API response
    fn parse_response(&self, api_response: AnthropicResponse) -> CompletionResponse {
        debug!(?api_response.stop_reason, "parse_response: called");
        let mut content = String::new();

        for block in api_response.content {
            match block {
                AnthropicContentBlock::Text { text } => {
                    debug!("parse_response: Text block");
                    content.push_str(&text);
                }
            }
        }

        CompletionResponse {
            content: if content.is_empty() { None } else { Some(content) },
            stop_reason: StopReason::from_anthropic(&api_response.stop_reason),
            usage: TokenUsage {
                input_tokens: api_response.usage.input_tokens,
                output_tokens: api_response.usage.output_tokens,
            },
        }
    }
}

#[async_trait]
impl CompletionClient for AnthropicClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, CompletionError> {
        debug!(%self.model, %request.max_tokens, "complete: called");
        let url = format!("{}/v1/messages", self.base_url);
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
                .header("x-api-key", self.api_key.clone())
                .header("anthropic-version", "2023-06-01")
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
            let api_response: AnthropicResponse = response.json().await?;
            return Ok(self.parse_response(api_response));
        }

        Err(last_error.unwrap_or_else(|| CompletionError::InvalidResponse("Max retries exceeded".to_string())))
    }
}

// Anthropic API response types

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
    stop_reason: String,
    usage: AnthropicUsage,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum AnthropicContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u64,
    output_tokens: u64,
}
