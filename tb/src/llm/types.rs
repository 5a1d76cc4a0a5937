//! Completion request/response types for taskbrief
//!
//! These types model the Anthropic Messages API but are provider-agnostic enough
//! to cover OpenAI-compatible endpoints as well. Briefing calls are text-only,
//! so content is a plain string rather than structured blocks.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A completion request - everything needed for one briefing call
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System prompt (rendered from Handlebars template)
    pub system_prompt: String,

    /// User messages (typically just the accumulated request text)
    pub messages: Vec<Message>,

    /// Max tokens for response (from config)
    pub max_tokens: u32,
}

/// A message in the conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    /// Create a user message
    pub fn user(text: impl Into<String>) -> Self {
        debug!("Message::user: called");
        Self {
            role: Role::User,
            content: text.into(),
        }
    }

    /// Create an assistant message
    pub fn assistant(text: impl Into<String>) -> Self {
        debug!("Message::assistant: called");
        Self {
            role: Role::Assistant,
            content: text.into(),
        }
    }
}

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Response from a completion request
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// Text content (if any)
    pub content: Option<String>,

    /// Why the model stopped
    pub stop_reason: StopReason,

    /// Token usage
    pub usage: TokenUsage,
}

/// Why the model stopped generating
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    StopSequence,
}

impl StopReason {
    /// Parse from Anthropic API stop_reason string
    pub fn from_anthropic(s: &str) -> Self {
        debug!(%s, "StopReason::from_anthropic: called");
        match s {
            "end_turn" => {
                debug!("StopReason::from_anthropic: EndTurn");
                StopReason::EndTurn
            }
            "max_tokens" => {
                debug!("StopReason::from_anthropic: MaxTokens");
                StopReason::MaxTokens
            }
            "stop_sequence" => {
                debug!("StopReason::from_anthropic: StopSequence");
                StopReason::StopSequence
            }
            _ => {
                debug!("StopReason::from_anthropic: unknown, defaulting to EndTurn");
                StopReason::EndTurn
            }
        }
    }
}

/// Token usage for logging
#[derive(Debug, Clone, Default)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}
