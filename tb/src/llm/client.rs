//! CompletionClient trait definition

use async_trait::async_trait;

use super::{CompletionError, CompletionRequest, CompletionResponse};

/// Stateless completion client - each call is independent
///
/// This is the core abstraction for interacting with language models.
/// A briefing pass makes up to three one-shot calls (analyze, clarify,
/// instruct); no conversation state is carried between them. Refinement
/// context travels inside the request text itself.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send a single completion request (blocking until complete)
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, CompletionError>;
}
