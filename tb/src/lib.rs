//! TaskBrief - Background Agent Briefing
//!
//! TaskBrief turns an ambiguous natural-language task request into either
//! clarifying questions or a ready-to-use instruction for a downstream
//! background agent. The hard work (language understanding, question
//! generation, instruction synthesis) is delegated to an LLM; this crate is
//! the workflow around it.
//!
//! # Core Concepts
//!
//! - **Briefing Pass**: analyze specificity, generate clarifying questions,
//!   and synthesize an instruction only when the request has specifics
//! - **Progressive Refinement**: operator answers are appended to the request
//!   as labeled blocks and the grown request goes through another pass,
//!   bounded by a round limit
//! - **Principles**: operator-owned guidance text injected into every
//!   clarification prompt
//! - **Degraded, Never Crashed**: a failed completion call costs that call's
//!   product, not the session
//!
//! # Modules
//!
//! - [`llm`] - Completion client trait and provider implementations
//! - [`prompts`] - Prompt template loading and rendering
//! - [`principles`] - Principles file loading and scaffolding
//! - [`brief`] - The analyze/clarify/instruct pipeline
//! - [`refine`] - Request accumulation and the refinement state machine
//! - [`report`] - Report rendering and persistence
//! - [`repl`] - Interactive operator session
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod brief;
pub mod cli;
pub mod config;
pub mod llm;
pub mod principles;
pub mod prompts;
pub mod refine;
pub mod repl;
pub mod report;

// Re-export commonly used types
pub use brief::{Analysis, BriefOutcome, Briefer, parse_analysis};
pub use config::{Config, LlmConfig, OutputConfig, PrinciplesConfig, RefineConfig};
pub use llm::{
    AnthropicClient, CompletionClient, CompletionError, CompletionRequest, CompletionResponse, Message, OpenAIClient,
    Role, StopReason, TokenUsage, create_client,
};
pub use principles::{Principles, init_starter};
pub use prompts::{PromptContext, PromptLoader, PromptSource, TEMPLATE_NAMES};
pub use refine::{RefineSession, RequestText, SessionError, SessionState};
pub use report::{INSTRUCTION_UNAVAILABLE, Report};
