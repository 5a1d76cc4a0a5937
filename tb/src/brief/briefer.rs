//! Briefing pipeline
//!
//! One pass = analyze, clarify, optionally instruct: up to three
//! sequential completion calls over the same request text. A failed call
//! degrades its product to absent; the pass itself never fails.

use colored::Colorize;
use eyre::{Context, Result};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::Config;
use crate::llm::{CompletionClient, CompletionError, CompletionRequest, Message, create_client};
use crate::principles::Principles;
use crate::prompts::{PromptContext, PromptLoader};

use super::outcome::{Analysis, BriefOutcome, parse_analysis};

/// Runs briefing passes over a request text
pub struct Briefer {
    llm: Arc<dyn CompletionClient>,
    prompts: PromptLoader,
    principles: Principles,
    max_tokens: u32,
}

impl Briefer {
    pub fn new(llm: Arc<dyn CompletionClient>, prompts: PromptLoader, principles: Principles, max_tokens: u32) -> Self {
        debug!(%max_tokens, "Briefer::new: called");
        Self {
            llm,
            prompts,
            principles,
            max_tokens,
        }
    }

    /// Wire a briefer from configuration
    ///
    /// Loads the principles (refusing to run without any), builds the
    /// completion client, and roots the prompt loader at the working
    /// directory.
    pub fn from_config(config: &Config) -> Result<Self> {
        debug!("Briefer::from_config: called");
        let principles = Principles::load(&config.principles)?;
        if principles.is_empty() {
            return Err(eyre::eyre!(
                "No principles file found. Checked: {}. Run `tb principles --init` to create one.",
                config.principles.paths.join(", ")
            ));
        }

        let llm = create_client(&config.llm).map_err(|e| eyre::eyre!("Failed to create completion client: {}", e))?;

        let workdir = std::env::current_dir().context("Failed to resolve working directory")?;
        let prompts = PromptLoader::new(&workdir);

        Ok(Self::new(llm, prompts, principles, config.llm.max_tokens))
    }

    /// Run one briefing pass over the request text
    ///
    /// The instruct call only happens when analysis says the request is
    /// specific enough; a failed analysis counts as insufficient.
    pub async fn process(&self, request: &str) -> BriefOutcome {
        debug!(request_len = request.len(), "Briefer::process: called");
        let mut failures = Vec::new();

        println!("{}", "Analyzing request specificity...".dimmed());
        let analysis = match self.analyze(request).await {
            Ok(reply) => parse_analysis(&reply),
            Err(e) => {
                warn!(error = %e, "Briefer::process: analyze call failed");
                println!("{}", format!("  analysis failed: {}", e).red());
                failures.push(format!("analysis failed: {}", e));
                Analysis::Insufficient("analysis unavailable".to_string())
            }
        };

        println!("{}", "Generating clarifying questions...".dimmed());
        let questions = match self.clarify(request).await {
            Ok(reply) => Some(reply),
            Err(e) => {
                warn!(error = %e, "Briefer::process: clarify call failed");
                println!("{}", format!("  clarify failed: {}", e).red());
                failures.push(format!("clarify failed: {}", e));
                None
            }
        };

        let instruction = if analysis.is_sufficient() {
            println!("{}", "Synthesizing ready-to-use instruction...".dimmed());
            match self.instruct(request).await {
                Ok(reply) => Some(reply),
                Err(e) => {
                    warn!(error = %e, "Briefer::process: instruct call failed");
                    println!("{}", format!("  instruct failed: {}", e).red());
                    failures.push(format!("instruct failed: {}", e));
                    None
                }
            }
        } else {
            debug!("Briefer::process: request insufficient, skipping instruction");
            println!("{}", "Request too vague for a direct instruction, skipping synthesis".dimmed());
            None
        };

        BriefOutcome {
            analysis,
            questions,
            instruction,
            failures,
        }
    }

    async fn analyze(&self, request: &str) -> Result<String, CompletionError> {
        debug!("Briefer::analyze: called");
        self.complete_with("analyze", request).await
    }

    async fn clarify(&self, request: &str) -> Result<String, CompletionError> {
        debug!("Briefer::clarify: called");
        self.complete_with("clarify", request).await
    }

    async fn instruct(&self, request: &str) -> Result<String, CompletionError> {
        debug!("Briefer::instruct: called");
        self.complete_with("instruct", request).await
    }

    /// Render the named template as the system prompt and send the request
    /// text as the sole user message
    async fn complete_with(&self, template: &str, request: &str) -> Result<String, CompletionError> {
        debug!(%template, "Briefer::complete_with: called");
        let context = PromptContext::new(self.principles.text());
        let system_prompt = self
            .prompts
            .render(template, &context)
            .map_err(|e| CompletionError::InvalidResponse(e.to_string()))?;

        let completion = CompletionRequest {
            system_prompt,
            messages: vec![Message::user(request)],
            max_tokens: self.max_tokens,
        };

        let response = self.llm.complete(completion).await?;
        debug!(
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "Briefer::complete_with: completed"
        );

        response
            .content
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| CompletionError::InvalidResponse("Empty completion".to_string()))
    }
}
