//! Report rendering and persistence
//!
//! A briefing produces a report: the original request plus whatever the
//! completion calls yielded. Two fixed text layouts exist, one for a full
//! brief and one for a questions-only handoff, plus a JSON form for
//! machine consumers.

use chrono::{DateTime, Utc};
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Placeholder line written when no instruction was produced
pub const INSTRUCTION_UNAVAILABLE: &str = "Not available - request too vague.";

/// Results of a briefing over one request
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Report {
    /// The request text as submitted, refinement blocks included
    pub original_request: String,
    /// Clarifying questions, absent only if the call failed
    pub questions: Option<String>,
    /// Ready-to-use instruction, absent when the request was too vague
    pub instruction: Option<String>,
    /// When the report was created
    pub created: DateTime<Utc>,
}

impl Report {
    pub fn new(
        original_request: impl Into<String>,
        questions: Option<String>,
        instruction: Option<String>,
    ) -> Self {
        Self {
            original_request: original_request.into(),
            questions,
            instruction,
            created: Utc::now(),
        }
    }

    /// Render the full brief layout
    ///
    /// The instruction section always appears; when no instruction exists
    /// it carries the fixed unavailable line so the file is self-explaining.
    pub fn render_brief(&self) -> String {
        debug!("Report::render_brief: called");
        let mut out = String::new();
        out.push_str("# Background Agent Task\n\n");
        out.push_str(&format!("## Original Request\n{}\n\n", self.original_request));
        out.push_str(&format!(
            "## Clarifying Questions\n{}\n\n",
            self.questions.as_deref().unwrap_or_default()
        ));
        match &self.instruction {
            Some(instruction) => {
                out.push_str(&format!("## Ready-to-Use Instruction\n{}\n", instruction));
            }
            None => {
                out.push_str(&format!("## Ready-to-Use Instruction\n{}\n", INSTRUCTION_UNAVAILABLE));
            }
        }
        out
    }

    /// Render the questions-only layout, for when the operator wants to
    /// refine offline and come back
    pub fn render_questions(&self) -> String {
        debug!("Report::render_questions: called");
        let mut out = String::new();
        out.push_str("# Background Agent Task - Clarifying Questions\n\n");
        out.push_str(&format!("## Original Request\n{}\n\n", self.original_request));
        out.push_str(&format!(
            "## Clarifying Questions\n{}\n\n",
            self.questions.as_deref().unwrap_or_default()
        ));
        out.push_str("## Next Steps\nAnswer the questions above and re-run with more details.\n");
        out
    }

    /// Serialize the report as pretty JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize report")
    }

    /// Write the full brief layout to a file
    pub fn save_brief(&self, path: &Path) -> Result<()> {
        debug!(path = %path.display(), "Report::save_brief: called");
        fs::write(path, self.render_brief())
            .with_context(|| format!("Failed to save report to {}", path.display()))
    }

    /// Write the questions-only layout to a file
    pub fn save_questions(&self, path: &Path) -> Result<()> {
        debug!(path = %path.display(), "Report::save_questions: called");
        fs::write(path, self.render_questions())
            .with_context(|| format!("Failed to save questions to {}", path.display()))
    }
}
