//! Prompt Loader
//!
//! Loads prompt templates from files or falls back to embedded defaults.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use super::embedded;

/// The templates a briefing pass uses, in call order
pub const TEMPLATE_NAMES: [&str; 3] = ["analyze", "clarify", "instruct"];

/// Where a template would be loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptSource {
    UserOverride(PathBuf),
    Repo(PathBuf),
    Embedded,
}

impl std::fmt::Display for PromptSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PromptSource::UserOverride(path) => write!(f, "user override: {}", path.display()),
            PromptSource::Repo(path) => write!(f, "repo: {}", path.display()),
            PromptSource::Embedded => write!(f, "embedded"),
        }
    }
}

/// Context for rendering prompt templates
///
/// Only the clarify template substitutes anything today; the other
/// templates ignore the context.
#[derive(Debug, Clone, Serialize)]
pub struct PromptContext {
    /// Principles text injected into the clarify prompt
    pub principles: String,
}

impl PromptContext {
    pub fn new(principles: impl Into<String>) -> Self {
        Self {
            principles: principles.into(),
        }
    }
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// User override directory (e.g., `.taskbrief/prompts/`)
    user_dir: Option<PathBuf>,
    /// Repo default directory (e.g., `prompts/`)
    repo_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a new prompt loader rooted at the working directory
    ///
    /// # Arguments
    /// * `workdir` - Used to find `.taskbrief/prompts/` and `prompts/`
    pub fn new(workdir: impl AsRef<Path>) -> Self {
        let workdir = workdir.as_ref();
        debug!(?workdir, "PromptLoader::new: called");
        let user_dir = workdir.join(".taskbrief/prompts");
        let repo_dir = workdir.join("prompts");

        let user_dir_exists = user_dir.exists();
        let repo_dir_exists = repo_dir.exists();
        debug!(
            ?user_dir,
            %user_dir_exists,
            ?repo_dir,
            %repo_dir_exists,
            "PromptLoader::new: checking directories"
        );

        Self {
            hbs: Handlebars::new(),
            user_dir: if user_dir_exists { Some(user_dir) } else { None },
            repo_dir: if repo_dir_exists { Some(repo_dir) } else { None },
        }
    }

    /// Create a loader that only uses embedded prompts (for testing)
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self {
            hbs: Handlebars::new(),
            user_dir: None,
            repo_dir: None,
        }
    }

    /// Report where a template would be loaded from
    pub fn source_of(&self, name: &str) -> Option<PromptSource> {
        debug!(%name, "PromptLoader::source_of: called");
        if let Some(ref user_dir) = self.user_dir {
            let path = user_dir.join(format!("{}.pmt", name));
            if path.exists() {
                return Some(PromptSource::UserOverride(path));
            }
        }

        if let Some(ref repo_dir) = self.repo_dir {
            let path = repo_dir.join(format!("{}.pmt", name));
            if path.exists() {
                return Some(PromptSource::Repo(path));
            }
        }

        embedded::get_embedded(name).map(|_| PromptSource::Embedded)
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. User override: `.taskbrief/prompts/{name}.pmt`
    /// 2. Repo default: `prompts/{name}.pmt`
    /// 3. Embedded fallback
    fn load_template(&self, name: &str) -> Result<String> {
        debug!(%name, "PromptLoader::load_template: called");
        // Try user override first
        if let Some(ref user_dir) = self.user_dir {
            debug!("PromptLoader::load_template: checking user override directory");
            let path = user_dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found in user override");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read user prompt {}: {}", path.display(), e));
            } else {
                debug!(?path, "PromptLoader::load_template: not found in user override");
            }
        } else {
            debug!("PromptLoader::load_template: no user override directory configured");
        }

        // Try repo default
        if let Some(ref repo_dir) = self.repo_dir {
            debug!("PromptLoader::load_template: checking repo directory");
            let path = repo_dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found in repo");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read repo prompt {}: {}", path.display(), e));
            } else {
                debug!(?path, "PromptLoader::load_template: not found in repo");
            }
        } else {
            debug!("PromptLoader::load_template: no repo directory configured");
        }

        // Fall back to embedded
        debug!("PromptLoader::load_template: trying embedded fallback");
        if let Some(content) = embedded::get_embedded(name) {
            debug!(%name, "PromptLoader::load_template: found in embedded");
            return Ok(content.to_string());
        }

        debug!(%name, "PromptLoader::load_template: not found anywhere");
        Err(eyre!("Prompt template not found: {}", name))
    }

    /// Render a template with the given context
    pub fn render(&self, template_name: &str, context: &PromptContext) -> Result<String> {
        debug!(%template_name, "PromptLoader::render: called");
        let template = self.load_template(template_name)?;

        debug!("PromptLoader::render: rendering template with handlebars");
        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }
}
