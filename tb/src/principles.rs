//! Principles loading
//!
//! Principles are the static guidance text injected into every clarify
//! prompt. They live in a plain markdown file owned by the operator;
//! `tb principles --init` scaffolds a starter version.

use eyre::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::PrinciplesConfig;

/// Starter principles written by `tb principles --init`
pub const STARTER_PRINCIPLES: &str = r#"# Task Briefing Principles

When turning a request into a background agent task, pin down:

1. **Scope** - which files, directories, or services the task touches.
   Name them. "The parser" is not a location; `src/parser.rs` is.
2. **Inputs** - the data, formats, or examples the agent should work from.
3. **Outputs** - what the agent must produce: files created or modified,
   reports, metrics.
4. **Constraints** - what must not change: public APIs, file layouts,
   dependencies, performance budgets.
5. **Success criteria** - how a reviewer verifies the task is done.
   Prefer measurable checks over "works better".

A request is actionable when an agent could start without guessing.
Clarifying questions should target the gaps above, most important first.
"#;

/// Principles text plus where it came from
#[derive(Debug, Clone)]
pub struct Principles {
    text: String,
    source: Option<PathBuf>,
}

impl Principles {
    /// Load the first existing principles file from the configured paths
    ///
    /// A missing file fails soft (empty text); an existing file that cannot
    /// be read is a hard error.
    pub fn load(config: &PrinciplesConfig) -> Result<Self> {
        debug!("Principles::load: called");
        for path in config.expanded_paths() {
            if path.exists() {
                debug!(path = %path.display(), "Principles::load: found file");
                let text = fs::read_to_string(&path)
                    .context(format!("Failed to read principles file {}", path.display()))?;
                info!("Loaded principles from: {}", path.display());
                return Ok(Self {
                    text,
                    source: Some(path),
                });
            }
        }

        warn!("No principles file found, principles are empty");
        Ok(Self {
            text: String::new(),
            source: None,
        })
    }

    /// Build principles from literal text (tests, embedding callers)
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Write the starter principles file, refusing to overwrite an existing one
pub fn init_starter(path: &Path) -> Result<()> {
    debug!(path = %path.display(), "init_starter: called");
    if path.exists() {
        return Err(eyre::eyre!("Principles file already exists: {}", path.display()));
    }

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).context(format!("Failed to create directory {}", parent.display()))?;
    }

    fs::write(path, STARTER_PRINCIPLES).context(format!("Failed to write {}", path.display()))?;
    info!("Wrote starter principles to: {}", path.display());
    Ok(())
}
