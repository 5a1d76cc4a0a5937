//! taskbrief configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main taskbrief configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Principles file locations
    pub principles: PrinciplesConfig,

    /// Refinement loop limits
    pub refine: RefineConfig,

    /// Output file names
    pub output: OutputConfig,

    /// Log level override (trace, debug, info, warn, error)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .taskbrief.yml
        let local_config = PathBuf::from(".taskbrief.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/taskbrief/taskbrief.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("taskbrief").join("taskbrief.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read just the log level ahead of full config loading
    ///
    /// Used before the tracing subscriber exists, so failures are silent
    /// and fall back to None.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let path = Self::resolve_config_path(config_path)?;
        let content = fs::read_to_string(&path).ok()?;
        let value: serde_yaml::Value = serde_yaml::from_str(&content).ok()?;
        value.get("log-level")?.as_str().map(|s| s.to_string())
    }

    fn resolve_config_path(config_path: Option<&PathBuf>) -> Option<PathBuf> {
        if let Some(path) = config_path {
            return Some(path.clone());
        }

        let local_config = PathBuf::from(".taskbrief.yml");
        if local_config.exists() {
            return Some(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("taskbrief").join("taskbrief.yml");
            if user_config.exists() {
                return Some(user_config);
            }
        }

        None
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name ("anthropic" or "openai")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// File containing the API key, consulted when the env var is unset
    #[serde(rename = "api-key-file")]
    pub api_key_file: Option<PathBuf>,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "anthropic".to_string(),
            model: "claude-sonnet-4-20250514".to_string(),
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            api_key_file: None,
            base_url: "https://api.anthropic.com".to_string(),
            max_tokens: 2048,
            timeout_ms: 120_000,
        }
    }
}

impl LlmConfig {
    /// Resolve the API key: environment variable first, then key file
    pub fn get_api_key(&self) -> Result<String> {
        if let Ok(key) = std::env::var(&self.api_key_env)
            && !key.trim().is_empty()
        {
            return Ok(key.trim().to_string());
        }

        if let Some(path) = &self.api_key_file {
            let key = fs::read_to_string(path).context(format!("Failed to read API key file {}", path.display()))?;
            let key = key.trim();
            if !key.is_empty() {
                return Ok(key.to_string());
            }
        }

        Err(eyre::eyre!(
            "LLM API key not found. Set the {} environment variable.",
            self.api_key_env
        ))
    }
}

/// Principles file locations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrinciplesConfig {
    /// Candidate principles files (searched in order, first existing wins)
    pub paths: Vec<String>,
}

impl Default for PrinciplesConfig {
    fn default() -> Self {
        Self {
            paths: vec![
                ".taskbrief/principles.md".to_string(),
                "~/.config/taskbrief/principles.md".to_string(),
            ],
        }
    }
}

impl PrinciplesConfig {
    /// Expand paths (resolve ~/ prefixes)
    pub fn expanded_paths(&self) -> Vec<PathBuf> {
        self.paths
            .iter()
            .filter_map(|p| {
                if p.starts_with("~/") {
                    dirs::home_dir().map(|home| home.join(&p[2..]))
                } else {
                    Some(PathBuf::from(p))
                }
            })
            .collect()
    }
}

/// Refinement loop limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RefineConfig {
    /// Maximum refinement rounds per request
    #[serde(rename = "max-rounds")]
    pub max_rounds: u32,

    /// Cap on accumulated request text, in characters
    #[serde(rename = "max-request-chars")]
    pub max_request_chars: usize,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            max_rounds: 3,
            max_request_chars: 24_000,
        }
    }
}

/// Output file names
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default filename for a full brief
    #[serde(rename = "task-file")]
    pub task_file: String,

    /// Default filename for a questions-only report
    #[serde(rename = "questions-file")]
    pub questions_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            task_file: "agent_task.txt".to_string(),
            questions_file: "clarifying_questions.txt".to_string(),
        }
    }
}
