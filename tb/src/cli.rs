//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::config::PrinciplesConfig;

/// TaskBrief - Background Agent Briefing
#[derive(Parser)]
#[command(
    name = "taskbrief",
    about = "Turns vague task requests into ready-to-run background agent briefs",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one briefing pass over a request (batch mode)
    Brief {
        /// Request text to brief
        request: String,

        /// Also write the report to this file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show the active principles, or scaffold a starter file
    Principles {
        /// Create a starter principles file at the first configured path
        #[arg(long)]
        init: bool,
    },

    /// List prompt templates and where each would load from
    Prompts,

    /// Show application logs
    Logs {
        /// Follow log output (like tail -f)
        #[arg(short, long)]
        follow: bool,

        /// Number of lines to show
        #[arg(long, default_value = "50")]
        lines: usize,
    },
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    let path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("taskbrief")
        .join("logs")
        .join("taskbrief.log");
    debug!(?path, "get_log_path: returning path");
    path
}

/// Generate the after_help text with principles discovery and log path
pub fn generate_after_help() -> String {
    debug!("generate_after_help: called");
    let candidates = PrinciplesConfig::default().expanded_paths();
    let log_path = get_log_path();

    let mut help = String::new();

    // Principles section
    help.push_str("Principles files (first existing wins):\n");
    for path in &candidates {
        let icon = if path.exists() {
            debug!(path = %path.display(), "generate_after_help: principles file exists");
            "\u{2705}"
        } else {
            debug!(path = %path.display(), "generate_after_help: principles file missing");
            "\u{274C}"
        };
        help.push_str(&format!("  {} {}\n", icon, path.display()));
    }

    // Log path
    help.push('\n');
    help.push_str(&format!("Logs are written to: {}\n", log_path.display()));

    debug!("generate_after_help: returning help text");
    help
}

/// Output format for the brief command
#[derive(Clone, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "OutputFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "text" | "plain" => {
                debug!("OutputFormat::from_str: matched Text");
                Ok(Self::Text)
            }
            "json" => {
                debug!("OutputFormat::from_str: matched Json");
                Ok(Self::Json)
            }
            _ => {
                debug!(%s, "OutputFormat::from_str: unknown format");
                Err(format!("Unknown format: {}. Use: text or json", s))
            }
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        debug!(?self, "OutputFormat::fmt: called");
        match self {
            Self::Text => {
                debug!("OutputFormat::fmt: writing text");
                write!(f, "text")
            }
            Self::Json => {
                debug!("OutputFormat::fmt: writing json");
                write!(f, "json")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_command() {
        let cli = Cli::parse_from(["tb"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_brief() {
        let cli = Cli::parse_from(["tb", "brief", "Fix the parser bug in src/lexer.rs"]);
        if let Some(Command::Brief { request, save, format }) = cli.command {
            assert_eq!(request, "Fix the parser bug in src/lexer.rs");
            assert!(save.is_none());
            assert!(matches!(format, OutputFormat::Text));
        } else {
            panic!("Expected Brief command");
        }
    }

    #[test]
    fn test_cli_parse_brief_with_save_and_format() {
        let cli = Cli::parse_from(["tb", "brief", "Fix the bug", "--save", "out.txt", "--format", "json"]);
        if let Some(Command::Brief { request, save, format }) = cli.command {
            assert_eq!(request, "Fix the bug");
            assert_eq!(save, Some(PathBuf::from("out.txt")));
            assert!(matches!(format, OutputFormat::Json));
        } else {
            panic!("Expected Brief command");
        }
    }

    #[test]
    fn test_cli_parse_principles() {
        let cli = Cli::parse_from(["tb", "principles"]);
        assert!(matches!(cli.command, Some(Command::Principles { init: false })));
    }

    #[test]
    fn test_cli_parse_principles_init() {
        let cli = Cli::parse_from(["tb", "principles", "--init"]);
        assert!(matches!(cli.command, Some(Command::Principles { init: true })));
    }

    #[test]
    fn test_cli_parse_prompts() {
        let cli = Cli::parse_from(["tb", "prompts"]);
        assert!(matches!(cli.command, Some(Command::Prompts)));
    }

    #[test]
    fn test_cli_parse_logs_defaults() {
        let cli = Cli::parse_from(["tb", "logs"]);
        assert!(matches!(cli.command, Some(Command::Logs { follow: false, lines: 50 })));
    }

    #[test]
    fn test_output_format_from_str() {
        assert!(matches!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text)));
        assert!(matches!("json".parse::<OutputFormat>(), Ok(OutputFormat::Json)));
        assert!("invalid".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_cli_with_config() {
        let cli = Cli::parse_from(["tb", "-c", "/path/to/config.yml", "prompts"]);
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/config.yml")));
    }

    #[test]
    fn test_cli_with_log_level() {
        let cli = Cli::parse_from(["tb", "-l", "debug", "prompts"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }
}
