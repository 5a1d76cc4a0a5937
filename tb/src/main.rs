//! TaskBrief - Background Agent Briefing
//!
//! CLI entry point for briefing requests and the interactive session.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use clap::{CommandFactory, FromArgMatches};
use eyre::{Context, Result};
use tracing::{debug, info};

use taskbrief::brief::Briefer;
use taskbrief::cli::{Cli, Command, OutputFormat, generate_after_help, get_log_path};
use taskbrief::config::Config;
use taskbrief::principles::{Principles, init_starter};
use taskbrief::prompts::{PromptLoader, TEMPLATE_NAMES};
use taskbrief::repl;
use taskbrief::report::Report;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("taskbrief")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level_str = cli_log_level.or(config_log_level);
    let level = if let Some(s) = level_str {
        match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        }
    } else {
        tracing::Level::INFO
    };

    let log_file = fs::File::create(log_dir.join("taskbrief.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Build command with dynamic after_help showing principles discovery
    let cmd = Cli::command().after_help(generate_after_help());

    // Parse CLI arguments using the modified command
    let cli = Cli::from_arg_matches(&cmd.get_matches())?;

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());

    // Setup logging with priority: CLI > config > INFO default
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!(
        "TaskBrief loaded config: provider={} model={}",
        config.llm.provider, config.llm.model
    );

    // Dispatch command
    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Brief { request, save, format }) => {
            debug!(?save, ?format, "main: matched Brief command");
            cmd_brief(&config, &request, save.as_deref(), format).await
        }
        Some(Command::Principles { init }) => {
            debug!(init, "main: matched Principles command");
            cmd_principles(&config, init).await
        }
        Some(Command::Prompts) => {
            debug!("main: matched Prompts command");
            cmd_prompts().await
        }
        Some(Command::Logs { follow, lines }) => {
            debug!(follow, lines, "main: matched Logs command");
            cmd_logs(follow, lines).await
        }
        None => {
            debug!("main: no command specified, starting interactive session");
            repl::run_interactive(&config).await
        }
    }
}

/// Run one briefing pass and print (and optionally save) the report
async fn cmd_brief(config: &Config, request: &str, save: Option<&Path>, format: OutputFormat) -> Result<()> {
    debug!(request_len = request.len(), ?save, ?format, "cmd_brief: called");
    let briefer = Briefer::from_config(config)?;
    let outcome = briefer.process(request).await;

    let report = Report::new(request, outcome.questions.clone(), outcome.instruction.clone());
    let rendered = match format {
        OutputFormat::Text => report.render_brief(),
        OutputFormat::Json => report.to_json()?,
    };

    println!();
    println!("{}", rendered);

    if let Some(path) = save {
        fs::write(path, &rendered).with_context(|| format!("Failed to save report to {}", path.display()))?;
        println!("Saved to {}", path.display());
    }

    Ok(())
}

/// Show the active principles, or scaffold a starter file
async fn cmd_principles(config: &Config, init: bool) -> Result<()> {
    debug!(init, "cmd_principles: called");

    if init {
        let path = config
            .principles
            .expanded_paths()
            .into_iter()
            .next()
            .ok_or_else(|| eyre::eyre!("No principles paths configured"))?;
        init_starter(&path)?;
        println!("Created starter principles at {}", path.display());
        return Ok(());
    }

    let principles = Principles::load(&config.principles)?;
    if principles.is_empty() {
        debug!("cmd_principles: no principles found");
        println!("No principles file found. Checked:");
        for path in config.principles.expanded_paths() {
            println!("  {}", path.display());
        }
        println!();
        println!("Run `tb principles --init` to create a starter file.");
        return Ok(());
    }

    if let Some(source) = principles.source() {
        println!("Principles from {}:", source.display());
        println!();
    }
    println!("{}", principles.text());
    Ok(())
}

/// List prompt templates and where each would load from
async fn cmd_prompts() -> Result<()> {
    debug!("cmd_prompts: called");
    let workdir = std::env::current_dir().context("Failed to resolve working directory")?;
    let loader = PromptLoader::new(&workdir);

    println!("Prompt templates:");
    for name in TEMPLATE_NAMES {
        match loader.source_of(name) {
            Some(source) => println!("  {:10} {}", name, source),
            None => println!("  {:10} not found", name),
        }
    }
    Ok(())
}

/// Show application logs
async fn cmd_logs(follow: bool, lines: usize) -> Result<()> {
    debug!(follow, lines, "cmd_logs: called");
    let log_path = get_log_path();

    if !log_path.exists() {
        debug!(?log_path, "cmd_logs: log file does not exist");
        println!("No log file found at: {}", log_path.display());
        println!("The tool may not have been run yet.");
        return Ok(());
    }

    if follow {
        debug!(?log_path, "cmd_logs: following log file");
        println!("Following log file: {} (Ctrl+C to stop)", log_path.display());
        println!();

        // Use tail -f for following
        let mut child = std::process::Command::new("tail")
            .args(["-f", "-n", &lines.to_string()])
            .arg(&log_path)
            .spawn()
            .context("Failed to run tail -f")?;

        child.wait()?;
    } else {
        debug!(?log_path, lines, "cmd_logs: reading last N lines");
        // Read last N lines
        let file = fs::File::open(&log_path).context("Failed to open log file")?;
        let reader = BufReader::new(file);
        let all_lines: Vec<String> = reader.lines().map_while(Result::ok).collect();

        let start = if all_lines.len() > lines { all_lines.len() - lines } else { 0 };

        for line in &all_lines[start..] {
            println!("{}", line);
        }
    }

    Ok(())
}
