//! Interactive session management

use std::path::Path;

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, warn};

use crate::brief::{Briefer, BriefOutcome};
use crate::config::Config;
use crate::refine::{RefineSession, SessionState};
use crate::report::Report;

/// Line that submits accumulated multiline input
const INPUT_SENTINEL: &str = "###";

/// Interactive briefing session
pub struct BriefSession {
    briefer: Briefer,
    max_rounds: u32,
    max_request_chars: usize,
    task_file: String,
    questions_file: String,
}

/// What a multiline read produced
enum ReadOutcome {
    /// Joined, trimmed input text (may be empty)
    Text(String),
    /// Operator asked to leave (quit/exit, Ctrl+C, or EOF)
    Quit,
}

impl BriefSession {
    /// Create a new session over a wired briefer
    pub fn new(briefer: Briefer, config: &Config) -> Self {
        debug!(
            max_rounds = config.refine.max_rounds,
            max_request_chars = config.refine.max_request_chars,
            "BriefSession::new: called"
        );
        Self {
            briefer,
            max_rounds: config.refine.max_rounds,
            max_request_chars: config.refine.max_request_chars,
            task_file: config.output.task_file.clone(),
            questions_file: config.output.questions_file.clone(),
        }
    }

    /// Run the session main loop
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        // Create readline editor for proper line editing
        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let request = match self.read_multiline(&mut rl, "Enter your background agent request")? {
                ReadOutcome::Text(text) => text,
                ReadOutcome::Quit => break,
            };

            if request.is_empty() {
                println!("Please enter a request.\n");
                continue;
            }

            println!();
            println!("Processing request ({} characters)...", request.chars().count());
            println!();

            let outcome = self.briefer.process(&request).await;
            self.print_outcome(&outcome);

            if !self.choose_next_step(&mut rl, &request, &outcome).await? {
                break;
            }

            println!("\n{}\n", "=".repeat(60));
        }

        println!("Goodbye!");
        Ok(())
    }

    /// Print welcome banner
    fn print_welcome(&self) {
        println!();
        println!("{}", "TaskBrief - Background Agent Briefing".bright_cyan().bold());
        println!("{}", "=".repeat(60));
        println!("Get both clarifying questions AND a ready-to-use instruction.");
        println!("Choose what works best for your situation.");
        println!("Type {} or {} to leave.", "quit".yellow(), "exit".yellow());
        println!();
    }

    /// Read multiline input terminated by the sentinel line
    ///
    /// A first line of quit/exit (case-insensitive) short-circuits without
    /// waiting for the sentinel. Ctrl+C and EOF also count as quitting.
    fn read_multiline(&self, rl: &mut DefaultEditor, prompt: &str) -> Result<ReadOutcome> {
        println!(
            "{} (type '{}' on a new line to submit):",
            prompt.bright_green(),
            INPUT_SENTINEL
        );

        let mut lines: Vec<String> = Vec::new();
        loop {
            match rl.readline("") {
                Ok(line) => {
                    if line.trim() == INPUT_SENTINEL {
                        break;
                    }
                    if lines.is_empty() {
                        let first = line.trim().to_lowercase();
                        if first == "quit" || first == "exit" {
                            debug!("BriefSession::read_multiline: quit command");
                            return Ok(ReadOutcome::Quit);
                        }
                    }
                    lines.push(line);
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C - leave
                    println!("^C");
                    return Ok(ReadOutcome::Quit);
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D - leave
                    println!();
                    return Ok(ReadOutcome::Quit);
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        Ok(ReadOutcome::Text(lines.join("\n").trim().to_string()))
    }

    /// Print both options from a briefing pass
    fn print_outcome(&self, outcome: &BriefOutcome) {
        println!();
        println!("{}", "=".repeat(60));
        println!("{}", "OPTION 1: CLARIFYING QUESTIONS".bright_cyan().bold());
        println!("{}", "=".repeat(60));
        println!("Use these if you want to refine your request further:\n");
        match &outcome.questions {
            Some(questions) => println!("{}", questions),
            None => println!("{}", "(clarifying questions unavailable)".dimmed()),
        }

        println!();
        println!("{}", "=".repeat(60));
        if let Some(instruction) = &outcome.instruction {
            println!("{}", "OPTION 2: READY-TO-USE INSTRUCTION".bright_cyan().bold());
            println!("{}", "=".repeat(60));
            println!("Copy this directly to your background agent:\n");
            println!("{}", instruction);
        } else {
            println!("{}", "OPTION 2: NOT AVAILABLE".yellow().bold());
            println!("{}", "=".repeat(60));
            println!("Request is too vague to create actionable instructions.");
            println!("Please use the clarifying questions above to add more details.");
        }
        println!("{}", "=".repeat(60));
    }

    /// Show the menu and act on the choice
    ///
    /// Returns false when the operator wants to leave the session.
    async fn choose_next_step(&self, rl: &mut DefaultEditor, request: &str, outcome: &BriefOutcome) -> Result<bool> {
        let has_instruction = outcome.instruction_present();

        println!();
        println!("{}", "Which option do you prefer?".bright_cyan());
        println!("  1. Use the clarifying questions to refine your request");
        if has_instruction {
            println!("  2. Use the ready-to-use instruction as-is");
            println!("  3. Save both to a file");
        } else {
            println!("  2. Save clarifying questions to a file");
            println!("     (No ready-to-use instruction available - request too vague)");
        }
        println!();

        let choice = match rl.readline("Enter your choice (1-3): ") {
            Ok(line) => line.trim().to_string(),
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                return Ok(false);
            }
            Err(ReadlineError::Eof) => {
                println!();
                return Ok(false);
            }
            Err(err) => {
                return Err(eyre::eyre!("Readline error: {}", err));
            }
        };
        debug!(%choice, "BriefSession::choose_next_step: choice read");

        match choice.as_str() {
            "1" => self.refine(rl, request, outcome).await?,
            "2" if has_instruction => {
                let report = Report::new(request, outcome.questions.clone(), outcome.instruction.clone());
                self.save_brief_flow(rl, &report);
            }
            "2" => {
                let report = Report::new(request, outcome.questions.clone(), None);
                self.save_questions_flow(rl, &report);
            }
            "3" => {
                let report = Report::new(request, outcome.questions.clone(), outcome.instruction.clone());
                self.save_brief_flow(rl, &report);
                self.save_questions_flow(rl, &report);
            }
            _ => {
                debug!(%choice, "BriefSession::choose_next_step: unrecognized choice, new request");
            }
        }

        Ok(true)
    }

    /// Drive the refinement loop: show questions, collect answers, re-run
    /// the briefing pass, until success, abandonment, or the round limit
    async fn refine(&self, rl: &mut DefaultEditor, request: &str, first_outcome: &BriefOutcome) -> Result<()> {
        debug!("BriefSession::refine: called");
        let mut session = RefineSession::new(request, self.max_rounds, self.max_request_chars);
        let mut questions = first_outcome.questions.clone();
        let mut last_outcome: Option<BriefOutcome> = None;

        while session.state() == SessionState::AwaitingAnswer {
            println!();
            println!(
                "{}",
                format!("REFINEMENT MODE - Round {}", session.round()).bright_cyan().bold()
            );
            println!("Answer the clarifying questions to improve your request:");
            println!("{}", "-".repeat(50));
            println!("Current Request:\n{}\n", session.request());
            println!("{}", "Clarifying Questions to Answer:".bright_cyan());
            match &questions {
                Some(questions) => println!("{}", questions),
                None => println!("{}", "(clarifying questions unavailable)".dimmed()),
            }
            println!();

            let answers = match self.read_multiline(rl, "Provide answers to any/all of the questions above")? {
                ReadOutcome::Text(text) => text,
                ReadOutcome::Quit => break,
            };

            let state = match session.submit_answer(&answers) {
                Ok(state) => state,
                Err(err) => {
                    warn!(error = %err, "BriefSession::refine: answer rejected");
                    println!("\n{} {}", "Answer rejected:".red(), err);
                    continue;
                }
            };

            if state == SessionState::Abandoned {
                println!("\n{}", "No answers provided. Exiting refinement mode.".yellow());
                break;
            }

            println!();
            println!(
                "{}",
                format!("Processing refined request (Round {})...", session.round()).dimmed()
            );
            let outcome = self.briefer.process(session.request().as_str()).await;
            self.print_outcome(&outcome);

            // Show the freshest questions next round; keep the old ones if
            // this round's clarify call failed
            if outcome.questions.is_some() {
                questions = outcome.questions.clone();
            }

            match session.record_outcome(outcome.instruction_present())? {
                SessionState::Success => {
                    println!();
                    println!(
                        "{}",
                        format!("Refinement successful after {} round(s)!", session.round())
                            .green()
                            .bold()
                    );
                    println!("You now have a ready-to-use instruction.");
                }
                SessionState::AwaitingAnswer => {
                    println!("\n{}", "Still needs more details. Let's continue refining...".yellow());
                }
                SessionState::RoundLimitReached => {
                    println!();
                    println!(
                        "{}",
                        format!("Reached maximum refinement rounds ({}).", session.max_rounds()).yellow()
                    );
                    println!("The request may be too complex for this tool.");
                }
                _ => {}
            }

            last_outcome = Some(outcome);
        }

        // Offer to keep whatever the refinement produced
        match session.state() {
            SessionState::Success => {
                if let Some(outcome) = &last_outcome
                    && self.confirm(rl, "Save the full brief to a file? (y/N): ")
                {
                    let report = Report::new(
                        session.request().as_str(),
                        outcome.questions.clone(),
                        outcome.instruction.clone(),
                    );
                    self.save_brief_flow(rl, &report);
                }
            }
            SessionState::Abandoned | SessionState::RoundLimitReached => {
                if questions.is_some() && self.confirm(rl, "Save the clarifying questions to a file? (y/N): ") {
                    let report = Report::new(session.request().as_str(), questions.clone(), None);
                    self.save_questions_flow(rl, &report);
                }
            }
            _ => {}
        }

        Ok(())
    }

    /// Ask a yes/no question; anything but y/Y declines
    fn confirm(&self, rl: &mut DefaultEditor, prompt: &str) -> bool {
        println!();
        match rl.readline(prompt) {
            Ok(line) => line.trim().eq_ignore_ascii_case("y"),
            Err(_) => false,
        }
    }

    /// Prompt for a filename and save the full brief
    fn save_brief_flow(&self, rl: &mut DefaultEditor, report: &Report) {
        let prompt = format!("Enter filename (default: {}): ", self.task_file);
        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(_) => {
                debug!("BriefSession::save_brief_flow: filename prompt cancelled");
                return;
            }
        };
        let filename = line.trim();
        let filename = if filename.is_empty() { self.task_file.as_str() } else { filename };

        match report.save_brief(Path::new(filename)) {
            Ok(()) => println!("{}", format!("Saved to {}", filename).green()),
            Err(e) => {
                warn!(error = %e, "BriefSession::save_brief_flow: save failed");
                eprintln!("{} {}", "Error saving file:".red(), e);
            }
        }
    }

    /// Prompt for a filename and save the questions-only report
    fn save_questions_flow(&self, rl: &mut DefaultEditor, report: &Report) {
        let prompt = format!("Enter filename (default: {}): ", self.questions_file);
        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(_) => {
                debug!("BriefSession::save_questions_flow: filename prompt cancelled");
                return;
            }
        };
        let filename = line.trim();
        let filename = if filename.is_empty() {
            self.questions_file.as_str()
        } else {
            filename
        };

        match report.save_questions(Path::new(filename)) {
            Ok(()) => println!("{}", format!("Saved clarifying questions to {}", filename).green()),
            Err(e) => {
                warn!(error = %e, "BriefSession::save_questions_flow: save failed");
                eprintln!("{} {}", "Error saving file:".red(), e);
            }
        }
    }
}
