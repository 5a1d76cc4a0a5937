//! Integration tests for taskbrief
//!
//! These tests verify end-to-end behavior of the briefing components.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tempfile::TempDir;

use taskbrief::brief::Briefer;
use taskbrief::config::{Config, PrinciplesConfig};
use taskbrief::llm::{CompletionClient, CompletionError, CompletionRequest, CompletionResponse, StopReason, TokenUsage};
use taskbrief::principles::{Principles, init_starter};
use taskbrief::prompts::PromptLoader;
use taskbrief::refine::{RefineSession, SessionState};
use taskbrief::report::Report;

/// Completion client that serves canned replies in order
struct ScriptedClient {
    replies: Mutex<VecDeque<String>>,
    calls: AtomicUsize,
}

impl ScriptedClient {
    fn new(replies: &[&str]) -> Self {
        Self {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            calls: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| CompletionError::InvalidResponse("Script exhausted".to_string()))?;
        Ok(CompletionResponse {
            content: Some(reply),
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage::default(),
        })
    }
}

fn briefer_over(client: Arc<ScriptedClient>) -> Briefer {
    Briefer::new(
        client,
        PromptLoader::embedded_only(),
        Principles::from_text("Pin down scope, inputs, outputs, and success criteria."),
        512,
    )
}

// =============================================================================
// Refinement Loop Tests
// =============================================================================

#[test]
fn test_empty_first_answer_abandons_with_request_unchanged() {
    let mut session = RefineSession::new("fix the bug", 3, 24_000);
    assert_eq!(session.state(), SessionState::AwaitingAnswer);
    assert_eq!(session.round(), 1);

    let state = session.submit_answer("").expect("Empty answer should be accepted as abandonment");

    assert_eq!(state, SessionState::Abandoned);
    assert_eq!(session.request().as_str(), "fix the bug");
}

#[test]
fn test_three_fruitless_rounds_hit_the_limit() {
    let mut session = RefineSession::new("fix the bug", 3, 24_000);

    for answer in ["first answer", "second answer", "third answer"] {
        session.submit_answer(answer).expect("Answer should be accepted");
        session
            .record_outcome(false)
            .expect("Outcome should be recordable while processing");
    }

    assert_eq!(session.state(), SessionState::RoundLimitReached);
    let text = session.request().as_str();
    assert_eq!(text.matches("[Refinement").count(), 3, "Exactly 3 blocks expected");
    let p1 = text.find("[Refinement 1]: first answer").expect("Block 1 missing");
    let p2 = text.find("[Refinement 2]: second answer").expect("Block 2 missing");
    let p3 = text.find("[Refinement 3]: third answer").expect("Block 3 missing");
    assert!(p1 < p2 && p2 < p3, "Blocks must keep submission order");
}

#[tokio::test]
async fn test_refinement_succeeds_once_the_request_gets_specific() {
    let client = Arc::new(ScriptedClient::new(&[
        // Pass over the initial request: too vague
        "ANSWER: NO\nREASONING: no files or success criteria named",
        "1. Which file is affected?\n2. How is success verified?",
        // Pass over the refined request: specific enough
        "ANSWER: YES\nREASONING: names src/parser.rs and a fixture suite",
        "1. Anything else to pin down?",
        "Fix UTF-8 handling in the parser and verify against the fixture suite.",
    ]));
    let briefer = briefer_over(client.clone());

    let initial = "fix the parser";
    let first = briefer.process(initial).await;
    assert!(!first.instruction_present(), "Vague request must not yield an instruction");
    assert_eq!(client.calls(), 2, "Insufficient pass makes 2 calls");

    // The wiring the interactive session performs per round
    let mut session = RefineSession::new(initial, 3, 24_000);
    session
        .submit_answer("src/parser.rs mishandles UTF-8; success is the fixture suite passing")
        .expect("Answer should be accepted");
    assert_eq!(session.state(), SessionState::Processing);

    let outcome = briefer.process(session.request().as_str()).await;
    let state = session
        .record_outcome(outcome.instruction_present())
        .expect("Outcome should be recordable");

    assert_eq!(state, SessionState::Success);
    assert_eq!(session.round(), 1, "Success on the first round");
    assert_eq!(client.calls(), 5, "Sufficient pass adds 3 more calls");
    assert!(session.request().as_str().contains("[Refinement 1]: src/parser.rs"));
    assert_eq!(
        outcome.instruction.as_deref(),
        Some("Fix UTF-8 handling in the parser and verify against the fixture suite.")
    );
}

// =============================================================================
// Briefing Pipeline Tests
// =============================================================================

#[tokio::test]
async fn test_sufficient_request_yields_instruction_in_three_calls() {
    let client = Arc::new(ScriptedClient::new(&[
        "ANSWER: YES\nREASONING: names samples/reviews.json and an output file",
        "1. Should existing output files be overwritten?",
        "Analyze the reviews file and write the top complaint categories to the output file.",
    ]));
    let briefer = briefer_over(client.clone());

    let outcome = briefer
        .process("Analyze reviews in samples/reviews.json and write the top 3 complaint categories to output/analysis.json")
        .await;

    assert!(outcome.analysis.is_sufficient());
    assert!(outcome.questions.is_some());
    assert!(outcome.instruction_present());
    assert!(outcome.failures.is_empty());
    assert_eq!(client.calls(), 3);
}

#[tokio::test]
async fn test_insufficient_request_never_invokes_the_synthesizer() {
    let client = Arc::new(ScriptedClient::new(&[
        "ANSWER: NO\nREASONING: does not say which bug or where",
        "1. Which component misbehaves?\n2. What is the expected behavior?",
    ]));
    let briefer = briefer_over(client.clone());

    let outcome = briefer.process("fix the bug").await;

    assert!(!outcome.analysis.is_sufficient());
    assert!(outcome.questions.is_some());
    assert!(!outcome.instruction_present());
    assert_eq!(client.calls(), 2, "Instruct call must be skipped");
}

#[tokio::test]
async fn test_exhausted_client_degrades_instead_of_crashing() {
    // Only the analyze reply is scripted; clarify and instruct fail
    let client = Arc::new(ScriptedClient::new(&["ANSWER: YES\nREASONING: concrete"]));
    let briefer = briefer_over(client.clone());

    let outcome = briefer.process("Rename Widget to Gadget in src/widget.rs").await;

    assert!(outcome.analysis.is_sufficient());
    assert!(outcome.questions.is_none());
    assert!(!outcome.instruction_present());
    assert_eq!(outcome.failures.len(), 2);
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_config_loads_from_explicit_path() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("taskbrief.yml");
    std::fs::write(
        &path,
        "llm:\n  provider: openai\n  base-url: http://localhost:11434\nrefine:\n  max-rounds: 2\nlog-level: debug\n",
    )
    .expect("Failed to write config");

    let config = Config::load(Some(&path)).expect("Failed to load config");

    assert_eq!(config.llm.provider, "openai");
    assert_eq!(config.llm.base_url, "http://localhost:11434");
    assert_eq!(config.refine.max_rounds, 2);
    // Unspecified fields fall back to defaults
    assert_eq!(config.refine.max_request_chars, 24_000);
    assert_eq!(config.output.task_file, "agent_task.txt");

    let level = Config::load_log_level(Some(&path));
    assert_eq!(level.as_deref(), Some("debug"));
}

#[test]
fn test_config_explicit_missing_path_is_an_error() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("no-such.yml");

    let result = Config::load(Some(&path));

    assert!(result.is_err(), "Explicit config path must exist");
    let err = format!("{:#}", result.unwrap_err());
    assert!(err.contains("no-such.yml"), "Error should name the path: {}", err);
}

// =============================================================================
// Principles Tests
// =============================================================================

#[test]
fn test_starter_principles_roundtrip_through_config_paths() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let first = temp_dir.path().join(".taskbrief").join("principles.md");
    let second = temp_dir.path().join("fallback.md");

    let config = PrinciplesConfig {
        paths: vec![
            first.to_string_lossy().into_owned(),
            second.to_string_lossy().into_owned(),
        ],
    };

    // Nothing on disk yet: fails soft to empty
    let empty = Principles::load(&config).expect("Missing principles should fail soft");
    assert!(empty.is_empty());
    assert!(empty.source().is_none());

    // Scaffold the first candidate and load again
    init_starter(&first).expect("Failed to scaffold principles");
    let loaded = Principles::load(&config).expect("Failed to load principles");
    assert!(!loaded.is_empty());
    assert_eq!(loaded.source(), Some(first.as_path()));
    assert!(loaded.text().contains("Success criteria"));

    // Scaffolding refuses to clobber
    let err = init_starter(&first).expect_err("Second init must refuse to overwrite");
    assert!(err.to_string().contains("already exists"));
}

// =============================================================================
// Report Tests
// =============================================================================

#[test]
fn test_saved_brief_matches_the_labeled_section_layout() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("agent_task.txt");

    let report = Report::new(
        "fix the parser\n\n[Refinement 1]: src/parser.rs, UTF-8 handling",
        Some("1. Which fixtures matter?".to_string()),
        Some("Fix UTF-8 handling in the parser.".to_string()),
    );
    report.save_brief(&path).expect("Failed to save brief");

    let written = std::fs::read_to_string(&path).expect("Failed to read saved brief");
    let expected = concat!(
        "# Background Agent Task\n",
        "\n",
        "## Original Request\n",
        "fix the parser\n",
        "\n",
        "[Refinement 1]: src/parser.rs, UTF-8 handling\n",
        "\n",
        "## Clarifying Questions\n",
        "1. Which fixtures matter?\n",
        "\n",
        "## Ready-to-Use Instruction\n",
        "Fix UTF-8 handling in the parser.\n",
    );
    assert_eq!(written, expected);
}

#[test]
fn test_saved_questions_file_carries_next_steps() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("clarifying_questions.txt");

    let report = Report::new("fix the bug", Some("1. Which bug?".to_string()), None);
    report.save_questions(&path).expect("Failed to save questions");

    let written = std::fs::read_to_string(&path).expect("Failed to read saved questions");
    assert!(written.starts_with("# Background Agent Task - Clarifying Questions\n"));
    assert!(written.contains("## Next Steps\n"));
    assert!(written.ends_with("Answer the questions above and re-run with more details.\n"));
}
