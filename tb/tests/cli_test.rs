//! CLI tests for the tb binary
//!
//! These run the compiled binary against temporary working directories.
//! Subcommands that would call the completion API are only exercised up to
//! their fail-fast checks (missing principles, missing API key).

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Binary command sandboxed to a temp dir (cwd and HOME both point there)
fn tb_in(temp: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("tb").expect("tb binary should build");
    cmd.current_dir(temp.path())
        .env("HOME", temp.path())
        .env_remove("XDG_CONFIG_HOME")
        .env_remove("XDG_DATA_HOME")
        .env_remove("ANTHROPIC_API_KEY");
    cmd
}

#[test]
fn test_help_shows_about_and_principles_discovery() {
    let temp = TempDir::new().expect("Failed to create temp dir");

    tb_in(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Turns vague task requests"))
        .stdout(predicate::str::contains("Principles files"))
        .stdout(predicate::str::contains("Logs are written to"));
}

#[test]
fn test_version_prints_binary_name() {
    let temp = TempDir::new().expect("Failed to create temp dir");

    tb_in(&temp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("taskbrief"));
}

#[test]
fn test_prompts_fall_back_to_embedded_in_a_clean_dir() {
    let temp = TempDir::new().expect("Failed to create temp dir");

    tb_in(&temp)
        .arg("prompts")
        .assert()
        .success()
        .stdout(predicate::str::contains("analyze"))
        .stdout(predicate::str::contains("clarify"))
        .stdout(predicate::str::contains("instruct"))
        .stdout(predicate::str::contains("embedded"));
}

#[test]
fn test_prompts_report_repo_files_when_present() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    std::fs::create_dir_all(temp.path().join("prompts")).expect("Failed to create prompts dir");
    std::fs::write(temp.path().join("prompts/analyze.pmt"), "custom analyze").expect("Failed to write template");

    tb_in(&temp)
        .arg("prompts")
        .assert()
        .success()
        .stdout(predicate::str::contains("repo:"))
        .stdout(predicate::str::contains("embedded"));
}

#[test]
fn test_principles_reports_missing_and_suggests_init() {
    let temp = TempDir::new().expect("Failed to create temp dir");

    tb_in(&temp)
        .arg("principles")
        .assert()
        .success()
        .stdout(predicate::str::contains("No principles file found"))
        .stdout(predicate::str::contains("tb principles --init"));
}

#[test]
fn test_principles_init_scaffolds_then_refuses_overwrite() {
    let temp = TempDir::new().expect("Failed to create temp dir");

    tb_in(&temp)
        .args(["principles", "--init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created starter principles"));

    assert!(temp.path().join(".taskbrief/principles.md").exists());

    // Showing them now works
    tb_in(&temp)
        .arg("principles")
        .assert()
        .success()
        .stdout(predicate::str::contains("Success criteria"));

    // A second init must not clobber the operator's file
    tb_in(&temp)
        .args(["principles", "--init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_brief_without_principles_fails_fast() {
    let temp = TempDir::new().expect("Failed to create temp dir");

    tb_in(&temp)
        .args(["brief", "fix the bug"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No principles file found"));
}

#[test]
fn test_brief_without_api_key_fails_before_any_call() {
    let temp = TempDir::new().expect("Failed to create temp dir");
    std::fs::create_dir_all(temp.path().join(".taskbrief")).expect("Failed to create dir");
    std::fs::write(temp.path().join(".taskbrief/principles.md"), "Name the files involved.")
        .expect("Failed to write principles");

    tb_in(&temp)
        .args(["brief", "fix the bug"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ANTHROPIC_API_KEY"));
}

#[test]
fn test_logs_prints_the_current_session_log() {
    let temp = TempDir::new().expect("Failed to create temp dir");

    // Startup opens the log file before the command dispatch, so even this
    // invocation leaves an initialization line behind
    tb_in(&temp)
        .arg("logs")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logging initialized"));
}
