//! Integration tests for the Readlog CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const FINISHED_DRAFT: &str = r#"{
  "title": "Dune",
  "author": "Frank Herbert",
  "publishedDate": "1965-08-01",
  "totalPages": "412",
  "status": "DONE",
  "startDate": "2024-01-02",
  "endDate": "2024-02-01",
  "recommend": true,
  "rating": 4.5,
  "review": "",
  "quotes": ["Fear is the mind-killer."],
  "isPublic": true
}"#;

/// Create a draft file for testing
fn create_draft(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write test file");
    path
}

fn readlog(data_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("readlog").unwrap();
    cmd.env_remove("READLOG_DATA_DIR")
        .arg("--data-dir")
        .arg(data_dir.path());
    cmd
}

#[test]
fn test_help() {
    let mut cmd = Command::cargo_bin("readlog").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("steps"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("preview"))
        .stdout(predicate::str::contains("fill"))
        .stdout(predicate::str::contains("reset"));
}

#[test]
fn test_version() {
    let mut cmd = Command::cargo_bin("readlog").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("readlog"));
}

#[test]
fn test_validate_help() {
    let mut cmd = Command::cargo_bin("readlog").unwrap();
    cmd.args(["validate", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Validate a draft"))
        .stdout(predicate::str::contains("--step"))
        .stdout(predicate::str::contains("--json"));
}

#[test]
fn test_steps_lists_form_in_order() {
    let mut cmd = Command::cargo_bin("readlog").unwrap();
    cmd.arg("steps")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. Book info"))
        .stdout(predicate::str::contains("5. Privacy"))
        .stdout(predicate::str::contains("Reading status"));
}

#[test]
fn test_validate_missing_input() {
    let mut cmd = Command::cargo_bin("readlog").unwrap();
    cmd.arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_validate_nonexistent_file() {
    let mut cmd = Command::cargo_bin("readlog").unwrap();
    cmd.args(["validate", "/nonexistent/draft.json"])
        .assert()
        .failure();
}

#[test]
fn test_validate_complete_draft() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_draft(&temp_dir, "draft.json", FINISHED_DRAFT);

    let mut cmd = Command::cargo_bin("readlog").unwrap();
    cmd.args(["validate", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Valid entry"));
}

#[test]
fn test_validate_reports_issues() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_draft(
        &temp_dir,
        "draft.json",
        r#"{"title": "Dune", "status": "WISH", "startDate": "2024-01-02", "rating": 5}"#,
    );

    let mut cmd = Command::cargo_bin("readlog").unwrap();
    cmd.args(["validate", input.to_str().unwrap()])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Author: Enter the author's name."))
        .stdout(predicate::str::contains("cannot have a start date"))
        .stdout(predicate::str::contains("at least 100 characters"));
}

#[test]
fn test_validate_single_step_json() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_draft(&temp_dir, "draft.json", r#"{"rating": 7}"#);

    let mut cmd = Command::cargo_bin("readlog").unwrap();
    let output = cmd
        .args(["validate", "--step", "2", "--json", input.to_str().unwrap()])
        .assert()
        .failure();

    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&stdout).expect("Output should be valid JSON");
    let issues = json.as_array().unwrap();
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["field"], "rating");
}

#[test]
fn test_validate_step_out_of_range() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_draft(&temp_dir, "draft.json", FINISHED_DRAFT);

    let mut cmd = Command::cargo_bin("readlog").unwrap();
    cmd.args(["validate", "--step", "9", input.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 1 and 5"));
}

#[test]
fn test_preview() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_draft(&temp_dir, "draft.json", FINISHED_DRAFT);

    let mut cmd = Command::cargo_bin("readlog").unwrap();
    cmd.args(["preview", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("[Finished] 412 pages"))
        .stdout(predicate::str::contains("Finished: Feb 1, 2024"))
        .stdout(predicate::str::contains("★★★★½"))
        .stdout(predicate::str::contains("> Fear is the mind-killer."));
}

#[test]
fn test_preview_placeholders() {
    let temp_dir = TempDir::new().unwrap();
    let input = create_draft(&temp_dir, "draft.json", "{}");

    let mut cmd = Command::cargo_bin("readlog").unwrap();
    cmd.args(["preview", input.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Enter a title"))
        .stdout(predicate::str::contains("(not rated)"));
}

#[test]
fn test_draft_when_nothing_saved() {
    let data_dir = TempDir::new().unwrap();
    readlog(&data_dir)
        .arg("draft")
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved draft"));
}

#[test]
fn test_fill_quit_then_resume_and_reset() {
    let data_dir = TempDir::new().unwrap();

    readlog(&data_dir)
        .arg("fill")
        .write_stdin("Dune\nFrank Herbert\n:quit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Step 1/5: Book info"))
        .stdout(predicate::str::contains("Draft saved."));

    readlog(&data_dir)
        .arg("draft")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"title\": \"Dune\""))
        .stdout(predicate::str::contains("\"author\": \"Frank Herbert\""));

    readlog(&data_dir)
        .arg("fill")
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Resuming your saved draft."))
        .stdout(predicate::str::contains("Title* [Dune]: "));

    readlog(&data_dir)
        .arg("reset")
        .assert()
        .success()
        .stdout(predicate::str::contains("Draft cleared"));

    readlog(&data_dir)
        .arg("draft")
        .assert()
        .success()
        .stdout(predicate::str::contains("No saved draft"));
}

#[test]
fn test_fill_submits_entry() {
    let data_dir = TempDir::new().unwrap();
    let answers = [
        "Dune",
        "Frank Herbert",
        "1965-08-01",
        "412",
        "done",
        "2024-01-02",
        "2024-02-01",
        "y",
        "4.5",
        "",
        "Fear is the mind-killer.",
        "y",
    ];

    readlog(&data_dir)
        .arg("fill")
        .write_stdin(answers.join("\n") + "\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Entry saved."));

    let entries: Vec<_> = fs::read_dir(data_dir.path().join("entries"))
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(entries.len(), 1);

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&entries[0]).unwrap()).unwrap();
    assert_eq!(saved["entry"]["title"], "Dune");
    assert_eq!(saved["entry"]["status"], "DONE");
    assert_eq!(saved["entry"]["totalPages"], 412);
    assert!(saved["submittedAt"].is_string());

    assert!(!data_dir.path().join("multi-step-form-data.json").exists());
}

#[test]
fn test_fill_corrects_step_token() {
    let data_dir = TempDir::new().unwrap();
    readlog(&data_dir)
        .args(["fill", "--url", "?step=99"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Step 1/5: Book info  (?step=1)"));
}

#[test]
fn test_data_dir_from_env() {
    let data_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("readlog").unwrap();
    cmd.env("READLOG_DATA_DIR", data_dir.path())
        .arg("fill")
        .write_stdin("Piranesi\n:quit\n")
        .assert()
        .success();

    assert!(data_dir.path().join("multi-step-form-data.json").exists());
}

#[test]
fn test_verbose_flag() {
    let mut cmd = Command::cargo_bin("readlog").unwrap();
    cmd.args(["--verbose", "steps"]).assert().success();
}
