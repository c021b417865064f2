//! CLI integration tests
//!
//! Run the built binary against temporary git repositories with no tracker
//! configured, so nothing touches the network.

use std::path::Path;
use std::process::{Command, Output};

fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

fn setup_test_git_repo() -> tempfile::TempDir {
    let temp = tempfile::tempdir().expect("failed to create temp dir");
    let dir = temp.path();

    git(dir, &["init", "-b", "main"]);
    git(dir, &["config", "user.name", "Test User"]);
    git(dir, &["config", "user.email", "test@example.com"]);
    std::fs::write(dir.join("README.md"), "test\n").expect("failed to write file");
    git(dir, &["add", "."]);
    git(dir, &["commit", "-m", "Initial commit"]);
    git(dir, &["branch", "JIRA-1-login"]);

    temp
}

/// Run gira in `dir` with a clean environment and an empty home
fn run_gira(dir: &Path, home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gira"))
        .args(args)
        .current_dir(dir)
        .env_remove("GIRA_JIRA_ISSUE_PATTERN")
        .env_remove("GIRA_JIRA_URL")
        .env_remove("GIRA_JIRA_USER")
        .env_remove("GIRA_JIRA_TOKEN")
        .env_remove("RUST_LOG")
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .output()
        .expect("failed to run gira")
}

fn branch_exists(dir: &Path, name: &str) -> bool {
    Command::new("git")
        .args(["show-ref", "--verify", "--quiet", &format!("refs/heads/{}", name)])
        .current_dir(dir)
        .status()
        .expect("failed to run git")
        .success()
}

#[test]
fn test_report_without_tracker_groups_under_no_issue() {
    let repo = setup_test_git_repo();
    let home = tempfile::tempdir().unwrap();

    let output = run_gira(repo.path(), home.path(), &["report"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("(no issue)"));
    // Piped output carries no color codes
    assert!(!stdout.contains('\u{1b}'));
    assert!(stdout.contains("JIRA-1-login"));
    assert!(stdout.contains("main"));
}

#[test]
fn test_report_json_envelope() {
    let repo = setup_test_git_repo();
    let home = tempfile::tempdir().unwrap();

    let output = run_gira(repo.path(), home.path(), &["report", "--json"]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["command"], "report");
    assert_eq!(json["status"], "ok");

    let groups = json["data"]["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["bucket"], "no_issue");
    assert_eq!(groups[0]["branches"].as_array().unwrap().len(), 2);
}

#[test]
fn test_report_outside_repository_fails() {
    let dir = tempfile::tempdir().unwrap();
    let home = tempfile::tempdir().unwrap();

    let output = run_gira(dir.path(), home.path(), &["report", "--json"]);
    assert_eq!(output.status.code(), Some(2));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"], "error");
    assert_eq!(json["issues"][0]["code"], "E001");
}

#[test]
fn test_invalid_pattern_is_fatal() {
    let repo = setup_test_git_repo();
    let home = tempfile::tempdir().unwrap();

    let output = run_gira(repo.path(), home.path(), &["report", "--pattern", "JIRA-("]);
    assert_eq!(output.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&output.stderr).contains("E003"));
}

#[test]
fn test_config_file_in_working_directory_is_read() {
    let repo = setup_test_git_repo();
    let home = tempfile::tempdir().unwrap();
    std::fs::write(repo.path().join(".gira.toml"), "jira_issue_pattern = \"JIRA-(\"\n").unwrap();

    let output = run_gira(repo.path(), home.path(), &["report"]);
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_delete_without_terminal_deletes_nothing() {
    let repo = setup_test_git_repo();
    let home = tempfile::tempdir().unwrap();

    let output = run_gira(repo.path(), home.path(), &["delete"]);
    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("E031"));
    assert!(branch_exists(repo.path(), "JIRA-1-login"));
    assert!(branch_exists(repo.path(), "main"));
}

#[test]
fn test_bare_invocation_runs_delete() {
    let repo = setup_test_git_repo();
    let home = tempfile::tempdir().unwrap();

    let output = run_gira(repo.path(), home.path(), &["--json"]);
    assert_eq!(output.status.code(), Some(3));

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["command"], "delete");
    assert_eq!(json["issues"][0]["code"], "E031");
}
