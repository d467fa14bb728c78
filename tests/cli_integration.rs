//! CLI integration tests for Gantt
//!
//! These tests exercise the full pipeline from chart file to derived
//! schedule, through the real binary.

use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Get a command instance for the gantt binary
fn gantt_cmd() -> assert_cmd::Command {
    assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("gantt"))
}

/// Write a chart file into a fresh temp dir, returning (dir, path)
fn write_chart(contents: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("chart.toml");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

const RELEASE_CHART: &str = r#"
[chart]
name = "Release 1.0"
start = "2026-01-01"

[[task]]
name = "Design"
duration = 5

[[task]]
name = "Build"
duration = 3
parents = ["Design"]

[[task]]
name = "Docs"
duration = 8

[[task]]
name = "Ship"
duration = 1
parents = ["Build", "Docs"]
"#;

// =============================================================================
// Render
// =============================================================================

#[test]
fn render_prints_linear_chain_dates() {
    let (_dir, path) = write_chart(RELEASE_CHART);

    gantt_cmd()
        .arg("render")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Design\t2026-01-01\t2026-01-06"))
        .stdout(predicate::str::contains("Build\t2026-01-06\t2026-01-09"));
}

#[test]
fn render_join_waits_for_slowest_parent() {
    let (_dir, path) = write_chart(RELEASE_CHART);

    // Build ends 2026-01-09, Docs ends 2026-01-09; Ship starts at the max.
    gantt_cmd()
        .arg("render")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Ship\t2026-01-09\t2026-01-10"));
}

#[test]
fn render_json_omits_the_root() {
    let (_dir, path) = write_chart(RELEASE_CHART);

    let output = gantt_cmd()
        .args(["--format", "json", "render"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());

    let bars: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = bars
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 4);
    assert!(!names.iter().any(|n| n.starts_with("root-")));
}

#[test]
fn render_flags_infeasible_start_requests() {
    let (_dir, path) = write_chart(
        r#"
        [chart]
        name = "Release"
        start = "2026-01-01"

        [[task]]
        name = "Design"
        duration = 5

        [[task]]
        name = "Build"
        duration = 3
        parents = ["Design"]
        start = "2026-01-02"
        "#,
    );

    gantt_cmd()
        .arg("render")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("requested 2026-01-02 not feasible"));
}

#[test]
fn render_from_limits_to_subtree() {
    let (_dir, path) = write_chart(RELEASE_CHART);

    gantt_cmd()
        .args(["render", "--from", "Design"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Build"))
        .stdout(predicate::str::contains("Docs").not());
}

#[test]
fn render_from_unknown_task_fails() {
    let (_dir, path) = write_chart(RELEASE_CHART);

    gantt_cmd()
        .args(["render", "--from", "Ghost"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Ghost"));
}

// =============================================================================
// Check
// =============================================================================

#[test]
fn check_reports_valid_chart() {
    let (_dir, path) = write_chart(RELEASE_CHART);

    gantt_cmd()
        .arg("check")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("4 tasks"));
}

#[test]
fn check_rejects_dependency_cycle() {
    let (_dir, path) = write_chart(
        r#"
        [chart]
        name = "Broken"
        start = "2026-01-01"

        [[task]]
        name = "A"
        duration = 2

        [[task]]
        name = "B"
        duration = 2
        parents = ["A"]
        children = ["A"]
        "#,
    );

    gantt_cmd()
        .arg("check")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("cycle"));
}

#[test]
fn check_rejects_unknown_parent() {
    let (_dir, path) = write_chart(
        r#"
        [chart]
        name = "Broken"
        start = "2026-01-01"

        [[task]]
        name = "A"
        duration = 2
        parents = ["Ghost"]
        "#,
    );

    gantt_cmd()
        .arg("check")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Ghost"));
}

#[test]
fn check_rejects_missing_file() {
    gantt_cmd()
        .args(["check", "/nonexistent/chart.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"));
}

// =============================================================================
// Search
// =============================================================================

#[test]
fn search_matches_case_insensitively() {
    let (_dir, path) = write_chart(RELEASE_CHART);

    gantt_cmd()
        .args(["search"])
        .arg(&path)
        .arg("des")
        .assert()
        .success()
        .stdout(predicate::str::contains("Design"))
        .stdout(predicate::str::contains("Build").not());
}

#[test]
fn search_reports_no_matches() {
    let (_dir, path) = write_chart(RELEASE_CHART);

    gantt_cmd()
        .args(["search"])
        .arg(&path)
        .arg("zzz")
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks match"));
}

#[test]
fn search_json_includes_relevance() {
    let (_dir, path) = write_chart(RELEASE_CHART);

    let output = gantt_cmd()
        .args(["--format", "json", "search"])
        .arg(&path)
        .arg("bui")
        .output()
        .unwrap();
    assert!(output.status.success());

    let hits: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(hits[0]["name"], "Build");
    assert_eq!(hits[0]["relevance"], 3);
}
