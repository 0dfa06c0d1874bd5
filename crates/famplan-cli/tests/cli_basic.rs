//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary and verify outputs.

use std::path::{Path, PathBuf};
use std::process::Command;

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/household.json")
}

/// Run a CLI command with an isolated config file and return output.
fn run_cli(config: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_famplan-cli"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

fn generate(config: &Path, extra: &[&str]) -> (i32, String, String) {
    let input = fixture();
    let mut args = vec!["generate", "--input", input.to_str().unwrap(), "--week", "2026-10-19"];
    args.extend_from_slice(extra);
    run_cli(config, &args)
}

#[test]
fn test_strategies_lists_all_three() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(&dir.path().join("engine.toml"), &["strategies"]);
    assert_eq!(code, 0);
    for name in ["balanced", "energy-optimized", "goal-focused"] {
        assert!(stdout.contains(name), "missing {name} in {stdout}");
    }
}

#[test]
fn test_generate_json() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, stderr) = generate(&dir.path().join("engine.toml"), &["--deterministic"]);
    assert_eq!(code, 0, "generate failed: {stderr}");

    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["schedule"]["weekStart"], "2026-10-19");
    assert_eq!(parsed["schedule"]["strategy"], "balanced");
    assert_eq!(parsed["schedule"]["id"], "sched-0001");
    assert_eq!(parsed["summary"]["totalGoals"], 4);

    let blocks = parsed["schedule"]["blocks"].as_array().unwrap();
    let fixed = blocks.iter().filter(|b| b["goalId"].is_null()).count();
    assert_eq!(fixed, 8);
    let runs = blocks.iter().filter(|b| b["goalId"] == "run").count();
    assert_eq!(runs, 3);
}

#[test]
fn test_generate_deterministic_runs_match() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("engine.toml");
    let (code, first, _) = generate(&config, &["--deterministic"]);
    assert_eq!(code, 0);
    let (_, second, _) = generate(&config, &["--deterministic"]);
    assert_eq!(first, second);

    let parsed: serde_json::Value = serde_json::from_str(&first).unwrap();
    assert_eq!(parsed["schedule"]["generatedAt"], "2026-10-19T00:00:00Z");
}

#[test]
fn test_generate_member_view() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = generate(&dir.path().join("engine.toml"), &["--member", "mia"]);
    assert_eq!(code, 0);

    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let blocks = parsed["schedule"]["blocks"].as_array().unwrap();
    assert!(blocks.iter().all(|b| b["owner"] == "mia" || b["owner"] == "shared"));
    assert!(blocks.iter().any(|b| b["goalId"] == "piano"));
    assert!(blocks.iter().any(|b| b["commitmentId"] == "sunday-lunch"));
    assert!(blocks.iter().all(|b| b["goalId"] != "run"));
}

#[test]
fn test_generate_agenda() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = generate(
        &dir.path().join("engine.toml"),
        &["--format", "agenda", "--strategy", "energy-optimized"],
    );
    assert_eq!(code, 0);
    assert!(stdout.contains("Week of 2026-10-19 (energy-optimized)"));
    assert!(stdout.contains("Game night"));
    assert!(stdout.contains("goals scheduled"));
}

#[test]
fn test_generate_excludes_goal() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = generate(&dir.path().join("engine.toml"), &["--exclude", "read"]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["summary"]["totalGoals"], 3);
    let blocks = parsed["schedule"]["blocks"].as_array().unwrap();
    assert!(blocks.iter().all(|b| b["goalId"] != "read"));
}

#[test]
fn test_generate_rejects_unknown_strategy() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("engine.toml");
    let (code, stdout, stderr) = generate(&config, &["--strategy", "fastest"]);
    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Unknown strategy 'fastest'"), "{stderr}");
}

#[test]
fn test_generate_rejects_non_monday() {
    let dir = tempfile::tempdir().unwrap();
    let input = fixture();
    let (code, _, stderr) = run_cli(
        &dir.path().join("engine.toml"),
        &["generate", "--input", input.to_str().unwrap(), "--week", "2026-10-21"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("expected a Monday"), "{stderr}");
}

#[test]
fn test_generate_reports_overlap() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("clash.json");
    std::fs::write(
        &input,
        r#"{
            "members": [{"id": "sam", "name": "Sam", "role": "PRIMARY"}],
            "commitments": [
                {"owner": "sam", "dayOfWeek": 3, "startTime": "09:00", "endTime": "12:00", "title": "Work", "blockType": "work"},
                {"owner": "sam", "dayOfWeek": 3, "startTime": "11:00", "endTime": "12:30", "title": "Dentist", "blockType": "appointment"}
            ],
            "goals": []
        }"#,
    )
    .unwrap();

    let (code, _, stderr) = run_cli(
        &dir.path().join("engine.toml"),
        &["generate", "--input", input.to_str().unwrap(), "--week", "2026-10-19"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("overlap"), "{stderr}");
    assert!(stderr.contains("Work") && stderr.contains("Dentist"), "{stderr}");
}

#[test]
fn test_config_set_get_reset() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("nested/engine.toml");

    let (code, stdout, _) = run_cli(&config, &["config", "get", "default_strategy"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "balanced");

    let set = ["config", "set", "default_strategy", "goal-focused"];
    let (code, _, stderr) = run_cli(&config, &set);
    assert_eq!(code, 0, "set failed: {stderr}");
    assert!(config.exists());

    let (_, stdout, _) = run_cli(&config, &["config", "get", "default_strategy"]);
    assert_eq!(stdout.trim(), "goal-focused");

    let (code, stdout, _) = generate(&config, &[]);
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["schedule"]["strategy"], "goal-focused");

    let (code, _, _) = run_cli(&config, &["config", "reset"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(&config, &["config", "get", "default_strategy"]);
    assert_eq!(stdout.trim(), "balanced");
}

#[test]
fn test_config_rejects_unknown_key() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("engine.toml");
    let (code, _, stderr) = run_cli(&config, &["config", "get", "no_such_key"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Unknown configuration key"), "{stderr}");

    let (code, _, _) = run_cli(&config, &["config", "set", "default_strategy", "fastest"]);
    assert_eq!(code, 1);
    assert!(!config.exists());
}

#[test]
fn test_config_path_honours_flag() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("engine.toml");
    let (code, stdout, _) = run_cli(&config, &["config", "path"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), config.display().to_string());
}
