//! Tests for the `janet-ai-reader` binary that don't need a model endpoint.

use anyhow::Result;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_cli(dir: &TempDir, args: &[&str]) -> Result<Output> {
    let output = Command::new(env!("CARGO_BIN_EXE_janet-ai-reader"))
        .arg("--root")
        .arg(dir.path())
        .args(args)
        .output()?;
    Ok(output)
}

fn project() -> Result<TempDir> {
    let dir = tempfile::tempdir()?;
    let content: String = (1..=40).map(|n| format!("line {n}\n")).collect();
    std::fs::write(dir.path().join("notes.txt"), content)?;
    Ok(dir)
}

#[test]
fn test_replay_text() -> Result<()> {
    let dir = project()?;
    let output = run_cli(
        &dir,
        &[
            "replay",
            "--file",
            "notes.txt",
            "--ranges",
            r#"{"line_ranges": [{"start": 3, "end": 4}, {"start": 7, "end": 7}]}"#,
        ],
    )?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    assert_eq!(
        stdout.trim_end(),
        "<notes.txt>\nline 3\nline 4\nline 5\nline 6\nline 7\n</notes.txt>"
    );
    Ok(())
}

#[test]
fn test_replay_json() -> Result<()> {
    let dir = project()?;
    let output = run_cli(
        &dir,
        &[
            "replay",
            "--file",
            "notes.txt",
            "--ranges",
            "[{\"start\": 35, \"end\": 99}]",
            "--format",
            "json",
        ],
    )?;
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(value[0]["path"], "notes.txt");
    assert_eq!(value[0]["line_start"], 35);
    assert_eq!(value[0]["line_end"], 40);
    Ok(())
}

#[test]
fn test_prompt_numbers_lines() -> Result<()> {
    let dir = project()?;
    let output = run_cli(&dir, &["prompt", "--file", "notes.txt"])?;
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains(" 1 | line 1"));
    assert!(stdout.contains("40 | line 40"));
    Ok(())
}

#[test]
fn test_missing_file_fails() -> Result<()> {
    let dir = project()?;
    let output = run_cli(&dir, &["prompt", "--file", "absent.txt"])?;
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("File not found: absent.txt"));
    Ok(())
}

#[test]
fn test_bad_config_fails() -> Result<()> {
    let dir = project()?;
    std::fs::write(dir.path().join(".janet-ai-reader.toml"), "max_chunk_distanse = 3\n")?;
    let output = run_cli(&dir, &["prompt", "--file", "notes.txt"])?;
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("Failed to parse config"));
    Ok(())
}
