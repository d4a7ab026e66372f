//! Integration tests for the mavinspect CLI
//!
//! These tests run the actual binary through the headless `dump` command.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get the binary to test
fn mavinspect_cmd() -> Command {
    Command::cargo_bin("mavinspect").unwrap()
}

const SAMPLE: &str = r#"{"kind":"record","system":1,"component":1,"type":"HEARTBEAT","timestamp":0,"value":{"fields":{"type":2,"autopilot":3}}}
{"kind":"record","system":1,"component":1,"type":"HEARTBEAT","timestamp":1,"value":{"fields":{"type":2,"autopilot":3}}}
{"kind":"record","system":1,"component":1,"type":"HEARTBEAT","timestamp":2,"value":{"fields":{"type":2,"autopilot":3}}}
{"kind":"record","system":1,"component":1,"type":"SYS_STATUS","timestamp":2,"value":{"text":"sensors present\nsensors enabled\nsensors health"}}
{"kind":"param","system":1,"component":1,"name":"SYSID_THISMAV","value":1}
{"kind":"status","system":1,"component":1,"severity":6,"text":"EKF3 IMU0 is using GPS"}
this line is not json
"#;

fn sample_file(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("telemetry.jsonl");
    fs::write(&path, SAMPLE).unwrap();
    path
}

#[test]
fn test_help_flag() {
    mavinspect_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Live collapsible tree view"))
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("dump"));
}

#[test]
fn test_dump_collapsed_tree() {
    let temp_dir = TempDir::new().unwrap();
    let input = sample_file(&temp_dir);

    mavinspect_cmd()
        .args(["dump", "--input"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("▼ 1:1\n  ▶ Messages\n  ▶ Parameters\n"))
        .stdout(predicate::str::contains(
            "Selected: 1/3 | Vehicles: 1 | Status msgs: 1",
        ));
}

#[test]
fn test_dump_expand_all() {
    let temp_dir = TempDir::new().unwrap();
    let input = sample_file(&temp_dir);

    mavinspect_cmd()
        .args(["dump", "--expand-all", "--input"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("    ▼ HEARTBEAT [1.0 Hz, 3 msgs]"))
        .stdout(predicate::str::contains("        type: 2"))
        .stdout(predicate::str::contains("        001: sensors enabled"))
        .stdout(predicate::str::contains("      SYSID_THISMAV: 1"));
}

#[test]
fn test_dump_details_turns_fields_into_lines() {
    let temp_dir = TempDir::new().unwrap();
    let input = sample_file(&temp_dir);

    mavinspect_cmd()
        .args(["dump", "--details", "--expand-all", "--input"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("000: type: 2"))
        .stdout(predicate::str::contains("001: autopilot: 3"));
}

#[test]
fn test_dump_reads_stdin() {
    mavinspect_cmd()
        .args(["dump", "--input", "-"])
        .write_stdin(SAMPLE)
        .assert()
        .success()
        .stdout(predicate::str::contains("Vehicles: 1"));
}

#[test]
fn test_dump_empty_input() {
    mavinspect_cmd()
        .args(["dump", "--input", "-"])
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Waiting for vehicles... (No data yet)",
        ))
        .stdout(predicate::str::contains("Selected: 0/0"));
}

#[test]
fn test_dump_missing_file_fails_with_fix() {
    mavinspect_cmd()
        .args(["dump", "--input", "/definitely/not/here.jsonl"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("Fix:"));
}

#[test]
fn test_malformed_config_is_reported() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("config.toml");
    fs::write(&config, "tick_ms = [").unwrap();

    mavinspect_cmd()
        .args(["dump", "--input", "-", "--config"])
        .arg(&config)
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config error"));
}
