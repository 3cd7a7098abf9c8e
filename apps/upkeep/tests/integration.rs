//! Integration tests for the upkeep CLI

use std::process::Command;

fn upkeep() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_upkeep"));
    for var in [
        "UPKEEP_SEARCH_CRITERIA",
        "UPKEEP_FILTERS",
        "UPKEEP_UPDATE_LIMIT",
        "UPKEEP_CLIENT_ID",
        "UPKEEP_COLOR",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_cli_version() {
    let output = upkeep()
        .arg("--version")
        .output()
        .expect("Failed to execute upkeep");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("upkeep"));
}

#[test]
fn test_cli_help() {
    let output = upkeep()
        .arg("--help")
        .output()
        .expect("Failed to execute upkeep");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--search-criteria"));
    assert!(stdout.contains("--filter"));
    assert!(stdout.contains("--update-limit"));
    assert!(stdout.contains("--only-check-for-reboot-required"));
}

#[test]
fn test_unknown_flag_is_fatal() {
    let output = upkeep()
        .arg("--no-such-flag")
        .output()
        .expect("Failed to execute upkeep");

    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_invalid_filter_is_fatal() {
    let temp = tempfile::tempdir().unwrap();
    let config = temp.path().join("config.toml");
    std::fs::write(&config, "").unwrap();

    let output = upkeep()
        .args(["--config", config.to_str().unwrap()])
        .args(["--filter", "keep:$true"])
        .output()
        .expect("Failed to execute upkeep");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.is_empty());
    assert!(stderr.lines().all(|line| line.starts_with("ERROR: ")));
    assert!(stderr.contains("keep"));
    assert!(stderr.lines().any(|line| line.starts_with("ERROR: hint: ")));
}

#[test]
fn test_missing_config_file_is_fatal() {
    let temp = tempfile::tempdir().unwrap();
    let missing = temp.path().join("absent.toml");

    let output = upkeep()
        .args(["--config", missing.to_str().unwrap()])
        .output()
        .expect("Failed to execute upkeep");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.starts_with("ERROR: "));
}

#[test]
fn test_zero_update_limit_is_rejected() {
    let temp = tempfile::tempdir().unwrap();
    let config = temp.path().join("config.toml");
    std::fs::write(&config, "[filter]\nupdate_limit = 5\n").unwrap();

    let output = upkeep()
        .args(["--config", config.to_str().unwrap()])
        .args(["--update-limit", "0"])
        .output()
        .expect("Failed to execute upkeep");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("update_limit"));
}
