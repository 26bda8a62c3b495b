//! Error scenario integration tests

use std::process::Command;

use tempfile::TempDir;

fn clipmenu_bin(home: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_clipmenu"));
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_RUNTIME_DIR", home.path())
        .env("CLIPMENU_LOG", "off");
    cmd
}

#[test]
fn config_get_unknown_key() {
    let home = TempDir::new().unwrap();
    let output = clipmenu_bin(&home)
        .args(["config", "get", "unknown_key"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Unknown key") && stderr.contains("retention"),
        "Expected error about unknown key, got: {}",
        stderr
    );
}

#[test]
fn config_set_invalid_duration() {
    let home = TempDir::new().unwrap();
    let output = clipmenu_bin(&home)
        .args(["config", "set", "poll_interval", "often"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("poll_interval"),
        "Expected validation error, got: {}",
        stderr
    );
}

#[test]
fn config_set_invalid_bool() {
    let home = TempDir::new().unwrap();
    let output = clipmenu_bin(&home)
        .args(["config", "set", "autopaste", "sometimes"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("true") && stderr.contains("false"),
        "Expected boolean validation error, got: {}",
        stderr
    );
}

#[test]
fn corrupt_config_file_is_reported() {
    let home = TempDir::new().unwrap();
    let config_dir = home.path().join("config/clipmenu");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), "history_limit = [").unwrap();

    let output = clipmenu_bin(&home)
        .args(["config", "list"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
}

#[test]
fn use_without_daemon() {
    let home = TempDir::new().unwrap();
    let output = clipmenu_bin(&home)
        .args(["use", "12"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No daemon running"), "got: {}", stderr);
}

#[test]
fn invalid_entry_id() {
    let home = TempDir::new().unwrap();
    let output = clipmenu_bin(&home)
        .args(["delete", "twelve"])
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn unknown_paste_tool_is_usage_error() {
    let home = TempDir::new().unwrap();
    let output = clipmenu_bin(&home)
        .args(["--daemon", "--paste-tool", "telepathy", "--data-dir"])
        .arg(home.path().join("data"))
        .output()
        .expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("telepathy"), "got: {}", stderr);
}
