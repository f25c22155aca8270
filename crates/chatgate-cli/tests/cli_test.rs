//! Integration tests for the `chatgate` binary.
//!
//! Each test points `XDG_CONFIG_HOME` at its own temporary directory so the
//! user's real config is never read or written.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn chatgate(config_home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_chatgate"))
        .args(args)
        .env("XDG_CONFIG_HOME", config_home)
        .env_remove("OPENAI_API_KEY")
        .env_remove("LANGGRAPH_DEPLOYMENT_URL")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run chatgate binary")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn help_lists_subcommands() {
    let tmp = TempDir::new().unwrap();
    let output = chatgate(tmp.path(), &["--help"]);
    assert!(output.status.success());
    let text = stdout(&output);
    for cmd in ["init", "serve", "chat"] {
        assert!(text.contains(cmd), "help should mention {cmd}: {text}");
    }
}

#[test]
fn init_writes_config_file() {
    let tmp = TempDir::new().unwrap();
    let output = chatgate(
        tmp.path(),
        &[
            "init",
            "--deployment-url",
            "http://agents.internal:2024",
            "--profile",
            "default",
        ],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let path = tmp.path().join("chatgate").join("config.toml");
    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("deployment_url = \"http://agents.internal:2024\""));
    assert!(contents.contains("profile = \"default\""));
    assert!(stdout(&output).contains("Config written to"));
}

#[test]
fn init_refuses_to_overwrite_without_force() {
    let tmp = TempDir::new().unwrap();
    assert!(chatgate(tmp.path(), &["init"]).status.success());

    let again = chatgate(tmp.path(), &["init"]);
    assert!(!again.status.success());
    assert!(stderr(&again).contains("already exists"));

    let forced = chatgate(tmp.path(), &["init", "--force"]);
    assert!(forced.status.success(), "stderr: {}", stderr(&forced));
}

#[test]
fn init_stores_api_key_without_echoing_it() {
    let tmp = TempDir::new().unwrap();
    let output = chatgate(tmp.path(), &["init", "--api-key", "sk-from-init"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(!stdout(&output).contains("sk-from-init"));

    let contents =
        std::fs::read_to_string(tmp.path().join("chatgate").join("config.toml")).unwrap();
    assert!(contents.contains("api_key = \"sk-from-init\""));
}

#[test]
fn serve_without_credential_fails_before_listening() {
    let tmp = TempDir::new().unwrap();
    let output = chatgate(tmp.path(), &["serve", "--port", "0"]);
    assert!(!output.status.success());
    assert!(
        stderr(&output).contains("OPENAI_API_KEY"),
        "stderr: {}",
        stderr(&output)
    );
}

#[test]
fn unknown_mode_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let output = chatgate(tmp.path(), &["chat", "--mode", "fullscreen"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("fullscreen"));
}

#[test]
fn unknown_profile_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let output = chatgate(tmp.path(), &["serve", "--profile", "sometimes"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("sometimes"));
}
