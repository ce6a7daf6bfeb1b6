//! CLI integration tests
//!
//! These run the compiled `appscribe` binary and check output and exit codes.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn appscribe() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_appscribe"));
    for (key, _) in std::env::vars() {
        if key.starts_with("APPSCRIBE_") {
            command.env_remove(key);
        }
    }
    command.env_remove("RUST_LOG");
    command
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn write_catalog(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("applications.json");
    fs::write(
        &path,
        r#"{
  "Safari": {
    "description": "Apple's web browser.",
    "version": "17.5",
    "created": null,
    "modified": null,
    "copyright": "",
    "raw_description": "",
    "bundle_identifier": "com.apple.Safari",
    "path": "/Applications/Safari.app"
  },
  "Slack": {
    "description": "",
    "version": "4.38.125",
    "path": "/Applications/Slack.app"
  }
}
"#,
    )
    .expect("Failed to write catalog");
    path
}

#[test]
fn test_cli_help() {
    let output = appscribe().arg("--help").output().expect("Failed to execute appscribe");

    assert!(output.status.success());
    let stdout = stdout(&output);
    for command in ["build", "show", "describe", "parse", "health"] {
        assert!(stdout.contains(command), "help is missing {}", command);
    }
}

#[test]
fn test_cli_version() {
    let output = appscribe().arg("--version").output().expect("Failed to execute appscribe");

    assert!(output.status.success());
    assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_parse_file() {
    let temp = TempDir::new().unwrap();
    let response = temp.path().join("response.txt");
    fs::write(
        &response,
        "starting session | provider: openai\n```json\n{\"Safari\": \"Browser\", \"Skim\": \"PDF reader\"}\n```\n",
    )
    .unwrap();

    let output = appscribe().arg("parse").arg(&response).output().unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(parsed["Safari"], "Browser");
    assert_eq!(parsed["Skim"], "PDF reader");
}

#[test]
fn test_parse_stdin_with_escape_sequences() {
    let mut child = appscribe()
        .arg("parse")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"\x1b[1m```json\x1b[0m\n{\"Zed\": \"Code editor\"}\n```\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "{\n  \"Zed\": \"Code editor\"\n}");
}

#[test]
fn test_parse_unusable_response_prints_empty_mapping() {
    let temp = TempDir::new().unwrap();
    let response = temp.path().join("response.txt");
    fs::write(&response, "{\"A\": 3}").unwrap();

    let output = appscribe().arg("parse").arg(&response).output().unwrap();
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "{}");
}

#[test]
fn test_parse_missing_file_fails() {
    let output = appscribe()
        .args(["parse", "/nonexistent/response.txt"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_show_json_and_human() {
    let temp = TempDir::new().unwrap();
    let catalog = write_catalog(&temp);

    let output = appscribe()
        .args(["show", "--format", "json", "--catalog"])
        .arg(&catalog)
        .output()
        .unwrap();
    assert!(output.status.success());
    let parsed: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(parsed["Safari"]["version"], "17.5");
    assert_eq!(parsed["Slack"]["bundle_identifier"], "");

    let output = appscribe().args(["show", "-c"]).arg(&catalog).output().unwrap();
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("2 applications, 1 described"));
    assert!(text.contains("Slack (4.38.125)\n  (no description)"));
}

#[test]
fn test_show_missing_catalog_fails() {
    let temp = TempDir::new().unwrap();
    let output = appscribe()
        .args(["show", "--catalog"])
        .arg(temp.path().join("missing.json"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_describe() {
    let temp = TempDir::new().unwrap();
    let catalog = write_catalog(&temp);

    let output = appscribe()
        .args(["describe", "Safari", "--catalog"])
        .arg(&catalog)
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(stdout(&output).contains("Apple's web browser."));

    let output = appscribe()
        .args(["describe", "Safari", "-f", "json", "-c"])
        .arg(&catalog)
        .output()
        .unwrap();
    let entry: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(entry["bundle_identifier"], "com.apple.Safari");
}

#[test]
fn test_describe_unknown_application_exits_1() {
    let temp = TempDir::new().unwrap();
    let catalog = write_catalog(&temp);

    let output = appscribe()
        .args(["describe", "Photoshop", "--catalog"])
        .arg(&catalog)
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Photoshop"));
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_health_missing_tool() {
    let output = appscribe()
        .args(["health", "--tool", "appscribe-no-such-tool", "-f", "json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let status: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(status["available"], false);
}

#[test]
fn test_build_rejects_invalid_batch_size() {
    let temp = TempDir::new().unwrap();
    let output = appscribe()
        .args(["build", "--batch-size", "0", "--applications-dir"])
        .arg(temp.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_build_with_no_applications_fails() {
    let temp = TempDir::new().unwrap();
    let catalog = temp.path().join("applications.json");
    let output = appscribe()
        .args(["build", "--applications-dir"])
        .arg(temp.path())
        .arg("--output")
        .arg(&catalog)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(!catalog.exists());
}

fn make_bundle(root: &Path, name: &str) {
    fs::create_dir_all(root.join(format!("{}.app", name)).join("Contents")).unwrap();
}

#[cfg(unix)]
#[test]
fn test_build_end_to_end_with_shell_tool() {
    let temp = TempDir::new().unwrap();
    let apps = temp.path().join("Applications");
    make_bundle(&apps, "Foo");
    make_bundle(&apps, "Bar");
    fs::write(
        apps.join("Foo.app/Contents/Info.plist"),
        r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0">
<dict>
    <key>CFBundleShortVersionString</key>
    <string>2.1</string>
</dict>
</plist>"#,
    )
    .unwrap();
    let catalog = temp.path().join("out/applications.json");

    // `sh -c <script> <prompt>`: the prompt lands in $0 and is ignored
    let output = appscribe()
        .args(["-q", "build", "--tool", "sh", "--tool-arg=-c"])
        .arg("--tool-arg=printf 'Sure!\\n```json\\n{\"Foo\": \"Does foo things.\"}\\n```\\n'")
        .arg("--applications-dir")
        .arg(&apps)
        .arg("--output")
        .arg(&catalog)
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&catalog).unwrap()).unwrap();
    assert_eq!(saved["Foo"]["description"], "Does foo things.");
    assert_eq!(saved["Foo"]["version"], "2.1");
    assert_eq!(saved["Bar"]["description"], "");
}
