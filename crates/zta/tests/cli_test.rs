//! Integration tests for the `zta` CLI binary.
//!
//! Argument parsing, help output and completions run without a gateway.
//! Gateway-bound commands run against a wiremock server.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `zta` binary with env isolation.
///
/// Clears all `ZTA_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration.
fn zta_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("zta");
    cmd.env("HOME", "/tmp/zta-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/zta-cli-test-nonexistent")
        .env("NO_COLOR", "1")
        .env_remove("ZTA_PROFILE")
        .env_remove("ZTA_API_URL")
        .env_remove("ZTA_OUTPUT")
        .env_remove("ZTA_TIMEOUT")
        .env_remove("ZTA_DEFAULTS__TIMEOUT")
        .env_remove("ZTA_DEFAULTS__OUTPUT");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn api_root(server: &MockServer) -> String {
    format!("{}/api", server.uri())
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = zta_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    zta_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("ZTA IoT security gateway")
            .and(predicate::str::contains("devices"))
            .and(predicate::str::contains("metrics")),
    );
}

#[test]
fn test_version_flag() {
    zta_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("zta"));
}

#[test]
fn test_invalid_subcommand() {
    let output = zta_cmd().arg("frobnicate").output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("frobnicate"), "Expected echo of bad subcommand:\n{text}");
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    zta_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    zta_cmd()
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("zta"));
}

#[test]
fn test_completions_fish() {
    zta_cmd()
        .args(["completions", "fish"])
        .assert()
        .success()
        .stdout(predicate::str::contains("devices"));
}

// ── Argument validation ─────────────────────────────────────────────

#[test]
fn test_add_rejects_unknown_type() {
    let output = zta_cmd()
        .args(["devices", "add", "t-1", "--type", "toaster"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("toaster"), "Expected bad value in output:\n{text}");
}

#[test]
fn test_remove_without_yes_needs_terminal() {
    let output = zta_cmd()
        .args(["devices", "remove", "t-1"])
        .write_stdin("")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("--yes"), "Expected hint about --yes:\n{text}");
}

#[test]
fn test_watch_rejects_bad_interval() {
    let output = zta_cmd()
        .args(["metrics", "watch", "--interval", "soon"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path() {
    zta_cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_show_defaults_as_json() {
    let output = zta_cmd()
        .args(["config", "show", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));
    let cfg: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(cfg["defaults"]["timeout"], 10);
}

#[test]
fn test_malformed_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join("zta");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), "defaults = [").unwrap();

    let output = zta_cmd()
        .env("XDG_CONFIG_HOME", dir.path())
        .args(["config", "show"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1), "{}", combined_output(&output));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_unknown_profile() {
    let output = zta_cmd()
        .args(["--profile", "staging", "devices", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = combined_output(&output);
    assert!(text.contains("staging"), "Expected profile name:\n{text}");
}

#[test]
fn test_zero_timeout_rejected() {
    let output = zta_cmd()
        .args(["--timeout", "0", "devices", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Gateway round trips ─────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn test_devices_list_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"device_id": "t-1", "device_type": "thermostat", "mode": "secure", "shared_secret": "s3cr3t"},
            {"device_id": "c-1", "device_type": "camera", "mode": "insecure"},
        ])))
        .mount(&server)
        .await;

    let output = zta_cmd()
        .args(["devices", "list", "-o", "json", "--api-url", &api_root(&server)])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("s3cr3t"));
    let devices: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(devices[0]["device_id"], "t-1");
    assert_eq!(devices[1]["device_type"], "camera");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_devices_list_plain() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"device_id": "t-1", "device_type": "thermostat", "mode": "secure"},
            {"device_id": "l-9", "device_type": "lock", "mode": "replay"},
        ])))
        .mount(&server)
        .await;

    zta_cmd()
        .args(["devices", "list", "-o", "plain", "-u", &api_root(&server)])
        .assert()
        .success()
        .stdout("t-1\nl-9\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_devices_list_warns_about_hidden_records() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"device_id": "t-1", "device_type": "thermostat", "mode": "secure"},
            {"device_id": "x-1", "device_type": "toaster", "mode": "secure"},
        ])))
        .mount(&server)
        .await;

    zta_cmd()
        .args(["devices", "list", "-o", "plain", "-u", &api_root(&server)])
        .assert()
        .success()
        .stdout("t-1\n")
        .stderr(predicate::str::contains("1 gateway record(s) hidden"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_metrics_summary_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/metrics/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "latencies": {"insecure": 0.012, "secure": 0.034},
            "requests": {"insecure": 30, "secure": 10},
            "attack_detection_rate": "12.5%",
            "total_logs": 40,
            "throughput_rps": 2.5,
        })))
        .mount(&server)
        .await;

    let output = zta_cmd()
        .args(["metrics", "summary", "-o", "json", "-u", &api_root(&server)])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["total_requests"], 40);
    assert_eq!(report["detection_rate"], 12.5);
    assert_eq!(report["unauthorized_rate"], 87.5);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_remove_unknown_device_exits_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/devices/ghost"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "Device not found"})),
        )
        .mount(&server)
        .await;

    let output = zta_cmd()
        .args(["devices", "remove", "ghost", "--yes", "-u", &api_root(&server)])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4), "{}", combined_output(&output));
    let text = combined_output(&output);
    assert!(text.contains("ghost"), "Expected device id:\n{text}");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_add_duplicate_exits_conflict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/devices"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"detail": "Device ID already exists"})),
        )
        .mount(&server)
        .await;

    let output = zta_cmd()
        .args(["devices", "add", "t-1", "-t", "lock", "-m", "secure", "-u", &api_root(&server)])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(6), "{}", combined_output(&output));
    let text = combined_output(&output);
    assert!(
        text.contains("Device ID already exists"),
        "Expected gateway detail:\n{text}"
    );
}

#[test]
fn test_connection_refused_exits_7() {
    let output = zta_cmd()
        .args(["devices", "list", "-u", "http://127.0.0.1:9/api"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7), "{}", combined_output(&output));
}
