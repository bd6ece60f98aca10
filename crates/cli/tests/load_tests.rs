//! Integration tests for the `load` command.

mod common;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use common::{app_config_cmd, app_config_cmd_with_server};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const DEV_ENV: &str = "\
META_DATABASE__POSTGRES_USER=airflowddddd
AIRFLOW_CORE__AIRFLOW_UID=0
FEATURE_FLAGS__CIRCUIT_BREAKER_DURATION=-3
";

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
}

#[test]
fn test_load_help_lists_sources() {
    app_config_cmd()
        .args(["load", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("file")
                .and(predicate::str::contains("secret"))
                .and(predicate::str::contains("blob")),
        );
}

#[test]
fn test_load_env_file_prints_nested_json() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(".env.dev");
    fs::write(&path, DEV_ENV).unwrap();

    let output = app_config_cmd()
        .args(["load", "file"])
        .arg(&path)
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        stdout_json(&output),
        serde_json::json!({
            "meta_database": {"postgres_user": "airflowddddd"},
            "airflow_core": {"airflow_uid": 0},
            "feature_flags": {"circuit_breaker_duration": -3},
        })
    );
}

#[test]
fn test_load_yaml_output() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.local.json");
    fs::write(
        &path,
        r#"{"meta_database": {"postgres_user": "KENAN"}, "airflow_core": {"load_examples": true}}"#,
    )
    .unwrap();

    app_config_cmd()
        .args(["--output", "yaml", "load", "file"])
        .arg(&path)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("postgres_user: KENAN")
                .and(predicate::str::contains("load_examples: true")),
        );
}

#[test]
fn test_load_writes_output_file() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("config.yaml");
    let output = temp_dir.path().join("out").join("config.json");
    fs::write(&input, "feature_flags:\n  circuit_breaker_enabled: true\n").unwrap();

    app_config_cmd()
        .args(["load", "file"])
        .arg(&input)
        .arg("--output-file")
        .arg(&output)
        .arg("--pretty")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written["feature_flags"]["circuit_breaker_enabled"], true);
}

#[test]
fn test_load_secret_from_mock_server() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock(
            "GET",
            "/projects/demo-project/secrets/app-config-env-dev/versions/latest:access",
        )
        .match_header("authorization", "Bearer test-token")
        .with_status(200)
        .with_body(
            serde_json::json!({"payload": {"data": BASE64_STANDARD.encode(DEV_ENV)}}).to_string(),
        )
        .create();

    let output = app_config_cmd_with_server(&server.url())
        .args([
            "load",
            "secret",
            "--project-id",
            "demo-project",
            "--secret-name",
            "app-config-env-dev",
            "--format",
            "env",
        ])
        .output()
        .unwrap();

    mock.assert();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(stdout_json(&output)["airflow_core"]["airflow_uid"], 0);
}

#[test]
fn test_logs_stay_off_stdout() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(&path, r#"{"a": {"b": 1}}"#).unwrap();

    let output = app_config_cmd()
        .env("RUST_LOG", "debug")
        .args(["load", "file"])
        .arg(&path)
        .output()
        .unwrap();

    assert!(output.status.success());
    assert_eq!(stdout_json(&output), serde_json::json!({"a": {"b": 1}}));
    assert!(!output.stderr.is_empty());
}
