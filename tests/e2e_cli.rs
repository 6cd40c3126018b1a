//! CLI end-to-end tests for the clipresolve binary.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[allow(deprecated)]
fn clipresolve_cmd() -> Command {
    let mut cmd = Command::cargo_bin("clipresolve").unwrap();
    cmd.env_remove("CLIPRESOLVE_API_KEY")
        .env_remove("CLIPRESOLVE_DOUYIN_COOKIES")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn no_args_shows_help() {
    clipresolve_cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn version_command() {
    clipresolve_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("clipresolve "));
}

#[test]
fn generate_api_key_prints_one_key() {
    let output = clipresolve_cmd().arg("generate-api-key").output().unwrap();
    assert!(output.status.success());
    let key = String::from_utf8(output.stdout).unwrap();
    assert_eq!(key.trim().len(), 43);
}

#[test]
fn validate_defaults_warns_about_missing_secrets() {
    clipresolve_cmd()
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Server: 0.0.0.0:8000"))
        .stdout(predicate::str::contains("API key: missing"))
        .stdout(predicate::str::contains("CLIPRESOLVE_DOUYIN_COOKIES"));
}

#[test]
fn validate_config_file_with_env_key() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("clipresolve.json");
    fs::write(
        &path,
        r#"{
            "server": { "port": 9000 },
            "platforms": [{ "domain": "douyin.com", "cookies": "sid=1" }],
            "cache": { "enabled": false }
        }"#,
    )
    .unwrap();

    clipresolve_cmd()
        .env("CLIPRESOLVE_API_KEY", "from-env")
        .arg("validate")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Server: 0.0.0.0:9000"))
        .stdout(predicate::str::contains("API key: set"))
        .stdout(predicate::str::contains("Cache: disabled"))
        .stdout(predicate::str::contains("No warnings"));
}

#[test]
fn validate_rejects_malformed_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").unwrap();

    clipresolve_cmd()
        .arg("validate")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("config parse error"));
}

#[test]
fn extract_rejects_bad_proxy() {
    clipresolve_cmd()
        .args(["extract", "https://example.com/v", "--proxy", "ftp://h:21"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported proxy scheme"));
}

#[test]
fn serve_refuses_without_api_key() {
    clipresolve_cmd()
        .args(["serve", "--port", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no API key configured"));
}

#[test]
fn check_tools_runs() {
    clipresolve_cmd()
        .arg("check-tools")
        .assert()
        .success()
        .stdout(predicate::str::contains("yt-dlp"));
}

/// Write an executable stand-in for yt-dlp that answers `--version` and
/// otherwise runs `body`.
#[cfg(unix)]
fn fake_ytdlp(dir: &std::path::Path, body: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = dir.join("yt-dlp");
    fs::write(
        &script,
        format!("#!/bin/sh\nif [ \"$1\" = \"--version\" ]; then echo 2024.01.01; exit 0; fi\n{body}\n"),
    )
    .unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();

    let config = dir.join("clipresolve.json");
    fs::write(
        &config,
        serde_json::json!({
            "extractor": { "binary": script },
            "platforms": [],
            "cache": { "enabled": false }
        })
        .to_string(),
    )
    .unwrap();
    config
}

#[cfg(unix)]
#[test]
fn extract_failure_body_exits_nonzero() {
    let dir = tempdir().unwrap();
    let config = fake_ytdlp(dir.path(), "echo 'ERROR: Private video' >&2\nexit 1");

    clipresolve_cmd()
        .arg("--config")
        .arg(&config)
        .args(["extract", "https://example.com/v/1"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"success\": false"))
        .stdout(predicate::str::contains(
            "Video not found or access denied (DownloadError).",
        ));
}

#[cfg(unix)]
#[test]
fn extract_success_prints_video_url() {
    let dir = tempdir().unwrap();
    let config = fake_ytdlp(
        dir.path(),
        r#"echo '{"title":"clip","url":"https://cdn.example/v.mp4"}'"#,
    );

    clipresolve_cmd()
        .arg("--config")
        .arg(&config)
        .args(["extract", "https://example.com/v/1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"videoUrl\": \"https://cdn.example/v.mp4\""));
}

#[cfg(unix)]
#[test]
fn check_tools_reports_version() {
    let dir = tempdir().unwrap();
    let config = fake_ytdlp(dir.path(), "exit 0");

    clipresolve_cmd()
        .arg("--config")
        .arg(&config)
        .arg("check-tools")
        .assert()
        .success()
        .stdout(predicate::str::contains("yt-dlp (2024.01.01)"));
}
