//! End-to-end CLI tests for the jobscraper binary.

#![allow(deprecated)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod support;
use support::fixtures::{numbered_page, search_site};
use support::socket_guard::{socket_skip_return, start_mock_server_or_skip};

const SEARCH_PATH: &str = "/jobs/Rust-Developer/in-London";

/// Writes a site profile for `base` and a zero-pause config into `dir`.
fn write_run_files(dir: &Path, base: &str) -> (PathBuf, PathBuf) {
    let site_path = dir.join("site.json");
    std::fs::write(
        &site_path,
        serde_json::to_string_pretty(&search_site(base)).unwrap(),
    )
    .unwrap();

    let config_path = dir.join("config.json");
    std::fs::write(
        &config_path,
        r#"{
  "max_attempts": 2,
  "timeout_secs": 5,
  "backoff_min_ms": 0,
  "backoff_max_ms": 0,
  "settle_min_ms": 0,
  "settle_max_ms": 0
}"#,
    )
    .unwrap();
    (site_path, config_path)
}

fn scrape_cmd(dir: &TempDir, site: &Path, config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("jobscraper").unwrap();
    cmd.env("XDG_CONFIG_HOME", dir.path().join("xdg-config"))
        .env_remove("RUST_LOG")
        .arg("--site-file")
        .arg(site)
        .arg("--config")
        .arg(config)
        .args(["--role", "Rust Developer", "--area", "London"]);
    cmd
}

async fn mount_page(server: &MockServer, page: u32, status: u16, body: String) {
    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .mount(server)
        .await;
}

/// Test that --help displays usage information and exits with code 0.
#[test]
fn test_binary_help_displays_usage() {
    let mut cmd = Command::cargo_bin("jobscraper").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Collect job listings"))
        .stdout(predicate::str::contains("--pages"));
}

/// Test that --version displays version and exits with code 0.
#[test]
fn test_binary_version_displays_version() {
    let mut cmd = Command::cargo_bin("jobscraper").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("jobscraper"));
}

/// Test that invalid flags cause non-zero exit.
#[test]
fn test_binary_invalid_flag_returns_error() {
    let mut cmd = Command::cargo_bin("jobscraper").unwrap();
    cmd.arg("--invalid-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_binary_rejects_too_many_pages() {
    let mut cmd = Command::cargo_bin("jobscraper").unwrap();
    cmd.args(["--pages", "51"]).assert().failure();
}

#[test]
fn test_binary_unknown_site_exits_one() {
    let tempdir = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("jobscraper").unwrap();
    cmd.env("XDG_CONFIG_HOME", tempdir.path())
        .args(["--site", "monster", "--role", "x", "--area", "y"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unknown site 'monster'"));
}

#[test]
fn test_binary_missing_role_exits_one() {
    let tempdir = TempDir::new().unwrap();
    let mut cmd = Command::cargo_bin("jobscraper").unwrap();
    cmd.env("XDG_CONFIG_HOME", tempdir.path())
        .args(["--site", "cwjobs", "--area", "London"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("needs a role"));
}

#[test]
fn test_binary_invalid_config_exits_one() {
    let tempdir = TempDir::new().unwrap();
    let config_path = tempdir.path().join("config.json");
    std::fs::write(&config_path, r#"{ "max_attempts": 0 }"#).unwrap();

    let mut cmd = Command::cargo_bin("jobscraper").unwrap();
    cmd.arg("--config")
        .arg(&config_path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("max_attempts"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_binary_prints_numbered_lines() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return socket_skip_return();
    };
    mount_page(&mock_server, 1, 200, numbered_page("Rust Dev", 2)).await;
    mount_page(&mock_server, 2, 200, numbered_page("Go Dev", 1)).await;

    let tempdir = TempDir::new().unwrap();
    let (site, config) = write_run_files(tempdir.path(), &mock_server.uri());
    let base = mock_server.uri();

    scrape_cmd(&tempdir, &site, &config)
        .args(["--pages", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "1. Rust Dev 1 | Acme Ltd | London | {base}/job/rust-dev-1"
        )))
        .stdout(predicate::str::contains("3. Go Dev 1 | Acme Ltd | London"))
        .stderr(predicate::str::contains("2 pages succeeded"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_binary_partial_failure_still_succeeds() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return socket_skip_return();
    };
    mount_page(&mock_server, 1, 500, String::new()).await;
    mount_page(&mock_server, 2, 200, numbered_page("Survivor", 1)).await;

    let tempdir = TempDir::new().unwrap();
    let (site, config) = write_run_files(tempdir.path(), &mock_server.uri());

    scrape_cmd(&tempdir, &site, &config)
        .args(["--pages", "2", "--format", "table"])
        .env("COLUMNS", "200")
        .assert()
        .success()
        .stdout(predicate::str::contains("Job Title"))
        .stdout(predicate::str::contains("Survivor 1"))
        .stdout(predicate::str::contains("Jobs: 1"))
        .stderr(predicate::str::contains("Page skipped"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_binary_all_pages_failed_exits_two() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return socket_skip_return();
    };
    mount_page(&mock_server, 1, 503, String::new()).await;

    let tempdir = TempDir::new().unwrap();
    let (site, config) = write_run_files(tempdir.path(), &mock_server.uri());

    scrape_cmd(&tempdir, &site, &config)
        .args(["--pages", "1"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_binary_json_output_and_show() {
    let Some(mock_server) = start_mock_server_or_skip().await else {
        return socket_skip_return();
    };
    mount_page(&mock_server, 1, 200, numbered_page("Data Engineer", 2)).await;

    let tempdir = TempDir::new().unwrap();
    let (site, config) = write_run_files(tempdir.path(), &mock_server.uri());

    let output = scrape_cmd(&tempdir, &site, &config)
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let records: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1]["title"], "Data Engineer 2");
    assert_eq!(records[1]["salary"], "N/A");

    scrape_cmd(&tempdir, &site, &config)
        .args(["--show", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#2 Data Engineer 2"))
        .stdout(predicate::str::contains("company:"));
}
