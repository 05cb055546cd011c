//! Integration tests for the `schoolmap` CLI binary.
//!
//! Argument parsing, help, completions and config handling run without a
//! server; the data commands run against a wiremock stand-in for the
//! school map API and the OSRM service.
#![allow(clippy::unwrap_used)]

use std::process::Output;

use assert_cmd::assert::OutputAssertExt;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{Value, json};
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `schoolmap` binary with env isolation.
///
/// Clears the `SCHOOLMAP_*` variables the CLI and config loader read and
/// points config directories at a nonexistent path.
fn schoolmap_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("schoolmap");
    cmd.env("HOME", "/tmp/schoolmap-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/schoolmap-cli-test-nonexistent")
        .env_remove("SCHOOLMAP_CONFIG")
        .env_remove("SCHOOLMAP_API_URL")
        .env_remove("SCHOOLMAP_DIRECTIONS_URL")
        .env_remove("SCHOOLMAP_DIRECTIONS_PROFILE")
        .env_remove("SCHOOLMAP_OUTPUT")
        .env_remove("SCHOOLMAP_TIMEOUT_SECS")
        .env_remove("SCHOOLMAP_USER_ID")
        .env_remove("RUST_LOG");
    cmd
}

/// A command aimed at `server` for both the API and directions.
fn against(server: &MockServer) -> assert_cmd::Command {
    let mut cmd = schoolmap_cmd();
    cmd.args([
        "--api-url",
        &format!("{}/api", server.uri()),
        "--directions-url",
        &server.uri(),
        "--timeout",
        "5",
    ]);
    cmd
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run(mut cmd: assert_cmd::Command) -> Output {
    tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap()
}

fn combined_output(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

fn schools_body() -> Value {
    json!([
        { "uuid": "s1", "nama": "SD Negeri 1", "bentuk_pendidikan": "SD",
          "lat": 3.5911, "lng": 98.6601, "kelurahan_id": 1 },
        { "uuid": "s2", "nama": "SMP Negeri 2", "bentuk_pendidikan": "SMP",
          "lat": 3.5802, "lng": 98.6712, "kelurahan_id": 1 },
        { "uuid": "s3", "nama": "SD Swasta 3", "bentuk_pendidikan": "SD",
          "lat": 3.6010, "lng": 98.6850, "kelurahan_id": 2 }
    ])
}

async fn mount_schools(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/schools"))
        .respond_with(ResponseTemplate::new(200).set_body_json(schools_body()))
        .mount(server)
        .await;
}

async fn mount_route(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/route/v1/driving/.+"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": "Ok",
            "routes": [{
                "distance": 2450.3,
                "duration": 312.0,
                "legs": [{
                    "distance": 2450.3,
                    "duration": 312.0,
                    "steps": [
                        { "distance": 2450.3, "duration": 312.0, "name": "Jalan Gatot Subroto",
                          "maneuver": { "type": "depart" } },
                        { "distance": 0.0, "duration": 0.0, "name": "",
                          "maneuver": { "type": "arrive" } }
                    ]
                }]
            }]
        })))
        .mount(server)
        .await;
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = schoolmap_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    schoolmap_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("school map")
            .and(predicate::str::contains("schools"))
            .and(predicate::str::contains("regions"))
            .and(predicate::str::contains("route")),
    );
}

#[test]
fn test_version_flag() {
    schoolmap_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("schoolmap"));
}

#[test]
fn test_invalid_subcommand() {
    schoolmap_cmd()
        .arg("teleport")
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_route_rejects_from_with_at() {
    schoolmap_cmd()
        .args(["route", "s3", "--from", "s1", "--at", "3.59,98.67"])
        .assert()
        .failure()
        .code(2);
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions() {
    for shell in ["bash", "zsh", "fish"] {
        schoolmap_cmd()
            .args(["completions", shell])
            .assert()
            .success()
            .stdout(predicate::str::contains("schoolmap"));
    }
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_path_honours_flag() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("custom.toml");
    schoolmap_cmd()
        .args(["config", "path", "--config"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("custom.toml"));
}

#[test]
fn test_config_init_refuses_to_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("nested").join("config.toml");

    schoolmap_cmd()
        .args(["config", "init", "--config"])
        .arg(&file)
        .assert()
        .success();
    let written = std::fs::read_to_string(&file).unwrap();
    assert!(written.contains("api_url"), "unexpected config:\n{written}");

    schoolmap_cmd()
        .args(["config", "init", "--config"])
        .arg(&file)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--force"));

    schoolmap_cmd()
        .args(["config", "init", "--force", "--config"])
        .arg(&file)
        .assert()
        .success();
}

#[test]
fn test_config_show_applies_env_and_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("config.toml");
    std::fs::write(&file, "directions_profile = \"foot\"\n").unwrap();

    let output = schoolmap_cmd()
        .env("SCHOOLMAP_API_URL", "https://peta.example.org/api")
        .args(["config", "show", "-o", "json", "--config"])
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let shown: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(shown["api_url"], "https://peta.example.org/api");
    assert_eq!(shown["directions_profile"], "foot");
    assert_eq!(shown["timeout_secs"], 30);
}

#[test]
fn test_config_show_rejects_bad_url() {
    schoolmap_cmd()
        .args(["config", "show", "--api-url", "ftp://peta.example.org"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("api_url"));
}

// ── Schools ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_schools_list_applies_filters() {
    let server = MockServer::start().await;
    mount_schools(&server).await;

    let mut cmd = against(&server);
    cmd.args(["schools", "list", "-o", "plain"]);
    run(cmd).await.assert().success().stdout("s1\ns2\ns3\n");

    let mut cmd = against(&server);
    cmd.args(["schools", "list", "--level", "SD", "-o", "plain"]);
    run(cmd).await.assert().success().stdout("s1\ns3\n");

    let mut cmd = against(&server);
    cmd.args(["schools", "list", "--region", "1", "--level", "smp", "-o", "plain"]);
    run(cmd).await.assert().success().stdout("s2\n");
}

#[tokio::test]
async fn test_schools_list_json_carries_marker() {
    let server = MockServer::start().await;
    mount_schools(&server).await;

    let mut cmd = against(&server);
    cmd.args(["schools", "list", "--limit", "1", "-o", "json"]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let markers: Value = serde_json::from_slice(&output.stdout).unwrap();
    let markers = markers.as_array().unwrap();
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0]["school"]["id"], "s1");
    assert_eq!(markers[0]["variant"]["kind"], "category");
    assert_eq!(markers[0]["variant"]["level"], "SD");
}

#[tokio::test]
async fn test_schools_search_matches_name_within_filters() {
    let server = MockServer::start().await;
    mount_schools(&server).await;

    let mut cmd = against(&server);
    cmd.args(["schools", "search", "negeri", "-o", "plain"]);
    run(cmd).await.assert().success().stdout("s1\ns2\n");

    let mut cmd = against(&server);
    cmd.args(["schools", "search", "NEGERI", "--level", "SMP", "-o", "plain"]);
    run(cmd).await.assert().success().stdout("s2\n");

    let mut cmd = against(&server);
    cmd.args(["schools", "search", "nowhere", "-o", "plain"]);
    run(cmd).await.assert().success().stdout("");

    let mut cmd = against(&server);
    cmd.args(["schools", "search", " "]);
    run(cmd).await.assert().failure().code(2);
}

#[tokio::test]
async fn test_schools_get_unknown_is_not_found() {
    let server = MockServer::start().await;
    mount_schools(&server).await;

    let mut cmd = against(&server);
    cmd.args(["schools", "get", "s9"]);
    run(cmd)
        .await
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("schools list"));
}

#[tokio::test]
async fn test_upstream_failure_is_connection_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/schools"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "db down" })))
        .mount(&server)
        .await;

    let mut cmd = against(&server);
    cmd.args(["schools", "list"]);
    run(cmd)
        .await
        .assert()
        .failure()
        .code(7)
        .stderr(predicate::str::contains("db down"));
}

// ── Regions & stats ─────────────────────────────────────────────────

#[tokio::test]
async fn test_stats_for_one_region() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/regions/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 3, "kelurahan": "Sei Sikambing B", "kecamatan": "Medan Sunggal",
              "total_schools": "9", "sd_count": "6", "smp_count": "2", "sma_count": "1" },
            { "id": 4, "kelurahan": "Babura", "kecamatan": "Medan Baru",
              "total_schools": "2", "sd_count": "2", "smp_count": "0", "sma_count": "0" }
        ])))
        .mount(&server)
        .await;

    let mut cmd = against(&server);
    cmd.args(["stats", "--region", "4"]);
    run(cmd).await.assert().success().stdout(
        predicate::str::contains("Babura").and(predicate::str::contains("Sei Sikambing").not()),
    );

    let mut cmd = against(&server);
    cmd.args(["stats", "--region", "99"]);
    run(cmd).await.assert().failure().code(4);
}

#[tokio::test]
async fn test_regions_get_shows_centre() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/regions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 3,
            "kelurahan": "Sei Sikambing B",
            "kecamatan": "Medan Sunggal",
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[98.63, 3.58], [98.65, 3.58], [98.65, 3.60], [98.63, 3.58]]]
            }
        }])))
        .mount(&server)
        .await;

    let mut cmd = against(&server);
    cmd.args(["regions", "get", "3"]);
    run(cmd).await.assert().success().stdout(
        predicate::str::contains("Sei Sikambing B").and(predicate::str::contains("Centre")),
    );
}

// ── Route ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_route_between_schools() {
    let server = MockServer::start().await;
    mount_schools(&server).await;
    mount_route(&server).await;

    let mut cmd = against(&server);
    cmd.args(["route", "s3", "--from", "s1", "--summary"]);
    run(cmd).await.assert().success().stdout("2.5 km, 5 min\n");
}

#[tokio::test]
async fn test_route_from_explicit_position() {
    let server = MockServer::start().await;
    mount_schools(&server).await;
    mount_route(&server).await;

    let mut cmd = against(&server);
    cmd.args(["route", "s2", "--at", "3.59,98.67", "-o", "json"]);
    let output = run(cmd).await;
    assert!(output.status.success(), "{}", combined_output(&output));

    let itinerary: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(itinerary["summary"], "2.5 km, 5 min");
    assert_eq!(itinerary["steps"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_route_without_position_needs_saved_location() {
    let server = MockServer::start().await;
    mount_schools(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/user-location"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "not found" })))
        .mount(&server)
        .await;

    let mut cmd = against(&server);
    cmd.args(["route", "s3"]);
    run(cmd)
        .await
        .assert()
        .failure()
        .code(5)
        .stderr(predicate::str::contains("--at"));
}

#[tokio::test]
async fn test_route_to_unknown_school() {
    let server = MockServer::start().await;
    mount_schools(&server).await;

    let mut cmd = against(&server);
    cmd.args(["route", "s9", "--from", "s1"]);
    run(cmd).await.assert().failure().code(4);
}
