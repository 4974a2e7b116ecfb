#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use std::path::Path;

use assert_cmd::cargo_bin_cmd;
use predicates::prelude::{PredicateBooleanExt, predicate};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const VESSEL_LOCATIONS: &str = concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../../fixtures/wsf/vessel_locations.json"
);

fn write_config(dir: &Path, body: &str) {
    std::fs::write(dir.join("config.toml"), body).unwrap();
}

#[test]
fn test_endpoints_filtered_by_family() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("wsdot");
    cmd.args(["endpoints", "--api", "wsf"])
        .assert()
        .success()
        .stdout(predicate::str::contains("getVesselLocations"))
        .stdout(predicate::str::contains("realtime"))
        .stdout(predicate::str::contains("getHighwayAlerts").not());
}

#[test]
fn test_endpoints_unknown_family() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("wsdot");
    cmd.args(["endpoints", "--api", "amtrak"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("amtrak"));
}

#[test]
fn test_normalize_fixture() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("wsdot");
    cmd.args(["normalize", VESSEL_LOCATIONS, "--endpoint", "getVesselLocations"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"VesselName\": \"Chelan\""))
        .stdout(predicate::str::contains("VesselWatch").not())
        .stdout(predicate::str::contains("/Date(").not());
}

#[test]
fn test_normalize_malformed_json() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("broken.json");
    std::fs::write(&file, "{\"VesselID\": ").unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("wsdot");
    cmd.arg("normalize")
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to normalize"))
        .stderr(predicate::str::contains("line 1"));
}

#[test]
fn test_openapi_to_stdout() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("wsdot");
    cmd.args(["openapi", "--api", "wsdot"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("openapi:"))
        .stdout(predicate::str::contains("operationId: getHighwayAlerts"))
        .stdout(predicate::str::contains("name: AccessCode"));
}

#[test]
fn test_openapi_to_file() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("wsf.yaml");

    // Act
    let mut cmd = cargo_bin_cmd!("wsdot");
    cmd.args(["openapi", "--api", "wsf", "--output"])
        .arg(&output)
        .assert()
        .success();

    // Assert
    let yaml = std::fs::read_to_string(&output).unwrap();
    assert!(yaml.contains("operationId: getScheduleToday"));
}

#[test]
fn test_config_set_key_then_show() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act
    let mut set = cargo_bin_cmd!("wsdot");
    set.arg("--dir")
        .arg(dir.path())
        .args(["config", "set-key", "abcd-1234-efgh"])
        .assert()
        .success();

    // Assert
    let saved = std::fs::read_to_string(dir.path().join("config.toml")).unwrap();
    assert!(saved.contains("access_code = \"abcd-1234-efgh\""));

    let mut show = cargo_bin_cmd!("wsdot");
    show.arg("--dir")
        .arg(dir.path())
        .args(["config", "show"])
        .env_remove("WSDOT_ACCESS_CODE")
        .assert()
        .success()
        .stdout(predicate::str::contains("access_code: abcd*** (config file)"))
        .stdout(predicate::str::contains("abcd-1234").not())
        .stdout(predicate::str::contains("strategy: native"));
}

#[test]
fn test_fetch_without_access_code() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("wsdot");
    cmd.arg("--dir")
        .arg(dir.path())
        .args(["fetch", "getVesselLocations"])
        .env_remove("WSDOT_ACCESS_CODE")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no access code configured"))
        .stderr(predicate::str::contains("WSDOT_ACCESS_CODE"));
}

#[test]
fn test_fetch_unknown_endpoint() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("wsdot");
    cmd.args(["fetch", "getNothing"])
        .env("WSDOT_ACCESS_CODE", "test-code")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown endpoint: getNothing"));
}

#[test]
fn test_fetch_invalid_param() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("wsdot");
    cmd.args(["fetch", "getScheduleToday", "--param", "RouteID=nine", "--sample"])
        .env("WSDOT_ACCESS_CODE", "test-code")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid parameters for getScheduleToday"))
        .stderr(predicate::str::contains("RouteID"));
}

#[test]
fn test_watch_static_endpoint_is_rejected() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("wsdot");
    cmd.args(["watch", "getVesselBasics", "--count", "1"])
        .env("WSDOT_ACCESS_CODE", "test-code")
        .assert()
        .failure()
        .stderr(predicate::str::contains("never refetched"));
}

#[tokio::test]
async fn test_fetch_against_mock_server() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ferries/api/vessels/rest/vessellocations"))
        .and(query_param("apiaccesscode", "test-code"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(include_str!(
                "../../../fixtures/wsf/vessel_locations.json"
            )),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    write_config(
        dir.path(),
        &format!("[api]\nwsf_base_url = \"{}/ferries/api/\"\n", server.uri()),
    );
    let dir_path = dir.path().to_path_buf();

    // Act
    let assert = tokio::task::spawn_blocking(move || {
        let mut cmd = cargo_bin_cmd!("wsdot");
        cmd.arg("--dir")
            .arg(&dir_path)
            .args(["fetch", "getVesselLocations"])
            .env("WSDOT_ACCESS_CODE", "test-code")
            .assert()
    })
    .await
    .unwrap();

    // Assert
    let output = assert.success().get_output().stdout.clone();
    let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let vessels = value.as_array().unwrap();
    assert_eq!(vessels.len(), 2);
    assert!(
        vessels
            .iter()
            .all(|v| v.get("VesselWatchShutID").is_none())
    );
}
