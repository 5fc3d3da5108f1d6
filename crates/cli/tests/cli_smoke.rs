//! CLI smoke tests for buildinfo.
//!
//! These tests run the binary against a graph snapshot and configuration
//! written to a temp directory and check the emitted record.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a Command for the buildinfo binary.
fn buildinfo_cmd() -> Command {
  cargo_bin_cmd!("buildinfo")
}

/// Root project `com.x:app:1.0` with `lib-1.0.jar` in compile and runtime
/// and its sources jar in test.
const GRAPH: &str = r#"{
  "tool": { "name": "Gradle", "version": "8.5" },
  "buildType": "GRADLE",
  "root": {
    "path": ":",
    "name": "app",
    "group": "com.x",
    "version": "1.0",
    "recordsBuildInfo": true,
    "configurations": [
      { "name": "compile",
        "artifacts": [{ "file": "libs/lib-1.0.jar", "type": "jar", "dependencyId": "com.x:lib:1.0" }] },
      { "name": "runtime",
        "artifacts": [{ "file": "libs/lib-1.0.jar", "type": "jar", "dependencyId": "com.x:lib:1.0" }] },
      { "name": "test",
        "artifacts": [{ "file": "libs/lib-1.0-sources.jar", "type": "jar", "dependencyId": "com.x:lib:1.0" }] },
      { "name": "broken", "resolutionError": "could not reach repository" }
    ]
  },
  "deployDetails": [
    { "project": ":",
      "artifactPath": "com/x/app/1.0/app-1.0.jar",
      "md5": "0123", "sha1": "4567",
      "publish": { "name": "app", "type": "jar" } }
  ]
}"#;

const CONFIG: &str = r#"
[buildInfo]
buildName = "smoke"
buildNumber = "7"
buildStarted = "2024-03-01T10:15:30.000+0000"
principal = "ci-bot"

[artifactory.publish]
username = "deployer"
repoKey = "libs-staging-local"
"#;

/// Create a temp directory with a graph snapshot, its jars and a config file.
fn temp_workspace(config: &str) -> TempDir {
  let temp = TempDir::new().unwrap();
  let libs = temp.path().join("libs");
  std::fs::create_dir_all(&libs).unwrap();
  std::fs::write(libs.join("lib-1.0.jar"), "lib").unwrap();
  std::fs::write(libs.join("lib-1.0-sources.jar"), "sources").unwrap();
  std::fs::write(temp.path().join("graph.json"), GRAPH).unwrap();
  std::fs::write(temp.path().join("buildinfo.toml"), config).unwrap();
  temp
}

fn extract(temp: &TempDir) -> Command {
  let mut cmd = buildinfo_cmd();
  cmd
    .arg("extract")
    .arg("--graph")
    .arg(temp.path().join("graph.json"))
    .arg("--config")
    .arg(temp.path().join("buildinfo.toml"));
  cmd
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
  let output = cmd.assert().success().get_output().stdout.clone();
  serde_json::from_slice(&output).unwrap()
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_works() {
  buildinfo_cmd()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("Usage"));
}

#[test]
fn version_flag_works() {
  buildinfo_cmd()
    .arg("--version")
    .assert()
    .success()
    .stdout(predicate::str::contains("buildinfo"));
}

#[test]
fn extract_help_works() {
  buildinfo_cmd()
    .arg("extract")
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("--graph"));
}

// =============================================================================
// extract
// =============================================================================

#[test]
fn extract_prints_record_to_stdout() {
  let temp = temp_workspace(CONFIG);

  let json = stdout_json(&mut extract(&temp));

  assert_eq!(json["name"], "smoke");
  assert_eq!(json["number"], "7");
  assert_eq!(json["type"], "GRADLE");
  assert_eq!(json["principal"], "ci-bot");
  assert_eq!(json["artifactoryPrincipal"], "deployer");

  let module = &json["modules"][0];
  assert_eq!(module["id"], "com.x:app:1.0");
  assert_eq!(module["artifacts"][0]["name"], "app-1.0.jar");

  let deps = module["dependencies"].as_array().unwrap();
  assert_eq!(deps.len(), 1);
  assert_eq!(deps[0]["id"], "com.x:lib:1.0");
  assert_eq!(deps[0]["scopes"], serde_json::json!(["compile", "runtime"]));
}

#[test]
fn extract_writes_output_file() {
  let temp = temp_workspace(CONFIG);
  let out = temp.path().join("build-info.json");

  extract(&temp)
    .arg("--output")
    .arg(&out)
    .assert()
    .success()
    .stdout(predicate::str::contains("Build info written"))
    .stdout(predicate::str::contains("smoke #7"));

  let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
  assert_eq!(json["name"], "smoke");
}

#[test]
fn extract_json_summary() {
  let temp = temp_workspace(CONFIG);
  let out = temp.path().join("build-info.json");

  let json = stdout_json(extract(&temp).arg("--output").arg(&out).arg("--format").arg("json"));

  assert_eq!(json["modules"], 1);
  assert_eq!(json["artifacts"], 1);
  assert_eq!(json["dependencies"], 1);
}

#[test]
fn overrides_win_over_config_file() {
  let temp = temp_workspace(CONFIG);

  let json = stdout_json(
    extract(&temp)
      .arg("-D")
      .arg("buildInfo.buildNumber=99")
      .arg("-D")
      .arg("buildInfo.releaseEnabled=true"),
  );

  assert_eq!(json["number"], "99");
  let statuses = json["statuses"].as_array().unwrap();
  assert_eq!(statuses.len(), 1);
  assert_eq!(statuses[0]["status"], "staged");
  assert_eq!(statuses[0]["repository"], "libs-staging-local");
  assert_eq!(statuses[0]["comment"], "");
}

#[test]
fn default_config_file_is_picked_up() {
  let temp = temp_workspace(CONFIG);

  let json = stdout_json(
    buildinfo_cmd()
      .current_dir(temp.path())
      .arg("extract")
      .arg("--graph")
      .arg("graph.json"),
  );

  assert_eq!(json["name"], "smoke");
}

#[test]
fn include_env_records_variables() {
  let temp = temp_workspace(CONFIG);

  let json = stdout_json(extract(&temp).arg("--include-env").env("BUILDINFO_SMOKE", "42"));

  assert_eq!(json["properties"]["buildInfo.env.BUILDINFO_SMOKE"], "42");
}

#[test]
fn missing_start_time_fails() {
  let temp = temp_workspace("[buildInfo]\nbuildName = \"smoke\"\n");

  extract(&temp)
    .assert()
    .failure()
    .stderr(predicate::str::contains("start time"));
}

#[test]
fn malformed_start_time_fails() {
  let temp = temp_workspace(CONFIG);

  extract(&temp)
    .arg("-D")
    .arg("buildInfo.buildStarted=yesterday")
    .assert()
    .failure()
    .stderr(predicate::str::contains("yesterday"));
}

#[test]
fn invalid_boolean_fails() {
  let temp = temp_workspace(CONFIG);

  extract(&temp)
    .arg("-D")
    .arg("buildInfo.releaseEnabled=maybe")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Invalid build-info configuration"));
}

#[test]
fn malformed_override_fails() {
  let temp = temp_workspace(CONFIG);

  extract(&temp)
    .arg("-D")
    .arg("buildInfo.buildNumber")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Invalid override"));
}

#[test]
fn nonexistent_graph_fails() {
  let temp = temp_workspace(CONFIG);

  buildinfo_cmd()
    .arg("extract")
    .arg("--graph")
    .arg("/nonexistent/path/graph.json")
    .arg("--config")
    .arg(temp.path().join("buildinfo.toml"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to load graph snapshot"));
}
