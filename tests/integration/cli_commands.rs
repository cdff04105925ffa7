//! End-to-end CLI tests against the built binary with an explicit environment.

use super::test_utils::{UnittestConfig, IFMIBD, SNMPD};
use std::process::{Command, Output};

fn run(config_dir: Option<&std::path::Path>, args: &[&str]) -> Output {
    let bin = env!("CARGO_BIN_EXE_pattoo-snmp-setup");
    let mut command = Command::new(bin);
    command
        .env_remove("PATTOO_CONFIGDIR")
        .env_remove("PATTOO_LOG")
        .env_remove("PATTOO_LOG_FORMAT")
        .env_remove("PATTOO_LOG_OUTPUT")
        .args(args);
    if let Some(dir) = config_dir {
        command.env("PATTOO_CONFIGDIR", dir);
    }
    command.output().unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_validate_without_configdir_prints_export_hint() {
    let output = run(None, &["validate"]);
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("[55023]"), "stderr={}", err);
    assert!(err.contains("$ export PATTOO_CONFIGDIR=/etc/pattoo"));
}

#[test]
fn test_validate_valid_daemon_succeeds() {
    let fixture = UnittestConfig::new().create();
    let output = run(Some(fixture.path()), &["validate", SNMPD, "--format", "json"]);
    assert!(output.status.success(), "stderr={}", stderr(&output));

    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json[0]["daemon"], SNMPD);
    assert_eq!(json[0]["polling_interval"], 912);
    assert_eq!(json[0]["targets"][0]["target"], "localhost");
    assert_eq!(json[0]["targets"][0]["snmp_version"], "v2c");
}

#[test]
fn test_validate_invalid_daemon_exits_nonzero_with_code() {
    let fixture = UnittestConfig::new().create();
    let output = run(Some(fixture.path()), &["validate", IFMIBD]);
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("[50404]"), "stderr={}", err);
    assert!(err.contains("snmp_community must be absent for SNMP v3"));
}

#[test]
fn test_validate_text_shows_resolution_table() {
    let fixture = UnittestConfig::new().create();
    let output = run(Some(fixture.path()), &["validate", SNMPD]);
    assert!(output.status.success(), "stderr={}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains(SNMPD));
    assert!(out.contains("Auth Group"));
    assert!(out.contains("localhost"));
}

#[test]
fn test_defaults_prints_fragment() {
    let output = run(None, &["defaults", SNMPD]);
    assert!(output.status.success(), "stderr={}", stderr(&output));
    assert_eq!(stdout(&output).trim_end(), format!("{}:\n  polling_interval: 300", SNMPD));
}

#[test]
fn test_invalid_daemon_name_is_rejected() {
    let output = run(None, &["defaults", "bad/name"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("[50701]"));
}

#[test]
fn test_relative_configdir_is_rejected() {
    let output = run(Some(std::path::Path::new("relative/dir")), &["validate"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("[55026]"));
}
