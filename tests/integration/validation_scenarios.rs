//! Startup validation against the unit-test fixture directory.

use super::test_utils::{daemon, first_entry, UnittestConfig, IFMIBD, SNMPD};
use pattoo_snmp_setup::config::{Strictness, ValidationError, Validator};
use pattoo_snmp_setup::error::SetupError;
use serde_yaml::Value;

fn validate(fixture: &UnittestConfig, name: &str) -> Result<(), SetupError> {
    let store = fixture.store();
    Validator::new(&store, Strictness::Startup)
        .validate(&daemon(name))
        .map(|_| ())
}

fn errors_of(result: Result<(), SetupError>) -> Vec<ValidationError> {
    match result {
        Err(SetupError::Validation { errors, .. }) => errors,
        other => panic!("expected validation failure, got {:?}", other),
    }
}

#[test]
fn test_fixture_environment_matches() {
    let fixture = UnittestConfig::new();
    assert!(fixture
        .check_environment(Some(fixture.path().as_os_str()))
        .is_ok());
    let unset = fixture.check_environment(None).unwrap_err();
    assert!(unset.contains("$ export PATTOO_CONFIGDIR="));
    let wrong = fixture
        .check_environment(Some(std::ffi::OsStr::new("/tmp/elsewhere")))
        .unwrap_err();
    assert!(wrong.contains("/tmp/elsewhere"));
}

#[test]
fn test_snmpd_fixture_is_valid() {
    let fixture = UnittestConfig::new().create();
    let store = fixture.store();
    let config = Validator::new(&store, Strictness::Startup)
        .validate(&daemon(SNMPD))
        .unwrap();
    assert_eq!(config.polling_interval, 912);
    assert_eq!(config.polling_groups[0].oids.len(), 2);
    assert_eq!(config.polling_groups[0].oids[0].multiplier, 8.0);
    assert_eq!(config.auth_groups[0].snmp_community.as_deref(), Some("8gfljtrwer"));
}

#[test]
fn test_ifmibd_fixture_rejects_community_on_v3() {
    let fixture = UnittestConfig::new().create();
    let errors = errors_of(validate(&fixture, IFMIBD));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code(), 50404);
    assert!(errors[0].to_string().contains("snmp_community"));

    let mut section = fixture.section(IFMIBD);
    first_entry(&mut section, "auth_groups").insert("snmp_community".into(), Value::Null);
    fixture.write_section(IFMIBD, &section);
    assert!(validate(&fixture, IFMIBD).is_ok());
}

#[test]
fn test_unauthenticated_target_names_it() {
    let fixture = UnittestConfig::new().create();
    let mut section = fixture.section(SNMPD);
    first_entry(&mut section, "auth_groups").insert(
        "ip_targets".into(),
        Value::Sequence(vec![Value::from("otherhost")]),
    );
    fixture.write_section(SNMPD, &section);

    let errors = errors_of(validate(&fixture, SNMPD));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code(), 50501);
    assert!(errors[0]
        .to_string()
        .starts_with("unauthenticated target: localhost"));
}

#[test]
fn test_overlapping_auth_groups_are_ambiguous() {
    let fixture = UnittestConfig::new().create();
    let mut section = fixture.section(SNMPD);
    let mut second = first_entry(&mut section, "auth_groups").clone();
    second.insert("group_name".into(), Value::from("LAB"));
    section
        .get_mut("auth_groups")
        .and_then(Value::as_sequence_mut)
        .unwrap()
        .push(Value::Mapping(second));
    fixture.write_section(SNMPD, &section);

    let errors = errors_of(validate(&fixture, SNMPD));
    assert_eq!(errors[0].code(), 50502);
    let message = errors[0].to_string();
    assert!(message.contains("localhost"));
    assert!(message.contains("'TEST'") && message.contains("'LAB'"));
}

#[test]
fn test_zero_interval_fails_regardless_of_groups() {
    let fixture = UnittestConfig::new().create();
    let mut section = fixture.section(SNMPD);
    section.insert("polling_interval".into(), Value::from(0));
    fixture.write_section(SNMPD, &section);

    let errors = errors_of(validate(&fixture, SNMPD));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].code(), 50304);
}

#[test]
fn test_missing_groups_fail_at_startup() {
    let fixture = UnittestConfig::new().create();
    let mut section = fixture.section(SNMPD);
    section.remove("auth_groups");
    fixture.write_section(SNMPD, &section);

    let errors = errors_of(validate(&fixture, SNMPD));
    assert_eq!(errors[0].code(), 50302);
    assert!(errors[0].to_string().contains("auth_groups"));
}

#[test]
fn test_auth_oid_and_resolution_errors_are_collected_together() {
    let fixture = UnittestConfig::new().create();
    let mut section = fixture.section(SNMPD);
    first_entry(&mut section, "auth_groups").insert("snmp_secname".into(), Value::from("ops"));
    let polling = first_entry(&mut section, "polling_groups");
    polling.insert(
        "ip_targets".into(),
        Value::Sequence(vec![Value::from("localhost"), Value::from("router1")]),
    );
    polling.insert(
        "oids".into(),
        serde_yaml::from_str("[{address: '.1.3..6', multiplier: 8}, {address: '.1.3.6.1', multiplier: -1}]")
            .unwrap(),
    );
    fixture.write_section(SNMPD, &section);

    let codes: Vec<u32> = errors_of(validate(&fixture, SNMPD))
        .iter()
        .map(ValidationError::code)
        .collect();
    assert_eq!(codes, vec![50402, 50501, 50601, 50602]);
}

#[test]
fn test_edit_between_runs_is_rechecked() {
    let fixture = UnittestConfig::new().create();
    let store = fixture.store();
    let validator = Validator::new(&store, Strictness::Startup);
    assert!(validator.validate(&daemon(SNMPD)).is_ok());

    let mut section = fixture.section(SNMPD);
    section.insert("polling_interval".into(), Value::from(-5));
    fixture.write_section(SNMPD, &section);
    assert!(validator.validate(&daemon(SNMPD)).is_err());
}
