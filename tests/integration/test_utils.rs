//! Shared test utilities for integration tests
//!
//! [`UnittestConfig`] writes a known-good configuration directory: the shared
//! `pattoo.yaml` plus one file per shipped daemon. Everything lives in a temp
//! directory that is removed on drop.

use pattoo_snmp_setup::config::{ConfigRoot, DaemonFileStore};
use pattoo_snmp_setup::types::DaemonName;
use serde_yaml::{Mapping, Value};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const SNMPD: &str = "pattoo_agent_snmpd";
pub const IFMIBD: &str = "pattoo_agent_snmp_ifmibd";

const SNMPD_SECTION: &str = r#"
polling_interval: 912
polling_groups:
  - group_name: TEST
    ip_targets: [localhost]
    oids:
      - address: .1.3.6.1.2.1.2.2.1.10
        multiplier: 8
      - address: .1.3.6.1.2.1.2.2.1.16
        multiplier: 8
auth_groups:
  - group_name: TEST
    snmp_authpassword: null
    snmp_authprotocol: null
    snmp_community: 8gfljtrwer
    snmp_port: 161
    snmp_privpassword: null
    snmp_privprotocol: null
    snmp_secname: null
    snmp_version: 2
    ip_targets: [localhost]
"#;

// snmp_community is set on a v3 group, so this section fails validation.
const IFMIBD_SECTION: &str = r#"
polling_interval: 7846
polling_groups:
  - group_name: TEST
    ip_targets: [localhost]
    oids:
      - address: .1.3.6.1.2.1.2.2.1.14
        multiplier: 8
      - address: .1.3.6.1.2.1.2.2.1.20
        multiplier: 8
auth_groups:
  - group_name: TEST
    snmp_authpassword: 092df34
    snmp_authprotocol: MD5
    snmp_community: 049s832
    snmp_port: 161
    snmp_privpassword: 987dee1234
    snmp_privprotocol: DES
    snmp_secname: 0981s23df
    snmp_version: 3
    ip_targets: [localhost]
"#;

/// Unit-test configuration directory with log, cache and daemon directories.
pub struct UnittestConfig {
    _temp: TempDir,
    config_dir: PathBuf,
    log_dir: PathBuf,
    cache_dir: PathBuf,
    daemon_dir: PathBuf,
}

impl UnittestConfig {
    pub fn new() -> Self {
        let temp = tempfile::Builder::new()
            .prefix("pattoo-agent-snmp-unittests")
            .tempdir()
            .unwrap();
        let config_dir = temp.path().join("config");
        let log_dir = temp.path().join("log");
        let cache_dir = temp.path().join("cache");
        let daemon_dir = temp.path().join("daemon");
        for dir in [&config_dir, &log_dir, &cache_dir, &daemon_dir] {
            std::fs::create_dir_all(dir).unwrap();
        }
        assert!(
            config_dir.to_string_lossy().contains("unittest"),
            "fixture must live in a unittest directory"
        );
        Self {
            _temp: temp,
            config_dir,
            log_dir,
            cache_dir,
            daemon_dir,
        }
    }

    /// Write every fixture file and return the directory.
    pub fn create(self) -> Self {
        let shared = format!(
            "pattoo:\n  log_directory: {}\n  log_level: debug\n  language: abc\n  cache_directory: {}\n  daemon_directory: {}\npattoo_agent_api:\n  ip_address: 127.0.0.11\n  ip_bind_port: 50001\npattoo_web_api:\n  ip_address: 127.0.0.12\n  ip_bind_port: 50002\n",
            self.log_dir.display(),
            self.cache_dir.display(),
            self.daemon_dir.display()
        );
        std::fs::write(self.root().shared_file(), shared).unwrap();
        self.write_section(SNMPD, &section_from(SNMPD_SECTION));
        self.write_section(IFMIBD, &section_from(IFMIBD_SECTION));
        self
    }

    pub fn path(&self) -> &Path {
        &self.config_dir
    }

    pub fn root(&self) -> ConfigRoot {
        ConfigRoot::new(&self.config_dir).unwrap()
    }

    pub fn store(&self) -> DaemonFileStore {
        DaemonFileStore::new(self.root())
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    /// Fixture section for `daemon`, ready to be edited.
    pub fn section(&self, daemon: &str) -> Mapping {
        match daemon {
            SNMPD => section_from(SNMPD_SECTION),
            IFMIBD => section_from(IFMIBD_SECTION),
            other => panic!("no fixture for {}", other),
        }
    }

    /// Replace the daemon's file with `{daemon: section}`.
    pub fn write_section(&self, daemon: &str, section: &Mapping) {
        let mut document = Mapping::new();
        document.insert(Value::from(daemon), Value::Mapping(section.clone()));
        std::fs::write(
            self.config_dir.join(format!("{}.yaml", daemon)),
            serde_yaml::to_string(&document).unwrap(),
        )
        .unwrap();
    }

    /// Check a `PATTOO_CONFIGDIR` value against this fixture.
    pub fn check_environment(&self, value: Option<&OsStr>) -> Result<(), String> {
        self.root().check_env_value(value).map_err(|e| e.to_string())
    }
}

pub fn section_from(yaml: &str) -> Mapping {
    serde_yaml::from_str(yaml).unwrap()
}

pub fn daemon(name: &str) -> DaemonName {
    name.parse().unwrap()
}

/// Mutable access to the first entry of a group sequence.
pub fn first_entry<'a>(section: &'a mut Mapping, key: &str) -> &'a mut Mapping {
    section
        .get_mut(key)
        .and_then(Value::as_sequence_mut)
        .and_then(|entries| entries.first_mut())
        .and_then(Value::as_mapping_mut)
        .unwrap()
}
