//! Provisioning pipeline over the fixture directory with recording collaborators.

use super::test_utils::{daemon, UnittestConfig, IFMIBD, SNMPD};
use pattoo_snmp_setup::config::DaemonConfigStore;
use pattoo_snmp_setup::error::ProvisionError;
use pattoo_snmp_setup::install::{InstallRequest, Installer};
use pattoo_snmp_setup::provision::{
    AccountProvisioner, CommandOutcome, CommandRunner, CommandSpec, Distribution, PackageOutcome,
    ServiceAccount,
};
use std::cell::RefCell;
use std::path::{Path, PathBuf};

#[derive(Default)]
struct RecordingProvisioner {
    created: RefCell<Vec<PathBuf>>,
    owned: RefCell<Vec<PathBuf>>,
}

impl AccountProvisioner for RecordingProvisioner {
    fn create_user(&self, _account: &ServiceAccount) -> Result<bool, ProvisionError> {
        Ok(false)
    }

    fn mkdir(&self, path: &Path) -> Result<(), ProvisionError> {
        self.created.borrow_mut().push(path.to_path_buf());
        std::fs::create_dir_all(path).map_err(|source| ProvisionError::Mkdir {
            path: path.to_path_buf(),
            source,
        })
    }

    fn chown(&self, path: &Path, _account: &ServiceAccount) -> Result<(), ProvisionError> {
        self.owned.borrow_mut().push(path.to_path_buf());
        Ok(())
    }
}

#[derive(Default)]
struct RecordingRunner {
    commands: RefCell<Vec<String>>,
}

impl CommandRunner for RecordingRunner {
    fn run(&self, command: &CommandSpec) -> Result<CommandOutcome, ProvisionError> {
        self.commands.borrow_mut().push(command.to_string());
        Ok(CommandOutcome::ok())
    }
}

#[test]
fn test_reinstall_keeps_operator_values() {
    let fixture = UnittestConfig::new().create();
    let store = fixture.store();
    let provisioner = RecordingProvisioner::default();
    let runner = RecordingRunner::default();
    let installer = Installer::new(fixture.root(), &store, &provisioner, &runner)
        .with_distribution(Distribution::Debian);

    let summary = installer
        .run(&InstallRequest::new("/nonexistent", vec![daemon(SNMPD)]))
        .unwrap();

    let report = &summary.daemons[0];
    assert!(!report.created);
    assert!(report.filled_keys.is_empty());
    assert_eq!(report.polling_groups, 1);
    assert_eq!(report.auth_groups, 1);

    let section = store.load_section(&daemon(SNMPD)).unwrap().unwrap();
    assert_eq!(section, fixture.section(SNMPD));

    assert_eq!(runner.commands.borrow().len(), 2);
    assert!(matches!(summary.packages, PackageOutcome::Installed { .. }));
    assert_eq!(summary.runtime_directories.len(), 3);
    assert!(provisioner.owned.borrow().contains(&report.path));
    assert!(provisioner.owned.borrow().contains(&fixture.log_dir().to_path_buf()));
}

#[test]
fn test_install_stops_on_invalid_existing_config() {
    let fixture = UnittestConfig::new().create();
    let store = fixture.store();
    let provisioner = RecordingProvisioner::default();
    let runner = RecordingRunner::default();
    let installer = Installer::new(fixture.root(), &store, &provisioner, &runner)
        .with_distribution(Distribution::Unsupported("arch".into()));

    let err = installer
        .run(&InstallRequest::new("/nonexistent", Vec::new()))
        .unwrap_err();
    // catalog order puts snmpd first, then the v3 group with a community fails
    assert_eq!(err.code(), 50404);
    assert!(runner.commands.borrow().is_empty());
    let snmpd = fixture.path().join(format!("{}.yaml", SNMPD));
    let ifmibd = fixture.path().join(format!("{}.yaml", IFMIBD));
    assert!(provisioner.owned.borrow().contains(&snmpd));
    assert!(!provisioner.owned.borrow().contains(&ifmibd));
}

#[test]
fn test_rerun_produces_identical_file() {
    let fixture = UnittestConfig::new();
    let store = fixture.store();
    let provisioner = RecordingProvisioner::default();
    let runner = RecordingRunner::default();
    let installer = Installer::new(fixture.root(), &store, &provisioner, &runner)
        .with_distribution(Distribution::Unsupported("arch".into()));
    let request = InstallRequest::new("/nonexistent", vec![daemon("custom_poller")]);

    let first = installer.run(&request).unwrap();
    let path = first.daemons[0].path.clone();
    let before = std::fs::read(&path).unwrap();
    assert!(first.daemons[0].created);

    let second = installer.run(&request).unwrap();
    assert!(!second.daemons[0].created);
    assert!(second.daemons[0].filled_keys.is_empty());
    assert_eq!(std::fs::read(&path).unwrap(), before);
}

#[test]
fn test_unrelated_top_level_keys_survive() {
    let fixture = UnittestConfig::new().create();
    let path = fixture.path().join(format!("{}.yaml", SNMPD));
    let mut content = std::fs::read_to_string(&path).unwrap();
    content.push_str("operator_notes:\n  owner: noc\n");
    std::fs::write(&path, content).unwrap();

    let store = fixture.store();
    let provisioner = RecordingProvisioner::default();
    let runner = RecordingRunner::default();
    Installer::new(fixture.root(), &store, &provisioner, &runner)
        .with_distribution(Distribution::Rhel)
        .run(&InstallRequest::new("/nonexistent", vec![daemon(SNMPD)]))
        .unwrap();

    let document = store.load_document(&daemon(SNMPD)).unwrap().unwrap();
    assert!(document.contains_key("operator_notes"));
    assert!(document.contains_key(SNMPD));
}
