//! Provisioning pipeline behind `pattoo-snmp-setup install`.
//!
//! Sequence: OS dependencies, config directory, service account, ownership,
//! runtime directories from `pattoo.yaml`, then for each daemon the
//! defaults → merge → write → validate pipeline. Each daemon only touches its
//! own file, and the first failure stops the run.

use crate::config::{
    daemon_defaults, load_shared_config, merge_with_existing, ConfigRoot, DaemonConfigStore,
    Strictness, Validator,
};
use crate::error::SetupError;
use crate::provision::{
    install_dependencies, AccountProvisioner, CommandRunner, Distribution, PackageOutcome,
    ServiceAccount,
};
use crate::types::DaemonName;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// What to provision.
#[derive(Debug, Clone)]
pub struct InstallRequest {
    /// Home directory recorded for the service account.
    pub home: PathBuf,
    /// Daemons to configure; empty means the whole catalog.
    pub daemons: Vec<DaemonName>,
}

impl InstallRequest {
    pub fn new(home: impl Into<PathBuf>, daemons: Vec<DaemonName>) -> Self {
        Self {
            home: home.into(),
            daemons,
        }
    }

    fn resolved_daemons(&self) -> Vec<DaemonName> {
        if self.daemons.is_empty() {
            DaemonName::catalog()
        } else {
            self.daemons.clone()
        }
    }
}

/// Per-daemon result of the configuration pipeline.
#[derive(Debug, Clone)]
pub struct DaemonReport {
    pub daemon: DaemonName,
    pub path: PathBuf,
    /// The file had no section for this daemon before the run.
    pub created: bool,
    /// Keys filled from the defaults.
    pub filled_keys: Vec<String>,
    pub polling_groups: usize,
    pub auth_groups: usize,
}

/// Everything `install` did.
#[derive(Debug, Clone)]
pub struct InstallSummary {
    pub config_dir: PathBuf,
    pub account: ServiceAccount,
    pub account_created: bool,
    pub packages: PackageOutcome,
    pub runtime_directories: Vec<PathBuf>,
    pub daemons: Vec<DaemonReport>,
}

/// Runs the provisioning pipeline against injected collaborators.
pub struct Installer<'a> {
    root: ConfigRoot,
    store: &'a dyn DaemonConfigStore,
    provisioner: &'a dyn AccountProvisioner,
    runner: &'a dyn CommandRunner,
    distribution: Option<Distribution>,
}

impl<'a> Installer<'a> {
    pub fn new(
        root: ConfigRoot,
        store: &'a dyn DaemonConfigStore,
        provisioner: &'a dyn AccountProvisioner,
        runner: &'a dyn CommandRunner,
    ) -> Self {
        Self {
            root,
            store,
            provisioner,
            runner,
            distribution: None,
        }
    }

    /// Skip `/etc/os-release` detection and use `distribution`.
    pub fn with_distribution(mut self, distribution: Distribution) -> Self {
        self.distribution = Some(distribution);
        self
    }

    pub fn run(&self, request: &InstallRequest) -> Result<InstallSummary, SetupError> {
        let distribution = match &self.distribution {
            Some(d) => d.clone(),
            None => Distribution::detect(),
        };
        let packages = install_dependencies(&distribution, self.runner)?;

        let account = ServiceAccount::pattoo(&request.home);
        let config_dir = self.root.path().to_path_buf();
        self.provisioner.mkdir(&config_dir)?;
        let account_created = self.provisioner.create_user(&account)?;
        self.provisioner.chown(&config_dir, &account)?;
        info!(path = %config_dir.display(), user = %account.name, "Configuration directory ready");

        let shared = load_shared_config(&self.root)?;
        let runtime_directories = shared.runtime_directories();
        for dir in &runtime_directories {
            self.provisioner.mkdir(dir)?;
            self.provisioner.chown(dir, &account)?;
            info!(path = %dir.display(), "Runtime directory ready");
        }

        let mut daemons = Vec::new();
        for daemon in request.resolved_daemons() {
            let report = self.configure_daemon(&daemon, &account).map_err(|e| {
                error!(daemon = %daemon, code = e.code(), "Daemon configuration failed: {}", e);
                e
            })?;
            daemons.push(report);
        }

        Ok(InstallSummary {
            config_dir,
            account,
            account_created,
            packages,
            runtime_directories,
            daemons,
        })
    }

    /// Defaults → merge → write → validate for one daemon.
    pub fn configure_daemon(
        &self,
        daemon: &DaemonName,
        account: &ServiceAccount,
    ) -> Result<DaemonReport, SetupError> {
        if !daemon.is_known() {
            warn!(daemon = %daemon, "Unknown daemon name, using generic defaults");
        }

        let defaults = daemon_defaults(daemon);
        let existing = self.store.load_section(daemon)?;
        let merged = merge_with_existing(&defaults, existing.as_ref());
        let path = self.store.save_section(daemon, &merged.section)?;
        info!(
            daemon = %daemon,
            path = %path.display(),
            filled = ?merged.filled_keys,
            "Wrote daemon configuration"
        );

        let config = Validator::new(self.store, Strictness::Provisioning).validate(daemon)?;
        self.provisioner.chown(&path, account)?;

        Ok(DaemonReport {
            daemon: daemon.clone(),
            path,
            created: !merged.existed,
            filled_keys: merged.filled_keys,
            polling_groups: config.polling_groups.len(),
            auth_groups: config.auth_groups.len(),
        })
    }
}
