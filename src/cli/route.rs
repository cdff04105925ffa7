//! CLI route: single route table and run context. Dispatches to domain services and presentation.

use crate::cli::parse::{Commands, OutputFormat};
use crate::cli::presentation::{
    format_defaults, format_install_summary, format_validation_json, format_validation_text,
    DaemonValidationReport,
};
use crate::config::{ConfigRoot, DaemonFileStore, Strictness, Validator};
use crate::error::SetupError;
use crate::install::{InstallRequest, Installer};
use crate::provision::{SystemProvisioner, SystemRunner};
use crate::types::DaemonName;
use std::path::Path;
use tracing::info;

/// Runtime context for CLI execution: the resolved config root.
pub struct RunContext {
    root: ConfigRoot,
}

impl RunContext {
    pub fn new(root: ConfigRoot) -> Self {
        Self { root }
    }

    /// Resolve the config root the way `command` requires.
    ///
    /// `install` and `defaults` fall back to `/etc/pattoo`; `install` also exports
    /// the result. `validate` requires `PATTOO_CONFIGDIR` to be set.
    pub fn for_command(command: &Commands) -> Result<Self, SetupError> {
        let root = match command {
            Commands::Install { .. } => {
                let (root, defaulted) = ConfigRoot::from_env_or_default()?;
                if defaulted {
                    info!(path = %root.path().display(), "PATTOO_CONFIGDIR unset, using default");
                }
                root.export();
                root
            }
            Commands::Defaults { .. } => ConfigRoot::from_env_or_default()?.0,
            Commands::Validate { .. } => ConfigRoot::from_env()?,
        };
        Ok(Self::new(root))
    }

    pub fn root(&self) -> &ConfigRoot {
        &self.root
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, SetupError> {
        match command {
            Commands::Install { home, daemons } => self.handle_install(home, daemons),
            Commands::Validate { daemons, format } => self.handle_validate(daemons, *format),
            Commands::Defaults { daemon } => format_defaults(&parse_daemon(daemon)?),
        }
    }

    fn handle_install(&self, home: &Path, daemons: &[String]) -> Result<String, SetupError> {
        let daemons = parse_daemons(daemons)?;
        let store = DaemonFileStore::new(self.root.clone());
        let runner = SystemRunner;
        let provisioner = SystemProvisioner::new(SystemRunner);
        let installer = Installer::new(self.root.clone(), &store, &provisioner, &runner);
        let summary = installer.run(&InstallRequest::new(home, daemons))?;
        Ok(format_install_summary(&summary))
    }

    fn handle_validate(
        &self,
        daemons: &[String],
        format: OutputFormat,
    ) -> Result<String, SetupError> {
        let mut daemons = parse_daemons(daemons)?;
        if daemons.is_empty() {
            daemons = DaemonName::catalog();
        }

        let store = DaemonFileStore::new(self.root.clone());
        let validator = Validator::new(&store, Strictness::Startup);
        let mut reports = Vec::new();
        for daemon in &daemons {
            let config = validator.validate(daemon)?;
            reports.push(DaemonValidationReport::from_config(daemon, &config));
        }

        match format {
            OutputFormat::Text => Ok(format_validation_text(&reports)),
            OutputFormat::Json => format_validation_json(&reports),
        }
    }
}

fn parse_daemon(name: &str) -> Result<DaemonName, SetupError> {
    name.parse().map_err(SetupError::InvalidDaemonName)
}

fn parse_daemons(names: &[String]) -> Result<Vec<DaemonName>, SetupError> {
    names.iter().map(|name| parse_daemon(name)).collect()
}
