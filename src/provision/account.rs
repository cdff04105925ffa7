//! Service account, directory creation and ownership.

use crate::error::ProvisionError;
use crate::provision::command::{CommandRunner, CommandSpec};
use std::path::{Path, PathBuf};
use tracing::info;

/// Permission bits for directories owned by the service account.
pub const DIRECTORY_MODE: u32 = 0o750;

/// The unprivileged account the daemons run as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceAccount {
    pub name: String,
    pub home: PathBuf,
    pub shell: PathBuf,
    pub system: bool,
}

impl ServiceAccount {
    /// `pattoo` system account with no login shell.
    pub fn pattoo(home: impl Into<PathBuf>) -> Self {
        Self {
            name: "pattoo".to_string(),
            home: home.into(),
            shell: PathBuf::from("/bin/false"),
            system: true,
        }
    }
}

impl Default for ServiceAccount {
    fn default() -> Self {
        Self::pattoo("/nonexistent")
    }
}

pub trait AccountProvisioner {
    /// Create the account and its group; existing accounts are left alone.
    /// Returns whether an account was created.
    fn create_user(&self, account: &ServiceAccount) -> Result<bool, ProvisionError>;

    /// Create `path` and any missing parents.
    fn mkdir(&self, path: &Path) -> Result<(), ProvisionError>;

    /// Recursively hand `path` to the account.
    fn chown(&self, path: &Path, account: &ServiceAccount) -> Result<(), ProvisionError>;
}

/// Host implementation backed by `useradd`, `chown` and the filesystem.
#[derive(Debug, Default, Clone)]
pub struct SystemProvisioner<R> {
    runner: R,
}

impl<R: CommandRunner> SystemProvisioner<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    fn user_exists(&self, name: &str) -> Result<bool, ProvisionError> {
        Ok(self.runner.run(&CommandSpec::new("id", ["-u", name]))?.success)
    }
}

/// `useradd` invocation for `account`.
pub fn useradd_command(account: &ServiceAccount) -> CommandSpec {
    let mut args = Vec::new();
    if account.system {
        args.push("--system".to_string());
    }
    args.extend([
        "--no-create-home".to_string(),
        "--home-dir".to_string(),
        account.home.display().to_string(),
        "--shell".to_string(),
        account.shell.display().to_string(),
        "--user-group".to_string(),
        account.name.clone(),
    ]);
    CommandSpec::new("useradd", args)
}

/// `chown -R` invocation handing `path` to `account`.
pub fn chown_command(path: &Path, account: &ServiceAccount) -> CommandSpec {
    CommandSpec::new(
        "chown",
        [
            "-R".to_string(),
            format!("{0}:{0}", account.name),
            path.display().to_string(),
        ],
    )
}

impl<R: CommandRunner> AccountProvisioner for SystemProvisioner<R> {
    fn create_user(&self, account: &ServiceAccount) -> Result<bool, ProvisionError> {
        if self.user_exists(&account.name)? {
            info!(user = %account.name, "Service account already exists");
            return Ok(false);
        }

        let command = useradd_command(account);
        let outcome = self.runner.run(&command)?;
        if !outcome.success {
            return Err(ProvisionError::CreateUser {
                user: account.name.clone(),
                reason: outcome.describe_failure(),
            });
        }
        info!(user = %account.name, home = %account.home.display(), "Created service account");
        Ok(true)
    }

    fn mkdir(&self, path: &Path) -> Result<(), ProvisionError> {
        let mut builder = std::fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(DIRECTORY_MODE);
        }
        builder.create(path).map_err(|source| ProvisionError::Mkdir {
            path: path.to_path_buf(),
            source,
        })
    }

    fn chown(&self, path: &Path, account: &ServiceAccount) -> Result<(), ProvisionError> {
        let outcome = self.runner.run(&chown_command(path, account))?;
        if outcome.success {
            Ok(())
        } else {
            Err(ProvisionError::Chown {
                path: path.to_path_buf(),
                reason: outcome.describe_failure(),
            })
        }
    }
}
