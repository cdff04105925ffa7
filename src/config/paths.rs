//! Config root resolution: `PATTOO_CONFIGDIR` or the platform default.

use crate::error::EnvironmentError;
use crate::types::DaemonName;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Environment variable naming the configuration directory.
pub const CONFIG_DIR_ENV: &str = "PATTOO_CONFIGDIR";

/// Used when `PATTOO_CONFIGDIR` is unset at install time.
pub const DEFAULT_CONFIG_DIR: &str = "/etc/pattoo";

/// Filename stem of the settings file shared by all pattoo components.
pub const SHARED_CONFIG_STEM: &str = "pattoo";

/// Absolute directory holding one `<daemon>.yaml` per daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigRoot(PathBuf);

impl ConfigRoot {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, EnvironmentError> {
        let path = path.into();
        if !path.is_absolute() {
            return Err(EnvironmentError::NotAbsolute(path));
        }
        Ok(Self(path))
    }

    /// Resolve from a raw `PATTOO_CONFIGDIR` value. Empty counts as unset.
    pub fn from_env_value(value: Option<OsString>) -> Result<Self, EnvironmentError> {
        match value {
            Some(v) if !v.is_empty() => Self::new(PathBuf::from(v)),
            _ => Err(EnvironmentError::Unset {
                expected: PathBuf::from(DEFAULT_CONFIG_DIR),
            }),
        }
    }

    /// Resolve from the process environment; the variable must be set.
    pub fn from_env() -> Result<Self, EnvironmentError> {
        Self::from_env_value(std::env::var_os(CONFIG_DIR_ENV))
    }

    /// Resolve from the process environment, falling back to [`DEFAULT_CONFIG_DIR`].
    ///
    /// Returns the root and whether the fallback was taken.
    pub fn from_env_or_default() -> Result<(Self, bool), EnvironmentError> {
        match Self::from_env() {
            Ok(root) => Ok((root, false)),
            Err(EnvironmentError::Unset { .. }) => Ok((Self(PathBuf::from(DEFAULT_CONFIG_DIR)), true)),
            Err(e) => Err(e),
        }
    }

    /// Check that a `PATTOO_CONFIGDIR` value points at this root.
    pub fn check_env_value(&self, value: Option<&OsStr>) -> Result<(), EnvironmentError> {
        match value {
            Some(v) if !v.is_empty() => {
                if Path::new(v) == self.0.as_path() {
                    Ok(())
                } else {
                    Err(EnvironmentError::Mismatch {
                        expected: self.0.clone(),
                        actual: PathBuf::from(v),
                    })
                }
            }
            _ => Err(EnvironmentError::Unset {
                expected: self.0.clone(),
            }),
        }
    }

    /// Export this root as `PATTOO_CONFIGDIR` for the remainder of the process.
    pub fn export(&self) {
        std::env::set_var(CONFIG_DIR_ENV, &self.0);
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// `<root>/<daemon>.yaml`
    pub fn daemon_file(&self, daemon: &DaemonName) -> PathBuf {
        self.0.join(format!("{}.yaml", daemon))
    }

    /// `<root>/pattoo.yaml`
    pub fn shared_file(&self) -> PathBuf {
        self.0.join(format!("{}.yaml", SHARED_CONFIG_STEM))
    }
}
