//! Error types for provisioning and validating pattoo SNMP daemon configuration.
//!
//! Every variant carries a stable numeric code so operators can search logs and
//! documentation for a failure without parsing the message text.

use crate::config::ValidationError;
use std::path::PathBuf;
use thiserror::Error;

/// Problems with the `PATTOO_CONFIGDIR` environment contract.
#[derive(Debug, Error)]
pub enum EnvironmentError {
    #[error(
        "PATTOO_CONFIGDIR is not set. Run this command to set it:\n\n$ export PATTOO_CONFIGDIR={}\n\nThen run this command again.",
        .expected.display()
    )]
    Unset { expected: PathBuf },

    #[error(
        "PATTOO_CONFIGDIR is set to {}, not {}. Run this command to correct it:\n\n$ export PATTOO_CONFIGDIR={}\n\nThen run this command again.",
        .actual.display(),
        .expected.display(),
        .expected.display()
    )]
    Mismatch { expected: PathBuf, actual: PathBuf },

    #[error(
        "PATTOO_CONFIGDIR must be an absolute path, got {}. Run this command to correct it:\n\n$ export PATTOO_CONFIGDIR=/etc/pattoo",
        .0.display()
    )]
    NotAbsolute(PathBuf),
}

impl EnvironmentError {
    pub fn code(&self) -> u32 {
        match self {
            EnvironmentError::Unset { .. } => 55023,
            EnvironmentError::Mismatch { .. } => 55024,
            EnvironmentError::NotAbsolute(_) => 55026,
        }
    }
}

/// Daemon configuration file I/O errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to read configuration file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write configuration file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed YAML in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to serialize configuration for daemon {daemon}: {source}")]
    Serialize {
        daemon: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Unexpected document layout in {}: {reason}", .path.display())]
    Layout { path: PathBuf, reason: String },
}

impl StorageError {
    pub fn code(&self) -> u32 {
        match self {
            StorageError::Read { .. } => 50101,
            StorageError::Write { .. } => 50102,
            StorageError::Parse { .. } => 50103,
            StorageError::Serialize { .. } => 50104,
            StorageError::Layout { .. } => 50105,
        }
    }
}

/// Account, directory, ownership and package installation failures.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Failed to create directory {}: {source}", .path.display())]
    Mkdir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create service account '{user}': {reason}")]
    CreateUser { user: String, reason: String },

    #[error("Failed to change ownership of {}: {reason}", .path.display())]
    Chown { path: PathBuf, reason: String },

    #[error("Command `{command}` failed: {reason}")]
    Command { command: String, reason: String },
}

impl ProvisionError {
    pub fn code(&self) -> u32 {
        match self {
            ProvisionError::Mkdir { .. } => 50201,
            ProvisionError::CreateUser { .. } => 50202,
            ProvisionError::Chown { .. } => 50203,
            ProvisionError::Command { .. } => 50204,
        }
    }
}

/// Top-level error surfaced to the CLI.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("Environment error: {0}")]
    Environment(#[from] EnvironmentError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Provisioning error: {0}")]
    Provision(#[from] ProvisionError),

    #[error("Configuration for daemon '{daemon}' failed validation with {} error(s)", .errors.len())]
    Validation {
        daemon: String,
        errors: Vec<ValidationError>,
    },

    #[error("{0}")]
    InvalidDaemonName(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SetupError {
    /// Stable diagnostic code. Validation failures report the code of their first error.
    pub fn code(&self) -> u32 {
        match self {
            SetupError::Environment(e) => e.code(),
            SetupError::Storage(e) => e.code(),
            SetupError::Provision(e) => e.code(),
            SetupError::Validation { errors, .. } => {
                errors.first().map(ValidationError::code).unwrap_or(50300)
            }
            SetupError::InvalidDaemonName(_) => 50701,
            SetupError::Config(_) => 50801,
        }
    }
}

impl From<config::ConfigError> for SetupError {
    fn from(err: config::ConfigError) -> Self {
        SetupError::Config(err.to_string())
    }
}
