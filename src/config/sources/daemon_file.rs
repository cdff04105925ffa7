//! Daemon config file source: `<root>/<daemon>.yaml`, one top-level key per file.

use crate::config::paths::ConfigRoot;
use crate::error::StorageError;
use crate::types::DaemonName;
use serde_yaml::{Mapping, Value};
use std::path::PathBuf;
use tracing::debug;

/// Persistence port for daemon configuration documents.
///
/// A document is the whole file: a mapping whose `daemon` key holds the
/// section this crate reads and writes. Other top-level keys are carried along.
pub trait DaemonConfigStore {
    /// Location of the document for `daemon`.
    fn path_for(&self, daemon: &DaemonName) -> PathBuf;

    /// Load the whole document; `None` when the file does not exist.
    fn load_document(&self, daemon: &DaemonName) -> Result<Option<Mapping>, StorageError>;

    /// Replace the whole document.
    fn save_document(&self, daemon: &DaemonName, document: &Mapping)
        -> Result<PathBuf, StorageError>;

    /// Load just the daemon's section.
    ///
    /// `None` when the file is missing or has no key for this daemon. An empty
    /// or null section is returned as an empty mapping.
    fn load_section(&self, daemon: &DaemonName) -> Result<Option<Mapping>, StorageError> {
        let Some(document) = self.load_document(daemon)? else {
            return Ok(None);
        };
        match document.get(daemon.as_str()) {
            None => Ok(None),
            Some(Value::Null) => Ok(Some(Mapping::new())),
            Some(Value::Mapping(section)) => Ok(Some(section.clone())),
            Some(_) => Err(StorageError::Layout {
                path: self.path_for(daemon),
                reason: format!("top-level key '{}' is not a mapping", daemon),
            }),
        }
    }

    /// Write `section` under the daemon's key, preserving other top-level keys.
    fn save_section(&self, daemon: &DaemonName, section: &Mapping) -> Result<PathBuf, StorageError> {
        let mut document = self.load_document(daemon)?.unwrap_or_default();
        document.insert(
            Value::from(daemon.as_str()),
            Value::Mapping(section.clone()),
        );
        self.save_document(daemon, &document)
    }
}

/// Filesystem-backed store rooted at a [`ConfigRoot`].
#[derive(Debug, Clone)]
pub struct DaemonFileStore {
    root: ConfigRoot,
}

impl DaemonFileStore {
    pub fn new(root: ConfigRoot) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &ConfigRoot {
        &self.root
    }
}

impl DaemonConfigStore for DaemonFileStore {
    fn path_for(&self, daemon: &DaemonName) -> PathBuf {
        self.root.daemon_file(daemon)
    }

    fn load_document(&self, daemon: &DaemonName) -> Result<Option<Mapping>, StorageError> {
        let path = self.path_for(daemon);
        if !path.exists() {
            debug!(path = %path.display(), "No existing daemon configuration");
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path).map_err(|source| StorageError::Read {
            path: path.clone(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(Some(Mapping::new()));
        }
        let value: Value = serde_yaml::from_str(&content).map_err(|source| StorageError::Parse {
            path: path.clone(),
            source,
        })?;

        match value {
            Value::Null => Ok(Some(Mapping::new())),
            Value::Mapping(document) => Ok(Some(document)),
            _ => Err(StorageError::Layout {
                path,
                reason: "top-level document is not a mapping".to_string(),
            }),
        }
    }

    fn save_document(
        &self,
        daemon: &DaemonName,
        document: &Mapping,
    ) -> Result<PathBuf, StorageError> {
        let path = self.path_for(daemon);
        let content = serde_yaml::to_string(document).map_err(|source| StorageError::Serialize {
            daemon: daemon.to_string(),
            source,
        })?;

        // Readers never observe a partial file.
        let tmp_path = path.with_extension("yaml.tmp");
        std::fs::write(&tmp_path, content).map_err(|source| StorageError::Write {
            path: tmp_path.clone(),
            source,
        })?;
        std::fs::rename(&tmp_path, &path).map_err(|source| {
            let _ = std::fs::remove_file(&tmp_path);
            StorageError::Write {
                path: path.clone(),
                source,
            }
        })?;

        debug!(path = %path.display(), "Wrote daemon configuration");
        Ok(path)
    }
}
