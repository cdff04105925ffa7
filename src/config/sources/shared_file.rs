//! Shared settings source: `<root>/pattoo.yaml`, read through the `config` crate.

use crate::config::merge::merge_policy::shared_builder_with_defaults;
use crate::config::paths::ConfigRoot;
use crate::error::SetupError;
use config::{File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

/// Settings shared by every pattoo component, stored under the `pattoo` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SharedConfig {
    #[serde(default)]
    pub log_directory: Option<PathBuf>,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub cache_directory: Option<PathBuf>,

    #[serde(default)]
    pub daemon_directory: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self {
            log_directory: None,
            log_level: default_log_level(),
            cache_directory: None,
            daemon_directory: None,
        }
    }
}

impl SharedConfig {
    /// Runtime directories the service account must own.
    pub fn runtime_directories(&self) -> Vec<PathBuf> {
        [
            &self.log_directory,
            &self.cache_directory,
            &self.daemon_directory,
        ]
        .into_iter()
        .flatten()
        .cloned()
        .collect()
    }
}

#[derive(Debug, Deserialize)]
struct SharedDocument {
    #[serde(default)]
    pattoo: SharedConfig,
}

/// Load `pattoo.yaml` layered over the defaults; a missing file yields defaults.
pub fn load_shared_config(root: &ConfigRoot) -> Result<SharedConfig, SetupError> {
    let path = root.shared_file();
    let mut builder = shared_builder_with_defaults()?;
    if path.exists() {
        debug!(path = %path.display(), "Loading shared settings");
        builder = builder.add_source(File::from(path).format(FileFormat::Yaml).required(false));
    }
    let document: SharedDocument = builder.build()?.try_deserialize()?;
    Ok(document.pattoo)
}
