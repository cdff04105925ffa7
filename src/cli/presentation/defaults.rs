//! Defaults command presentation.

use crate::config::daemon_defaults;
use crate::error::{SetupError, StorageError};
use crate::types::DaemonName;
use serde_yaml::{Mapping, Value};

/// The default fragment as it would be written: `{daemon: {...}}`.
pub fn format_defaults(daemon: &DaemonName) -> Result<String, SetupError> {
    let mut document = Mapping::new();
    document.insert(
        Value::from(daemon.as_str()),
        Value::Mapping(daemon_defaults(daemon)),
    );
    let yaml = serde_yaml::to_string(&document).map_err(|source| StorageError::Serialize {
        daemon: daemon.to_string(),
        source,
    })?;
    Ok(yaml.trim_end().to_string())
}
