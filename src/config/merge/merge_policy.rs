//! Merge rules: defaults per daemon and for the shared settings file.

use crate::types::DaemonName;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};
use serde_yaml::{Mapping, Value};

/// Seconds between poll cycles when nothing else is configured.
pub const DEFAULT_POLLING_INTERVAL: u64 = 300;

/// Per-daemon polling interval overrides; daemons not listed use the generic default.
const DAEMON_POLLING_INTERVALS: &[(&str, u64)] = &[
    ("pattoo_agent_snmpd", DEFAULT_POLLING_INTERVAL),
    ("pattoo_agent_snmp_ifmibd", DEFAULT_POLLING_INTERVAL),
];

/// Smallest configuration fragment a daemon needs before any customization.
pub fn daemon_defaults(daemon: &DaemonName) -> Mapping {
    let interval = DAEMON_POLLING_INTERVALS
        .iter()
        .find(|(name, _)| *name == daemon.as_str())
        .map(|(_, interval)| *interval)
        .unwrap_or(DEFAULT_POLLING_INTERVAL);

    let mut defaults = Mapping::new();
    defaults.insert(Value::from("polling_interval"), Value::from(interval));
    defaults
}

/// Create a Config builder for `pattoo.yaml` with merge policy defaults applied.
pub fn shared_builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder().set_default("pattoo.log_level", "info")
}
