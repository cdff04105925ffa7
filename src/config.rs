//! Configuration System
//!
//! Daemon configuration model for the pattoo SNMP agents: computed defaults, the
//! shallow merge with whatever is already on disk, YAML persistence, and the
//! validation pass that must succeed before a daemon is allowed to poll.
//!
//! Every component takes an explicit [`ConfigRoot`]; only the CLI boundary reads
//! `PATTOO_CONFIGDIR`.

mod merge;
mod paths;
mod resolution;
mod schema;
mod sources;
mod validate;

pub use merge::merge_policy::{daemon_defaults, DEFAULT_POLLING_INTERVAL};
pub use merge::{merge_with_existing, MergeOutcome};
pub use paths::{ConfigRoot, CONFIG_DIR_ENV, DEFAULT_CONFIG_DIR, SHARED_CONFIG_STEM};
pub use resolution::{ResolutionFailure, TargetResolution};
pub use schema::{
    AuthGroup, AuthProtocol, DaemonConfig, OidSpec, PollingGroup, PrivProtocol, SnmpVersion,
    DEFAULT_MULTIPLIER, DEFAULT_SNMP_PORT,
};
pub use sources::daemon_file::{DaemonConfigStore, DaemonFileStore};
pub use sources::shared_file::{load_shared_config, SharedConfig};
pub use validate::{validate_section, Strictness, ValidationError, Validator};
