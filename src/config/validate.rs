//! Config Validator
//!
//! Single stateless pass over a persisted daemon section, in four stages:
//!
//! 1. shape: `polling_interval` is a positive integer; group sections are sequences
//!    whose entries deserialize
//! 2. auth groups: version-dependent credential presence
//! 3. target resolution: every polled target maps to exactly one auth group
//! 4. OID sanity: dotted-numeric addresses, positive multipliers
//!
//! Shape errors end the pass early. Errors from stages 2-4 are collected in
//! stage order so the operator sees every broken rule at once.

use crate::config::resolution::{ResolutionFailure, TargetResolution};
use crate::config::schema::{AuthGroup, DaemonConfig, PollingGroup, SnmpVersion};
use crate::config::sources::daemon_file::DaemonConfigStore;
use crate::error::SetupError;
use crate::types::DaemonName;
use serde::de::DeserializeOwned;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeSet;
use std::fmt;
use tracing::{error, info, warn};

/// How strictly the group sections are required.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
    /// Right after provisioning: absent group sections read as empty.
    Provisioning,
    /// Daemon startup: both group sections must be present.
    Startup,
}

/// Credential field named by an auth group rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credential {
    Community,
    Secname,
    AuthProtocol,
    AuthPassword,
    PrivProtocol,
    PrivPassword,
}

impl Credential {
    pub fn key(self) -> &'static str {
        match self {
            Credential::Community => "snmp_community",
            Credential::Secname => "snmp_secname",
            Credential::AuthProtocol => "snmp_authprotocol",
            Credential::AuthPassword => "snmp_authpassword",
            Credential::PrivProtocol => "snmp_privprotocol",
            Credential::PrivPassword => "snmp_privpassword",
        }
    }
}

/// A single broken rule.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    MissingSection {
        daemon: String,
    },
    MissingKey {
        daemon: String,
        key: &'static str,
    },
    WrongType {
        daemon: String,
        key: &'static str,
        expected: &'static str,
        found: String,
    },
    NonPositiveInterval {
        daemon: String,
        value: String,
    },
    MalformedEntry {
        section: &'static str,
        index: usize,
        group: Option<String>,
        reason: String,
    },
    MissingCredential {
        group: String,
        version: SnmpVersion,
        field: Credential,
    },
    ForbiddenCredential {
        group: String,
        version: SnmpVersion,
        field: Credential,
    },
    InvalidPort {
        group: String,
    },
    UnauthenticatedTarget {
        target: String,
        polling_group: String,
    },
    AmbiguousTarget {
        target: String,
        auth_groups: Vec<String>,
    },
    InvalidOidAddress {
        group: String,
        address: String,
    },
    InvalidMultiplier {
        group: String,
        address: String,
        multiplier: f64,
    },
}

impl ValidationError {
    /// Stable diagnostic code, unique per rule.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::MissingSection { .. } => 50301,
            ValidationError::MissingKey { .. } => 50302,
            ValidationError::WrongType { .. } => 50303,
            ValidationError::NonPositiveInterval { .. } => 50304,
            ValidationError::MalformedEntry { .. } => 50305,
            ValidationError::MissingCredential { field, .. } => match field {
                Credential::Community => 50401,
                Credential::Secname => 50403,
                Credential::AuthProtocol | Credential::AuthPassword => 50405,
                Credential::PrivProtocol | Credential::PrivPassword => 50406,
            },
            ValidationError::ForbiddenCredential { field, .. } => match field {
                Credential::Community => 50404,
                _ => 50402,
            },
            ValidationError::InvalidPort { .. } => 50407,
            ValidationError::UnauthenticatedTarget { .. } => 50501,
            ValidationError::AmbiguousTarget { .. } => 50502,
            ValidationError::InvalidOidAddress { .. } => 50601,
            ValidationError::InvalidMultiplier { .. } => 50602,
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingSection { daemon } => {
                write!(f, "missing top-level '{}' section", daemon)
            }
            ValidationError::MissingKey { daemon, key } => {
                write!(f, "daemon '{}': missing required key '{}'", daemon, key)
            }
            ValidationError::WrongType {
                daemon,
                key,
                expected,
                found,
            } => write!(
                f,
                "daemon '{}': '{}' must be {}, found {}",
                daemon, key, expected, found
            ),
            ValidationError::NonPositiveInterval { daemon, value } => write!(
                f,
                "daemon '{}': polling_interval must be a positive integer, found {}",
                daemon, value
            ),
            ValidationError::MalformedEntry {
                section,
                index,
                group,
                reason,
            } => match group {
                Some(name) => write!(f, "{}[{}] ('{}'): {}", section, index, name, reason),
                None => write!(f, "{}[{}]: {}", section, index, reason),
            },
            ValidationError::MissingCredential {
                group,
                version,
                field,
            } => match field {
                Credential::AuthPassword => write!(
                    f,
                    "auth group '{}': snmp_authpassword is required when snmp_authprotocol is set",
                    group
                ),
                Credential::PrivPassword => write!(
                    f,
                    "auth group '{}': snmp_privpassword is required when snmp_privprotocol is set",
                    group
                ),
                _ => write!(
                    f,
                    "auth group '{}': {} is required for SNMP {}",
                    group,
                    field.key(),
                    version
                ),
            },
            ValidationError::ForbiddenCredential {
                group,
                version,
                field,
            } => write!(
                f,
                "auth group '{}': {} must be absent for SNMP {}",
                group,
                field.key(),
                version
            ),
            ValidationError::InvalidPort { group } => write!(
                f,
                "auth group '{}': snmp_port must be between 1 and 65535",
                group
            ),
            ValidationError::UnauthenticatedTarget {
                target,
                polling_group,
            } => write!(
                f,
                "unauthenticated target: {} (polling group '{}' has no matching auth group)",
                target, polling_group
            ),
            ValidationError::AmbiguousTarget {
                target,
                auth_groups,
            } => write!(
                f,
                "ambiguous target: {} is listed by auth groups '{}'",
                target,
                auth_groups.join("', '")
            ),
            ValidationError::InvalidOidAddress { group, address } => write!(
                f,
                "polling group '{}': '{}' is not a dotted-numeric OID",
                group, address
            ),
            ValidationError::InvalidMultiplier {
                group,
                address,
                multiplier,
            } => write!(
                f,
                "polling group '{}': multiplier for {} must be a positive number, found {}",
                group, address, multiplier
            ),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Loads a daemon's persisted section and validates it.
pub struct Validator<'a> {
    store: &'a dyn DaemonConfigStore,
    strictness: Strictness,
}

impl<'a> Validator<'a> {
    pub fn new(store: &'a dyn DaemonConfigStore, strictness: Strictness) -> Self {
        Self { store, strictness }
    }

    /// Re-read and validate; nothing is cached between calls.
    pub fn validate(&self, daemon: &DaemonName) -> Result<DaemonConfig, SetupError> {
        let section = self.store.load_section(daemon)?;
        match validate_section(daemon.as_str(), section.as_ref(), self.strictness) {
            Ok(config) => {
                info!(
                    daemon = %daemon,
                    polling_groups = config.polling_groups.len(),
                    auth_groups = config.auth_groups.len(),
                    targets = config.polled_targets().len(),
                    "Configuration valid"
                );
                Ok(config)
            }
            Err(errors) => {
                for e in &errors {
                    error!(daemon = %daemon, code = e.code(), "{}", e);
                }
                Err(SetupError::Validation {
                    daemon: daemon.to_string(),
                    errors,
                })
            }
        }
    }
}

/// Validate one daemon section without touching storage.
pub fn validate_section(
    daemon: &str,
    section: Option<&Mapping>,
    strictness: Strictness,
) -> Result<DaemonConfig, Vec<ValidationError>> {
    let Some(section) = section else {
        return Err(vec![ValidationError::MissingSection {
            daemon: daemon.to_string(),
        }]);
    };

    let config = check_shape(daemon, section, strictness)?;

    let mut errors = Vec::new();
    for group in &config.auth_groups {
        errors.extend(check_auth_group(group));
    }
    errors.extend(check_resolution(&config));
    for group in &config.polling_groups {
        errors.extend(check_oids(group));
    }

    if errors.is_empty() {
        Ok(config)
    } else {
        Err(errors)
    }
}

fn check_shape(
    daemon: &str,
    section: &Mapping,
    strictness: Strictness,
) -> Result<DaemonConfig, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let polling_interval = match section.get("polling_interval") {
        None => {
            errors.push(ValidationError::MissingKey {
                daemon: daemon.to_string(),
                key: "polling_interval",
            });
            None
        }
        Some(Value::Number(n)) => match (n.as_u64(), n.as_i64()) {
            (Some(0), _) | (None, Some(_)) => {
                errors.push(ValidationError::NonPositiveInterval {
                    daemon: daemon.to_string(),
                    value: n.to_string(),
                });
                None
            }
            (Some(interval), _) => Some(interval),
            (None, None) => {
                errors.push(ValidationError::WrongType {
                    daemon: daemon.to_string(),
                    key: "polling_interval",
                    expected: "a positive integer",
                    found: describe(&Value::Number(n.clone())),
                });
                None
            }
        },
        Some(other) => {
            errors.push(ValidationError::WrongType {
                daemon: daemon.to_string(),
                key: "polling_interval",
                expected: "a positive integer",
                found: describe(other),
            });
            None
        }
    };

    let polling_groups: Vec<PollingGroup> =
        parse_entries(daemon, section, "polling_groups", strictness, &mut errors);
    let auth_groups: Vec<AuthGroup> =
        parse_entries(daemon, section, "auth_groups", strictness, &mut errors);

    match polling_interval {
        Some(polling_interval) if errors.is_empty() => Ok(DaemonConfig {
            polling_interval,
            polling_groups,
            auth_groups,
        }),
        _ => Err(errors),
    }
}

fn parse_entries<T: DeserializeOwned>(
    daemon: &str,
    section: &Mapping,
    key: &'static str,
    strictness: Strictness,
    errors: &mut Vec<ValidationError>,
) -> Vec<T> {
    let entries = match section.get(key) {
        None => {
            if strictness == Strictness::Startup {
                errors.push(ValidationError::MissingKey {
                    daemon: daemon.to_string(),
                    key,
                });
            } else {
                info!(daemon, section = key, "Section not configured yet");
            }
            return Vec::new();
        }
        Some(Value::Sequence(entries)) => entries,
        Some(other) => {
            errors.push(ValidationError::WrongType {
                daemon: daemon.to_string(),
                key,
                expected: "a sequence",
                found: describe(other),
            });
            return Vec::new();
        }
    };

    let mut parsed = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        match serde_yaml::from_value::<T>(entry.clone()) {
            Ok(item) => parsed.push(item),
            Err(e) => errors.push(ValidationError::MalformedEntry {
                section: key,
                index,
                group: entry
                    .get("group_name")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                reason: e.to_string(),
            }),
        }
    }
    parsed
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean {}", b),
        Value::Number(n) => format!("number {}", n),
        Value::String(s) => format!("string '{}'", s),
        Value::Sequence(_) => "a sequence".to_string(),
        Value::Mapping(_) => "a mapping".to_string(),
        Value::Tagged(t) => format!("tagged value {}", t.tag),
    }
}

/// Blank strings count as absent.
fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

fn check_auth_group(group: &AuthGroup) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let version = group.snmp_version;
    let missing = |field| ValidationError::MissingCredential {
        group: group.group_name.clone(),
        version,
        field,
    };
    let forbidden = |field| ValidationError::ForbiddenCredential {
        group: group.group_name.clone(),
        version,
        field,
    };

    if version.uses_community() {
        if !is_set(&group.snmp_community) {
            errors.push(missing(Credential::Community));
        }
        let usm_fields = [
            (Credential::Secname, is_set(&group.snmp_secname)),
            (Credential::AuthProtocol, group.snmp_authprotocol.is_some()),
            (Credential::AuthPassword, is_set(&group.snmp_authpassword)),
            (Credential::PrivProtocol, group.snmp_privprotocol.is_some()),
            (Credential::PrivPassword, is_set(&group.snmp_privpassword)),
        ];
        for (field, present) in usm_fields {
            if present {
                errors.push(forbidden(field));
            }
        }
    } else {
        if !is_set(&group.snmp_secname) {
            errors.push(missing(Credential::Secname));
        }
        if is_set(&group.snmp_community) {
            errors.push(forbidden(Credential::Community));
        }
        if group.snmp_authprotocol.is_some() && !is_set(&group.snmp_authpassword) {
            errors.push(missing(Credential::AuthPassword));
        }
        if group.snmp_privprotocol.is_some() && !is_set(&group.snmp_privpassword) {
            errors.push(missing(Credential::PrivPassword));
        }
        if group.snmp_authprotocol.is_none() && is_set(&group.snmp_authpassword) {
            warn!(group = %group.group_name, "snmp_authpassword set without snmp_authprotocol; it is ignored");
        }
        if group.snmp_privprotocol.is_none() && is_set(&group.snmp_privpassword) {
            warn!(group = %group.group_name, "snmp_privpassword set without snmp_privprotocol; it is ignored");
        }
    }

    if !(1..=i64::from(u16::MAX)).contains(&group.snmp_port) {
        errors.push(ValidationError::InvalidPort {
            group: group.group_name.clone(),
        });
    }
    errors
}

fn check_resolution(config: &DaemonConfig) -> Vec<ValidationError> {
    let resolution = TargetResolution::build(&config.auth_groups);
    let mut seen = BTreeSet::new();
    let mut errors = Vec::new();

    for group in &config.polling_groups {
        for target in &group.ip_targets {
            let target = target.trim();
            if !seen.insert(target) {
                continue;
            }
            match resolution.resolve(target) {
                Ok(_) => {}
                Err(ResolutionFailure::Unauthenticated) => {
                    errors.push(ValidationError::UnauthenticatedTarget {
                        target: target.to_string(),
                        polling_group: group.group_name.clone(),
                    })
                }
                Err(ResolutionFailure::Ambiguous(auth_groups)) => {
                    errors.push(ValidationError::AmbiguousTarget {
                        target: target.to_string(),
                        auth_groups,
                    })
                }
            }
        }
    }
    errors
}

/// Digits and dots only, optional leading dot, no empty segments.
fn is_valid_oid(address: &str) -> bool {
    let body = address.strip_prefix('.').unwrap_or(address);
    !body.is_empty()
        && body
            .split('.')
            .all(|segment| !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()))
}

fn check_oids(group: &PollingGroup) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if group.oids.is_empty() {
        warn!(group = %group.group_name, "Polling group has no OIDs");
    }
    for oid in &group.oids {
        if !is_valid_oid(&oid.address) {
            errors.push(ValidationError::InvalidOidAddress {
                group: group.group_name.clone(),
                address: oid.address.clone(),
            });
        }
        if !(oid.multiplier.is_finite() && oid.multiplier > 0.0) {
            errors.push(ValidationError::InvalidMultiplier {
                group: group.group_name.clone(),
                address: oid.address.clone(),
                multiplier: oid.multiplier,
            });
        }
    }
    errors
}
