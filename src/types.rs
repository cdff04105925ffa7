//! Daemon identity types shared across configuration and provisioning.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Daemons shipped with the SNMP agent package.
pub const KNOWN_DAEMONS: &[&str] = &["pattoo_agent_snmpd", "pattoo_agent_snmp_ifmibd"];

/// Identifier of a polling daemon.
///
/// Doubles as the YAML filename stem and as the single top-level key inside
/// that file, so it is restricted to characters that are safe in both places.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DaemonName(String);

impl DaemonName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this daemon belongs to the shipped catalog.
    pub fn is_known(&self) -> bool {
        KNOWN_DAEMONS.contains(&self.0.as_str())
    }

    /// The full shipped catalog.
    pub fn catalog() -> Vec<DaemonName> {
        KNOWN_DAEMONS
            .iter()
            .map(|name| DaemonName((*name).to_string()))
            .collect()
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl FromStr for DaemonName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_valid_name(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(format!(
                "Invalid daemon name '{}': only letters, digits, '_' and '-' are allowed",
                s
            ))
        }
    }
}

impl TryFrom<String> for DaemonName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DaemonName> for String {
    fn from(name: DaemonName) -> Self {
        name.0
    }
}

impl fmt::Display for DaemonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
