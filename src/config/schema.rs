//! Typed view of a daemon configuration section.
//!
//! These types describe a section that has already passed the shape check. The
//! on-disk merge operates on raw YAML mappings instead, so keys this crate does
//! not know about survive a provisioning run untouched.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::fmt;

/// Default UDP port for SNMP agents.
pub const DEFAULT_SNMP_PORT: u16 = 161;

/// Scaling factor applied when an OID entry omits `multiplier`.
pub const DEFAULT_MULTIPLIER: f64 = 1.0;

fn default_snmp_port() -> i64 {
    i64::from(DEFAULT_SNMP_PORT)
}

fn default_multiplier() -> f64 {
    DEFAULT_MULTIPLIER
}

/// Validated configuration for one daemon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Seconds between poll cycles; always positive.
    pub polling_interval: u64,

    #[serde(default)]
    pub polling_groups: Vec<PollingGroup>,

    #[serde(default)]
    pub auth_groups: Vec<AuthGroup>,
}

impl DaemonConfig {
    /// Render as the mapping stored under the daemon's top-level key.
    pub fn to_section(&self) -> Result<Mapping, serde_yaml::Error> {
        match serde_yaml::to_value(self)? {
            Value::Mapping(mapping) => Ok(mapping),
            _ => Ok(Mapping::new()),
        }
    }

    /// Every distinct target referenced by a polling group, in first-seen order.
    pub fn polled_targets(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for group in &self.polling_groups {
            for target in &group.ip_targets {
                let target = target.trim();
                if !seen.contains(&target) {
                    seen.push(target);
                }
            }
        }
        seen
    }
}

/// Hosts plus the OIDs sampled from each of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollingGroup {
    /// Label only; never used to join against auth groups.
    pub group_name: String,
    pub ip_targets: Vec<String>,
    pub oids: Vec<OidSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OidSpec {
    pub address: String,

    /// Pure scale factor, e.g. 8 converts octet counters to bits.
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

/// Credential profile for a set of hosts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthGroup {
    pub group_name: String,
    pub ip_targets: Vec<String>,
    pub snmp_version: SnmpVersion,

    /// Kept wide so out-of-range values reach the port rule.
    #[serde(default = "default_snmp_port")]
    pub snmp_port: i64,

    #[serde(default)]
    pub snmp_community: Option<String>,

    #[serde(default)]
    pub snmp_secname: Option<String>,

    #[serde(default)]
    pub snmp_authprotocol: Option<AuthProtocol>,

    #[serde(default)]
    pub snmp_authpassword: Option<String>,

    #[serde(default)]
    pub snmp_privprotocol: Option<PrivProtocol>,

    #[serde(default)]
    pub snmp_privpassword: Option<String>,
}

impl AuthGroup {
    /// Community-based v1/v2c group with no USM fields.
    pub fn community(group_name: &str, community: &str, targets: &[&str]) -> Self {
        Self {
            group_name: group_name.to_string(),
            ip_targets: targets.iter().map(|t| t.to_string()).collect(),
            snmp_version: SnmpVersion::V2c,
            snmp_port: default_snmp_port(),
            snmp_community: Some(community.to_string()),
            snmp_secname: None,
            snmp_authprotocol: None,
            snmp_authpassword: None,
            snmp_privprotocol: None,
            snmp_privpassword: None,
        }
    }

    /// USM (v3) group with only a security name set.
    pub fn usm(group_name: &str, secname: &str, targets: &[&str]) -> Self {
        Self {
            snmp_version: SnmpVersion::V3,
            snmp_community: None,
            snmp_secname: Some(secname.to_string()),
            ..Self::community(group_name, "", targets)
        }
    }
}

/// SNMP protocol version, stored on disk as the integers 1, 2 and 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum SnmpVersion {
    V1,
    V2c,
    V3,
}

impl SnmpVersion {
    /// v1 and v2c authenticate with a community string.
    pub fn uses_community(self) -> bool {
        matches!(self, SnmpVersion::V1 | SnmpVersion::V2c)
    }
}

impl TryFrom<u8> for SnmpVersion {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(SnmpVersion::V1),
            2 => Ok(SnmpVersion::V2c),
            3 => Ok(SnmpVersion::V3),
            other => Err(format!(
                "unsupported snmp_version {}, expected 1, 2 or 3",
                other
            )),
        }
    }
}

impl From<SnmpVersion> for u8 {
    fn from(version: SnmpVersion) -> Self {
        match version {
            SnmpVersion::V1 => 1,
            SnmpVersion::V2c => 2,
            SnmpVersion::V3 => 3,
        }
    }
}

impl fmt::Display for SnmpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnmpVersion::V1 => f.write_str("v1"),
            SnmpVersion::V2c => f.write_str("v2c"),
            SnmpVersion::V3 => f.write_str("v3"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuthProtocol {
    Md5,
    Sha,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PrivProtocol {
    Des,
    Aes,
    Aes192,
    Aes256,
}
