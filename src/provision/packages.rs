//! OS package dependencies for the SNMP daemons, selected per distribution family.

use crate::error::ProvisionError;
use crate::provision::command::{CommandRunner, CommandSpec};
use std::fmt;
use std::path::Path;
use tracing::{info, warn};

/// Manual installation guide shown when the distribution is not in the table.
pub const NET_SNMP_GUIDE_URL: &str = "http://www.net-snmp.org/docs/INSTALL.html";

const OS_RELEASE_PATH: &str = "/etc/os-release";
const DEFAULT_OS_ID: &str = "linux";

const DEBIAN_COMMANDS: &[&str] = &[
    "sudo apt-get install -y libsnmp-dev snmp-mibs-downloader",
    "sudo apt-get install -y gcc",
];

const RHEL_COMMANDS: &[&str] = &[
    "sudo yum install -y net-snmp-devel",
    "sudo yum install -y gcc",
];

/// Distribution family, as far as dependency installation cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Distribution {
    Debian,
    Rhel,
    Unsupported(String),
}

const FAMILIES: &[(&str, Distribution)] = &[
    ("debian", Distribution::Debian),
    ("ubuntu", Distribution::Debian),
    ("rhel", Distribution::Rhel),
    ("centos", Distribution::Rhel),
];

impl Distribution {
    /// Map an os-release `ID` to its family.
    pub fn from_id(id: &str) -> Self {
        let id = id.trim().trim_matches(|c| c == '"' || c == '\'').to_lowercase();
        FAMILIES
            .iter()
            .find(|(known, _)| *known == id)
            .map(|(_, family)| family.clone())
            .unwrap_or(Distribution::Unsupported(id))
    }

    /// Family named by the `ID=` line of os-release content.
    ///
    /// os-release(5) makes `ID` optional with a default of `linux`.
    pub fn parse_os_release(content: &str) -> Self {
        content
            .lines()
            .filter_map(|line| line.trim().strip_prefix("ID="))
            .next()
            .map(Self::from_id)
            .unwrap_or_else(|| Self::from_id(DEFAULT_OS_ID))
    }

    pub fn detect() -> Self {
        Self::detect_from(Path::new(OS_RELEASE_PATH))
    }

    /// An unreadable file yields an unnamed unsupported distribution.
    pub fn detect_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::parse_os_release(&content),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cannot read os-release");
                Distribution::Unsupported(String::new())
            }
        }
    }

    /// Install commands for this family; empty when unsupported.
    pub fn install_commands(&self) -> Vec<CommandSpec> {
        let lines: &[&str] = match self {
            Distribution::Debian => DEBIAN_COMMANDS,
            Distribution::Rhel => RHEL_COMMANDS,
            Distribution::Unsupported(_) => &[],
        };
        lines.iter().map(|line| CommandSpec::from_line(line)).collect()
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distribution::Debian => f.write_str("debian"),
            Distribution::Rhel => f.write_str("rhel"),
            Distribution::Unsupported(id) if id.is_empty() => f.write_str("unknown"),
            Distribution::Unsupported(id) => f.write_str(id),
        }
    }
}

/// Result of the dependency step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageOutcome {
    Installed { commands: Vec<String> },
    Unsupported { distribution: String, guide: &'static str },
}

/// Run the install commands for `distribution`. Unsupported systems only warn.
pub fn install_dependencies(
    distribution: &Distribution,
    runner: &dyn CommandRunner,
) -> Result<PackageOutcome, ProvisionError> {
    if let Distribution::Unsupported(id) = distribution {
        warn!(
            distribution = %id,
            guide = NET_SNMP_GUIDE_URL,
            "Unsupported distribution, install net-snmp development packages manually"
        );
        return Ok(PackageOutcome::Unsupported {
            distribution: distribution.to_string(),
            guide: NET_SNMP_GUIDE_URL,
        });
    }

    info!(distribution = %distribution, "Installing SNMP dependencies");
    let mut commands = Vec::new();
    for command in distribution.install_commands() {
        runner.run_checked(&command)?;
        commands.push(command.to_string());
    }
    Ok(PackageOutcome::Installed { commands })
}
