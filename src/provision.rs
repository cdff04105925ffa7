//! External collaborators used by the installer: command execution, the service
//! account and its directories, and OS package installation.

pub mod account;
pub mod command;
pub mod packages;

pub use account::{AccountProvisioner, ServiceAccount, SystemProvisioner};
pub use command::{CommandOutcome, CommandRunner, CommandSpec, SystemRunner};
pub use packages::{install_dependencies, Distribution, PackageOutcome, NET_SNMP_GUIDE_URL};
