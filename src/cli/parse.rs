//! CLI parse: clap types for pattoo-snmp-setup. No behavior; definitions only.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Provision and validate pattoo SNMP polling daemons
#[derive(Parser)]
#[command(name = "pattoo-snmp-setup")]
#[command(about = "Provision and validate configuration for pattoo SNMP polling daemons")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging (default: off)
    #[arg(long, global = true, default_value = "false")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Install dependencies, create the service account and write daemon configuration
    Install {
        /// Home directory for the service account
        home: PathBuf,
        /// Daemons to configure (default: all shipped daemons)
        daemons: Vec<String>,
    },
    /// Validate daemon configuration as a daemon would at startup
    Validate {
        /// Daemons to validate (default: all shipped daemons)
        daemons: Vec<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print the default configuration fragment for a daemon
    Defaults {
        /// Daemon name
        daemon: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
