//! pattoo-snmp-setup CLI Binary
//!
//! Command-line interface for provisioning and validating pattoo SNMP daemons.

use clap::Parser;
use pattoo_snmp_setup::cli::{command_name, map_error, Cli, RunContext};
use pattoo_snmp_setup::config::{load_shared_config, ConfigRoot};
use pattoo_snmp_setup::logging::{init_logging, LoggingConfig};
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    // Environment errors come before any file I/O, logging included
    let context = match RunContext::for_command(&cli.command) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    };

    let logging_config = build_logging_config(context.root(), cli.verbose);
    if let Err(e) = init_logging(&logging_config) {
        eprintln!("{}", map_error(&e));
        process::exit(1);
    }

    let command = command_name(&cli.command);
    info!(command, root = %context.root().path().display(), "pattoo-snmp-setup starting");

    match context.execute(&cli.command) {
        Ok(output) => {
            info!(command, "Command completed successfully");
            println!("{}", output);
        }
        Err(e) => {
            error!(command, code = e.code(), "Command failed: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    }
}

/// Logging settings from `pattoo.yaml`; an unreadable file falls back to defaults.
fn build_logging_config(root: &ConfigRoot, verbose: bool) -> LoggingConfig {
    let shared = load_shared_config(root).unwrap_or_default();
    LoggingConfig::from_shared(&shared, verbose)
}
