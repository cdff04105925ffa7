//! pattoo-snmp-setup: provisioning and configuration validation for pattoo SNMP daemons
//!
//! Creates the service account and directories, installs OS dependencies, merges
//! computed defaults into each daemon's YAML configuration, and validates that
//! every polled target resolves to exactly one SNMP credential profile.

pub mod cli;
pub mod config;
pub mod error;
pub mod install;
pub mod logging;
pub mod provision;
pub mod types;
