//! Integration tests for pattoo SNMP daemon provisioning and validation

mod cli_commands;
mod install_pipeline;
mod test_utils;
mod validation_scenarios;
