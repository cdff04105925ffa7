//! Validate command presentation: per-target resolution table or JSON.

use crate::config::{DaemonConfig, TargetResolution};
use crate::error::SetupError;
use crate::types::DaemonName;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::Serialize;

/// One polled target and the auth group it resolved to.
#[derive(Debug, Clone, Serialize)]
pub struct TargetRow {
    pub polling_group: String,
    pub target: String,
    pub auth_group: String,
    pub snmp_version: String,
    pub snmp_port: i64,
    pub oids: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DaemonValidationReport {
    pub daemon: String,
    pub polling_interval: u64,
    pub targets: Vec<TargetRow>,
}

impl DaemonValidationReport {
    pub fn from_config(daemon: &DaemonName, config: &DaemonConfig) -> Self {
        let resolution = TargetResolution::build(&config.auth_groups);
        let mut targets = Vec::new();
        for group in &config.polling_groups {
            for target in &group.ip_targets {
                let (auth_group, snmp_version, snmp_port) = match resolution.resolve(target) {
                    Ok(auth) => (
                        auth.group_name.clone(),
                        auth.snmp_version.to_string(),
                        auth.snmp_port,
                    ),
                    Err(_) => ("-".to_string(), "-".to_string(), 0),
                };
                targets.push(TargetRow {
                    polling_group: group.group_name.clone(),
                    target: target.trim().to_string(),
                    auth_group,
                    snmp_version,
                    snmp_port,
                    oids: group.oids.len(),
                });
            }
        }
        Self {
            daemon: daemon.to_string(),
            polling_interval: config.polling_interval,
            targets,
        }
    }
}

pub fn format_validation_text(reports: &[DaemonValidationReport]) -> String {
    let mut sections = Vec::new();
    for report in reports {
        let mut s = format!(
            "{} {} (polling every {}s)",
            "✓".green(),
            report.daemon,
            report.polling_interval
        );
        if report.targets.is_empty() {
            s.push_str("\n  No polling targets configured.");
        } else {
            let mut table = Table::new();
            table.load_preset(UTF8_FULL);
            table.set_header(vec![
                "Polling Group",
                "Target",
                "Auth Group",
                "Version",
                "Port",
                "OIDs",
            ]);
            for row in &report.targets {
                table.add_row(vec![
                    row.polling_group.clone(),
                    row.target.clone(),
                    row.auth_group.clone(),
                    row.snmp_version.clone(),
                    row.snmp_port.to_string(),
                    row.oids.to_string(),
                ]);
            }
            s.push('\n');
            s.push_str(&table.to_string());
        }
        sections.push(s);
    }
    sections.join("\n\n")
}

pub fn format_validation_json(reports: &[DaemonValidationReport]) -> Result<String, SetupError> {
    serde_json::to_string_pretty(reports)
        .map_err(|e| SetupError::Config(format!("Failed to render JSON: {}", e)))
}
