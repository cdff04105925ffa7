//! Install command presentation.

use crate::install::InstallSummary;
use crate::provision::PackageOutcome;
use owo_colors::OwoColorize;

pub fn format_install_summary(summary: &InstallSummary) -> String {
    let mut output = String::from("Provisioning pattoo SNMP daemons...\n\n");

    output.push_str("Dependencies:\n");
    match &summary.packages {
        PackageOutcome::Installed { commands } => {
            for command in commands {
                output.push_str(&format!("  {} {}\n", "✓".green(), command));
            }
        }
        PackageOutcome::Unsupported {
            distribution,
            guide,
        } => {
            output.push_str(&format!(
                "  {} unsupported distribution '{}', install net-snmp manually: {}\n",
                "!".yellow(),
                distribution,
                guide
            ));
        }
    }
    output.push('\n');

    let account_state = if summary.account_created {
        "created"
    } else {
        "already exists"
    };
    output.push_str(&format!(
        "Service account: {} ({})\n",
        summary.account.name, account_state
    ));
    output.push_str(&format!(
        "Configuration directory: {}\n",
        summary.config_dir.display()
    ));
    for dir in &summary.runtime_directories {
        output.push_str(&format!("Runtime directory: {}\n", dir.display()));
    }
    output.push('\n');

    output.push_str("Daemons:\n");
    for report in &summary.daemons {
        let action = if report.created { "created" } else { "merged" };
        output.push_str(&format!(
            "  {} {} ({}) {}\n",
            "✓".green(),
            report.daemon,
            action,
            report.path.display()
        ));
        if !report.filled_keys.is_empty() {
            output.push_str(&format!(
                "    filled from defaults: {}\n",
                report.filled_keys.join(", ")
            ));
        }
        if report.polling_groups == 0 && report.auth_groups == 0 {
            output.push_str(&format!(
                "    {} no polling_groups or auth_groups yet; add them before starting the daemon\n",
                "!".yellow()
            ));
        }
    }
    output.push_str("\nProvisioning complete.");
    output
}
