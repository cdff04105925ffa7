//! CLI domain: parse, route, help, output, and presentation only.
//! No provisioning logic; the route table dispatches to the installer and validator.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands, OutputFormat};
pub use presentation::{
    format_defaults, format_install_summary, format_validation_json, format_validation_text,
    DaemonValidationReport, TargetRow,
};
pub use route::RunContext;
