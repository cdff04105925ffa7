//! CLI command-name contract for logging.

use crate::cli::parse::Commands;

/// Command name recorded on log events (e.g. "install", "validate").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Install { .. } => "install",
        Commands::Validate { .. } => "validate",
        Commands::Defaults { .. } => "defaults",
    }
}
