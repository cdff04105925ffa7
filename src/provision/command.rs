//! Command execution port so provisioning can be exercised without root.

use crate::error::ProvisionError;
use std::fmt;
use std::process::Command;
use tracing::debug;

/// Program plus arguments, run without a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Build from a whitespace-separated command line.
    pub fn from_line(line: &str) -> Self {
        let mut parts = line.split_whitespace();
        let program = parts.next().unwrap_or_default();
        Self::new(program, parts)
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Exit state of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    pub success: bool,
    pub code: Option<i32>,
    pub stderr: String,
}

impl CommandOutcome {
    pub fn ok() -> Self {
        Self {
            success: true,
            code: Some(0),
            stderr: String::new(),
        }
    }

    /// Failure reason suitable for an error message.
    pub fn describe_failure(&self) -> String {
        let status = match self.code {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        };
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            status
        } else {
            format!("{}: {}", status, stderr)
        }
    }
}

pub trait CommandRunner {
    /// Run to completion. `Err` only when the command could not be started.
    fn run(&self, command: &CommandSpec) -> Result<CommandOutcome, ProvisionError>;

    /// Run and treat a non-zero exit as an error.
    fn run_checked(&self, command: &CommandSpec) -> Result<(), ProvisionError> {
        let outcome = self.run(command)?;
        if outcome.success {
            Ok(())
        } else {
            Err(ProvisionError::Command {
                command: command.to_string(),
                reason: outcome.describe_failure(),
            })
        }
    }
}

/// Runs commands on the host with `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &CommandSpec) -> Result<CommandOutcome, ProvisionError> {
        debug!(command = %command, "Running command");
        let output = Command::new(&command.program)
            .args(&command.args)
            .output()
            .map_err(|e| ProvisionError::Command {
                command: command.to_string(),
                reason: format!("failed to start: {}", e),
            })?;

        Ok(CommandOutcome {
            success: output.status.success(),
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
