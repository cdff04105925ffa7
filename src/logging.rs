//! Logging System
//!
//! Structured logging through `tracing`. Level, format and destination come from
//! the shared `pattoo.yaml` settings and the `--verbose` flag, and can be
//! overridden with `PATTOO_LOG`, `PATTOO_LOG_FORMAT` and `PATTOO_LOG_OUTPUT`.

use crate::config::SharedConfig;
use crate::error::SetupError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

pub const LOG_ENV: &str = "PATTOO_LOG";
pub const LOG_FORMAT_ENV: &str = "PATTOO_LOG_FORMAT";
pub const LOG_OUTPUT_ENV: &str = "PATTOO_LOG_OUTPUT";

/// File name used under `log_directory` when logging to a file.
pub const LOG_FILE_NAME: &str = "pattoo-snmp-setup.log";

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path, required when output is "file"
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Colored output (text format on a terminal stream only)
    #[serde(default = "default_true")]
    pub color: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

// stdout carries command reports
fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
        }
    }
}

impl LoggingConfig {
    /// Derive from the shared settings; `verbose` forces debug.
    pub fn from_shared(shared: &SharedConfig, verbose: bool) -> Self {
        Self {
            level: if verbose {
                "debug".to_string()
            } else {
                shared.log_level.clone()
            },
            file: shared
                .log_directory
                .as_ref()
                .map(|dir| dir.join(LOG_FILE_NAME)),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    Stdout,
    Stderr,
    File,
}

/// Initialize the global subscriber.
///
/// Priority order (highest to lowest):
/// 1. Environment variables (PATTOO_LOG, PATTOO_LOG_FORMAT, PATTOO_LOG_OUTPUT)
/// 2. The given config
/// 3. Defaults
pub fn init_logging(config: &LoggingConfig) -> Result<(), SetupError> {
    let filter = build_env_filter(config)?;
    let format = resolve_format(std::env::var(LOG_FORMAT_ENV).ok(), &config.format)?;
    let output = resolve_output(std::env::var(LOG_OUTPUT_ENV).ok(), &config.output)?;
    let ansi = config.color && output != Output::File;

    let writer = match output {
        Output::Stdout => BoxMakeWriter::new(std::io::stdout),
        Output::Stderr => BoxMakeWriter::new(std::io::stderr),
        Output::File => BoxMakeWriter::new(Mutex::new(open_log_file(config)?)),
    };

    let registry = Registry::default().with(filter);
    let result = match format {
        Format::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(writer),
            )
            .try_init(),
        Format::Text => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(ansi)
                    .with_writer(writer),
            )
            .try_init(),
    };

    result.map_err(|e| SetupError::Config(format!("Failed to initialize logging: {}", e)))
}

fn open_log_file(config: &LoggingConfig) -> Result<std::fs::File, SetupError> {
    let path = config.file.as_ref().ok_or_else(|| {
        SetupError::Config("Log output is 'file' but no log_directory is configured".to_string())
    })?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| SetupError::Config(format!("Failed to create log directory: {}", e)))?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| {
            SetupError::Config(format!("Failed to open log file {}: {}", path.display(), e))
        })
}

fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, SetupError> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return Ok(filter);
    }
    EnvFilter::try_new(&config.level)
        .map_err(|e| SetupError::Config(format!("Invalid log level '{}': {}", config.level, e)))
}

fn resolve_format(env: Option<String>, configured: &str) -> Result<Format, SetupError> {
    match env.as_deref().unwrap_or(configured) {
        "text" => Ok(Format::Text),
        "json" => Ok(Format::Json),
        other => Err(SetupError::Config(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            other
        ))),
    }
}

fn resolve_output(env: Option<String>, configured: &str) -> Result<Output, SetupError> {
    match env.as_deref().unwrap_or(configured) {
        "stdout" => Ok(Output::Stdout),
        "stderr" => Ok(Output::Stderr),
        "file" => Ok(Output::File),
        other => Err(SetupError::Config(format!(
            "Invalid log output: {} (must be 'stdout', 'stderr' or 'file')",
            other
        ))),
    }
}
