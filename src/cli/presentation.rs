//! CLI presentation: text and json formatters per command family.

mod defaults;
mod install;
mod validate;

pub use defaults::format_defaults;
pub use install::format_install_summary;
pub use validate::{
    format_validation_json, format_validation_text, DaemonValidationReport, TargetRow,
};
