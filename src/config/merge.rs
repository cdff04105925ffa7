//! Shallow key-level merge of computed defaults into an existing daemon section.
//!
//! Existing keys always win, including ones whose value a later validation pass
//! will reject. Only keys missing entirely are filled from the defaults.

pub mod merge_policy;

use serde_yaml::{Mapping, Value};

/// Result of merging defaults into a daemon section.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    /// Section to persist under the daemon's top-level key.
    pub section: Mapping,
    /// Top-level keys that came from the defaults.
    pub filled_keys: Vec<String>,
    /// Whether an existing section was found on disk.
    pub existed: bool,
}

impl MergeOutcome {
    /// True when persisting `section` would not change the existing file's section.
    pub fn is_unchanged(&self) -> bool {
        self.existed && self.filled_keys.is_empty()
    }
}

/// Merge `defaults` into `existing`; an absent section is treated as empty.
///
/// Key order is preserved: existing keys keep their position and filled keys
/// are appended in the order the defaults list them.
pub fn merge_with_existing(defaults: &Mapping, existing: Option<&Mapping>) -> MergeOutcome {
    let mut section = existing.cloned().unwrap_or_default();
    let mut filled_keys = Vec::new();

    for (key, value) in defaults {
        if section.contains_key(key) {
            continue;
        }
        section.insert(key.clone(), value.clone());
        filled_keys.push(key_label(key));
    }

    MergeOutcome {
        section,
        filled_keys,
        existed: existing.is_some(),
    }
}

fn key_label(key: &Value) -> String {
    match key {
        Value::String(s) => s.clone(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_else(|_| format!("{:?}", other)),
    }
}
