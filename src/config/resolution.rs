//! Target resolution: which auth group authenticates a given polling target.
//!
//! Built fresh from the auth groups on every validation pass and never persisted.

use crate::config::schema::AuthGroup;
use std::collections::BTreeMap;

/// Why a target did not resolve to exactly one auth group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionFailure {
    /// No auth group lists the target.
    Unauthenticated,
    /// Several auth groups list the target; holds their names in config order.
    Ambiguous(Vec<String>),
}

/// Map from trimmed target string to the indices of auth groups listing it.
#[derive(Debug)]
pub struct TargetResolution<'a> {
    groups: &'a [AuthGroup],
    by_target: BTreeMap<&'a str, Vec<usize>>,
}

impl<'a> TargetResolution<'a> {
    pub fn build(groups: &'a [AuthGroup]) -> Self {
        let mut by_target: BTreeMap<&'a str, Vec<usize>> = BTreeMap::new();
        for (index, group) in groups.iter().enumerate() {
            for target in &group.ip_targets {
                let owners = by_target.entry(target.trim()).or_default();
                // A target repeated inside one group is still a single match.
                if owners.last() != Some(&index) {
                    owners.push(index);
                }
            }
        }
        Self { groups, by_target }
    }

    pub fn resolve(&self, target: &str) -> Result<&'a AuthGroup, ResolutionFailure> {
        match self.by_target.get(target.trim()).map(Vec::as_slice) {
            None | Some([]) => Err(ResolutionFailure::Unauthenticated),
            Some([only]) => Ok(&self.groups[*only]),
            Some(many) => Err(ResolutionFailure::Ambiguous(
                many.iter()
                    .map(|i| self.groups[*i].group_name.clone())
                    .collect(),
            )),
        }
    }
}
