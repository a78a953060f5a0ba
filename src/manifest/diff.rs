//! Orphan detection.
//!
//! Matching is by name only. A desired resource whose content changed keeps
//! its name and is updated in place, never deleted.

use std::collections::HashSet;

use crate::manifest::desired::DesiredResource;
use crate::store::ObservedResource;

/// Observed managed resources with no desired counterpart.
pub fn orphans(desired: &[DesiredResource], observed: &[ObservedResource]) -> Vec<ObservedResource> {
    let wanted: HashSet<&str> = desired.iter().map(|d| d.name.as_str()).collect();

    observed
        .iter()
        .filter(|resource| !wanted.contains(resource.name.as_str()))
        .cloned()
        .collect()
}
