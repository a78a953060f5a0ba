//! Desired routing-rule resources.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::manifest::aggregate::{HostGroup, RouteGroup};

/// Value the management marker annotation must carry.
pub const MANAGED_VALUE: &str = "true";

/// A routing-rule resource the engine wants to exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DesiredResource {
    /// Resource name, identical to the route group name.
    pub name: String,

    /// Annotations to write; always contains the management marker.
    pub annotations: BTreeMap<String, String>,

    /// Host rules, sorted by host.
    pub rules: Vec<HostGroup>,
}

impl DesiredResource {
    /// Returns true if this resource carries the given marker set to `"true"`.
    pub fn is_managed(&self, marker_key: &str) -> bool {
        self.annotations.get(marker_key).map(String::as_str) == Some(MANAGED_VALUE)
    }
}

/// Render route groups into desired resources, one per group.
pub fn build(groups: Vec<RouteGroup>, marker_key: &str) -> Vec<DesiredResource> {
    let mut desired: Vec<DesiredResource> = groups
        .into_iter()
        .map(|group| {
            let mut annotations = BTreeMap::new();
            annotations.insert(marker_key.to_string(), MANAGED_VALUE.to_string());

            let mut rules = group.hosts;
            rules.sort_by(|a, b| a.host.cmp(&b.host));
            for host in &mut rules {
                host.paths.sort();
            }

            DesiredResource {
                name: group.name,
                annotations,
                rules,
            }
        })
        .collect();

    desired.sort_by(|a, b| a.name.cmp(&b.name));
    desired
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::aggregate::PathRule;

    fn path(p: &str) -> PathRule {
        PathRule { path: p.into(), service: "web".into(), port: 80 }
    }

    #[test]
    fn test_one_resource_per_group_with_marker() {
        let groups = vec![
            RouteGroup {
                name: "staging".into(),
                hosts: vec![HostGroup { host: "b.example.com".into(), paths: vec![path("/x")] }],
            },
            RouteGroup {
                name: "production".into(),
                hosts: vec![HostGroup { host: "a.example.com".into(), paths: vec![path("/")] }],
            },
        ];

        let desired = build(groups, "managed");
        assert_eq!(desired.len(), 2);
        assert_eq!(desired[0].name, "production");
        assert_eq!(desired[1].name, "staging");
        assert!(desired.iter().all(|d| d.is_managed("managed")));
        assert!(!desired[0].is_managed("other"));
    }

    #[test]
    fn test_sorts_unsorted_groups() {
        let groups = vec![RouteGroup {
            name: "g".into(),
            hosts: vec![
                HostGroup { host: "z.example.com".into(), paths: vec![path("/b"), path("/a")] },
                HostGroup { host: "a.example.com".into(), paths: vec![path("/")] },
            ],
        }];

        let desired = build(groups, "managed");
        let rules = &desired[0].rules;
        assert_eq!(rules[0].host, "a.example.com");
        assert_eq!(rules[1].host, "z.example.com");
        assert_eq!(rules[1].paths[0].path, "/a");
    }
}
