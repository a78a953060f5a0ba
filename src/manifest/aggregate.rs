//! Declaration aggregation.
//!
//! Groups declarations by group name, then by host. Output is sorted so that
//! rendering is independent of the order sources were listed in.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::manifest::declaration::RoutingDeclaration;

/// A single path → backend rule.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PathRule {
    pub path: String,
    pub service: String,
    pub port: u16,
}

/// All path rules declared for one host within a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostGroup {
    pub host: String,
    pub paths: Vec<PathRule>,
}

/// All hosts declared under one group name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteGroup {
    pub name: String,
    pub hosts: Vec<HostGroup>,
}

/// Aggregate declarations into route groups.
///
/// Groups are ordered by name, hosts by host name and paths by
/// `(path, service, port)`. Duplicate declarations are all kept.
pub fn aggregate<'a, I>(declarations: I) -> Vec<RouteGroup>
where
    I: IntoIterator<Item = &'a RoutingDeclaration>,
{
    let mut groups: BTreeMap<&str, BTreeMap<&str, Vec<PathRule>>> = BTreeMap::new();

    for decl in declarations {
        groups
            .entry(decl.group_name.as_str())
            .or_default()
            .entry(decl.host.as_str())
            .or_default()
            .push(PathRule {
                path: decl.path.clone(),
                service: decl.service.clone(),
                port: decl.port,
            });
    }

    groups
        .into_iter()
        .map(|(name, hosts)| RouteGroup {
            name: name.to_string(),
            hosts: hosts
                .into_iter()
                .map(|(host, mut paths)| {
                    paths.sort();
                    HostGroup {
                        host: host.to_string(),
                        paths,
                    }
                })
                .collect(),
        })
        .collect()
}
