//! Observed-state selection.

use crate::manifest::desired::MANAGED_VALUE;
use crate::store::ObservedResource;

/// Keep only the resources carrying `marker_key: "true"`.
pub fn select(all: Vec<ObservedResource>, marker_key: &str) -> Vec<ObservedResource> {
    all.into_iter()
        .filter(|resource| {
            resource.annotations.get(marker_key).map(String::as_str) == Some(MANAGED_VALUE)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn observed(name: &str, marker: Option<&str>) -> ObservedResource {
        let mut annotations = BTreeMap::new();
        annotations.insert("unrelated".to_string(), "true".to_string());
        if let Some(value) = marker {
            annotations.insert("managed".to_string(), value.to_string());
        }
        ObservedResource { name: name.into(), annotations }
    }

    #[test]
    fn test_select_exact_marker_only() {
        let all = vec![
            observed("production", Some("true")),
            observed("some-other", None),
            observed("uppercase", Some("TRUE")),
            observed("empty", Some("")),
            observed("staging", Some("true")),
        ];

        let names: Vec<_> = select(all, "managed").into_iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["production", "staging"]);
    }
}
