//! Conversions between engine types and Kubernetes objects.

use k8s_openapi::api::core::v1::Service;
use k8s_openapi::api::networking::v1::{
    HTTPIngressPath, HTTPIngressRuleValue, Ingress, IngressBackend, IngressRule,
    IngressServiceBackend, IngressSpec, ServiceBackendPort,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use kube::ResourceExt;

use crate::manifest::{DesiredResource, HostGroup, PathRule};
use crate::store::{ObservedResource, SourceResource};

/// Path type written on every rendered path. Paths like `/*` are passed through verbatim.
pub const PATH_TYPE: &str = "ImplementationSpecific";

/// Project a Service onto the fields the engine reads.
pub fn source_from_service(service: &Service) -> SourceResource {
    SourceResource {
        name: service.name_any(),
        annotations: service.annotations().clone(),
    }
}

/// Project an Ingress onto its name and annotations.
pub fn observed_from_ingress(ingress: &Ingress) -> ObservedResource {
    ObservedResource {
        name: ingress.name_any(),
        annotations: ingress.annotations().clone(),
    }
}

/// Render a desired resource as a networking.k8s.io/v1 Ingress.
pub fn to_ingress(resource: &DesiredResource, namespace: &str) -> Ingress {
    Ingress {
        metadata: ObjectMeta {
            name: Some(resource.name.clone()),
            namespace: Some(namespace.to_string()),
            annotations: Some(resource.annotations.clone()),
            ..Default::default()
        },
        spec: Some(IngressSpec {
            rules: Some(resource.rules.iter().map(to_rule).collect()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

// An empty host becomes a rule without `host`, which matches every host.
fn to_rule(host: &HostGroup) -> IngressRule {
    IngressRule {
        host: (!host.host.is_empty()).then(|| host.host.clone()),
        http: Some(HTTPIngressRuleValue {
            paths: host.paths.iter().map(to_path).collect(),
        }),
    }
}

fn to_path(rule: &PathRule) -> HTTPIngressPath {
    HTTPIngressPath {
        path: Some(rule.path.clone()),
        path_type: PATH_TYPE.to_string(),
        backend: IngressBackend {
            service: Some(IngressServiceBackend {
                name: rule.service.clone(),
                port: Some(ServiceBackendPort {
                    number: Some(i32::from(rule.port)),
                    ..Default::default()
                }),
            }),
            ..Default::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn staging() -> DesiredResource {
        let mut annotations = BTreeMap::new();
        annotations.insert("managed".to_string(), "true".to_string());
        DesiredResource {
            name: "staging".into(),
            annotations,
            rules: vec![
                HostGroup {
                    host: "other.example.com".into(),
                    paths: vec![
                        PathRule { path: "/asdf".into(), service: "web".into(), port: 80 },
                        PathRule { path: "/fdsa".into(), service: "web2".into(), port: 80 },
                    ],
                },
                HostGroup {
                    host: "that.example.com".into(),
                    paths: vec![PathRule { path: "/that".into(), service: "web".into(), port: 80 }],
                },
            ],
        }
    }

    #[test]
    fn test_to_ingress() {
        let ingress = to_ingress(&staging(), "default");

        assert_eq!(ingress.metadata.name.as_deref(), Some("staging"));
        assert_eq!(ingress.metadata.namespace.as_deref(), Some("default"));
        assert_eq!(
            ingress.metadata.annotations.as_ref().and_then(|a| a.get("managed")).map(String::as_str),
            Some("true")
        );

        let rules = ingress.spec.unwrap().rules.unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].host.as_deref(), Some("other.example.com"));

        let paths = &rules[0].http.as_ref().unwrap().paths;
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[1].path.as_deref(), Some("/fdsa"));
        assert_eq!(paths[1].path_type, PATH_TYPE);

        let backend = paths[1].backend.service.as_ref().unwrap();
        assert_eq!(backend.name, "web2");
        assert_eq!(backend.port.as_ref().unwrap().number, Some(80));
    }

    #[test]
    fn test_empty_host_renders_catch_all_rule() {
        let resource = DesiredResource {
            name: "fallback".into(),
            annotations: BTreeMap::new(),
            rules: vec![HostGroup {
                host: String::new(),
                paths: vec![PathRule { path: "/".into(), service: "web".into(), port: 80 }],
            }],
        };

        let rules = to_ingress(&resource, "default").spec.unwrap().rules.unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].host, None);
        assert_eq!(rules[0].http.as_ref().unwrap().paths.len(), 1);
    }

    #[test]
    fn test_round_trip_metadata() {
        let ingress = to_ingress(&staging(), "default");
        let observed = observed_from_ingress(&ingress);
        assert_eq!(observed.name, "staging");
        assert_eq!(observed.annotations.get("managed").map(String::as_str), Some("true"));
    }

    #[test]
    fn test_source_from_service_without_annotations() {
        let service = Service {
            metadata: ObjectMeta { name: Some("another".into()), ..Default::default() },
            ..Default::default()
        };
        let source = source_from_service(&service);
        assert_eq!(source.name, "another");
        assert!(source.annotations.is_empty());
    }
}
