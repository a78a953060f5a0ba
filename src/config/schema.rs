//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the operator.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the reconciler.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct OperatorConfig {
    /// Which source resources to watch and how often to resync.
    pub watch: WatchConfig,

    /// Annotation keys read from sources and written on targets.
    pub annotations: AnnotationConfig,

    /// Reconciliation policy switches.
    pub reconcile: ReconcileConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Admin HTTP endpoint.
    pub admin: AdminConfig,
}

/// Watch configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Namespace sources and targets live in.
    pub namespace: String,

    /// Label selector applied to the source watch.
    pub label_selector: String,

    /// Periodic full resync interval in seconds.
    pub resync_secs: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            namespace: "default".to_string(),
            label_selector: "icc-operator=true".to_string(),
            resync_secs: 20,
        }
    }
}

/// Annotation keys.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AnnotationConfig {
    /// Source annotation holding the YAML routing declaration.
    pub config_key: String,

    /// Target annotation marking engine-owned resources.
    pub managed_key: String,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            config_key: "ingress-reconciler/config".to_string(),
            managed_key: "ingress-reconciler/managed".to_string(),
        }
    }
}

/// What to do when a source annotation fails to parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParseFailurePolicy {
    /// Abort the whole pass; nothing is applied or deleted.
    #[default]
    Abort,
    /// Log and leave the malformed source out of the desired state.
    Skip,
}

/// Order of the two reconcile phases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PhaseOrder {
    #[default]
    DeleteFirst,
    ApplyFirst,
}

/// Reconciliation policy.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ReconcileConfig {
    pub on_parse_error: ParseFailurePolicy,
    pub order: PhaseOrder,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Filter used when `RUST_LOG` is unset.
    pub log_filter: String,

    /// Emit logs as JSON.
    pub json_logs: bool,

    /// Enable the Prometheus exporter.
    pub metrics_enabled: bool,

    /// Exporter bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "ingress_reconciler=info".to_string(),
            json_logs: false,
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    pub enabled: bool,
    pub bind_address: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind_address: "0.0.0.0:8081".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: OperatorConfig = toml::from_str("").unwrap();
        assert_eq!(config.watch.namespace, "default");
        assert_eq!(config.watch.resync_secs, 20);
        assert_eq!(config.reconcile.on_parse_error, ParseFailurePolicy::Abort);
        assert_eq!(config.reconcile.order, PhaseOrder::DeleteFirst);
    }

    #[test]
    fn test_policy_spelling() {
        let raw = r#"
            [reconcile]
            on_parse_error = "skip"
            order = "apply-first"

            [watch]
            namespace = "edge"
        "#;
        let config: OperatorConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.reconcile.on_parse_error, ParseFailurePolicy::Skip);
        assert_eq!(config.reconcile.order, PhaseOrder::ApplyFirst);
        assert_eq!(config.watch.namespace, "edge");
        assert_eq!(config.watch.label_selector, "icc-operator=true");
    }
}
