//! Annotation-driven Ingress reconciler library.
//!
//! Services carry a YAML routing annotation; the engine groups them by route
//! group name, renders one Ingress per group, and converges the cluster toward
//! that set on every trigger.

pub mod admin;
pub mod config;
pub mod controller;
pub mod kube_store;
pub mod lifecycle;
pub mod manifest;
pub mod observability;
pub mod reconcile;
pub mod store;

pub use config::OperatorConfig;
pub use lifecycle::Shutdown;
pub use reconcile::Engine;
