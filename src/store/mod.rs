//! Resource store boundary.
//!
//! # Responsibilities
//! - List source resources (annotated services)
//! - List target resources (routing rules)
//! - Create, update and delete target resources
//!
//! # Design Decisions
//! - The engine owns no persistent state; the store is the source of truth
//! - `create` reports `AlreadyExists` distinctly so callers can fall back to update
//! - Implementations: `memory::MemoryStore` (dry runs, tests) and
//!   `crate::kube_store::KubeStore` (API server)

pub mod memory;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::manifest::DesiredResource;

/// A resource that may carry a routing annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceResource {
    pub name: String,
    pub annotations: BTreeMap<String, String>,
}

/// A routing-rule resource as currently listed by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObservedResource {
    pub name: String,
    pub annotations: BTreeMap<String, String>,
}

/// Errors returned by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A create targeted a name that is already taken.
    #[error("{kind} '{name}' already exists")]
    AlreadyExists { kind: &'static str, name: String },

    /// An update or delete targeted a name that does not exist.
    #[error("{kind} '{name}' not found")]
    NotFound { kind: &'static str, name: String },

    /// Any other failure talking to the store.
    #[error("resource store request failed: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl StoreError {
    /// True when a create hit an existing name and should fall back to update.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, StoreError::AlreadyExists { .. })
    }
}

/// Narrow interface the reconciliation engine needs from a resource store.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Kind name of the target resources, used in logs.
    fn target_kind(&self) -> &'static str {
        "Ingress"
    }

    /// Every source resource in scope, annotated or not.
    async fn list_sources(&self) -> Result<Vec<SourceResource>, StoreError>;

    /// Every target resource in scope, managed or not.
    async fn list_targets(&self) -> Result<Vec<ObservedResource>, StoreError>;

    /// Create a target; `AlreadyExists` when the name is taken.
    async fn create(&self, resource: &DesiredResource) -> Result<(), StoreError>;

    /// Replace the rules and annotations of an existing target.
    async fn update(&self, resource: &DesiredResource) -> Result<(), StoreError>;

    /// Delete a target by name.
    async fn delete(&self, resource: &ObservedResource) -> Result<(), StoreError>;
}
