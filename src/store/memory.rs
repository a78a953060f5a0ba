//! In-memory resource store.
//!
//! Backs dry runs of the CLI and the test suites. Supports injecting failures
//! per operation and resource name, and records every mutating call in order.

use std::sync::Mutex;

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};

use crate::manifest::DesiredResource;
use crate::store::{ObservedResource, ResourceStore, SourceResource, StoreError};

const KIND: &str = "Ingress";

/// Store operations, used for fault injection and call recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    ListSources,
    ListTargets,
    Create,
    Update,
    Delete,
}

/// One recorded store call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreCall {
    pub op: StoreOp,
    pub name: String,
}

/// Thread-safe in-memory store using `DashMap`.
#[derive(Default)]
pub struct MemoryStore {
    sources: DashMap<String, SourceResource>,
    targets: DashMap<String, DesiredResource>,
    faults: DashSet<(StoreOp, String)>,
    calls: Mutex<Vec<StoreCall>>,
}

impl MemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a source resource.
    pub fn insert_source(&self, source: SourceResource) {
        self.sources.insert(source.name.clone(), source);
    }

    /// Remove a source resource.
    pub fn remove_source(&self, name: &str) {
        self.sources.remove(name);
    }

    /// Insert or replace a target resource directly, bypassing call recording.
    pub fn insert_target(&self, target: DesiredResource) {
        self.targets.insert(target.name.clone(), target);
    }

    /// Returns a stored target resource by name.
    pub fn target(&self, name: &str) -> Option<DesiredResource> {
        self.targets.get(name).map(|entry| entry.value().clone())
    }

    /// Returns all stored target names, sorted.
    pub fn target_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.targets.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }

    /// Make `op` fail for `name`. List operations ignore the name.
    pub fn fail(&self, op: StoreOp, name: &str) {
        self.faults.insert((op, Self::fault_key(op, name)));
    }

    /// Remove all injected failures.
    pub fn clear_faults(&self) {
        self.faults.clear();
    }

    /// Returns mutating calls recorded so far, in call order.
    pub fn calls(&self) -> Vec<StoreCall> {
        match self.calls.lock() {
            Ok(calls) => calls.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn fault_key(op: StoreOp, name: &str) -> String {
        match op {
            StoreOp::ListSources | StoreOp::ListTargets => "*".to_string(),
            _ => name.to_string(),
        }
    }

    fn check(&self, op: StoreOp, name: &str) -> Result<(), StoreError> {
        if self.faults.contains(&(op, Self::fault_key(op, name))) {
            return Err(StoreError::Backend(
                format!("injected {:?} failure for '{}'", op, name).into(),
            ));
        }
        Ok(())
    }

    fn record(&self, op: StoreOp, name: &str) {
        let call = StoreCall { op, name: name.to_string() };
        match self.calls.lock() {
            Ok(mut calls) => calls.push(call),
            Err(poisoned) => poisoned.into_inner().push(call),
        }
    }
}

#[async_trait]
impl ResourceStore for MemoryStore {
    async fn list_sources(&self) -> Result<Vec<SourceResource>, StoreError> {
        self.check(StoreOp::ListSources, "")?;
        let mut sources: Vec<SourceResource> =
            self.sources.iter().map(|entry| entry.value().clone()).collect();
        sources.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(sources)
    }

    async fn list_targets(&self) -> Result<Vec<ObservedResource>, StoreError> {
        self.check(StoreOp::ListTargets, "")?;
        let mut targets: Vec<ObservedResource> = self
            .targets
            .iter()
            .map(|entry| ObservedResource {
                name: entry.key().clone(),
                annotations: entry.value().annotations.clone(),
            })
            .collect();
        targets.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(targets)
    }

    async fn create(&self, resource: &DesiredResource) -> Result<(), StoreError> {
        self.record(StoreOp::Create, &resource.name);
        self.check(StoreOp::Create, &resource.name)?;
        if self.targets.contains_key(&resource.name) {
            return Err(StoreError::AlreadyExists { kind: KIND, name: resource.name.clone() });
        }
        self.targets.insert(resource.name.clone(), resource.clone());
        Ok(())
    }

    async fn update(&self, resource: &DesiredResource) -> Result<(), StoreError> {
        self.record(StoreOp::Update, &resource.name);
        self.check(StoreOp::Update, &resource.name)?;
        match self.targets.get_mut(&resource.name) {
            Some(mut entry) => {
                *entry = resource.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound { kind: KIND, name: resource.name.clone() }),
        }
    }

    async fn delete(&self, resource: &ObservedResource) -> Result<(), StoreError> {
        self.record(StoreOp::Delete, &resource.name);
        self.check(StoreOp::Delete, &resource.name)?;
        match self.targets.remove(&resource.name) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound { kind: KIND, name: resource.name.clone() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn desired(name: &str) -> DesiredResource {
        DesiredResource { name: name.into(), annotations: BTreeMap::new(), rules: Vec::new() }
    }

    #[tokio::test]
    async fn test_create_then_already_exists() {
        let store = MemoryStore::new();
        store.create(&desired("a")).await.unwrap();
        let err = store.create(&desired("a")).await.unwrap_err();
        assert!(err.is_already_exists());
        assert_eq!(store.target_names(), vec!["a"]);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = MemoryStore::new();
        let err = store.update(&desired("a")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_injected_faults() {
        let store = MemoryStore::new();
        store.fail(StoreOp::Create, "a");
        store.fail(StoreOp::ListTargets, "ignored");

        assert!(store.create(&desired("a")).await.is_err());
        assert!(store.create(&desired("b")).await.is_ok());
        assert!(store.list_targets().await.is_err());

        store.clear_faults();
        assert!(store.create(&desired("a")).await.is_ok());
        assert_eq!(store.calls().len(), 3);
    }
}
