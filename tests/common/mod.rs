//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use ingress_reconciler::config::OperatorConfig;
use ingress_reconciler::manifest::{DesiredResource, MANAGED_VALUE};
use ingress_reconciler::observability::metrics::LocalErrorCounter;
use ingress_reconciler::reconcile::Engine;
use ingress_reconciler::store::memory::MemoryStore;
use ingress_reconciler::store::SourceResource;

pub const PROD_CONFIG: &str = "name: production
host: this.example.com
path: /*
service: web
port: 80";

pub const STAGING_CONFIG: &str = "name: staging
host: that.example.com
path: /that
service: web
port: 80";

pub const STAGING_CONFIG_2: &str = "name: staging
host: other.example.com
path: /asdf
service: web
port: 80";

pub const STAGING_CONFIG_3: &str = "name: staging
host: other.example.com
path: /fdsa
service: web2
port: 80";

/// Everything a test needs to drive one engine.
pub struct Harness {
    pub config: OperatorConfig,
    pub store: Arc<MemoryStore>,
    pub errors: Arc<LocalErrorCounter>,
    pub engine: Arc<Engine>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(OperatorConfig::default())
    }

    pub fn with_config(config: OperatorConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let errors = Arc::new(LocalErrorCounter::new());
        let engine = Arc::new(Engine::new(store.clone(), errors.clone(), &config));
        Self { config, store, errors, engine }
    }

    /// Add a service carrying `raw` under the configured annotation key.
    pub fn annotated_service(&self, name: &str, raw: &str) {
        let mut annotations = BTreeMap::new();
        annotations.insert(self.config.annotations.config_key.clone(), raw.to_string());
        self.store.insert_source(SourceResource { name: name.into(), annotations });
    }

    /// Add a service without any routing annotation.
    pub fn plain_service(&self, name: &str) {
        let mut annotations = BTreeMap::new();
        annotations.insert("unrelated/annotation".to_string(), "x".to_string());
        self.store.insert_source(SourceResource { name: name.into(), annotations });
    }

    /// Seed an existing Ingress, managed or not.
    pub fn existing_ingress(&self, name: &str, managed: bool) {
        let mut annotations = BTreeMap::new();
        if managed {
            annotations.insert(self.config.annotations.managed_key.clone(), MANAGED_VALUE.to_string());
        }
        self.store.insert_target(DesiredResource { name: name.into(), annotations, rules: Vec::new() });
    }

    /// The four services of the reference fixture plus one without annotation.
    pub fn reference_services(&self) {
        self.annotated_service("prod", PROD_CONFIG);
        self.annotated_service("one", STAGING_CONFIG);
        self.annotated_service("two", STAGING_CONFIG_2);
        self.annotated_service("three", STAGING_CONFIG_3);
        self.plain_service("another");
    }
}

/// Poll `check` until it returns true or `timeout` elapses.
pub async fn eventually<F>(timeout: Duration, mut check: F) -> bool
where
    F: FnMut() -> bool,
{
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}
